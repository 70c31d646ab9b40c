//! AVX2 Q15 kernel for 256-bit vectors.
//!
//! One `__m256i` holds 16 Q15 lanes. The widened accumulator for those lanes
//! spans two registers of 8 `i32` each, so a chunk of `vlmax = 64` elements is
//! four registers of input and eight of accumulator.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86 or x86_64
//! - **Runtime Detection**: every entry point is `#[target_feature(enable = "avx2")]`
//!   and is only reached through an [`Accelerator`](crate::simd::Accelerator)
//!   probed with `is_x86_feature_detected!("avx2")`.

pub mod i16x16;

pub(crate) mod axpy;
