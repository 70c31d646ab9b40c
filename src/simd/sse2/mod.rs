//! SSE2 Q15 kernel for 128-bit vectors.
//!
//! SSE2 is part of the `x86_64` baseline, so this path is the floor for every
//! 64-bit x86 CPU that lacks AVX2. It has no 32-bit lane multiply, so the
//! widening MAC builds exact i32 products from `_mm_mullo_epi16` and
//! `_mm_mulhi_epi16` halves.

pub mod i16x8;

pub(crate) mod axpy;
