//! Saturating Q15 fixed-point `y[i] = a[i] + alpha * b[i]`.
//!
//! All values are `i16` in Q15 format. The multiply-accumulate runs in 32 bits
//! and is narrowed back to 16 bits with saturation. The crate provides:
//!
//! - [`scalar::q15_axpy_ref`]: the scalar reference kernel
//! - [`simd::VectorKernel`]: chunked AVX2 / SSE2 / NEON kernels behind a
//!   runtime probe, with a scalar fallback
//! - [`harness`]: the equivalence harness that proves both agree bit-for-bit
//!   and times them with an injected cycle counter
//!
//! Note the operand convention: `alpha` scales `b`, not `a`.
//!
//! ```rust
//! use q15axpy::{scalar::q15_axpy_ref, simd::VectorKernel};
//!
//! let a = [100, 32_000, -32_000];
//! let b = [10, 1_000, 1_000];
//! let (mut y_ref, mut y_vec) = ([0i16; 3], [0i16; 3]);
//!
//! q15_axpy_ref(&a, &b, &mut y_ref, 3, 3).unwrap();
//! VectorKernel::probe().compute(&a, &b, &mut y_vec, 3, 3).unwrap();
//!
//! assert_eq!(y_ref, [130, 32_767, -29_000]);
//! assert_eq!(y_ref, y_vec);
//! ```

pub mod error;
pub mod harness;
pub mod q15;
pub mod scalar;
pub mod simd;
pub mod utils;

pub use simd::SimdAxpy;

/// Buffer alignment used by the harness (one cache line).
pub const DEFAULT_ALIGNMENT: usize = 64;

/// Length at or below which `par_simd_axpy` stays single-threaded.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Elements per rayon task; a multiple of every kernel's `vlmax`.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;
