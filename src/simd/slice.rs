//! Slice-level Q15 operations.
//!
//! Owned-output wrappers around the kernels, in three flavours:
//!
//! - [`SimdAxpy::scalar_axpy`]: the scalar reference kernel
//! - [`SimdAxpy::simd_axpy`]: the probed [`VectorKernel`]
//! - [`SimdAxpy::par_simd_axpy`]: the probed kernel on rayon worker threads
//!
//! Every flavour writes into a fresh `Vec` and produces the same bits. Callers
//! that need aligned storage run a kernel into an
//! [`AlignedBuffer`](crate::utils::AlignedBuffer) themselves.
//!
//! # Usage Examples
//!
//! ```rust
//! use q15axpy::SimdAxpy;
//!
//! let a: Vec<i16> = (0..1000).map(|i| (i * 37 % 65_536 - 32_768) as i16).collect();
//! let b: Vec<i16> = (0..1000).map(|i| (i * 91 % 65_536 - 32_768) as i16).collect();
//!
//! let reference = a.as_slice().scalar_axpy(b.as_slice(), 3).unwrap();
//! let vectorized = a.as_slice().simd_axpy(b.as_slice(), 3).unwrap();
//!
//! assert_eq!(reference, vectorized);
//! ```

use rayon::prelude::*;

use crate::{
    error::{validation_error, Result},
    q15::Q15,
    scalar::q15_axpy_ref,
    simd::{traits::SimdAxpy, VectorKernel},
    PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD,
};

fn check_same_length(a: &[Q15], b: &[Q15]) -> Result<()> {
    if a.len() != b.len() {
        return Err(validation_error(format!(
            "input slices must have same length (a: {}, b: {})",
            a.len(),
            b.len()
        )));
    }

    Ok(())
}

#[inline(always)]
fn scalar_axpy(a: &[Q15], b: &[Q15], alpha: Q15) -> Result<Vec<Q15>> {
    check_same_length(a, b)?;

    let mut y = vec![0; a.len()];
    q15_axpy_ref(a, b, &mut y, a.len(), alpha)?;

    Ok(y)
}

#[inline(always)]
fn simd_axpy(a: &[Q15], b: &[Q15], alpha: Q15) -> Result<Vec<Q15>> {
    check_same_length(a, b)?;

    let mut y = vec![0; a.len()];
    VectorKernel::probe().compute(a, b, &mut y, a.len(), alpha)?;

    Ok(y)
}

/// Splits the signal into `PARALLEL_CHUNK_SIZE` blocks processed on the rayon
/// pool. The block size is a multiple of every kernel's `vlmax`, so each
/// worker sees the same chunk boundaries a single-threaded run would.
#[inline(always)]
fn parallel_simd_axpy(a: &[Q15], b: &[Q15], alpha: Q15) -> Result<Vec<Q15>> {
    // For small arrays, fall back to regular SIMD to avoid threading overhead
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return simd_axpy(a, b, alpha);
    }

    check_same_length(a, b)?;

    let kernel = VectorKernel::probe();
    let mut y = vec![0; a.len()];

    y.par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(a.par_chunks(PARALLEL_CHUNK_SIZE))
        .zip(b.par_chunks(PARALLEL_CHUNK_SIZE))
        .try_for_each(|((y_chunk, a_chunk), b_chunk)| {
            kernel.compute(a_chunk, b_chunk, y_chunk, y_chunk.len(), alpha)
        })?;

    Ok(y)
}

impl<'b> SimdAxpy<&'b [Q15]> for &[Q15] {
    type Output = Result<Vec<Q15>>;

    /// Returns a validation error if the slices differ in length.
    #[inline(always)]
    fn simd_axpy(self, rhs: &'b [Q15], alpha: Q15) -> Self::Output {
        simd_axpy(self, rhs, alpha)
    }

    /// Falls back to [`simd_axpy`](SimdAxpy::simd_axpy) at or below
    /// [`PARALLEL_SIMD_THRESHOLD`] elements.
    #[inline(always)]
    fn par_simd_axpy(self, rhs: &'b [Q15], alpha: Q15) -> Self::Output {
        parallel_simd_axpy(self, rhs, alpha)
    }

    #[inline(always)]
    fn scalar_axpy(self, rhs: &'b [Q15], alpha: Q15) -> Self::Output {
        scalar_axpy(self, rhs, alpha)
    }
}
