use crate::q15::Q15;
use crate::simd::neon::i16x8::I16x8;
use crate::simd::traits::Q15Lanes;

/// NEON chunk kernel.
///
/// # Safety
///
/// The CPU must support NEON and all slices must have the same length.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn axpy_chunk(a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
    I16x8::axpy_chunk(a, b, y, alpha)
}
