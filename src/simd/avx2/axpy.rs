use crate::q15::Q15;
use crate::simd::avx2::i16x16::I16x16;
use crate::simd::traits::Q15Lanes;

/// AVX2 chunk kernel.
///
/// # Safety
///
/// The CPU must support AVX2 and all slices must have the same length.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn axpy_chunk(a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
    I16x16::axpy_chunk(a, b, y, alpha)
}
