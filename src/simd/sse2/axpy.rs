use crate::q15::Q15;
use crate::simd::sse2::i16x8::I16x8;
use crate::simd::traits::Q15Lanes;

/// SSE2 chunk kernel.
///
/// # Safety
///
/// The CPU must support SSE2 and all slices must have the same length.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn axpy_chunk(a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
    I16x8::axpy_chunk(a, b, y, alpha)
}
