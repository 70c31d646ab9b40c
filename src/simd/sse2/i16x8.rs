//! SSE2 8-lane Q15 vector.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::q15::Q15;
use crate::simd::traits::Q15Lanes;

pub(crate) const SSE_ALIGNMENT: usize = 16;

pub(crate) const LANE_COUNT: usize = 8;

/// SSE2 vector containing 8 packed Q15 values.
#[derive(Copy, Clone, Debug)]
pub struct I16x8 {
    pub elements: __m128i,
}

/// Widened accumulator: lanes 0..4 in `lo`, 4..8 in `hi`.
#[derive(Copy, Clone, Debug)]
pub struct I32x8 {
    pub lo: __m128i,
    pub hi: __m128i,
}

impl Q15Lanes for I16x8 {
    type Wide = I32x8;

    const LANE_COUNT: usize = LANE_COUNT;

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn load(slice: &[Q15]) -> Self {
        debug_assert!(slice.len() >= LANE_COUNT, "Size must be >= {LANE_COUNT}");

        let ptr = slice.as_ptr() as *const __m128i;

        let elements = match (ptr as usize) % SSE_ALIGNMENT == 0 {
            true => _mm_load_si128(ptr),
            false => _mm_loadu_si128(ptr),
        };

        Self { elements }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn load_partial(slice: &[Q15]) -> Self {
        debug_assert!(slice.len() < LANE_COUNT, "Size must be < {LANE_COUNT}");

        let mut padded = [0 as Q15; LANE_COUNT];
        padded[..slice.len()].copy_from_slice(slice);

        Self::load(&padded)
    }

    /// Duplicates each lane into both halves of an i32, then shifts the copy
    /// in the upper half down arithmetically.
    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn widen(self) -> I32x8 {
        let v = self.elements;

        I32x8 {
            lo: _mm_srai_epi32::<16>(_mm_unpacklo_epi16(v, v)),
            hi: _mm_srai_epi32::<16>(_mm_unpackhi_epi16(v, v)),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn widening_mac(acc: I32x8, alpha: Q15, b: Self) -> I32x8 {
        let alpha = _mm_set1_epi16(alpha);

        // Low and high 16 bits of each 32-bit product.
        let prod_lo = _mm_mullo_epi16(b.elements, alpha);
        let prod_hi = _mm_mulhi_epi16(b.elements, alpha);

        I32x8 {
            lo: _mm_add_epi32(acc.lo, _mm_unpacklo_epi16(prod_lo, prod_hi)),
            hi: _mm_add_epi32(acc.hi, _mm_unpackhi_epi16(prod_lo, prod_hi)),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn narrow_saturate(acc: I32x8) -> Self {
        Self {
            elements: _mm_packs_epi32(acc.lo, acc.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn store(self, out: &mut [Q15]) {
        debug_assert!(out.len() >= LANE_COUNT, "Size must be >= {LANE_COUNT}");

        let ptr = out.as_mut_ptr() as *mut __m128i;

        match (ptr as usize) % SSE_ALIGNMENT == 0 {
            true => _mm_store_si128(ptr, self.elements),
            false => _mm_storeu_si128(ptr, self.elements),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn store_partial(self, out: &mut [Q15]) {
        debug_assert!(out.len() < LANE_COUNT, "Size must be < {LANE_COUNT}");

        let mut padded = [0 as Q15; LANE_COUNT];
        self.store(&mut padded);

        let len = out.len();
        out.copy_from_slice(&padded[..len]);
    }
}
