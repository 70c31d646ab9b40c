//! AVX2 16-lane Q15 vector.
//!
//! `I16x16` wraps a `__m256i` holding 16 packed `i16` values. Its widened
//! counterpart `I32x16` keeps the same 16 lanes as two `__m256i` of 8 `i32`:
//! `lo` holds lanes 0..8 and `hi` lanes 8..16.
//!
//! # Numeric steps
//!
//! - **Widen**: `_mm256_cvtepi16_epi32` on each 128-bit half (sign extension)
//! - **MAC**: `_mm256_mullo_epi32` + `_mm256_add_epi32`; exact, the product
//!   and sum never leave the i32 range
//! - **Narrow**: `_mm256_packs_epi32` saturates to i16. It interleaves 64-bit
//!   quarters per 128-bit lane, so `_mm256_permute4x64_epi64::<0xD8>` puts the
//!   lanes back in order

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::q15::Q15;
use crate::simd::traits::Q15Lanes;

/// AVX2 memory alignment requirement in bytes.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// Number of Q15 elements in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 16;

/// Quarter order `[0, 2, 1, 3]` undoing the per-lane interleave of `packs`.
const PACK_ORDER: i32 = 0b11_01_10_00;

/// AVX2 SIMD vector containing 16 packed Q15 values.
#[derive(Copy, Clone, Debug)]
pub struct I16x16 {
    pub elements: __m256i,
}

/// Widened accumulator for the 16 lanes of an [`I16x16`].
#[derive(Copy, Clone, Debug)]
pub struct I32x16 {
    pub lo: __m256i,
    pub hi: __m256i,
}

impl I16x16 {
    /// Checks if a pointer is aligned for `_mm256_load_si256`.
    #[inline(always)]
    pub fn is_aligned(ptr: *const Q15) -> bool {
        (ptr as usize) % AVX_ALIGNMENT == 0
    }
}

impl Q15Lanes for I16x16 {
    type Wide = I32x16;

    const LANE_COUNT: usize = LANE_COUNT;

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn load(slice: &[Q15]) -> Self {
        debug_assert!(slice.len() >= LANE_COUNT, "Size must be >= {LANE_COUNT}");

        let ptr = slice.as_ptr() as *const __m256i;

        let elements = match Self::is_aligned(slice.as_ptr()) {
            true => _mm256_load_si256(ptr),
            false => _mm256_loadu_si256(ptr),
        };

        Self { elements }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn load_partial(slice: &[Q15]) -> Self {
        debug_assert!(slice.len() < LANE_COUNT, "Size must be < {LANE_COUNT}");

        // AVX2 has no 16-bit masked load; stage through a zeroed buffer.
        let mut padded = [0 as Q15; LANE_COUNT];
        padded[..slice.len()].copy_from_slice(slice);

        Self::load(&padded)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn widen(self) -> I32x16 {
        I32x16 {
            lo: _mm256_cvtepi16_epi32(_mm256_castsi256_si128(self.elements)),
            hi: _mm256_cvtepi16_epi32(_mm256_extracti128_si256::<1>(self.elements)),
        }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn widening_mac(acc: I32x16, alpha: Q15, b: Self) -> I32x16 {
        let alpha = _mm256_set1_epi32(alpha as i32);
        let b = b.widen();

        I32x16 {
            lo: _mm256_add_epi32(acc.lo, _mm256_mullo_epi32(alpha, b.lo)),
            hi: _mm256_add_epi32(acc.hi, _mm256_mullo_epi32(alpha, b.hi)),
        }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn narrow_saturate(acc: I32x16) -> Self {
        let packed = _mm256_packs_epi32(acc.lo, acc.hi);

        Self {
            elements: _mm256_permute4x64_epi64::<PACK_ORDER>(packed),
        }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn store(self, out: &mut [Q15]) {
        debug_assert!(out.len() >= LANE_COUNT, "Size must be >= {LANE_COUNT}");

        let ptr = out.as_mut_ptr() as *mut __m256i;

        match Self::is_aligned(out.as_ptr()) {
            true => _mm256_store_si256(ptr, self.elements),
            false => _mm256_storeu_si256(ptr, self.elements),
        }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn store_partial(self, out: &mut [Q15]) {
        debug_assert!(out.len() < LANE_COUNT, "Size must be < {LANE_COUNT}");

        let mut padded = [0 as Q15; LANE_COUNT];
        self.store(&mut padded);

        let len = out.len();
        out.copy_from_slice(&padded[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q15::{axpy_element, widen};

    fn lanes(v: I16x16) -> [Q15; LANE_COUNT] {
        let mut out = [0; LANE_COUNT];
        unsafe { v.store(&mut out) };
        out
    }

    fn wide_lanes(v: I32x16) -> [i32; LANE_COUNT] {
        let mut out = [0i32; LANE_COUNT];
        unsafe {
            _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, v.lo);
            _mm256_storeu_si256(out[8..].as_mut_ptr() as *mut __m256i, v.hi);
        }
        out
    }

    fn ramp() -> [Q15; LANE_COUNT] {
        std::array::from_fn(|i| (i as i16 - 8) * 4_001)
    }

    #[test]
    fn widen_keeps_lane_order_and_sign() {
        if !std::is_x86_feature_detected!("avx2") {
            return;
        }

        let data = ramp();
        let wide = unsafe { I16x16::load(&data).widen() };

        assert_eq!(wide_lanes(wide), data.map(widen));
    }

    #[test]
    fn narrow_restores_lane_order() {
        if !std::is_x86_feature_detected!("avx2") {
            return;
        }

        let data = ramp();
        let round_trip = unsafe { I16x16::narrow_saturate(I16x16::load(&data).widen()) };

        assert_eq!(lanes(round_trip), data);
    }

    #[test]
    fn mac_and_narrow_saturate_per_lane() {
        if !std::is_x86_feature_detected!("avx2") {
            return;
        }

        let a = ramp();
        let b: [Q15; LANE_COUNT] = std::array::from_fn(|i| if i % 2 == 0 { i16::MIN } else { i16::MAX });

        for alpha in [3, i16::MIN, i16::MAX, -1] {
            let result = unsafe {
                let acc = I16x16::widening_mac(I16x16::load(&a).widen(), alpha, I16x16::load(&b));
                I16x16::narrow_saturate(acc)
            };
            let expected: [Q15; LANE_COUNT] = std::array::from_fn(|i| axpy_element(a[i], b[i], alpha));

            assert_eq!(lanes(result), expected, "alpha={alpha}");
        }
    }

    #[test]
    fn partial_load_zero_pads_and_partial_store_stops() {
        if !std::is_x86_feature_detected!("avx2") {
            return;
        }

        let data = [1, -2, 3, -4, 5];
        let v = unsafe { I16x16::load_partial(&data) };

        let mut expected = [0; LANE_COUNT];
        expected[..5].copy_from_slice(&data);
        assert_eq!(lanes(v), expected);

        let mut out = [9i16; 7];
        unsafe { v.store_partial(&mut out[..3]) };
        assert_eq!(out, [1, -2, 3, 9, 9, 9, 9]);
    }
}
