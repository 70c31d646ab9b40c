use std::arch::aarch64::*;

use crate::q15::Q15;
use crate::simd::traits::Q15Lanes;

pub const NEON_ALIGNMENT: usize = 16;

pub const LANE_COUNT: usize = 8;

/// A NEON vector of 8 Q15 values.
#[derive(Copy, Clone, Debug)]
pub struct I16x8 {
    elements: int16x8_t,
}

/// Widened accumulator: lanes 0..4 in `lo`, 4..8 in `hi`.
#[derive(Copy, Clone, Debug)]
pub struct I32x8 {
    lo: int32x4_t,
    hi: int32x4_t,
}

impl Q15Lanes for I16x8 {
    type Wide = I32x8;

    const LANE_COUNT: usize = LANE_COUNT;

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn load(slice: &[Q15]) -> Self {
        debug_assert!(slice.len() >= LANE_COUNT, "Size must be >= {LANE_COUNT}");

        Self {
            elements: vld1q_s16(slice.as_ptr()),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn load_partial(slice: &[Q15]) -> Self {
        debug_assert!(slice.len() < LANE_COUNT, "Size must be < {LANE_COUNT}");

        let mut padded = [0 as Q15; LANE_COUNT];
        padded[..slice.len()].copy_from_slice(slice);

        Self::load(&padded)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn widen(self) -> I32x8 {
        I32x8 {
            lo: vmovl_s16(vget_low_s16(self.elements)),
            hi: vmovl_high_s16(self.elements),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn widening_mac(acc: I32x8, alpha: Q15, b: Self) -> I32x8 {
        I32x8 {
            lo: vmlal_n_s16(acc.lo, vget_low_s16(b.elements), alpha),
            hi: vmlal_high_n_s16(acc.hi, b.elements, alpha),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn narrow_saturate(acc: I32x8) -> Self {
        Self {
            elements: vqmovn_high_s32(vqmovn_s32(acc.lo), acc.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn store(self, out: &mut [Q15]) {
        debug_assert!(out.len() >= LANE_COUNT, "Size must be >= {LANE_COUNT}");

        vst1q_s16(out.as_mut_ptr(), self.elements);
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn store_partial(self, out: &mut [Q15]) {
        debug_assert!(out.len() < LANE_COUNT, "Size must be < {LANE_COUNT}");

        let mut padded = [0 as Q15; LANE_COUNT];
        self.store(&mut padded);

        let len = out.len();
        out.copy_from_slice(&padded[..len]);
    }
}
