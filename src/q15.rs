//! Q15 numeric policy shared by every kernel.
//!
//! A Q15 value is an `i16` carrying 15 fractional bits. No buffer stores its
//! scale; `a`, `b` and `y` all share the same implicit `2^-15` factor, so the
//! kernels operate on the raw integers.
//!
//! The single correctness contract of the crate lives here:
//!
//! ```text
//! y[i] = saturate_q15(widen(a[i]) + widen(alpha) * widen(b[i]))
//! ```
//!
//! The accumulation can never overflow 32 bits: `|alpha * b| <= 2^30` and
//! `|a| <= 2^15`.
//!
//! Narrowing goes through [`narrow_clip`], a fixed-point clip with a right
//! shift and a selectable [`RoundingMode`]. The kernels always narrow with
//! [`NARROW_SHIFT`] (zero), where every rounding mode degenerates to plain
//! saturation.

use serde::Serialize;

/// Signed 16-bit fixed-point value with 15 fractional bits.
pub type Q15 = i16;

/// Largest representable Q15 value, widened.
pub const Q15_MAX: i32 = i16::MAX as i32;

/// Smallest representable Q15 value, widened.
pub const Q15_MIN: i32 = i16::MIN as i32;

/// Right shift applied when narrowing the accumulator back to Q15.
pub const NARROW_SHIFT: u32 = 0;

/// Ratio between the accumulator width and the element width.
pub const WIDEN_FACTOR: usize = 2;

/// Sign-extends a Q15 value into the 32-bit accumulator domain.
#[inline(always)]
pub fn widen(x: Q15) -> i32 {
    x as i32
}

/// Fused widening multiply-accumulate: `acc + alpha * b` in 32 bits.
#[inline(always)]
pub fn mac_widening(acc: i32, alpha: Q15, b: Q15) -> i32 {
    acc + widen(alpha) * widen(b)
}

/// Clamps a 32-bit accumulator to `[-32768, 32767]`.
#[inline(always)]
pub fn saturate_q15(v: i32) -> Q15 {
    if v > Q15_MAX {
        i16::MAX
    } else if v < Q15_MIN {
        i16::MIN
    } else {
        v as i16
    }
}

/// Reference element computation used by every kernel and test.
#[inline(always)]
pub fn axpy_element(a: Q15, b: Q15, alpha: Q15) -> Q15 {
    saturate_q15(mac_widening(widen(a), alpha, b))
}

/// Fixed-point rounding modes for a narrowing right shift.
///
/// `d` is the shift amount and `v` the value being shifted; the rounding
/// increment `r` added to `v >> d` is:
///
/// | Mode  | increment `r`                              |
/// |-------|--------------------------------------------|
/// | `Rnu` | `v[d-1]`                                   |
/// | `Rne` | `v[d-1] & (v[d-2:0] != 0 \| v[d])`         |
/// | `Rdn` | `0`                                        |
/// | `Rod` | `!v[d] & (v[d-1:0] != 0)`                  |
///
/// With `d == 0` every bit range above is empty, so `r == 0` for all modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RoundingMode {
    /// Round to nearest, ties up.
    #[default]
    Rnu,
    /// Round to nearest, ties to even.
    Rne,
    /// Round down (truncate toward negative infinity).
    Rdn,
    /// Round to odd ("jam" the dropped bits into the LSB).
    Rod,
}

impl RoundingMode {
    /// Every supported mode, in declaration order.
    pub const ALL: [RoundingMode; 4] = [
        RoundingMode::Rnu,
        RoundingMode::Rne,
        RoundingMode::Rdn,
        RoundingMode::Rod,
    ];

    /// Rounding increment for `v >> shift`. `shift` must be in `0..=31`.
    #[inline]
    fn increment(self, v: i64, shift: u32) -> i64 {
        if shift == 0 {
            return 0;
        }

        let bit = |i: u32| (v >> i) & 1;
        let any_below = |i: u32| v & ((1i64 << i) - 1) != 0;

        match self {
            RoundingMode::Rnu => bit(shift - 1),
            RoundingMode::Rne => bit(shift - 1) & ((any_below(shift - 1) as i64) | bit(shift)),
            RoundingMode::Rdn => 0,
            RoundingMode::Rod => ((bit(shift) == 0) && any_below(shift)) as i64,
        }
    }
}

/// Narrowing fixed-point clip: `saturate_q15(round(acc >> shift))`.
///
/// Only the low five bits of `shift` are used, matching the width of a
/// 32-to-16 narrowing shift operand.
#[inline]
pub fn narrow_clip(acc: i32, shift: u32, mode: RoundingMode) -> Q15 {
    let shift = shift & 31;
    let v = acc as i64;
    let rounded = (v >> shift) + mode.increment(v, shift);

    rounded.clamp(Q15_MIN as i64, Q15_MAX as i64) as Q15
}
