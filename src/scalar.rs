//! Scalar reference kernel.
//!
//! This is the ground truth every vectorized path is checked against. It walks
//! the buffers one element at a time with no parallelism assumed.

use crate::error::{validation_error, Result};
use crate::q15::{axpy_element, Q15};

/// Computes `y[i] = saturate(a[i] + alpha * b[i])` for `i` in `0..n`.
///
/// The accumulation is done in 32 bits and then clamped to the Q15 range. No
/// rounding takes place because the narrowing shift is zero. Elements of `y`
/// at or beyond `n` are left untouched.
///
/// # Errors
///
/// Returns a validation error if `n` exceeds the length of `a`, `b` or `y`.
/// Nothing is written in that case.
///
/// # Examples
///
/// ```rust
/// use q15axpy::scalar::q15_axpy_ref;
///
/// let a = [100, 32_000, -32_000];
/// let b = [10, 1_000, 1_000];
/// let mut y = [0i16; 3];
///
/// q15_axpy_ref(&a, &b, &mut y, 3, 3).unwrap();
/// assert_eq!(y, [130, 32_767, -29_000]);
/// ```
pub fn q15_axpy_ref(a: &[Q15], b: &[Q15], y: &mut [Q15], n: usize, alpha: Q15) -> Result<()> {
    check_lengths(a.len(), b.len(), y.len(), n)?;

    axpy_block(&a[..n], &b[..n], &mut y[..n], alpha);

    Ok(())
}

/// Checks the caller contract shared by every kernel: all three buffers hold
/// at least `n` elements.
pub(crate) fn check_lengths(a_len: usize, b_len: usize, y_len: usize, n: usize) -> Result<()> {
    for (name, len) in [("a", a_len), ("b", b_len), ("y", y_len)] {
        if n > len {
            return Err(validation_error(format!(
                "n={n} exceeds {name}.len()={len}"
            )));
        }
    }

    Ok(())
}

/// Unchecked inner loop over equally sized slices.
#[inline(always)]
pub(crate) fn axpy_block(a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
    debug_assert!(a.len() == y.len() && b.len() == y.len());

    for ((y_i, &a_i), &b_i) in y.iter_mut().zip(a).zip(b) {
        *y_i = axpy_element(a_i, b_i, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Q15Error;

    #[test]
    fn test_worked_example() {
        let a = [100, 32_000, -32_000];
        let b = [10, 1_000, 1_000];
        let mut y = [0; 3];

        q15_axpy_ref(&a, &b, &mut y, 3, 3).unwrap();

        assert_eq!(y, [130, 32_767, -29_000]);
    }

    #[test]
    fn test_most_negative_gain_saturates_high() {
        let a = [0; 4];
        let b = [i16::MIN; 4];
        let mut y = [0; 4];

        q15_axpy_ref(&a, &b, &mut y, 4, i16::MIN).unwrap();

        assert_eq!(y, [i16::MAX; 4]);
    }

    #[test]
    fn test_saturates_low() {
        let a = [-30_000, i16::MIN];
        let b = [i16::MAX, 1];
        let mut y = [0; 2];

        q15_axpy_ref(&a, &b, &mut y, 2, i16::MAX).unwrap();

        assert_eq!(y, [i16::MAX, i16::MIN + i16::MAX]);

        q15_axpy_ref(&a, &b, &mut y, 2, -2).unwrap();
        assert_eq!(y, [i16::MIN, i16::MIN]);
    }

    #[test]
    fn test_zero_length_writes_nothing() {
        let mut y = [7i16; 3];

        q15_axpy_ref(&[], &[], &mut y, 0, 3).unwrap();

        assert_eq!(y, [7; 3]);
    }

    #[test]
    fn test_prefix_only_is_written() {
        let a = [1, 2, 3, 4];
        let b = [1, 1, 1, 1];
        let mut y = [-1i16; 4];

        q15_axpy_ref(&a, &b, &mut y, 2, 10).unwrap();

        assert_eq!(y, [11, 12, -1, -1]);
    }

    #[test]
    fn test_n_beyond_buffer_is_rejected() {
        let a = [1, 2, 3];
        let b = [1, 2];
        let mut y = [0i16; 3];

        let err = q15_axpy_ref(&a, &b, &mut y, 3, 1).unwrap_err();

        assert_eq!(
            err,
            Q15Error::ValidationError {
                message: "n=3 exceeds b.len()=2".to_string()
            }
        );
        assert_eq!(y, [0; 3]);
    }

    #[test]
    fn test_short_output_is_rejected() {
        let mut y = [0i16; 1];
        assert!(q15_axpy_ref(&[1, 2], &[1, 2], &mut y, 2, 1).is_err());
    }
}
