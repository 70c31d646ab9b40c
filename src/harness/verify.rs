use serde::Serialize;

use crate::error::{validation_error, Result};
use crate::q15::Q15;

/// First index where the two outputs disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub index: usize,
    pub expected: Q15,
    pub actual: Q15,
}

/// Outcome of an elementwise comparison.
///
/// `ok` is the pass/fail verdict: any nonzero difference fails. `max_diff`
/// is only diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub ok: bool,
    pub max_diff: i32,
    pub mismatches: usize,
    pub first_mismatch: Option<Mismatch>,
}

/// Compares `test` against `reference` element by element.
///
/// # Errors
///
/// Returns a validation error if the outputs differ in length.
pub fn verify_equal(reference: &[Q15], test: &[Q15]) -> Result<Verification> {
    if reference.len() != test.len() {
        return Err(validation_error(format!(
            "outputs must have the same length (reference: {}, test: {})",
            reference.len(),
            test.len()
        )));
    }

    let mut max_diff = 0;
    let mut mismatches = 0;
    let mut first_mismatch = None;

    for (index, (&expected, &actual)) in reference.iter().zip(test).enumerate() {
        let diff = (expected as i32 - actual as i32).abs();
        max_diff = max_diff.max(diff);

        if diff != 0 {
            mismatches += 1;
            first_mismatch.get_or_insert(Mismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(Verification {
        ok: mismatches == 0,
        max_diff,
        mismatches,
        first_mismatch,
    })
}
