//! Deterministic Q15 input signals.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{validation_error, Result};
use crate::q15::Q15;

/// Seeded pseudo-random source of full-range Q15 samples.
///
/// The same seed always yields the same sequence, so repeated runs see
/// identical buffers.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    rng: StdRng,
}

impl SignalGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform over all 65536 bit patterns.
    #[inline]
    pub fn random_u16(&mut self) -> u16 {
        self.rng.random::<u16>()
    }

    /// The next sample reinterpreted over `[-32768, 32767]`.
    #[inline]
    pub fn next_q15(&mut self) -> Q15 {
        self.random_u16() as Q15
    }

    /// Fills `a` and `b` with interleaved draws (`a[0]`, `b[0]`, `a[1]`, ...).
    ///
    /// # Errors
    ///
    /// Returns a validation error, and draws nothing, if the buffers differ in
    /// length.
    pub fn fill_pair(&mut self, a: &mut [Q15], b: &mut [Q15]) -> Result<()> {
        if a.len() != b.len() {
            return Err(validation_error(format!(
                "signal buffers must have the same length (a: {}, b: {})",
                a.len(),
                b.len()
            )));
        }

        for (a_i, b_i) in a.iter_mut().zip(b.iter_mut()) {
            *a_i = self.next_q15();
            *b_i = self.next_q15();
        }

        Ok(())
    }
}
