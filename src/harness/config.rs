use std::mem;

use serde::Serialize;

use crate::error::{validation_error, Result};
use crate::q15::Q15;
use crate::DEFAULT_ALIGNMENT;

/// Element count used when none is given.
pub const DEFAULT_LEN: usize = 4096;

/// Seed of the input generator.
pub const DEFAULT_SEED: u64 = 1234;

/// Example scalar gain.
pub const DEFAULT_ALPHA: Q15 = 3;

/// Sizes visited by a sweep, smallest first.
pub const SWEEP_SIZES: [usize; 8] = [256, 512, 1024, 2048, 4096, 8192, 16384, 32768];

/// Parameters of one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessConfig {
    /// Number of elements `N` in each signal buffer.
    pub len: usize,
    pub seed: u64,
    pub alpha: Q15,
    /// Byte alignment of every buffer.
    pub alignment: usize,
    /// Timed repetitions per kernel; verification must pass on each one.
    pub iterations: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            seed: DEFAULT_SEED,
            alpha: DEFAULT_ALPHA,
            alignment: DEFAULT_ALIGNMENT,
            iterations: 1,
        }
    }
}

impl HarnessConfig {
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_alpha(mut self, alpha: Q15) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Rejects configurations the harness cannot run.
    pub fn validate(&self) -> Result<()> {
        if !self.alignment.is_power_of_two() || self.alignment < mem::align_of::<Q15>() {
            return Err(validation_error(format!(
                "alignment must be a power of two >= {}, got {}",
                mem::align_of::<Q15>(),
                self.alignment
            )));
        }

        if self.iterations == 0 {
            return Err(validation_error("iterations must be at least 1"));
        }

        Ok(())
    }
}
