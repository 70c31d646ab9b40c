//! Equivalence harness: proves the vector kernel matches the scalar reference.
//!
//! A run allocates four aligned buffers, fills `a` and `b` from a seeded
//! generator, times the reference kernel and then the vector kernel with an
//! injected [`CycleCounter`], and compares the outputs elementwise. Every
//! allocation happens before any kernel runs, so an allocation failure aborts
//! the run without touching either kernel.
//!
//! ```rust
//! use q15axpy::harness::{config::HarnessConfig, report::Outcome, EquivalenceHarness};
//!
//! let report = EquivalenceHarness::new(HarnessConfig::default().with_len(1000))
//!     .run()
//!     .unwrap();
//! assert_ne!(report.outcome(), Outcome::Fail);
//! ```

pub mod config;
pub mod cycles;
pub mod report;
pub mod signal;
pub mod verify;

use log::{debug, error, warn};

use crate::error::Result;
use crate::q15::Q15;
use crate::scalar::q15_axpy_ref;
use crate::simd::VectorKernel;
use crate::utils::AlignedBuffer;

use config::HarnessConfig;
use cycles::{CounterKind, CycleCounter};
use report::{RunReport, SweepEntry, SweepReport};
use signal::SignalGenerator;
use verify::{verify_equal, Verification};

/// Signature shared by the scalar and vector kernels.
#[cfg(test)]
type KernelFn = fn(&[Q15], &[Q15], &mut [Q15], usize, Q15) -> Result<()>;

pub struct EquivalenceHarness {
    config: HarnessConfig,
    kernel: VectorKernel,
    counter: Box<dyn CycleCounter>,
    /// Replaces the vector kernel call, to drive the mismatch path.
    #[cfg(test)]
    vector_override: Option<KernelFn>,
}

impl EquivalenceHarness {
    /// Harness with the probed vector kernel and the best available counter.
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            kernel: VectorKernel::probe(),
            counter: cycles::probe(),
            #[cfg(test)]
            vector_override: None,
        }
    }

    pub fn with_kernel(mut self, kernel: VectorKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_counter(mut self, counter: impl CycleCounter + 'static) -> Self {
        self.counter = Box::new(counter);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_vector_override(mut self, kernel: KernelFn) -> Self {
        self.vector_override = Some(kernel);
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn kernel(&self) -> VectorKernel {
        self.kernel
    }

    pub fn counter_kind(&self) -> CounterKind {
        self.counter.kind()
    }

    /// Runs the configured length.
    ///
    /// A mismatch is not an error: it comes back as a report whose outcome is
    /// [`Outcome::Fail`](report::Outcome::Fail).
    ///
    /// # Errors
    ///
    /// Invalid configuration, or a buffer that could not be allocated.
    pub fn run(&self) -> Result<RunReport> {
        self.run_len(self.config.len)
    }

    /// Runs each size in `sizes` with the configured seed, alpha and iterations.
    pub fn sweep(&self, sizes: &[usize]) -> Result<SweepReport> {
        let entries = sizes
            .iter()
            .map(|&len| self.run_len(len).map(|run| SweepEntry::from(&run)))
            .collect::<Result<Vec<_>>>()?;

        Ok(SweepReport {
            seed: self.config.seed,
            alpha: self.config.alpha,
            kernel: self.kernel.name(),
            counter: self.counter.kind(),
            entries,
        })
    }

    fn run_len(&self, len: usize) -> Result<RunReport> {
        self.config.validate()?;

        let HarnessConfig {
            seed,
            alpha,
            alignment,
            iterations,
            ..
        } = self.config;

        let mut a = AlignedBuffer::zeroed(len, alignment)?;
        let mut b = AlignedBuffer::zeroed(len, alignment)?;
        let mut y_ref = AlignedBuffer::zeroed(len, alignment)?;
        let mut y_vec = AlignedBuffer::zeroed(len, alignment)?;

        SignalGenerator::new(seed).fill_pair(&mut a, &mut b)?;

        debug!(
            "harness run: len={len}, seed={seed}, alpha={alpha}, kernel={}, vlmax={:?}",
            self.kernel,
            self.kernel.shape().map(|s| s.vlmax())
        );

        let verify_vector = self.counter.kind() == CounterKind::Cycles;
        if !verify_vector {
            warn!("no cycle counter available, vector verification skipped");
        }

        let mut ref_total = 0u64;
        let mut vec_total = 0u64;
        let mut completed = 0usize;
        let mut verification: Option<Verification> = None;

        for iteration in 0..iterations {
            ref_total += self.time(|| q15_axpy_ref(&a, &b, &mut y_ref, len, alpha))?;
            completed += 1;

            if !verify_vector {
                continue;
            }

            vec_total += self.time(|| self.compute_vector(&a, &b, &mut y_vec, len, alpha))?;

            let check = verify_equal(&y_ref, &y_vec)?;
            verification = Some(check);

            if let Some(m) = check.first_mismatch {
                error!(
                    "{} kernel mismatch on iteration {iteration}: index {}, ref {}, vec {} ({} mismatches, max diff {})",
                    self.kernel, m.index, m.expected, m.actual, check.mismatches, check.max_diff
                );
                break;
            }
        }

        let mean = |total: u64| total / completed as u64;

        Ok(RunReport {
            len,
            seed,
            alpha,
            kernel: self.kernel.name(),
            counter: self.counter.kind(),
            iterations: completed,
            ref_cycles: mean(ref_total),
            vec_cycles: verification.map(|_| mean(vec_total)),
            verification,
        })
    }

    fn compute_vector(&self, a: &[Q15], b: &[Q15], y: &mut [Q15], n: usize, alpha: Q15) -> Result<()> {
        #[cfg(test)]
        if let Some(kernel) = self.vector_override {
            return kernel(a, b, y, n, alpha);
        }

        self.kernel.compute(a, b, y, n, alpha)
    }

    /// Elapsed counter ticks around one kernel call.
    fn time(&self, kernel: impl FnOnce() -> Result<()>) -> Result<u64> {
        let start = self.counter.now_cycles();
        kernel()?;
        let end = self.counter.now_cycles();
        Ok(end.saturating_sub(start))
    }
}
