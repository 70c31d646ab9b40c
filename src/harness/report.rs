//! Console and JSON reports.

use std::fmt;

use serde::Serialize;

use super::cycles::CounterKind;
use super::verify::Verification;
use crate::q15::Q15;

/// Verdict of a run, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    /// No cycle counter: only the reference kernel was timed.
    Skipped,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Pass | Outcome::Skipped => 0,
            Outcome::Fail => 1,
        }
    }
}

/// Result of one [`EquivalenceHarness::run`](super::EquivalenceHarness::run).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub len: usize,
    pub seed: u64,
    pub alpha: Q15,
    pub kernel: &'static str,
    pub counter: CounterKind,
    /// Iterations actually timed; fewer than configured after a mismatch.
    pub iterations: usize,
    /// Mean elapsed counter ticks of the reference kernel.
    pub ref_cycles: u64,
    /// Mean elapsed counter ticks of the vector kernel, `None` when skipped.
    pub vec_cycles: Option<u64>,
    /// `None` when verification was skipped.
    pub verification: Option<Verification>,
}

impl RunReport {
    pub fn outcome(&self) -> Outcome {
        match &self.verification {
            None => Outcome::Skipped,
            Some(v) if v.ok => Outcome::Pass,
            Some(_) => Outcome::Fail,
        }
    }

    /// `ref / vec`, only for a passing run with a nonzero vector time.
    pub fn speedup(&self) -> Option<f64> {
        match (self.outcome(), self.vec_cycles) {
            (Outcome::Pass, Some(vec)) if vec > 0 => Some(self.ref_cycles as f64 / vec as f64),
            _ => None,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.counter.label();
        writeln!(f, "{label} ref: {}", self.ref_cycles)?;

        match (&self.verification, self.vec_cycles) {
            (Some(v), Some(vec_cycles)) => {
                let verdict = if v.ok { "OK" } else { "FAIL" };
                writeln!(f, "Verify vector: {verdict} (max diff = {})", v.max_diff)?;
                write!(f, "{label} vector: {vec_cycles}")
            }
            _ => write!(f, "Verify vector: verification skipped (no cycle counter)"),
        }
    }
}

/// One row of a size sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepEntry {
    pub len: usize,
    pub outcome: Outcome,
    pub ref_cycles: u64,
    pub vec_cycles: Option<u64>,
    pub speedup: Option<f64>,
}

impl From<&RunReport> for SweepEntry {
    fn from(run: &RunReport) -> Self {
        Self {
            len: run.len,
            outcome: run.outcome(),
            ref_cycles: run.ref_cycles,
            vec_cycles: run.vec_cycles,
            speedup: run.speedup(),
        }
    }
}

/// Per-size timings of [`EquivalenceHarness::sweep`](super::EquivalenceHarness::sweep).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub seed: u64,
    pub alpha: Q15,
    pub kernel: &'static str,
    pub counter: CounterKind,
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    /// Fails if any size failed; skipped only if every size was skipped.
    pub fn outcome(&self) -> Outcome {
        if self.entries.iter().any(|e| e.outcome == Outcome::Fail) {
            Outcome::Fail
        } else if !self.entries.is_empty()
            && self.entries.iter().all(|e| e.outcome == Outcome::Skipped)
        {
            Outcome::Skipped
        } else {
            Outcome::Pass
        }
    }

    /// Sizes that passed verification, with their speedup.
    pub fn speedups(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.speedup.map(|s| (e.len, s)))
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.counter.label().to_lowercase();
        writeln!(f, "kernel: {}", self.kernel)?;
        write!(
            f,
            "{:>8} {:>14} {:>14} {:>9}",
            "N",
            format!("ref {label}"),
            format!("vec {label}"),
            "speedup"
        )?;

        for entry in &self.entries {
            writeln!(f)?;
            write!(f, "{:>8} {:>14}", entry.len, entry.ref_cycles)?;
            match (entry.outcome, entry.vec_cycles, entry.speedup) {
                (Outcome::Fail, _, _) => write!(f, " {:>14} {:>9}", "-", "FAIL")?,
                (Outcome::Skipped, _, _) => write!(f, " {:>14} {:>9}", "-", "skipped")?,
                (Outcome::Pass, Some(vec), Some(speedup)) => {
                    write!(f, " {vec:>14} {:>9}", format!("{speedup:.2}x"))?
                }
                (Outcome::Pass, Some(vec), None) => write!(f, " {vec:>14} {:>9}", "-")?,
                (Outcome::Pass, None, _) => write!(f, " {:>14} {:>9}", "-", "-")?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::verify::verify_equal;

    fn report(verification: Option<Verification>, vec_cycles: Option<u64>) -> RunReport {
        RunReport {
            len: 4096,
            seed: 1234,
            alpha: 3,
            kernel: "avx2",
            counter: CounterKind::Cycles,
            iterations: 1,
            ref_cycles: 8000,
            vec_cycles,
            verification,
        }
    }

    #[test]
    fn passing_run_prints_three_lines() {
        let run = report(Some(verify_equal(&[1, 2], &[1, 2]).unwrap()), Some(2000));
        assert_eq!(
            run.to_string(),
            "Cycles ref: 8000\nVerify vector: OK (max diff = 0)\nCycles vector: 2000"
        );
        assert_eq!(run.outcome(), Outcome::Pass);
        assert_eq!(run.outcome().exit_code(), 0);
        assert_eq!(run.speedup(), Some(4.0));
    }

    #[test]
    fn failing_run_reports_max_diff() {
        let run = report(Some(verify_equal(&[1, 2], &[1, 9]).unwrap()), Some(2000));
        assert!(run.to_string().contains("Verify vector: FAIL (max diff = 7)"));
        assert_eq!(run.outcome().exit_code(), 1);
        assert_eq!(run.speedup(), None);
    }

    #[test]
    fn skipped_run_prints_reference_only() {
        let mut run = report(None, None);
        run.counter = CounterKind::Nanos;
        let text = run.to_string();
        assert!(text.starts_with("Nanos ref: 8000\n"));
        assert!(text.contains("verification skipped"));
        assert!(!text.contains("Nanos vector"));
        assert_eq!(run.outcome(), Outcome::Skipped);
        assert_eq!(run.outcome().exit_code(), 0);
    }

    #[test]
    fn sweep_excludes_failed_sizes_from_speedups() {
        let pass = report(Some(verify_equal(&[0], &[0]).unwrap()), Some(4000));
        let mut fail = report(Some(verify_equal(&[0], &[1]).unwrap()), Some(4000));
        fail.len = 8192;

        let sweep = SweepReport {
            seed: 1234,
            alpha: 3,
            kernel: "avx2",
            counter: CounterKind::Cycles,
            entries: vec![SweepEntry::from(&pass), SweepEntry::from(&fail)],
        };

        assert_eq!(sweep.speedups().collect::<Vec<_>>(), vec![(4096, 2.0)]);
        assert_eq!(sweep.outcome(), Outcome::Fail);
        assert!(sweep.to_string().contains("FAIL"));
    }

    #[test]
    fn outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Skipped).unwrap(), "\"skipped\"");
    }
}
