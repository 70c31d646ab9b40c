//! End-to-end runs of the equivalence harness with injected counters.

use std::cell::Cell;

use pretty_assertions::assert_eq;

use q15axpy::error::Q15Error;
use q15axpy::harness::config::{HarnessConfig, SWEEP_SIZES};
use q15axpy::harness::cycles::{CounterKind, CycleCounter};
use q15axpy::harness::report::Outcome;
use q15axpy::harness::EquivalenceHarness;
use q15axpy::simd::VectorKernel;

/// Deterministic counter: every read advances by `step`.
struct FakeCounter {
    now: Cell<u64>,
    step: u64,
    kind: CounterKind,
}

impl FakeCounter {
    fn cycles(step: u64) -> Self {
        Self {
            now: Cell::new(1_000),
            step,
            kind: CounterKind::Cycles,
        }
    }

    fn nanos(step: u64) -> Self {
        Self {
            kind: CounterKind::Nanos,
            ..Self::cycles(step)
        }
    }
}

impl CycleCounter for FakeCounter {
    fn now_cycles(&self) -> u64 {
        self.now.set(self.now.get() + self.step);
        self.now.get()
    }

    fn kind(&self) -> CounterKind {
        self.kind
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[test]
fn test_default_run_reports_ok() {
    let report = EquivalenceHarness::new(HarnessConfig::default())
        .with_counter(FakeCounter::cycles(40))
        .run()
        .unwrap();

    assert_eq!(report.outcome(), Outcome::Pass);
    assert_eq!(report.ref_cycles, 40);
    assert_eq!(report.vec_cycles, Some(40));
    assert_eq!(
        report.to_string(),
        "Cycles ref: 40\nVerify vector: OK (max diff = 0)\nCycles vector: 40"
    );
}

#[test]
fn test_every_kernel_passes_the_harness() {
    for kernel in VectorKernel::available() {
        for len in [0, 1, 63, 64, 65, 4096] {
            let report = EquivalenceHarness::new(HarnessConfig::default().with_len(len))
                .with_kernel(kernel)
                .with_counter(FakeCounter::cycles(1))
                .run()
                .unwrap();

            assert_eq!(report.outcome(), Outcome::Pass, "kernel={kernel}, len={len}");
            assert_eq!(report.kernel, kernel.name());
        }
    }
}

#[test]
fn test_forced_scalar_fallback_passes() {
    let report = EquivalenceHarness::new(HarnessConfig::default())
        .with_kernel(VectorKernel::ScalarFallback)
        .with_counter(FakeCounter::cycles(5))
        .run()
        .unwrap();

    assert_eq!(report.kernel, "scalar-fallback");
    assert_eq!(report.outcome().exit_code(), 0);
}

#[test]
fn test_same_seed_gives_same_report() {
    let run = |seed| {
        EquivalenceHarness::new(HarnessConfig::default().with_len(2_000).with_seed(seed))
            .with_counter(FakeCounter::cycles(3))
            .run()
            .unwrap()
    };

    assert_eq!(run(1234), run(1234));
    assert_eq!(run(99).outcome(), Outcome::Pass);
}

#[test]
fn test_negative_alpha_and_iterations() {
    let config = HarnessConfig::default()
        .with_alpha(i16::MIN)
        .with_iterations(3);
    let report = EquivalenceHarness::new(config)
        .with_counter(FakeCounter::cycles(10))
        .run()
        .unwrap();

    assert_eq!(report.iterations, 3);
    assert_eq!(report.alpha, -32_768);
    assert_eq!(report.outcome(), Outcome::Pass);
}

#[test]
fn test_without_cycle_counter_verification_is_skipped() {
    let report = EquivalenceHarness::new(HarnessConfig::default())
        .with_counter(FakeCounter::nanos(100))
        .run()
        .unwrap();

    assert_eq!(report.outcome(), Outcome::Skipped);
    assert_eq!(report.outcome().exit_code(), 0);
    assert_eq!(report.verification, None);
    assert_eq!(report.vec_cycles, None);
    assert_eq!(report.ref_cycles, 100);

    let text = report.to_string();
    assert!(text.starts_with("Nanos ref: 100"), "{text}");
    assert!(text.contains("verification skipped"), "{text}");
}

#[test]
fn test_sweep_covers_every_size() {
    let report = EquivalenceHarness::new(HarnessConfig::default())
        .with_counter(FakeCounter::cycles(8))
        .sweep(&SWEEP_SIZES)
        .unwrap();

    let sizes: Vec<usize> = report.entries.iter().map(|e| e.len).collect();
    assert_eq!(sizes, SWEEP_SIZES.to_vec());
    assert_eq!(report.outcome(), Outcome::Pass);
    assert!(report.speedups().all(|(_, s)| s == 1.0));
}

#[test]
fn test_unallocatable_length_is_an_error() {
    let result = EquivalenceHarness::new(HarnessConfig::default().with_len(usize::MAX))
        .with_counter(FakeCounter::cycles(1))
        .run();

    assert!(matches!(result, Err(Q15Error::LayoutError { .. })));
}

#[test]
fn test_invalid_configuration_is_an_error() {
    let result = EquivalenceHarness::new(HarnessConfig::default().with_alignment(24))
        .with_counter(FakeCounter::cycles(1))
        .run();

    assert!(matches!(result, Err(Q15Error::ValidationError { .. })));
}

#[test]
fn test_report_serializes_to_json() {
    let report = EquivalenceHarness::new(HarnessConfig::default().with_len(128))
        .with_counter(FakeCounter::cycles(2))
        .run()
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["len"], 128);
    assert_eq!(json["counter"], "Cycles");
    assert_eq!(json["verification"]["ok"], true);
    assert_eq!(json["verification"]["max_diff"], 0);
}
