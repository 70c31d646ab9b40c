//! Timing capability injected into the harness.
//!
//! The harness never reads a hardware counter directly; it asks a
//! [`CycleCounter`]. [`probe`] returns the processor cycle counter where one is
//! readable from user space, and a monotonic nanosecond clock elsewhere. The
//! [`CounterKind`] tells the harness which one it got, because cycle-accurate
//! verification is only performed with a real cycle counter.

use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CounterKind {
    /// Processor cycles (`rdtsc`, `cntvct_el0`, `rdcycle`).
    Cycles,
    /// Wall-clock nanoseconds from a monotonic clock.
    Nanos,
}

impl CounterKind {
    /// Report label for elapsed values.
    pub fn label(self) -> &'static str {
        match self {
            CounterKind::Cycles => "Cycles",
            CounterKind::Nanos => "Nanos",
        }
    }
}

/// A monotonic counter service.
pub trait CycleCounter {
    fn now_cycles(&self) -> u64;

    fn kind(&self) -> CounterKind;

    fn name(&self) -> &'static str;
}

/// The processor's own cycle/time-stamp counter.
#[derive(Debug, Clone, Copy)]
pub struct HardwareCounter {
    _private: (),
}

impl HardwareCounter {
    /// `Some` on architectures with a user-readable counter.
    #[allow(unreachable_code)]
    pub fn probe() -> Option<Self> {
        #[cfg(any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "aarch64",
            target_arch = "riscv64"
        ))]
        return Some(Self { _private: () });

        None
    }
}

impl CycleCounter for HardwareCounter {
    #[inline(always)]
    fn now_cycles(&self) -> u64 {
        read_hardware_counter()
    }

    fn kind(&self) -> CounterKind {
        CounterKind::Cycles
    }

    #[allow(unreachable_code)]
    fn name(&self) -> &'static str {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        return "rdtsc";
        #[cfg(target_arch = "aarch64")]
        return "cntvct_el0";
        #[cfg(target_arch = "riscv64")]
        return "rdcycle";
        "none"
    }
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_hardware_counter() -> u64 {
    // SAFETY: `rdtsc` is available on every x86_64 CPU.
    unsafe { std::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "x86")]
#[inline(always)]
fn read_hardware_counter() -> u64 {
    // SAFETY: `rdtsc` is available on every CPU that runs Rust's x86 targets.
    unsafe { std::arch::x86::_rdtsc() }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_hardware_counter() -> u64 {
    let value: u64;
    // SAFETY: the virtual counter is readable from EL0 on Linux and macOS.
    unsafe { std::arch::asm!("mrs {}, cntvct_el0", out(reg) value, options(nomem, nostack)) };
    value
}

#[cfg(target_arch = "riscv64")]
#[inline(always)]
fn read_hardware_counter() -> u64 {
    let value: u64;
    // SAFETY: reads the `cycle` CSR; no memory is touched.
    unsafe { std::arch::asm!("rdcycle {}", out(reg) value, options(nomem, nostack)) };
    value
}

#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "riscv64"
)))]
#[inline(always)]
fn read_hardware_counter() -> u64 {
    0
}

/// Nanoseconds since construction, from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleCounter for MonotonicClock {
    fn now_cycles(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn kind(&self) -> CounterKind {
        CounterKind::Nanos
    }

    fn name(&self) -> &'static str {
        "monotonic-clock"
    }
}

/// Best counter available on this platform.
pub fn probe() -> Box<dyn CycleCounter> {
    match HardwareCounter::probe() {
        Some(counter) => {
            info!("cycle counter: {}", counter.name());
            Box::new(counter)
        }
        None => {
            warn!("no hardware cycle counter, timing with the monotonic clock");
            Box::new(MonotonicClock::new())
        }
    }
}
