//! Data-parallel Q15 kernels and their runtime dispatch.
//!
//! The vectorized kernel is exposed as a single [`VectorKernel`] capability
//! with two variants:
//!
//! - [`VectorKernel::HardwareAccelerated`]: an [`Accelerator`] for one
//!   instruction set that the running CPU was probed to support.
//! - [`VectorKernel::ScalarFallback`]: delegates to
//!   [`scalar::q15_axpy_ref`](crate::scalar::q15_axpy_ref), with the same
//!   contract and no approximation.
//!
//! The variant is chosen once by [`VectorKernel::probe`]. Call sites never
//! branch on `cfg` themselves.
//!
//! # Chunked processing
//!
//! The hardware path walks the buffers in chunks of `vl` elements, where
//! `vl = setvl(remaining)` is the widest chunk the [`VectorShape`] allows.
//! Each chunk is an index range over the caller's slices, and chunks are
//! disjoint and visited in increasing order:
//!
//! ```text
//! while remaining > 0:
//!     vl   = setvl(remaining)
//!     acc  = widen(a[off..off+vl])            // i16 -> i32, sign-extended
//!     acc += widen(alpha) * widen(b[..])      // fused widening MAC
//!     y[..] = narrow_clip(acc, 0, mode)       // saturating i32 -> i16
//!     off += vl; remaining -= vl
//! ```

use std::fmt;
use std::sync::OnceLock;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::Result;
use crate::q15::{Q15, WIDEN_FACTOR};
use crate::scalar::{self, check_lengths};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;

#[cfg(target_arch = "aarch64")]
pub mod neon;

pub mod slice;

pub mod traits;

pub use traits::SimdAxpy;

/// Bits in one Q15 element.
const ELEMENT_BITS: usize = 16;

/// Largest register group a single widened operand may span.
const MAX_REGISTER_GROUP: usize = 8;

/// Instruction sets with a hardware Q15 kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Isa {
    /// 256-bit AVX2 (`x86`/`x86_64`).
    Avx2,
    /// 128-bit SSE2 (`x86`/`x86_64`; always present on `x86_64`).
    Sse2,
    /// 128-bit Advanced SIMD (`aarch64`).
    Neon,
}

impl Isa {
    /// Every ISA in probe priority order (widest first).
    pub const ALL: [Isa; 3] = [Isa::Avx2, Isa::Sse2, Isa::Neon];

    /// Width of one vector register in bits.
    pub fn register_bits(self) -> usize {
        match self {
            Isa::Avx2 => 256,
            Isa::Sse2 | Isa::Neon => 128,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Isa::Avx2 => "avx2",
            Isa::Sse2 => "sse2",
            Isa::Neon => "neon",
        }
    }

    /// Runtime check that the current CPU can execute this ISA's kernel.
    #[allow(unreachable_code)]
    pub fn is_supported(self) -> bool {
        match self {
            Isa::Avx2 => {
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                return std::is_x86_feature_detected!("avx2");
                false
            }
            Isa::Sse2 => {
                #[cfg(target_arch = "x86_64")]
                return true;
                #[cfg(target_arch = "x86")]
                return std::is_x86_feature_detected!("sse2");
                false
            }
            Isa::Neon => {
                #[cfg(target_arch = "aarch64")]
                return std::arch::is_aarch64_feature_detected!("neon");
                false
            }
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register geometry used to pick the chunk length `vl`.
///
/// Elements are 16 bits wide and grouped `group` registers at a time. The
/// group is the largest power of two whose widened (32-bit) accumulator still
/// fits in [`MAX_REGISTER_GROUP`] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VectorShape {
    pub register_bits: usize,
    pub group: usize,
}

impl VectorShape {
    pub fn for_isa(isa: Isa) -> Self {
        Self {
            register_bits: isa.register_bits(),
            group: Self::widest_safe_group(WIDEN_FACTOR),
        }
    }

    /// Largest power-of-two group factor `g` such that `g * widen` registers
    /// still hold the widened accumulator.
    pub const fn widest_safe_group(widen: usize) -> usize {
        let mut group = MAX_REGISTER_GROUP;
        while group > 1 && group * widen > MAX_REGISTER_GROUP {
            group /= 2;
        }
        group
    }

    /// Number of Q15 lanes in one register.
    pub fn lanes(&self) -> usize {
        self.register_bits / ELEMENT_BITS
    }

    /// Maximum chunk length for one loop iteration.
    pub fn vlmax(&self) -> usize {
        self.lanes() * self.group
    }

    /// Chunk length for `remaining` unprocessed elements.
    #[inline(always)]
    pub fn setvl(&self, remaining: usize) -> usize {
        remaining.min(self.vlmax())
    }
}

/// Proof that the running CPU supports a given [`Isa`].
///
/// Only [`Accelerator::new`] constructs one, so a
/// [`VectorKernel::HardwareAccelerated`] value never dispatches into
/// instructions the CPU lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accelerator {
    isa: Isa,
}

impl Accelerator {
    /// Returns `None` if the CPU does not support `isa`.
    pub fn new(isa: Isa) -> Option<Self> {
        isa.is_supported().then_some(Self { isa })
    }

    pub fn isa(&self) -> Isa {
        self.isa
    }

    pub fn shape(&self) -> VectorShape {
        VectorShape::for_isa(self.isa)
    }

    /// Processes one chunk of at most `vlmax` elements.
    #[inline(always)]
    fn chunk(&self, a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
        match self.isa {
            // SAFETY: `Accelerator::new` verified CPU support for the ISA.
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Avx2 => unsafe { avx2::axpy::axpy_chunk(a, b, y, alpha) },
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Sse2 => unsafe { sse2::axpy::axpy_chunk(a, b, y, alpha) },
            #[cfg(target_arch = "aarch64")]
            Isa::Neon => unsafe { neon::axpy::axpy_chunk(a, b, y, alpha) },
            #[allow(unreachable_patterns)]
            _ => scalar::axpy_block(a, b, y, alpha),
        }
    }

    /// Chunk loop over equally sized slices.
    fn run(&self, a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
        let shape = self.shape();

        let mut offset = 0;
        let mut remaining = y.len();

        while remaining > 0 {
            let vl = shape.setvl(remaining);
            let range = offset..offset + vl;

            self.chunk(&a[range.clone()], &b[range.clone()], &mut y[range], alpha);

            offset += vl;
            remaining -= vl;
        }
    }
}

/// The vectorized Q15 kernel, selected once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKernel {
    HardwareAccelerated(Accelerator),
    ScalarFallback,
}

static DETECTED: OnceLock<VectorKernel> = OnceLock::new();

impl VectorKernel {
    /// Cached capability probe; the first call logs the outcome.
    pub fn probe() -> Self {
        *DETECTED.get_or_init(|| {
            let kernel = Self::detect();
            match kernel {
                VectorKernel::HardwareAccelerated(acc) => {
                    info!(
                        "vector kernel: {} (vlmax = {} lanes)",
                        acc.isa(),
                        acc.shape().vlmax()
                    )
                }
                VectorKernel::ScalarFallback => {
                    warn!("no data-parallel support detected, vector kernel uses the scalar fallback")
                }
            }
            kernel
        })
    }

    /// Uncached probe: the widest supported ISA, or the scalar fallback.
    pub fn detect() -> Self {
        Isa::ALL
            .into_iter()
            .find_map(Self::for_isa)
            .unwrap_or(VectorKernel::ScalarFallback)
    }

    /// Hardware kernel for `isa`, if the CPU supports it.
    pub fn for_isa(isa: Isa) -> Option<Self> {
        Accelerator::new(isa).map(VectorKernel::HardwareAccelerated)
    }

    /// Every kernel variant runnable on this CPU, fallback included.
    pub fn available() -> Vec<Self> {
        Isa::ALL
            .into_iter()
            .filter_map(Self::for_isa)
            .chain(std::iter::once(VectorKernel::ScalarFallback))
            .collect()
    }

    pub fn is_accelerated(&self) -> bool {
        matches!(self, VectorKernel::HardwareAccelerated(_))
    }

    /// Chunk geometry, or `None` for the scalar fallback.
    pub fn shape(&self) -> Option<VectorShape> {
        match self {
            VectorKernel::HardwareAccelerated(acc) => Some(acc.shape()),
            VectorKernel::ScalarFallback => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VectorKernel::HardwareAccelerated(acc) => acc.isa().name(),
            VectorKernel::ScalarFallback => "scalar-fallback",
        }
    }

    /// Computes `y[i] = saturate(a[i] + alpha * b[i])` for `i` in `0..n`.
    ///
    /// Bit-for-bit identical to [`scalar::q15_axpy_ref`] for every input.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `n` exceeds the length of any buffer.
    pub fn compute(&self, a: &[Q15], b: &[Q15], y: &mut [Q15], n: usize, alpha: Q15) -> Result<()> {
        check_lengths(a.len(), b.len(), y.len(), n)?;

        let (a, b, y) = (&a[..n], &b[..n], &mut y[..n]);

        match self {
            VectorKernel::HardwareAccelerated(acc) => {
                debug!("{} kernel: n={n}, vlmax={}", acc.isa(), acc.shape().vlmax());
                acc.run(a, b, y, alpha);
            }
            VectorKernel::ScalarFallback => scalar::axpy_block(a, b, y, alpha),
        }

        Ok(())
    }
}

impl fmt::Display for VectorKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
