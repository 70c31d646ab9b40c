use crate::q15::Q15;

/// Saturating Q15 `a + alpha * b` over whole signals.
///
/// Implemented for `&[i16]` in [`slice`](crate::simd::slice). Every variant
/// returns exactly the same values; they differ only in how the work is
/// executed.
pub trait SimdAxpy<Rhs = Self> {
    type Output;

    /// Runs the probed [`VectorKernel`](crate::simd::VectorKernel).
    fn simd_axpy(self, rhs: Rhs, alpha: Q15) -> Self::Output;

    /// Splits long inputs across the rayon pool, one vector kernel call per chunk.
    fn par_simd_axpy(self, rhs: Rhs, alpha: Q15) -> Self::Output;

    /// Runs the scalar reference kernel.
    fn scalar_axpy(self, rhs: Rhs, alpha: Q15) -> Self::Output;
}

/// One hardware register of Q15 lanes and its widened accumulator.
///
/// Implementors wrap a native vector type. The provided [`axpy_chunk`]
/// composes the four numeric steps (widen, widening MAC, saturating narrow,
/// store) so every ISA follows the same sequence.
///
/// [`axpy_chunk`]: Q15Lanes::axpy_chunk
pub(crate) trait Q15Lanes: Copy {
    /// Widened (i32) accumulator covering the same lanes.
    type Wide: Copy;

    const LANE_COUNT: usize;

    /// Loads exactly `LANE_COUNT` elements.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA and
    /// `slice.len() >= LANE_COUNT`.
    unsafe fn load(slice: &[Q15]) -> Self;

    /// Loads fewer than `LANE_COUNT` elements; missing lanes read as zero.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA.
    unsafe fn load_partial(slice: &[Q15]) -> Self;

    /// Sign-extends every lane to 32 bits.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA.
    unsafe fn widen(self) -> Self::Wide;

    /// `acc + alpha * b` per lane, computed in 32 bits.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA.
    unsafe fn widening_mac(acc: Self::Wide, alpha: Q15, b: Self) -> Self::Wide;

    /// Narrows with saturation to `[-32768, 32767]` at shift zero.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA.
    unsafe fn narrow_saturate(acc: Self::Wide) -> Self;

    /// Stores exactly `LANE_COUNT` elements.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA and
    /// `out.len() >= LANE_COUNT`.
    unsafe fn store(self, out: &mut [Q15]);

    /// Stores the first `out.len()` lanes, `out.len() < LANE_COUNT`.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA.
    unsafe fn store_partial(self, out: &mut [Q15]);

    /// Processes one `vl`-element chunk: full registers first, then a
    /// zero-padded partial register for the remainder.
    ///
    /// # Safety
    ///
    /// The CPU must support the implementor's ISA. All slices must have the
    /// same length.
    #[inline(always)]
    unsafe fn axpy_chunk(a: &[Q15], b: &[Q15], y: &mut [Q15], alpha: Q15) {
        debug_assert!(a.len() == y.len() && b.len() == y.len());

        let step = Self::LANE_COUNT;
        let complete = y.len() - y.len() % step;

        for i in (0..complete).step_by(step) {
            let acc = Self::load(&a[i..]).widen();
            let acc = Self::widening_mac(acc, alpha, Self::load(&b[i..]));
            Self::narrow_saturate(acc).store(&mut y[i..]);
        }

        if complete < y.len() {
            let acc = Self::load_partial(&a[complete..]).widen();
            let acc = Self::widening_mac(acc, alpha, Self::load_partial(&b[complete..]));
            Self::narrow_saturate(acc).store_partial(&mut y[complete..]);
        }
    }
}
