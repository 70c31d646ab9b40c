//! ARM NEON Q15 kernel for 128-bit vectors.
//!
//! NEON has native widening and narrowing forms, so each numeric step maps to
//! one instruction family:
//!
//! - **Widen**: `vmovl_s16` / `vmovl_high_s16`
//! - **MAC**: `vmlal_n_s16` / `vmlal_high_n_s16`, a fused widening
//!   multiply-accumulate by a scalar
//! - **Narrow**: `vqmovn_s32` / `vqmovn_high_s32`, saturating at shift zero
//!
//! NEON is mandatory on AArch64; the runtime probe still goes through
//! `is_aarch64_feature_detected!` for uniformity.

pub mod i16x8;

pub(crate) mod axpy;
