//! Error types for q15axpy operations.
//!
//! Kernels and the harness report contract violations and allocation failures
//! through [`Q15Error`] instead of panicking. A numeric mismatch between the
//! kernels is not an error: it is reported as a failed
//! [`Verification`](crate::harness::verify::Verification).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Q15Error {
    /// The allocator could not provide a signal buffer. The harness raises
    /// this before any kernel runs.
    #[error(
        "signal buffer allocation failed: {message} ({requested_size} bytes, {requested_alignment}-byte aligned)"
    )]
    AllocationError {
        requested_size: usize,
        requested_alignment: usize,
        message: String,
    },

    /// A buffer of `size` bytes cannot be laid out with `alignment`: the
    /// alignment is not a power of two or is below that of `i16`, or the
    /// element count overflows the byte size.
    #[error("invalid signal buffer layout: {message} (size {size}, alignment {alignment})")]
    LayoutError {
        size: usize,
        alignment: usize,
        message: String,
    },

    /// Caller contract violated, e.g. `n` exceeds the length of `a`, `b` or
    /// `y`, input slices differ in length, or the harness configuration is
    /// unusable.
    #[error("invalid input: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, Q15Error>;

pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> Q15Error {
    Q15Error::AllocationError {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> Q15Error {
    Q15Error::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}

pub fn validation_error(message: impl Into<String>) -> Q15Error {
    Q15Error::ValidationError {
        message: message.into(),
    }
}
