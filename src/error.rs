//! Error types for elemr

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using elemr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in elemr operations
///
/// Arithmetic edge cases (division by zero, overflow) are never reported here:
/// they produce defined values. Every variant below is raised before a kernel
/// touches its output.
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Operands live on incompatible devices
    #[error("Device mismatch: {lhs} vs {rhs}")]
    DeviceMismatch {
        /// Name of the first device
        lhs: String,
        /// Name of the conflicting device
        rhs: String,
    },

    /// No kernel registered under the requested key
    #[error("No kernel registered for '{name}' on backend '{backend}'")]
    KernelNotFound {
        /// Canonical kernel name
        name: String,
        /// Backend that was searched
        backend: &'static str,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Operation requires a contiguous tensor
    #[error("Operation requires contiguous tensor")]
    NotContiguous,

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create a device mismatch error from two device names
    pub fn device_mismatch(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self::DeviceMismatch {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
