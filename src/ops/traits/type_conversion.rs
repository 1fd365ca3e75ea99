//! Type conversion operations trait.

use crate::dtype::DType;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Type conversion operations
pub trait TypeConversionOps<R: Runtime> {
    /// Cast a tensor to another dtype.
    ///
    /// Returns a view sharing storage when `dtype` already matches. Otherwise
    /// allocates a contiguous tensor of the same shape and converts every
    /// element:
    ///
    /// - int -> int wraps (two's complement)
    /// - float -> int truncates toward zero and saturates, NaN becomes 0
    /// - anything -> float rounds to nearest
    fn cast(&self, a: &Tensor<R>, dtype: DType) -> Result<Tensor<R>>;
}
