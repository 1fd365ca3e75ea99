//! Helper functions shared by the CPU kernels

pub mod binary;
pub mod cast;

pub use binary::{integral_binary_impl, numeric_binary_impl};
pub use cast::cast_impl;

use super::CpuRuntime;
use super::kernels::elementwise::{StridedView, StridedViewMut};
use crate::dtype::Element;
use crate::tensor::Tensor;

/// Read view over a CPU tensor's elements
///
/// # Safety
/// `T::DTYPE` must equal `tensor.dtype()`.
#[inline]
pub(crate) unsafe fn read_view<T: Element>(tensor: &Tensor<CpuRuntime>) -> StridedView<'_, T> {
    debug_assert_eq!(T::DTYPE, tensor.dtype());
    // SAFETY: the layout describes elements inside the tensor's storage
    unsafe { StridedView::new(tensor.data_ptr() as *const T, tensor.shape(), tensor.strides()) }
}

/// Write view over a CPU tensor's elements
///
/// # Safety
/// `T::DTYPE` must equal `tensor.dtype()`, and nothing else may access the
/// tensor's elements while the view is alive.
#[inline]
pub(crate) unsafe fn write_view<T: Element>(tensor: &Tensor<CpuRuntime>) -> StridedViewMut<'_, T> {
    debug_assert_eq!(T::DTYPE, tensor.dtype());
    // SAFETY: as above
    unsafe { StridedViewMut::new(tensor.data_ptr() as *mut T, tensor.shape(), tensor.strides()) }
}
