//! Tensors: strided views onto device memory

mod core;
mod layout;
mod storage;

pub use core::Tensor;
pub use layout::{Layout, Shape, Strides};
pub(crate) use layout::{checked_elem_count, is_row_major};
pub use storage::Storage;
