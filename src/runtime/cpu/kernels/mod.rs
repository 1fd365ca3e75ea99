//! Low-level CPU kernels

pub mod elementwise;

pub use elementwise::{StridedView, StridedViewMut, elementwise_binary, elementwise_unary};
