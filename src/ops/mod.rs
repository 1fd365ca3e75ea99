//! Elementwise binary operations
//!
//! ```text
//! BinaryOps (client API)
//!   └── KernelRegistry lookup by (BinaryOp, OperandPattern)
//!         └── kernel shell: checks, casts, dtype dispatch
//!               └── elementwise iterator
//!                     └── primitive (per element type)
//! ```
//!
//! Everything here is backend independent. The CPU kernels live in
//! `runtime::cpu`.

mod arithmetic;
mod dispatch;
pub mod primitives;
pub mod traits;

pub use arithmetic::{BinaryOp, BinaryOperands, OperandPattern, broadcast_shape};
pub use traits::{BinaryOps, TypeConversionOps};
