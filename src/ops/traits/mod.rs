//! Operation traits.
//!
//! Implementations live with each backend (see `runtime::cpu`).

mod binary;
mod type_conversion;

pub use binary::BinaryOps;
pub use type_conversion::TypeConversionOps;
