//! # elemr
//!
//! **Typed elementwise binary kernels over strided n-dimensional arrays.**
//!
//! elemr provides the arithmetic core of an array library: eight binary
//! operations (add, subtract, multiply, divide, floor divide and the three
//! bitwise operations) over eight dtypes, for array/array, array/scalar and
//! scalar/array operands, with broadcasting and arbitrary strides.
//!
//! ## Semantics at a glance
//!
//! - The **output** decides the computation: its dtype is the working dtype,
//!   its shape the iteration shape, its device the execution device.
//! - Integer add/subtract/multiply wrap. Integer division by zero yields 0.
//! - Floor division rounds toward negative infinity for every dtype.
//! - Bitwise operations accept integral dtypes only.
//! - Every failure is reported before the first element is written.
//!
//! ## Quick Start
//!
//! ```rust
//! use elemr::prelude::*;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let a = Tensor::<CpuRuntime>::from_slice(&[1.5f32, -1.5], &[2], &device)?;
//! let out = Tensor::<CpuRuntime>::zeros(&[2], DType::F32, &device)?;
//!
//! client.binary_op_scalar(BinaryOp::FloorDivide, &a, Scalar::from(1.0), &out)?;
//! assert_eq!(out.to_vec::<f32>()?, [1.0, -2.0]);
//! # Ok::<(), elemr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): split large kernels across threads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod scalar;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, DTypeSet, Element};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{BinaryOp, BinaryOps, OperandPattern, TypeConversionOps};
    pub use crate::runtime::{
        CpuClient, CpuDevice, CpuRuntime, Device, ParallelismConfig, Runtime, RuntimeClient,
    };
    pub use crate::scalar::{Scalar, ScalarKind};
    pub use crate::tensor::{Layout, Tensor};
}

/// Default runtime
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
