//! CPU runtime implementation
//!
//! Reference backend: heap memory, synchronous kernels, optional rayon
//! parallelism over disjoint chunks of the output.
//!
//! # Non-contiguous Tensors
//!
//! Kernels read and write through strides, so transposed, narrowed and
//! broadcast views are handled without copies. Only inputs whose dtype
//! differs from the output's are materialized (as a converted copy).

mod client;
mod device;
pub(crate) mod helpers;
pub mod kernels;
mod ops;
mod registry;
mod runtime;

pub use client::{CpuClient, DEFAULT_CHUNK_SIZE, ParallelismConfig};
pub use device::CpuDevice;
pub use registry::cpu_kernels;
pub use runtime::CpuRuntime;
