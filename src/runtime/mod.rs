//! Runtime backends
//!
//! ```text
//! Runtime (backend identity, memory primitives)
//! ├── Device (identifies one memory space)
//! ├── Client (dispatches operations on a device)
//! └── KernelRegistry (binary kernels by op and operand pattern)
//! ```
//!
//! Only the CPU backend is provided. The traits are the seams another
//! backend would plug into.

pub mod cpu;
mod registry;

pub use cpu::{CpuClient, CpuDevice, CpuRuntime, ParallelismConfig};
pub use registry::{BinaryKernel, KernelKey, KernelRegistry};

use crate::error::Result;

/// Core trait for compute backends
///
/// Memory is addressed by opaque `u64` handles. For the CPU backend a handle
/// is a host address.
pub trait Runtime: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Allocate `size_bytes` of zero-initialized device memory
    ///
    /// A zero-sized request returns the null handle 0.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64>;

    /// Return memory obtained from [`Runtime::allocate`]
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy host bytes to device memory
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device) -> Result<()>;

    /// Copy device memory to host bytes
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device) -> Result<()>;

    /// Gather a strided view into a dense row-major buffer
    ///
    /// `strides` are in elements; `src_byte_offset` locates the first
    /// element of the view inside `src`.
    fn copy_strided(
        src: u64,
        src_byte_offset: usize,
        dst: u64,
        shape: &[usize],
        strides: &[isize],
        elem_size: usize,
        device: &Self::Device,
    ) -> Result<()>;

    /// Default device
    fn default_device() -> Self::Device;

    /// Client bound to `device`
    fn default_client(device: &Self::Device) -> Self::Client;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Unique identifier for this device within its runtime
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that handle operation dispatch
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Device this client operates on
    fn device(&self) -> &R::Device;

    /// Wait for all pending operations to complete
    fn synchronize(&self);
}
