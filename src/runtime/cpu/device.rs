//! CPU device implementation

use crate::runtime::Device;

/// A host memory space
///
/// All CPU devices share the machine's memory, but tensors created on
/// different indices are treated as living on different devices. Kernels
/// refuse to mix them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuDevice {
    id: usize,
}

impl CpuDevice {
    /// The default CPU device (index 0)
    pub fn new() -> Self {
        Self { id: 0 }
    }

    /// A distinct logical CPU device
    pub fn with_index(id: usize) -> Self {
        Self { id }
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        format!("cpu:{}", self.id)
    }
}
