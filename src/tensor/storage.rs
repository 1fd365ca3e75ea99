//! Storage: reference-counted device memory

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::sync::Arc;

/// Device buffer shared by every view onto it
///
/// Cloning is cheap (reference count bump). Memory is returned to the
/// runtime when the last reference is dropped.
pub struct Storage<R: Runtime> {
    inner: Arc<StorageInner<R>>,
}

struct StorageInner<R: Runtime> {
    /// Device pointer (host address cast to u64 on CPU)
    ptr: u64,
    /// Number of elements, not bytes
    len: usize,
    dtype: DType,
    device: R::Device,
}

impl<R: Runtime> Storage<R> {
    /// Allocate zeroed storage for `len` elements of `dtype`
    ///
    /// Fails with `InvalidArgument` if the byte size does not fit in `isize`.
    pub fn new(len: usize, dtype: DType, device: &R::Device) -> Result<Self> {
        let ptr = R::allocate(byte_size(len, dtype)?, device)?;
        Ok(Self::wrap(ptr, len, dtype, device))
    }

    /// Copy a host slice into new storage
    pub fn from_slice<T: Element>(data: &[T], device: &R::Device) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let ptr = R::allocate(bytes.len(), device)?;
        R::copy_to_device(bytes, ptr, device)?;
        Ok(Self::wrap(ptr, data.len(), T::DTYPE, device))
    }

    fn wrap(ptr: u64, len: usize, dtype: DType, device: &R::Device) -> Self {
        Self {
            inner: Arc::new(StorageInner {
                ptr,
                len,
                dtype,
                device: device.clone(),
            }),
        }
    }

    /// Raw device pointer
    #[inline]
    pub fn ptr(&self) -> u64 {
        self.inner.ptr
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// True if the buffer holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype
    }

    /// Owning device
    #[inline]
    pub fn device(&self) -> &R::Device {
        &self.inner.device
    }

    /// Size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.inner.len * self.inner.dtype.size_in_bytes()
    }

    /// Number of live references
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Copy the whole buffer to the host
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let mut out = vec![T::zeroed(); self.inner.len];
        R::copy_from_device(
            self.inner.ptr,
            bytemuck::cast_slice_mut(&mut out),
            &self.inner.device,
        )?;
        Ok(out)
    }
}

/// Size in bytes of `len` elements of `dtype`
pub(crate) fn byte_size(len: usize, dtype: DType) -> Result<usize> {
    len.checked_mul(dtype.size_in_bytes())
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or_else(|| {
            Error::invalid_argument(
                "len",
                format!("{len} elements of {dtype} exceed the addressable size"),
            )
        })
}

impl<R: Runtime> Clone for Storage<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Runtime> Drop for StorageInner<R> {
    fn drop(&mut self) {
        if self.ptr != 0 {
            R::deallocate(
                self.ptr,
                self.len * self.dtype.size_in_bytes(),
                &self.device,
            );
        }
    }
}

impl<R: Runtime> std::fmt::Debug for Storage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("ptr", &format!("0x{:x}", self.inner.ptr))
            .field("len", &self.inner.len)
            .field("dtype", &self.inner.dtype)
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
