//! CPU runtime implementation

use super::client::CpuClient;
use super::device::CpuDevice;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::alloc::{Layout as AllocLayout, alloc_zeroed, dealloc};

/// Alignment of every CPU allocation (one cache line, AVX-512 width)
const ALIGN: usize = 64;

/// CPU compute runtime
///
/// Memory comes from the global allocator, zeroed and 64-byte aligned.
#[derive(Clone, Debug, Default)]
pub struct CpuRuntime;

fn alloc_layout(size_bytes: usize) -> Result<AllocLayout> {
    AllocLayout::from_size_align(size_bytes, ALIGN)
        .map_err(|_| Error::OutOfMemory { size: size_bytes })
}

impl Runtime for CpuRuntime {
    type Device = CpuDevice;
    type Client = CpuClient;

    fn name() -> &'static str {
        "cpu"
    }

    fn allocate(size_bytes: usize, _device: &Self::Device) -> Result<u64> {
        if size_bytes == 0 {
            return Ok(0);
        }

        let layout = alloc_layout(size_bytes)?;
        // SAFETY: layout has non-zero size
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(Error::OutOfMemory { size: size_bytes });
        }
        Ok(ptr as u64)
    }

    fn deallocate(ptr: u64, size_bytes: usize, _device: &Self::Device) {
        if ptr == 0 || size_bytes == 0 {
            return;
        }
        // The layout was valid when the block was allocated
        if let Ok(layout) = alloc_layout(size_bytes) {
            // SAFETY: ptr came from allocate() with this exact layout
            unsafe { dealloc(ptr as *mut u8, layout) };
        }
    }

    fn copy_to_device(src: &[u8], dst: u64, _device: &Self::Device) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        if dst == 0 {
            return Err(Error::Backend("copy to null device pointer".into()));
        }
        // SAFETY: dst points to at least src.len() bytes owned by a Storage
        unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), dst as *mut u8, src.len()) };
        Ok(())
    }

    fn copy_from_device(src: u64, dst: &mut [u8], _device: &Self::Device) -> Result<()> {
        if dst.is_empty() {
            return Ok(());
        }
        if src == 0 {
            return Err(Error::Backend("copy from null device pointer".into()));
        }
        // SAFETY: src points to at least dst.len() readable bytes
        unsafe { std::ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len()) };
        Ok(())
    }

    fn copy_strided(
        src: u64,
        src_byte_offset: usize,
        dst: u64,
        shape: &[usize],
        strides: &[isize],
        elem_size: usize,
        _device: &Self::Device,
    ) -> Result<()> {
        let numel: usize = shape.iter().product();
        if numel == 0 {
            return Ok(());
        }
        if src == 0 || dst == 0 {
            return Err(Error::Backend("strided copy with null device pointer".into()));
        }

        let src_base = (src as usize + src_byte_offset) as *const u8;
        let dst_base = dst as *mut u8;
        let ndim = shape.len();
        let mut indices = vec![0usize; ndim];
        let mut src_offset: isize = 0;

        for dst_index in 0..numel {
            // SAFETY: the view described by shape/strides lies inside the
            // source buffer and dst holds numel elements
            unsafe {
                std::ptr::copy_nonoverlapping(
                    src_base.offset(src_offset * elem_size as isize),
                    dst_base.add(dst_index * elem_size),
                    elem_size,
                );
            }

            for dim in (0..ndim).rev() {
                indices[dim] += 1;
                src_offset += strides[dim];
                if indices[dim] < shape[dim] {
                    break;
                }
                src_offset -= strides[dim] * shape[dim] as isize;
                indices[dim] = 0;
            }
        }
        Ok(())
    }

    fn default_device() -> Self::Device {
        CpuDevice::new()
    }

    fn default_client(device: &Self::Device) -> Self::Client {
        CpuClient::new(device.clone())
    }
}
