use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::error::{allocation_error, layout_error, Result};
use crate::q15::Q15;

/// Owned, zero-initialized Q15 buffer with a caller-chosen alignment.
///
/// The buffer is allocated and freed with the same [`Layout`], which is why it
/// does not hand its memory over to a `Vec`: a `Vec<i16>` would free it with
/// the natural 2-byte alignment.
///
/// Derefs to `[i16]`, so kernels take it as an ordinary slice.
///
/// # Example
///
/// ```rust
/// use q15axpy::utils::AlignedBuffer;
///
/// let buf = AlignedBuffer::zeroed(4096, 64).unwrap();
/// assert_eq!(buf.len(), 4096);
/// assert_eq!(buf.as_ptr() as usize % 64, 0);
/// ```
pub struct AlignedBuffer {
    ptr: NonNull<Q15>,
    len: usize,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocates `len` zeroed elements aligned to `align` bytes.
    ///
    /// An empty buffer performs no allocation.
    ///
    /// # Errors
    ///
    /// - [`LayoutError`](crate::error::Q15Error::LayoutError) if `align` is not
    ///   a power of two, is below the alignment of `i16`, or the byte size
    ///   overflows.
    /// - [`AllocationError`](crate::error::Q15Error::AllocationError) if the
    ///   allocator returns null.
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        if !align.is_power_of_two() || align < mem::align_of::<Q15>() {
            return Err(layout_error(
                len,
                align,
                format!("alignment must be a power of two >= {}", mem::align_of::<Q15>()),
            ));
        }

        let size = len
            .checked_mul(mem::size_of::<Q15>())
            .ok_or_else(|| layout_error(len, align, "total size overflows usize"))?;

        let layout = Layout::from_size_align(size, align)
            .map_err(|e| layout_error(size, align, e.to_string()))?;

        if size == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
                layout,
            });
        }

        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) } as *mut Q15;

        let ptr = NonNull::new(ptr).ok_or_else(|| {
            allocation_error(size, align, "allocator returned null")
        })?;

        Ok(Self { ptr, len, layout })
    }

    /// Alignment the buffer was allocated with.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: allocated in `zeroed` with exactly this layout.
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, self.layout) }
        }
    }
}

impl Deref for AlignedBuffer {
    type Target = [Q15];

    fn deref(&self) -> &Self::Target {
        // SAFETY: `ptr` is valid for `len` initialized elements (or dangling with len 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AlignedBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as in `deref`, and `&mut self` guarantees unique access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("alignment", &self.alignment())
            .finish()
    }
}

// SAFETY: the buffer uniquely owns plain `i16` data.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}
