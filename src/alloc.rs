//! Memory allocators that a [`Variant`](crate::Variant) threads into its alternatives.
//!
//! A variant owns one allocator handle for its whole lifetime. Whenever it constructs an
//! alternative from an existing value it routes that value through [`MoveIn`] or [`CloneIn`]
//! so the value ends up owning memory from the variant's allocator rather than from wherever
//! it came from.

use std::{alloc::Layout, ptr::NonNull};

use thiserror::Error;

mod counting;

pub use counting::{AllocStats, CountingAllocator};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    #[error("Allocating {size} bytes would exceed the limit of {limit} bytes ({in_use} in use)")]
    LimitExceeded { size: usize, in_use: u64, limit: u64 },
    #[error("Out of memory while allocating {size} bytes")]
    Exhausted { size: usize },
}

/// A handle to a source of memory.
///
/// Handles are cheap to clone, and clones refer to the same underlying allocator.
pub trait Allocator: Clone {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// # Safety
    ///
    /// `ptr` must have been returned by [`Allocator::allocate`] on an allocator equal to this one
    /// with the same `layout`, and must not have been deallocated yet.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Whether memory obtained from `other` may be released through `self`.
    fn is_equal(&self, other: &Self) -> bool;
}

/// The process-wide allocator backing [`std::alloc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            // SAFETY: Alignments are never zero.
            return Ok(unsafe {
                NonNull::new_unchecked(std::ptr::without_provenance_mut(layout.align()))
            });
        }

        // SAFETY: The layout has a non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::Exhausted {
            size: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }

    fn is_equal(&self, _other: &Self) -> bool {
        true
    }
}

/// Values that can be rehomed into memory from an allocator of type `A`.
///
/// Types that never allocate implement this as the identity.
pub trait MoveIn<A: Allocator>: Sized {
    fn move_in(self, alloc: &A) -> Self;
}

/// Values that can be copied into memory from an allocator of type `A`.
pub trait CloneIn<A: Allocator>: MoveIn<A> {
    fn clone_in(&self, alloc: &A) -> Self;

    /// Overwrites `self` with a copy of `source`, `self` already lives in `alloc`.
    fn clone_from_in(&mut self, source: &Self, alloc: &A) {
        *self = source.clone_in(alloc);
    }
}

impl<T> MoveIn<Global> for T {
    #[inline]
    fn move_in(self, _alloc: &Global) -> Self {
        self
    }
}

impl<T: Clone> CloneIn<Global> for T {
    #[inline]
    fn clone_in(&self, _alloc: &Global) -> Self {
        self.clone()
    }

    #[inline]
    fn clone_from_in(&mut self, source: &Self, _alloc: &Global) {
        self.clone_from(source)
    }
}
