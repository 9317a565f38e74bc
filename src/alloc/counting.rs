use std::{alloc::Layout, cell::Cell, fmt::Debug, ptr::NonNull, rc::Rc};

use log::{error, trace, warning, RootLogger};

use super::{AllocError, Allocator, CloneIn, Global, MoveIn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: u64,
    pub deallocations: u64,
    pub blocks_in_use: u64,
    pub bytes_in_use: u64,
    pub max_bytes_in_use: u64,
    pub refused: u64,
}

struct CountingState {
    name: String,
    stats: Cell<AllocStats>,
    limit: Cell<Option<u64>>,
    logger: RootLogger,
}

impl Drop for CountingState {
    fn drop(&mut self) {
        let stats = self.stats.get();
        if stats.blocks_in_use != 0 {
            error!(
                self.logger,
                "{}: dropped with {} blocks ({} bytes) still in use",
                self.name,
                stats.blocks_in_use,
                stats.bytes_in_use
            );
        }
    }
}

/// Instrumented allocator that records every allocation it serves.
///
/// Clones share the same counters and compare equal to each other, independently created
/// allocators never compare equal. Memory itself comes from [`Global`].
#[derive(Clone)]
pub struct CountingAllocator(Rc<CountingState>);

impl CountingAllocator {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_logger(name, RootLogger::new())
    }

    pub fn with_logger(name: impl Into<String>, logger: RootLogger) -> Self {
        Self(Rc::new(CountingState {
            name: name.into(),
            stats: Cell::new(AllocStats::default()),
            limit: Cell::new(None),
            logger,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn stats(&self) -> AllocStats {
        self.0.stats.get()
    }

    /// Caps the number of bytes that may be in use at once, `None` lifts the cap.
    pub fn set_allocation_limit(&self, limit: Option<u64>) {
        self.0.limit.set(limit);
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::new("counting")
    }
}

impl Debug for CountingAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("name", &self.0.name)
            .field("stats", &self.0.stats.get())
            .field("limit", &self.0.limit.get())
            .finish()
    }
}

impl Allocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let state = &*self.0;
        let mut stats = state.stats.get();
        let size = layout.size() as u64;

        if let Some(limit) = state.limit.get() {
            if stats.bytes_in_use + size > limit {
                stats.refused += 1;
                state.stats.set(stats);
                warning!(
                    state.logger,
                    "{}: refused {} byte allocation ({} of {} bytes in use)",
                    state.name,
                    size,
                    stats.bytes_in_use,
                    limit
                );
                return Err(AllocError::LimitExceeded {
                    size: layout.size(),
                    in_use: stats.bytes_in_use,
                    limit,
                });
            }
        }

        let ptr = Global.allocate(layout)?;

        stats.allocations += 1;
        stats.blocks_in_use += 1;
        stats.bytes_in_use += size;
        stats.max_bytes_in_use = stats.max_bytes_in_use.max(stats.bytes_in_use);
        state.stats.set(stats);

        trace!(
            state.logger,
            "{}: allocated {} bytes at {:p}",
            state.name,
            size,
            ptr
        );

        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let state = &*self.0;
        let mut stats = state.stats.get();
        debug_assert!(stats.blocks_in_use > 0, "{}: deallocation without allocation", state.name);

        stats.deallocations += 1;
        stats.blocks_in_use -= 1;
        stats.bytes_in_use -= layout.size() as u64;
        state.stats.set(stats);

        trace!(
            state.logger,
            "{}: released {} bytes at {:p}",
            state.name,
            layout.size(),
            ptr
        );

        unsafe { Global.deallocate(ptr, layout) }
    }

    fn is_equal(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

macro_rules! allocator_oblivious {
    ($($ty: ty),* $(,)?) => {$(
        impl MoveIn<CountingAllocator> for $ty {
            #[inline]
            fn move_in(self, _alloc: &CountingAllocator) -> Self {
                self
            }
        }

        impl CloneIn<CountingAllocator> for $ty {
            #[inline]
            fn clone_in(&self, _alloc: &CountingAllocator) -> Self {
                self.clone()
            }
        }
    )*};
}

allocator_oblivious!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    &'static str,
    String,
);

// Containers rehome their elements; their own buffers stay on the global heap.

impl<T: MoveIn<CountingAllocator>> MoveIn<CountingAllocator> for Option<T> {
    fn move_in(self, alloc: &CountingAllocator) -> Self {
        self.map(|value| value.move_in(alloc))
    }
}

impl<T: CloneIn<CountingAllocator>> CloneIn<CountingAllocator> for Option<T> {
    fn clone_in(&self, alloc: &CountingAllocator) -> Self {
        self.as_ref().map(|value| value.clone_in(alloc))
    }
}

impl<T: MoveIn<CountingAllocator>> MoveIn<CountingAllocator> for Box<T> {
    fn move_in(self, alloc: &CountingAllocator) -> Self {
        Box::new((*self).move_in(alloc))
    }
}

impl<T: CloneIn<CountingAllocator>> CloneIn<CountingAllocator> for Box<T> {
    fn clone_in(&self, alloc: &CountingAllocator) -> Self {
        Box::new((**self).clone_in(alloc))
    }
}

impl<T: MoveIn<CountingAllocator>> MoveIn<CountingAllocator> for Vec<T> {
    fn move_in(self, alloc: &CountingAllocator) -> Self {
        self.into_iter().map(|value| value.move_in(alloc)).collect()
    }
}

impl<T: CloneIn<CountingAllocator>> CloneIn<CountingAllocator> for Vec<T> {
    fn clone_in(&self, alloc: &CountingAllocator) -> Self {
        self.iter().map(|value| value.clone_in(alloc)).collect()
    }
}
