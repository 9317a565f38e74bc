use std::mem::{ManuallyDrop, MaybeUninit};

/// Storage wide and aligned enough for `H` and everything `T` can hold.
///
/// Every field of a `repr(C)` union lives at offset zero, so nesting these
/// yields a buffer in which any of the alternatives can be placed at its start.
#[doc(hidden)]
#[repr(C)]
#[allow(dead_code)]
pub union RawUnion<H, T> {
    head: ManuallyDrop<H>,
    tail: ManuallyDrop<T>,
}

pub(crate) const EMPTY: usize = usize::MAX;

/// Raw storage paired with the index of the alternative that currently lives in it.
///
/// This type never runs destructors itself, it only knows *where* a value is. Whoever owns
/// it must consult the index and dispatch to the right type before dropping.
pub(crate) struct TaggedStorage<S> {
    slot: MaybeUninit<S>,
    index: usize,
}

impl<S> TaggedStorage<S> {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            slot: MaybeUninit::uninit(),
            index: EMPTY,
        }
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        (self.index != EMPTY).then_some(self.index)
    }

    #[inline]
    pub fn raw_index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index == EMPTY
    }

    /// Records which alternative lives in the slot.
    ///
    /// # Safety
    ///
    /// A value of the alternative at `index` must have been written to the slot,
    /// or `index` must be [`EMPTY`] (in which case the old value is simply forgotten).
    #[inline]
    pub unsafe fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Forgets the live value without dropping it, returning the index it was stored under.
    #[inline]
    pub fn mark_empty(&mut self) -> Option<usize> {
        let index = self.index();
        self.index = EMPTY;
        index
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        util::cast_slot(&self.slot)
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        util::cast_slot_mut(&mut self.slot)
    }

    /// # Safety
    ///
    /// A `T` must currently live in the slot.
    #[inline]
    pub unsafe fn value<T>(&self) -> &T {
        unsafe { &*util::cast_slot::<S, T>(&self.slot) }
    }

    /// # Safety
    ///
    /// A `T` must currently live in the slot.
    #[inline]
    pub unsafe fn value_mut<T>(&mut self) -> &mut T {
        unsafe { &mut *util::cast_slot_mut::<S, T>(&mut self.slot) }
    }

    /// Moves `value` into the slot and records `index`.
    ///
    /// # Safety
    ///
    /// The slot must be empty, `T` must be the alternative at `index`,
    /// and `S` must be large and aligned enough to hold a `T`.
    #[inline]
    pub unsafe fn write<T>(&mut self, index: usize, value: T) -> &mut T {
        debug_assert!(self.is_empty());
        unsafe {
            let ptr = util::cast_slot_mut::<S, T>(&mut self.slot);
            ptr.write(value);
            self.index = index;
            &mut *ptr
        }
    }

    /// Moves the live `T` out of the slot, leaving it empty.
    ///
    /// # Safety
    ///
    /// A `T` must currently live in the slot.
    #[inline]
    pub unsafe fn read<T>(&mut self) -> T {
        self.index = EMPTY;
        unsafe { util::cast_slot::<S, T>(&self.slot).read() }
    }
}
