//! Runtime-index to per-type operation dispatch.
//!
//! Every list of alternatives carries one table per operation, each table holding one
//! type-erased row per alternative. Invoking row `k` of a table performs the operation on
//! storage reinterpreted as the `k`-th alternative. Tables that need a trait bound from every
//! alternative (equality, cloning, ...) live in their own trait so that lists whose members
//! lack the bound simply lack the operation.

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
};

use crate::{
    alloc::{Allocator, CloneIn, MoveIn},
    visit::{Visit, VisitMut, Visitor},
};

mod tuples;

mod sealed {
    pub trait Sealed {}
}

pub type DropRow = unsafe fn(*mut u8);
pub type SwapRow = unsafe fn(*mut u8, *mut u8);
pub type TypeNameRow = fn() -> &'static str;
/// `(source, destination, allocator)`, the source is left logically uninitialized.
pub type MoveRow = unsafe fn(*mut u8, *mut u8, *const ());
/// `(source, destination, allocator)`.
pub type CloneRow = unsafe fn(*const u8, *mut u8, *const ());
pub type EqRow = unsafe fn(*const u8, *const u8) -> bool;
pub type PartialCmpRow = unsafe fn(*const u8, *const u8) -> Option<Ordering>;
pub type CmpRow = unsafe fn(*const u8, *const u8) -> Ordering;
pub type HashRow = unsafe fn(*const u8, &mut dyn Hasher);
pub type FmtRow = unsafe fn(*const u8, &mut fmt::Formatter<'_>) -> fmt::Result;

/// Type-level index of an alternative, used to drive [`Contains`] lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Idx<const N: usize>;

/// A closed, ordered list of alternative types.
///
/// Implemented for tuples of one up to twenty types, `(T0, T1, ...)`.
pub trait Alternatives: sealed::Sealed + Sized {
    #[doc(hidden)]
    type Storage;

    /// Number of alternatives in the list.
    const LEN: usize;

    #[doc(hidden)]
    const DROP: &'static [DropRow];
    #[doc(hidden)]
    const SWAP: &'static [SwapRow];
    #[doc(hidden)]
    const TYPE_NAMES: &'static [TypeNameRow];
}

/// Resolves the alternative `T` to its position.
///
/// `I` is inferred: it is `Idx<k>` for the single position `k` holding `T`. If `T` is not
/// in the list there is no implementation and if it occurs more than once inference is
/// ambiguous, so both mistakes are compile errors rather than runtime failures.
///
/// # Safety
///
/// `INDEX` must be the position of `T` in the list. Implemented by this crate for every tuple
/// of alternatives; other implementations are never needed.
pub unsafe trait Contains<T, I>: Alternatives {
    const INDEX: usize;
}

/// The alternative at position `K`.
pub trait At<const K: usize>: Alternatives {
    type Output;
}

/// # Safety
///
/// Every row must perform the move its table describes on the alternative at its position.
pub unsafe trait MoveRows<A: Allocator>: Alternatives {
    #[doc(hidden)]
    const MOVE: &'static [MoveRow];
    #[doc(hidden)]
    const MOVE_ASSIGN: &'static [MoveRow];
}

/// # Safety
///
/// Every row must perform the clone its table describes on the alternative at its position.
pub unsafe trait CloneRows<A: Allocator>: MoveRows<A> {
    #[doc(hidden)]
    const CLONE: &'static [CloneRow];
    #[doc(hidden)]
    const CLONE_ASSIGN: &'static [CloneRow];
}

pub trait PartialEqRows: Alternatives {
    #[doc(hidden)]
    const EQ: &'static [EqRow];
}

/// Marker for lists in which every alternative is [`Eq`].
pub trait EqRows: PartialEqRows {}

pub trait PartialOrdRows: PartialEqRows {
    #[doc(hidden)]
    const PARTIAL_CMP: &'static [PartialCmpRow];
}

pub trait OrdRows: PartialOrdRows + EqRows {
    #[doc(hidden)]
    const CMP: &'static [CmpRow];
}

pub trait HashRows: Alternatives {
    #[doc(hidden)]
    const HASH: &'static [HashRow];
}

pub trait DebugRows: Alternatives {
    #[doc(hidden)]
    const DEBUG: &'static [FmtRow];
}

pub trait DisplayRows: Alternatives {
    #[doc(hidden)]
    const DISPLAY: &'static [FmtRow];
}

/// Lists whose every alternative can be visited by `V`.
pub trait Accept<V: Visitor>: Alternatives {
    /// # Safety
    ///
    /// The alternative at `index` must live at `ptr`.
    #[doc(hidden)]
    unsafe fn accept(index: usize, ptr: *const u8, visitor: &mut V) -> V::Output;
}

/// Lists whose every alternative can be visited mutably by `V`.
pub trait AcceptMut<V: Visitor>: Alternatives {
    /// # Safety
    ///
    /// The alternative at `index` must live at `ptr`.
    #[doc(hidden)]
    unsafe fn accept_mut(index: usize, ptr: *mut u8, visitor: &mut V) -> V::Output;
}

unsafe fn drop_row<T>(dst: *mut u8) {
    unsafe { std::ptr::drop_in_place(dst.cast::<T>()) }
}

unsafe fn swap_row<T>(a: *mut u8, b: *mut u8) {
    unsafe { std::mem::swap(&mut *a.cast::<T>(), &mut *b.cast::<T>()) }
}

unsafe fn move_row<T: MoveIn<A>, A: Allocator>(src: *mut u8, dst: *mut u8, alloc: *const ()) {
    unsafe {
        let value = src.cast::<T>().read();
        let moved = value.move_in(&*alloc.cast::<A>());
        dst.cast::<T>().write(moved);
    }
}

unsafe fn move_assign_row<T: MoveIn<A>, A: Allocator>(
    src: *mut u8,
    dst: *mut u8,
    alloc: *const (),
) {
    unsafe {
        let value = src.cast::<T>().read();
        *dst.cast::<T>() = value.move_in(&*alloc.cast::<A>());
    }
}

unsafe fn clone_row<T: CloneIn<A>, A: Allocator>(src: *const u8, dst: *mut u8, alloc: *const ()) {
    unsafe {
        let cloned = (*src.cast::<T>()).clone_in(&*alloc.cast::<A>());
        dst.cast::<T>().write(cloned);
    }
}

unsafe fn clone_assign_row<T: CloneIn<A>, A: Allocator>(
    src: *const u8,
    dst: *mut u8,
    alloc: *const (),
) {
    unsafe { (*dst.cast::<T>()).clone_from_in(&*src.cast::<T>(), &*alloc.cast::<A>()) }
}

unsafe fn eq_row<T: PartialEq>(a: *const u8, b: *const u8) -> bool {
    unsafe { *a.cast::<T>() == *b.cast::<T>() }
}

unsafe fn partial_cmp_row<T: PartialOrd>(a: *const u8, b: *const u8) -> Option<Ordering> {
    unsafe { (*a.cast::<T>()).partial_cmp(&*b.cast::<T>()) }
}

unsafe fn cmp_row<T: Ord>(a: *const u8, b: *const u8) -> Ordering {
    unsafe { (*a.cast::<T>()).cmp(&*b.cast::<T>()) }
}

unsafe fn hash_row<T: Hash>(a: *const u8, mut state: &mut dyn Hasher) {
    unsafe { (*a.cast::<T>()).hash(&mut state) }
}

unsafe fn debug_row<T: Debug>(a: *const u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    unsafe { Debug::fmt(&*a.cast::<T>(), f) }
}

unsafe fn display_row<T: Display>(a: *const u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    unsafe { Display::fmt(&*a.cast::<T>(), f) }
}

#[cold]
#[track_caller]
fn index_out_of_range(index: usize, len: usize) -> ! {
    panic!("alternative index {index} out of range for a list of {len} alternatives")
}
