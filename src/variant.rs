use std::{fmt, marker::PhantomData, mem};

use crate::{
    alloc::{Allocator, Global, MoveIn},
    dispatch::{Accept, AcceptMut, Alternatives, At, CloneRows, Contains, DisplayRows, MoveRows},
    error::BadVariantAccess,
    storage::TaggedStorage,
    visit::{Nil, Visit, VisitMut, Visitor},
};

mod traits;

/// A value that is exactly one of the alternatives listed in the tuple `L`, or nothing at all.
///
/// The active alternative is tracked at runtime by its position in `L`. A variant starts out
/// empty unless constructed with a value, and it becomes empty again after [`Variant::reset`]
/// or [`Variant::take`], or when constructing a new alternative fails midway.
///
/// Every alternative a variant constructs is handed the variant's allocator `A`, see
/// [`crate::alloc`]. With the default [`Global`] allocator this is free.
///
/// Alternatives are addressed either by type, where `I` is always left to inference
/// (`variant.get::<String, _>()`), or by index (`variant.get_at::<1>()`). A type that appears
/// more than once in `L` can only be addressed by index.
pub struct Variant<L: Alternatives, A: Allocator = Global> {
    storage: TaggedStorage<L::Storage>,
    alloc: A,
    _marker: PhantomData<L>,
}

impl<L: Alternatives> Variant<L> {
    /// Creates an empty variant.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a variant holding the default value of its first alternative.
    pub fn new_first_default() -> Self
    where
        L: At<0>,
        <L as At<0>>::Output: Default,
    {
        Self::from_index::<0>(Default::default())
    }

    pub fn from_value<T, I>(value: T) -> Self
    where
        L: Contains<T, I>,
    {
        Self::from_value_in::<T, I>(value, Global)
    }

    pub fn from_index<const K: usize>(value: <L as At<K>>::Output) -> Self
    where
        L: At<K>,
    {
        Self::from_index_in::<K>(value, Global)
    }
}

impl<L: Alternatives, A: Allocator> Variant<L, A> {
    /// Number of alternatives in `L`.
    pub const ALTERNATIVES: usize = L::LEN;

    /// Creates an empty variant that will construct its alternatives using `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            storage: TaggedStorage::empty(),
            alloc,
            _marker: PhantomData,
        }
    }

    pub fn from_value_in<T, I>(value: T, alloc: A) -> Self
    where
        L: Contains<T, I>,
        T: MoveIn<A>,
    {
        let mut result = Self::new_in(alloc);
        result.emplace::<T, I>(value);
        result
    }

    pub fn from_index_in<const K: usize>(value: <L as At<K>>::Output, alloc: A) -> Self
    where
        L: At<K>,
        <L as At<K>>::Output: MoveIn<A>,
    {
        let mut result = Self::new_in(alloc);
        result.emplace_at::<K>(value);
        result
    }

    /// Copies this variant into a new one that uses `alloc`.
    pub fn clone_in(&self, alloc: A) -> Self
    where
        L: CloneRows<A>,
    {
        let mut result = Self::new_in(alloc);
        if let Some(index) = self.storage.index() {
            // SAFETY: `index` describes the value in `self.storage` and `result.storage` is empty.
            unsafe {
                (L::CLONE[index])(
                    self.storage.as_ptr(),
                    result.storage.as_mut_ptr(),
                    result.erased_alloc(),
                );
                result.storage.set_index(index);
            }
        }
        result
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    fn erased_alloc(&self) -> *const () {
        (&self.alloc as *const A).cast()
    }

    /// Index of the active alternative, `None` if empty.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.storage.index()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    pub fn holds<T, I>(&self) -> bool
    where
        L: Contains<T, I>,
    {
        self.storage.index() == Some(<L as Contains<T, I>>::INDEX)
    }

    #[inline]
    pub fn holds_index(&self, index: usize) -> bool {
        self.storage.index() == Some(index)
    }

    /// Name of the active alternative's type as reported by [`std::any::type_name`].
    pub fn active_type_name(&self) -> Option<&'static str> {
        self.storage.index().map(|index| (L::TYPE_NAMES[index])())
    }

    fn bad_access(&self, requested: usize) -> BadVariantAccess {
        BadVariantAccess {
            requested,
            active: self.storage.index(),
        }
    }

    pub fn get<T, I>(&self) -> Result<&T, BadVariantAccess>
    where
        L: Contains<T, I>,
    {
        let index = <L as Contains<T, I>>::INDEX;
        self.get_if::<T, I>().ok_or_else(|| self.bad_access(index))
    }

    pub fn get_mut<T, I>(&mut self) -> Result<&mut T, BadVariantAccess>
    where
        L: Contains<T, I>,
    {
        let index = <L as Contains<T, I>>::INDEX;
        if !self.holds_index(index) {
            return Err(self.bad_access(index));
        }

        // SAFETY: Checked above.
        Ok(unsafe { self.storage.value_mut::<T>() })
    }

    pub fn get_at<const K: usize>(&self) -> Result<&<L as At<K>>::Output, BadVariantAccess>
    where
        L: At<K>,
    {
        self.get_if_at::<K>().ok_or_else(|| self.bad_access(K))
    }

    pub fn get_at_mut<const K: usize>(
        &mut self,
    ) -> Result<&mut <L as At<K>>::Output, BadVariantAccess>
    where
        L: At<K>,
    {
        if !self.holds_index(K) {
            return Err(self.bad_access(K));
        }

        // SAFETY: Checked above.
        Ok(unsafe { self.storage.value_mut::<<L as At<K>>::Output>() })
    }

    pub fn get_if<T, I>(&self) -> Option<&T>
    where
        L: Contains<T, I>,
    {
        // SAFETY: `holds` guarantees a `T` is live.
        self.holds::<T, I>()
            .then(|| unsafe { self.storage.value::<T>() })
    }

    pub fn get_if_mut<T, I>(&mut self) -> Option<&mut T>
    where
        L: Contains<T, I>,
    {
        if self.holds::<T, I>() {
            // SAFETY: A `T` is live.
            Some(unsafe { self.storage.value_mut::<T>() })
        } else {
            None
        }
    }

    pub fn get_if_at<const K: usize>(&self) -> Option<&<L as At<K>>::Output>
    where
        L: At<K>,
    {
        // SAFETY: The alternative at `K` is live.
        self.holds_index(K)
            .then(|| unsafe { self.storage.value::<<L as At<K>>::Output>() })
    }

    pub fn get_if_at_mut<const K: usize>(&mut self) -> Option<&mut <L as At<K>>::Output>
    where
        L: At<K>,
    {
        if self.holds_index(K) {
            // SAFETY: The alternative at `K` is live.
            Some(unsafe { self.storage.value_mut::<<L as At<K>>::Output>() })
        } else {
            None
        }
    }

    /// # Safety
    ///
    /// The variant must hold a `T`.
    #[inline]
    pub unsafe fn get_unchecked<T, I>(&self) -> &T
    where
        L: Contains<T, I>,
    {
        debug_assert!(self.holds::<T, I>());
        unsafe { self.storage.value::<T>() }
    }

    /// # Safety
    ///
    /// The variant must hold a `T`.
    #[inline]
    pub unsafe fn get_unchecked_mut<T, I>(&mut self) -> &mut T
    where
        L: Contains<T, I>,
    {
        debug_assert!(self.holds::<T, I>());
        unsafe { self.storage.value_mut::<T>() }
    }

    /// Moves the held `T` out, or gives the variant back if it does not hold one.
    pub fn into_inner<T, I>(mut self) -> Result<T, Self>
    where
        L: Contains<T, I>,
    {
        if self.holds::<T, I>() {
            // SAFETY: A `T` is live, reading it leaves the storage empty so `self` drops nothing.
            Ok(unsafe { self.storage.read::<T>() })
        } else {
            Err(self)
        }
    }

    /// Destroys the held value, if any.
    pub fn reset(&mut self) {
        if let Some(index) = self.storage.mark_empty() {
            // SAFETY: The alternative at `index` was live, the storage already claims to be empty.
            unsafe { (L::DROP[index])(self.storage.as_mut_ptr()) }
        }
    }

    fn replace_with<T>(&mut self, index: usize, make: impl FnOnce(&A) -> T) -> &mut T {
        self.reset();
        let value = make(&self.alloc);
        // SAFETY: Callers pass the index at which `T` is listed, the storage is empty.
        unsafe { self.storage.write(index, value) }
    }

    fn try_replace_with<T, E>(
        &mut self,
        index: usize,
        make: impl FnOnce(&A) -> Result<T, E>,
    ) -> Result<&mut T, E> {
        self.reset();
        let value = make(&self.alloc)?;
        // SAFETY: Callers pass the index at which `T` is listed, the storage is empty.
        Ok(unsafe { self.storage.write(index, value) })
    }

    /// Makes `value` the held alternative.
    ///
    /// If a `T` is already held it is assigned to, otherwise the current value is destroyed
    /// before `value` is moved in.
    pub fn set<T, I>(&mut self, value: T) -> &mut T
    where
        L: Contains<T, I>,
        T: MoveIn<A>,
    {
        if self.holds::<T, I>() {
            let value = value.move_in(&self.alloc);
            // SAFETY: A `T` is live.
            let slot = unsafe { self.storage.value_mut::<T>() };
            *slot = value;
            slot
        } else {
            self.emplace::<T, I>(value)
        }
    }

    /// Converts `value` to `T` and assigns it like [`Variant::set`].
    pub fn assign_to<T, I>(&mut self, value: impl Into<T>) -> &mut T
    where
        L: Contains<T, I>,
        T: MoveIn<A>,
    {
        self.set::<T, I>(value.into())
    }

    /// Destroys the held value and moves `value` in.
    pub fn emplace<T, I>(&mut self, value: T) -> &mut T
    where
        L: Contains<T, I>,
        T: MoveIn<A>,
    {
        self.replace_with(<L as Contains<T, I>>::INDEX, |alloc| value.move_in(alloc))
    }

    /// Destroys the held value and constructs a new `T` from `make`.
    ///
    /// If `make` panics the variant is left empty.
    pub fn emplace_with<T, I>(&mut self, make: impl FnOnce() -> T) -> &mut T
    where
        L: Contains<T, I>,
        T: MoveIn<A>,
    {
        self.replace_with(<L as Contains<T, I>>::INDEX, |alloc| make().move_in(alloc))
    }

    /// Destroys the held value and tries to construct a new `T` from `make`.
    ///
    /// On failure the error is returned unchanged and the variant is left empty.
    pub fn try_emplace_with<T, I, E>(
        &mut self,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E>
    where
        L: Contains<T, I>,
        T: MoveIn<A>,
    {
        self.try_replace_with(<L as Contains<T, I>>::INDEX, |alloc| {
            make().map(|value| value.move_in(alloc))
        })
    }

    /// Destroys the held value and constructs a new `T` from `make`, which is handed the
    /// variant's allocator.
    pub fn emplace_in<T, I>(&mut self, make: impl FnOnce(&A) -> T) -> &mut T
    where
        L: Contains<T, I>,
    {
        self.replace_with(<L as Contains<T, I>>::INDEX, make)
    }

    pub fn try_emplace_in<T, I, E>(
        &mut self,
        make: impl FnOnce(&A) -> Result<T, E>,
    ) -> Result<&mut T, E>
    where
        L: Contains<T, I>,
    {
        self.try_replace_with(<L as Contains<T, I>>::INDEX, make)
    }

    pub fn emplace_at<const K: usize>(
        &mut self,
        value: <L as At<K>>::Output,
    ) -> &mut <L as At<K>>::Output
    where
        L: At<K>,
        <L as At<K>>::Output: MoveIn<A>,
    {
        self.replace_with(K, |alloc| value.move_in(alloc))
    }

    pub fn emplace_at_with<const K: usize>(
        &mut self,
        make: impl FnOnce() -> <L as At<K>>::Output,
    ) -> &mut <L as At<K>>::Output
    where
        L: At<K>,
        <L as At<K>>::Output: MoveIn<A>,
    {
        self.replace_with(K, |alloc| make().move_in(alloc))
    }

    /// Moves the held value into a new variant sharing this variant's allocator,
    /// leaving this one empty.
    pub fn take(&mut self) -> Self {
        Self {
            storage: mem::replace(&mut self.storage, TaggedStorage::empty()),
            alloc: self.alloc.clone(),
            _marker: PhantomData,
        }
    }

    /// Moves the held value into a new variant using `alloc`, leaving this one empty.
    pub fn take_in(&mut self, alloc: A) -> Self
    where
        L: MoveRows<A>,
    {
        let mut result = Self::new_in(alloc);
        result.move_from(self);
        result
    }

    /// Replaces the held value with the one held by `source`, which is left empty.
    ///
    /// This variant keeps its own allocator; if `source` uses a different one the value is
    /// rehomed with [`MoveIn`].
    pub fn move_from(&mut self, source: &mut Self)
    where
        L: MoveRows<A>,
    {
        if self.alloc.is_equal(&source.alloc) {
            self.reset();
            self.storage = mem::replace(&mut source.storage, TaggedStorage::empty());
            return;
        }

        let Some(index) = source.storage.mark_empty() else {
            self.reset();
            return;
        };

        if self.storage.index() == Some(index) {
            // SAFETY: Both sides hold the alternative at `index`, the source's copy is
            // consumed and already forgotten.
            unsafe {
                (L::MOVE_ASSIGN[index])(
                    source.storage.as_mut_ptr(),
                    self.storage.as_mut_ptr(),
                    self.erased_alloc(),
                )
            }
        } else {
            self.reset();
            // SAFETY: As above, and our storage is empty.
            unsafe {
                (L::MOVE[index])(
                    source.storage.as_mut_ptr(),
                    self.storage.as_mut_ptr(),
                    self.erased_alloc(),
                );
                self.storage.set_index(index);
            }
        }
    }

    /// Exchanges the values held by two variants.
    ///
    /// With equal allocators this never fails. Otherwise each value is rehomed into the other
    /// variant's allocator, and if that panics either variant may be left empty.
    pub fn swap(&mut self, other: &mut Self)
    where
        L: MoveRows<A>,
    {
        if !self.alloc.is_equal(&other.alloc) {
            let mut aside = self.take_in(other.alloc.clone());
            self.move_from(other);
            other.move_from(&mut aside);
            return;
        }

        match (self.storage.index(), other.storage.index()) {
            // SAFETY: Both sides hold the alternative at `a`.
            (Some(a), Some(b)) if a == b => unsafe {
                (L::SWAP[a])(self.storage.as_mut_ptr(), other.storage.as_mut_ptr())
            },
            _ => mem::swap(&mut self.storage, &mut other.storage),
        }
    }

    /// Applies `visitor` to the held value, or to [`Nil`] if empty.
    pub fn apply<V>(&self, mut visitor: V) -> V::Output
    where
        V: Visit<Nil>,
        L: Accept<V>,
    {
        match self.storage.index() {
            // SAFETY: `index` describes the live value.
            Some(index) => unsafe { L::accept(index, self.storage.as_ptr(), &mut visitor) },
            None => visitor.visit(&Nil),
        }
    }

    /// Applies `visitor` to the held value, or to `default` if empty.
    pub fn apply_or<V, D>(&self, mut visitor: V, default: &D) -> V::Output
    where
        V: Visit<D>,
        D: ?Sized,
        L: Accept<V>,
    {
        match self.storage.index() {
            // SAFETY: `index` describes the live value.
            Some(index) => unsafe { L::accept(index, self.storage.as_ptr(), &mut visitor) },
            None => visitor.visit(default),
        }
    }

    /// Like [`Variant::apply`], converting the result to the explicitly requested `R`.
    pub fn apply_as<R, V>(&self, visitor: V) -> R
    where
        V: Visit<Nil>,
        V::Output: Into<R>,
        L: Accept<V>,
    {
        self.apply(visitor).into()
    }

    /// Applies `visitor` to the held value.
    ///
    /// # Panics
    ///
    /// If the variant is empty.
    #[track_caller]
    pub fn apply_raw<V>(&self, mut visitor: V) -> V::Output
    where
        V: Visitor,
        L: Accept<V>,
    {
        let Some(index) = self.storage.index() else {
            empty_variant_visited();
        };

        // SAFETY: `index` describes the live value.
        unsafe { L::accept(index, self.storage.as_ptr(), &mut visitor) }
    }

    /// Applies `visitor` to the held value without checking that there is one.
    ///
    /// # Safety
    ///
    /// The variant must not be empty.
    pub unsafe fn apply_unchecked<V>(&self, mut visitor: V) -> V::Output
    where
        V: Visitor,
        L: Accept<V>,
    {
        debug_assert!(!self.is_empty());
        unsafe { L::accept(self.storage.raw_index(), self.storage.as_ptr(), &mut visitor) }
    }

    /// Applies `visitor` to the held value mutably, or to [`Nil`] if empty.
    pub fn apply_mut<V>(&mut self, mut visitor: V) -> V::Output
    where
        V: VisitMut<Nil>,
        L: AcceptMut<V>,
    {
        match self.storage.index() {
            // SAFETY: `index` describes the live value.
            Some(index) => unsafe {
                L::accept_mut(index, self.storage.as_mut_ptr(), &mut visitor)
            },
            None => visitor.visit_mut(&mut Nil),
        }
    }

    /// # Panics
    ///
    /// If the variant is empty.
    #[track_caller]
    pub fn apply_raw_mut<V>(&mut self, mut visitor: V) -> V::Output
    where
        V: Visitor,
        L: AcceptMut<V>,
    {
        let Some(index) = self.storage.index() else {
            empty_variant_visited();
        };

        // SAFETY: `index` describes the live value.
        unsafe { L::accept_mut(index, self.storage.as_mut_ptr(), &mut visitor) }
    }

    /// Writes the held value on its own line, indented by `level * spaces_per_level` spaces.
    ///
    /// A negative `level` suppresses the indentation of the first line and a negative
    /// `spaces_per_level` suppresses the trailing newline. An empty variant writes nothing.
    pub fn print(
        &self,
        out: &mut impl fmt::Write,
        level: i32,
        spaces_per_level: i32,
    ) -> fmt::Result
    where
        L: DisplayRows,
    {
        let Some(index) = self.storage.index() else {
            return Ok(());
        };

        util::write_indent(&mut *out, level, spaces_per_level)?;
        write!(
            out,
            "{}",
            // SAFETY: `index` describes the live value.
            util::fmt_from_fn(|f| unsafe { (L::DISPLAY[index])(self.storage.as_ptr(), f) })
        )?;

        if spaces_per_level >= 0 {
            out.write_char('\n')?;
        }

        Ok(())
    }
}

#[cold]
#[track_caller]
fn empty_variant_visited() -> ! {
    panic!("visitor applied to an empty variant")
}

impl<L: Alternatives, A: Allocator> Drop for Variant<L, A> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<L: Alternatives, A: Allocator + Default> Default for Variant<L, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<L: CloneRows<A>, A: Allocator + Default> Clone for Variant<L, A> {
    fn clone(&self) -> Self {
        self.clone_in(A::default())
    }

    fn clone_from(&mut self, source: &Self) {
        let Some(index) = source.storage.index() else {
            self.reset();
            return;
        };

        if self.storage.index() == Some(index) {
            // SAFETY: Both sides hold the alternative at `index`.
            unsafe {
                (L::CLONE_ASSIGN[index])(
                    source.storage.as_ptr(),
                    self.storage.as_mut_ptr(),
                    self.erased_alloc(),
                )
            }
        } else {
            self.reset();
            // SAFETY: `index` describes the source's value and our storage is empty.
            unsafe {
                (L::CLONE[index])(
                    source.storage.as_ptr(),
                    self.storage.as_mut_ptr(),
                    self.erased_alloc(),
                );
                self.storage.set_index(index);
            }
        }
    }
}
