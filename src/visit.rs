//! Callables applied to whatever value a variant currently holds.

use std::fmt::{self, Display};

pub use macros::visitor;

/// Declares the single result type shared by all of a visitor's [`Visit`] implementations.
pub trait Visitor {
    type Output;
}

/// Visitors that accept a shared reference to a `T`.
pub trait Visit<T: ?Sized>: Visitor {
    fn visit(&mut self, value: &T) -> Self::Output;
}

/// Visitors that accept a mutable reference to a `T`.
pub trait VisitMut<T: ?Sized>: Visitor {
    fn visit_mut(&mut self, value: &mut T) -> Self::Output;
}

/// Placeholder handed to visitors applied to an empty variant.
///
/// It is never one of a variant's alternatives, visiting it therefore always means that nothing
/// was held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nil;

impl Display for Nil {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    type Output = V::Output;
}

impl<T: ?Sized, V: Visit<T> + ?Sized> Visit<T> for &mut V {
    #[inline]
    fn visit(&mut self, value: &T) -> Self::Output {
        (**self).visit(value)
    }
}

impl<T: ?Sized, V: VisitMut<T> + ?Sized> VisitMut<T> for &mut V {
    #[inline]
    fn visit_mut(&mut self, value: &mut T) -> Self::Output {
        (**self).visit_mut(value)
    }
}
