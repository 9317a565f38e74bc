use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
};

use super::Variant;
use crate::{
    alloc::Allocator,
    dispatch::{DebugRows, DisplayRows, EqRows, HashRows, OrdRows, PartialEqRows, PartialOrdRows},
};

// Values are only ever compared when both sides hold the same alternative, otherwise the
// indices decide with empty ordered before everything else.

impl<L: PartialEqRows, A: Allocator> PartialEq for Variant<L, A> {
    fn eq(&self, other: &Self) -> bool {
        match (self.index(), other.index()) {
            // SAFETY: Both sides hold the alternative at `a`.
            (Some(a), Some(b)) if a == b => unsafe {
                (L::EQ[a])(self.storage.as_ptr(), other.storage.as_ptr())
            },
            (a, b) => a == b,
        }
    }
}

impl<L: EqRows, A: Allocator> Eq for Variant<L, A> {}

impl<L: PartialOrdRows, A: Allocator> PartialOrd for Variant<L, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.index(), other.index()) {
            // SAFETY: Both sides hold the alternative at `a`.
            (Some(a), Some(b)) if a == b => unsafe {
                (L::PARTIAL_CMP[a])(self.storage.as_ptr(), other.storage.as_ptr())
            },
            (a, b) => a.partial_cmp(&b),
        }
    }
}

impl<L: OrdRows, A: Allocator> Ord for Variant<L, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.index(), other.index()) {
            // SAFETY: Both sides hold the alternative at `a`.
            (Some(a), Some(b)) if a == b => unsafe {
                (L::CMP[a])(self.storage.as_ptr(), other.storage.as_ptr())
            },
            (a, b) => a.cmp(&b),
        }
    }
}

impl<L: HashRows, A: Allocator> Hash for Variant<L, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let index = self.index();
        index.hash(state);
        if let Some(index) = index {
            // SAFETY: `index` describes the live value.
            unsafe { (L::HASH[index])(self.storage.as_ptr(), state) }
        }
    }
}

impl<L: DebugRows, A: Allocator> Debug for Variant<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Variant");
        match self.index() {
            Some(index) => tuple.field(&util::fmt_from_fn(|f| {
                write!(f, "{index}: ")?;
                // SAFETY: `index` describes the live value.
                unsafe { (L::DEBUG[index])(self.storage.as_ptr(), f) }
            })),
            None => tuple.field(&util::fmt_from_fn(|f| f.write_str("<empty>"))),
        };
        tuple.finish()
    }
}

/// Shows the held value as is, and nothing at all if empty.
impl<L: DisplayRows, A: Allocator> Display for Variant<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            // SAFETY: `index` describes the live value.
            Some(index) => unsafe { (L::DISPLAY[index])(self.storage.as_ptr(), f) },
            None => Ok(()),
        }
    }
}
