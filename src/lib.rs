//! Tagged unions over an arbitrary closed list of types.
//!
//! A [`Variant<(T0, T1, ...)>`](Variant) holds exactly one value of one of the listed types,
//! or nothing at all, and remembers which one it is. Values are inspected through typed
//! accessors or by applying a [`Visitor`] that handles every alternative.
//!
//! ```
//! use oneof::{visitor, Nil, Variant};
//!
//! let mut cell = Variant::<(i64, String)>::from_value(5i64);
//! assert_eq!(cell.get::<i64, _>(), Ok(&5));
//!
//! cell.set(String::from("five"));
//! assert_eq!(cell.index(), Some(1));
//!
//! let len = cell.apply(visitor! {
//!     |_: &i64| 8,
//!     |s: &String| s.len(),
//!     |_: &Nil| 0,
//! });
//! assert_eq!(len, 4);
//! ```

extern crate self as oneof;

pub mod alloc;
mod dispatch;
mod error;
mod storage;
mod variant;
mod visit;

pub use dispatch::{
    Accept, AcceptMut, Alternatives, At, CloneRows, Contains, DebugRows, DisplayRows, EqRows,
    HashRows, Idx, MoveRows, OrdRows, PartialEqRows, PartialOrdRows,
};
pub use error::BadVariantAccess;
pub use variant::Variant;
pub use visit::{visitor, Nil, Visit, VisitMut, Visitor};
