use std::{
    cell::Cell,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use thiserror::Error;

/// Shared counter of live [`Tracked`] instances.
#[derive(Debug, Clone, Default)]
pub struct LiveCount(Rc<Cell<usize>>);

impl LiveCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    fn inc(&self) {
        self.0.set(self.0.get() + 1);
    }

    fn dec(&self) {
        let prev = self.0.get();
        assert!(prev > 0, "tracked instance dropped more often than it was created");
        self.0.set(prev - 1);
    }
}

/// A value that counts how many of its instances are alive.
///
/// Every construction and clone increments the shared [`LiveCount`], every drop decrements it.
#[derive(Debug)]
pub struct Tracked {
    value: i32,
    live: LiveCount,
}

impl Tracked {
    pub fn new(value: i32, live: &LiveCount) -> Self {
        live.inc();
        Self {
            value,
            live: live.clone(),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.value, &self.live)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.dec();
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("refusing to construct a rigged value from {0}")]
pub struct RiggedError(pub i32);

/// A value whose construction fails for the argument [`Rigged::TRAP`].
///
/// An armed instance additionally panics whenever it is cloned.
#[derive(Debug, PartialEq, Eq)]
pub struct Rigged {
    value: i32,
    armed: bool,
}

impl Rigged {
    pub const TRAP: i32 = -1;

    pub fn try_new(value: i32) -> Result<Self, RiggedError> {
        if value == Self::TRAP {
            return Err(RiggedError(value));
        }

        Ok(Self {
            value,
            armed: false,
        })
    }

    #[track_caller]
    pub fn new(value: i32) -> Self {
        match Self::try_new(value) {
            Ok(rigged) => rigged,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn armed(value: i32) -> Self {
        Self {
            value,
            armed: true,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Rigged {
    fn clone(&self) -> Self {
        if self.armed {
            panic!("cloning armed rigged value {}", self.value);
        }

        Self {
            value: self.value,
            armed: false,
        }
    }
}

/// Runs `f`, returning the panic message if it panicked.
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Option<String> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => None,
        Err(payload) => Some(
            payload
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
                .unwrap_or_default(),
        ),
    }
}
