//! Thread safe listener set.
use log::error;
use std::{
    any::Any,
    collections::HashMap,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{Arc, PoisonError, RwLock},
};

/// Callback receiving `true` when the OS switched to a dark theme.
///
/// Two listeners are the same when they share an allocation, so keep the
/// [`Arc`] around to remove it later.
pub type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Unordered set of listeners keyed by the address of their allocation.
///
/// Iteration works on a snapshot so listeners can be added or removed
/// concurrently, including from inside a listener.
#[derive(Default)]
pub struct ListenerSet {
    listeners: RwLock<HashMap<usize, Listener>>,
}

fn key(listener: &Listener) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Returns `false` if it was already present.
    pub fn add(&self, listener: Listener) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let key = key(&listener);
        if listeners.contains_key(&key) {
            return false;
        }
        listeners.insert(key, listener);
        true
    }

    /// Remove a listener. Returns `false` if it was not present.
    pub fn remove(&self, listener: &Listener) -> bool {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key(listener))
            .is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Visit a snapshot of the current listeners.
    pub fn for_each(&self, mut f: impl FnMut(&Listener)) {
        let snapshot = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect::<Vec<_>>();

        for listener in &snapshot {
            f(listener);
        }
    }

    /// Invoke every listener with `dark`. A panicking listener is logged and
    /// does not stop the others.
    pub fn notify(&self, dark: bool) {
        self.for_each(|listener| {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(dark))) {
                error!(
                    "Caught panic during listener notification: {}",
                    panic_message(&panic)
                );
            }
        });
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
