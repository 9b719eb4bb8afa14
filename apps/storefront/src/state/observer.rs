//! # Change Observer
//!
//! Hook the cart store calls after every successful mutation.
//!
//! ```text
//! CartStore::dispatch(cmd)
//!      │
//!      ├── cart mutated?  no ──► return report (observer not called)
//!      │
//!      ├── persist()           (failure recorded in the report)
//!      │
//!      └── observer.cart_changed()
//! ```
//!
//! The hook carries no payload; observers read whatever they need from the
//! store once control returns.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Receives "the cart changed" notifications.
pub trait CartObserver: Send + Sync {
    fn cart_changed(&self);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl CartObserver for NoOpObserver {
    fn cart_changed(&self) {}
}

/// Remembers whether anything changed since the last `take()`.
///
/// The CLI uses it to decide whether to re-render the drawer.
#[derive(Debug, Default)]
pub struct ChangeFlag {
    changed: AtomicBool,
    notifications: AtomicUsize,
}

impl ChangeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a change was seen, and resets the flag.
    pub fn take(&self) -> bool {
        self.changed.swap(false, Ordering::SeqCst)
    }

    /// Total notifications received.
    pub fn count(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl CartObserver for ChangeFlag {
    fn cart_changed(&self) {
        self.changed.store(true, Ordering::SeqCst);
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_flag_take_resets() {
        let flag = ChangeFlag::new();
        assert!(!flag.take());

        flag.cart_changed();
        flag.cart_changed();
        assert!(flag.take());
        assert!(!flag.take());
        assert_eq!(flag.count(), 2);
    }
}
