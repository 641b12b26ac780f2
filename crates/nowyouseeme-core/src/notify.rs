//! Change notification from the upload side to the gallery owner.

use std::sync::atomic::{AtomicBool, Ordering};

/// Receives a signal whenever the remote collection is known to have changed.
///
/// Implementations must not block; the owner of the gallery reacts by issuing
/// a fresh `list()`.
pub trait ChangeNotifier: Send + Sync {
    fn notify_changed(&self);
}

/// Latching notifier for owners that poll instead of listening.
#[derive(Debug, Default)]
pub struct RefreshFlag {
    raised: AtomicBool,
}

impl RefreshFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return whether a change was signalled since the last call, and reset.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

impl ChangeNotifier for RefreshFlag {
    fn notify_changed(&self) {
        self.raised.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_latches_until_taken() {
        let flag = RefreshFlag::new();
        assert!(!flag.take());
        flag.notify_changed();
        flag.notify_changed();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
