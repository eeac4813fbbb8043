//! Single-slot latest-wins mailbox.

use tracing::trace;

/// A one-element slot where a newer value displaces an unconsumed older one.
///
/// Scale requests arrive faster than a pass can run while the user drags a
/// window slider; only the newest request matters. Holding at most one
/// pending value makes that drop policy structural instead of relying on
/// queue draining alone.
#[derive(Debug, Default)]
pub struct Mailbox<T> {
    slot: Option<T>,
}

impl<T> Mailbox<T> {
    /// Creates an empty mailbox.
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Posts a value, displacing any unconsumed one. Returns `true` if a
    /// stale value was dropped.
    pub fn post(&mut self, value: T) -> bool {
        let displaced = self.slot.replace(value).is_some();
        if displaced {
            trace!("mailbox displaced a stale pending value");
        }
        displaced
    }

    /// Takes the pending value, leaving the mailbox empty.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// True if no value is pending.
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_value_wins() {
        let mut mailbox = Mailbox::new();
        assert!(!mailbox.post(1));
        assert!(mailbox.post(2));
        assert_eq!(mailbox.take(), Some(2));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_take_empties_slot() {
        let mut mailbox = Mailbox::new();
        mailbox.post("window");
        assert!(!mailbox.is_empty());
        mailbox.take();
        assert!(mailbox.is_empty());
    }
}
