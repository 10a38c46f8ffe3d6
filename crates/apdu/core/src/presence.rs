//! New-device detection for polling loops
//!
//! The reader is polled on a fixed interval. A device counts as new when its
//! UID differs from the last one seen, so a phone left on the reader is
//! scanned once, and a phone with a randomised UID is scanned on each tap.

/// What a poll observed, as far as the caller needs to act on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    /// A device with a UID not seen last time; scan it
    NewCard(String),
    /// The same device is still there
    Unchanged,
    /// The previously seen device left the field
    Removed,
    /// Nothing there, and nothing was there before
    Idle,
}

/// Tracks the UID of the last device seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTracker {
    last_uid: Option<String>,
}

impl PresenceTracker {
    /// Create a tracker that has seen nothing yet
    pub const fn new() -> Self {
        Self { last_uid: None }
    }

    /// A device answered the poll with this UID label
    pub fn observe_card(&mut self, uid: &str) -> PresenceEvent {
        if self.last_uid.as_deref() == Some(uid) {
            return PresenceEvent::Unchanged;
        }
        self.last_uid = Some(uid.to_string());
        PresenceEvent::NewCard(uid.to_string())
    }

    /// The poll found no device
    pub fn observe_absent(&mut self) -> PresenceEvent {
        match self.last_uid.take() {
            Some(_) => PresenceEvent::Removed,
            None => PresenceEvent::Idle,
        }
    }

    /// Forget the last device without reporting a removal
    pub fn reset(&mut self) {
        self.last_uid = None;
    }

    /// UID label of the last device seen
    pub fn last_uid(&self) -> Option<&str> {
        self.last_uid.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_info::UNKNOWN_UID;

    #[test]
    fn test_new_card_once() {
        let mut tracker = PresenceTracker::new();

        assert_eq!(tracker.observe_card("04A22B1A"), PresenceEvent::NewCard("04A22B1A".into()));
        assert_eq!(tracker.observe_card("04A22B1A"), PresenceEvent::Unchanged);
        assert_eq!(tracker.observe_card("08112233"), PresenceEvent::NewCard("08112233".into()));
        assert_eq!(tracker.last_uid(), Some("08112233"));
    }

    #[test]
    fn test_removed_once() {
        let mut tracker = PresenceTracker::new();

        assert_eq!(tracker.observe_absent(), PresenceEvent::Idle);
        tracker.observe_card("04A22B1A");
        assert_eq!(tracker.observe_absent(), PresenceEvent::Removed);
        assert_eq!(tracker.observe_absent(), PresenceEvent::Idle);

        // Same card again after removal is new
        assert_eq!(tracker.observe_card("04A22B1A"), PresenceEvent::NewCard("04A22B1A".into()));
    }

    #[test]
    fn test_reset_is_silent() {
        let mut tracker = PresenceTracker::new();
        tracker.observe_card(UNKNOWN_UID);
        tracker.reset();

        assert_eq!(tracker.observe_absent(), PresenceEvent::Idle);
        assert_eq!(tracker.observe_card(UNKNOWN_UID), PresenceEvent::NewCard(UNKNOWN_UID.into()));
    }
}
