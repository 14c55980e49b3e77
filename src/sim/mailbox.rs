/// Single-slot input mailbox.
///
/// Input sources `post` whenever a command arrives; the simulation `take`s
/// at most one per tick. Last write wins: a newer command overwrites one
/// that has not been consumed yet. Nothing queues.

use crate::domain::entity::ShotDirection;

#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Option<T>,
    overwritten: u32,
}

pub type ShotMailbox = Mailbox<ShotDirection>;

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Mailbox { slot: None, overwritten: 0 }
    }

    /// Deliver a command, replacing any unconsumed one.
    pub fn post(&mut self, value: T) {
        if self.slot.replace(value).is_some() {
            self.overwritten += 1;
        }
    }

    /// Consume the pending command, if any.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Drop any pending command without counting it as overwritten.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// How many commands were dropped because a newer one replaced them.
    pub fn overwritten(&self) -> u32 {
        self.overwritten
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_take_is_none() {
        let mut mb = ShotMailbox::new();
        assert!(mb.is_empty());
        assert_eq!(mb.take(), None);
    }

    #[test]
    fn latest_post_wins() {
        let mut mb = ShotMailbox::new();
        mb.post(ShotDirection::Left);
        mb.post(ShotDirection::Center);
        mb.post(ShotDirection::Right);
        assert_eq!(mb.overwritten(), 2);
        assert_eq!(mb.take(), Some(ShotDirection::Right));
        assert_eq!(mb.take(), None);
    }

    #[test]
    fn take_empties_slot() {
        let mut mb = ShotMailbox::new();
        mb.post(ShotDirection::Left);
        assert!(!mb.is_empty());
        mb.take();
        assert!(mb.is_empty());
        mb.post(ShotDirection::Center);
        assert_eq!(mb.overwritten(), 0);
    }

    #[test]
    fn clear_drops_pending_without_counting() {
        let mut mb = ShotMailbox::new();
        mb.post(ShotDirection::Left);
        mb.clear();
        assert!(mb.is_empty());
        assert_eq!(mb.overwritten(), 0);
    }
}
