/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

use crate::domain::entity::ShotDirection;
use crate::domain::shot::ShotOutcome;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Ball left the player's foot.
    Kicked { direction: ShotDirection },
    /// Terminal result of the shot in flight.
    Resolved { outcome: ShotOutcome, shots: u32, goals: u32 },
    /// Keeper sped up after a goal.
    KeeperFaster { speed: f32 },
    /// Keeper bounced off a post.
    KeeperTurned,
    /// A shot command arrived while the ball was in flight and was dropped.
    AimRejected { direction: ShotDirection },
}
