/// The step function: advances the session by one tick.
///
/// Processing order:
///   1. Poll the shot mailbox (aim, unless a shot is in flight)
///   2. Goalkeeper motion
///   3. Shot resolution (kick / integrate / classify)
///   4. Outcome bookkeeping: counters, escalation, banner
///   5. Message timer
///
/// Rendering is not part of the step; the driver draws after it returns.

use crate::domain::difficulty;
use crate::domain::keeper;
use crate::domain::shot::{self, ShotOutcome};
use super::event::GameEvent;
use super::mailbox::ShotMailbox;
use super::world::{Phase, WorldState};

/// Banner duration, in ticks.
pub const OUTCOME_MESSAGE_TICKS: u32 = 60;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, mailbox: &mut ShotMailbox) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    resolve_aim(world, mailbox, &mut events);
    resolve_keeper(world, &mut events);
    resolve_shot(world, &mut events);
    world.tick_message();

    events
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

fn resolve_aim(world: &mut WorldState, mailbox: &mut ShotMailbox, events: &mut Vec<GameEvent>) {
    let dir = match mailbox.take() { Some(d) => d, None => return };
    if !world.player.aim(dir) {
        events.push(GameEvent::AimRejected { direction: dir });
    }
}

// ══════════════════════════════════════════════════════════════
// Goalkeeper
// ══════════════════════════════════════════════════════════════

fn resolve_keeper(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if keeper::advance(&mut world.keeper, &world.goal) {
        events.push(GameEvent::KeeperTurned);
    }
}

// ══════════════════════════════════════════════════════════════
// Shot
// ══════════════════════════════════════════════════════════════

fn resolve_shot(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let result = shot::resolve(
        &mut world.player, &mut world.ball,
        &world.keeper, &world.goal, &world.field,
    );

    if let Some(direction) = result.kicked {
        events.push(GameEvent::Kicked { direction });
    }

    let outcome = match result.outcome { Some(o) => o, None => return };

    world.counters.record(outcome);
    world.last_outcome = Some(outcome);
    events.push(GameEvent::Resolved {
        outcome,
        shots: world.counters.shots_taken,
        goals: world.counters.goals_scored,
    });

    let banner = match outcome {
        ShotOutcome::Scored => {
            let speed = difficulty::escalate(&mut world.keeper, world.speed_increment);
            events.push(GameEvent::KeeperFaster { speed });
            "GOAL!"
        }
        ShotOutcome::Saved => "SAVED!",
        ShotOutcome::OutOfBounds => "MISSED",
    };
    world.set_message(banner, OUTCOME_MESSAGE_TICKS);
}
