/// Shot resolver: drives the ball from rest on the player to a terminal outcome.
///
/// Per tick, while a direction is pending:
///   1. Trigger: if not yet in flight, snap ball to the player and set
///      velocity from the direction table.
///   2. Integrate: one Euler step (pixels per tick).
///   3. Classify: goal plane first, then out of bounds.
///
/// Collision against the keeper is coarse: it is checked only on the
/// first tick the ball is past the goal line, using where the keeper is
/// on that same tick. A fast ball may slip past the keeper's span
/// between ticks.

use super::entity::{Ball, Field, Goal, Goalkeeper, Player, ShotDirection};

/// Terminal result of one shot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShotOutcome {
    Saved,
    Scored,
    OutOfBounds,
}

/// What happened to the shot during one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ShotTick {
    /// Set on the tick the ball was kicked.
    pub kicked: Option<ShotDirection>,
    /// Set on the tick the shot resolved.
    pub outcome: Option<ShotOutcome>,
}

/// Fixed launch velocity for each direction, in pixels per tick.
pub fn velocity_for(dir: ShotDirection) -> (f32, f32) {
    match dir {
        ShotDirection::Left => (-3.0, -4.0),
        ShotDirection::Right => (3.0, -4.0),
        ShotDirection::Center => (0.0, -5.0),
    }
}

/// Kick the ball if a direction is pending and nothing is in flight.
pub fn try_trigger(player: &mut Player, ball: &mut Ball) -> Option<ShotDirection> {
    if player.in_flight {
        return None;
    }
    let dir = player.pending?;
    player.in_flight = true;
    ball.x = player.x;
    ball.y = player.y;
    let (dx, dy) = velocity_for(dir);
    ball.dx = dx;
    ball.dy = dy;
    Some(dir)
}

#[inline]
pub fn integrate(ball: &mut Ball) {
    ball.x += ball.dx;
    ball.y += ball.dy;
}

/// Classify the ball's current position. `None` means still in flight.
pub fn classify(ball: &Ball, goal: &Goal, keeper: &Goalkeeper, field: &Field) -> Option<ShotOutcome> {
    if goal.contains_crossing(ball.x, ball.y) {
        if keeper.covers(ball.x) {
            Some(ShotOutcome::Saved)
        } else {
            Some(ShotOutcome::Scored)
        }
    } else if field.is_outside(ball.x, ball.y) {
        Some(ShotOutcome::OutOfBounds)
    } else {
        None
    }
}

/// Put the player back on the kick spot with the ball at rest at their feet.
/// Idempotent.
pub fn reset(player: &mut Player, ball: &mut Ball, field: &Field) {
    let (x, y) = field.kick_spot();
    player.x = x;
    player.y = y;
    player.pending = None;
    player.in_flight = false;
    ball.x = x;
    ball.y = y;
    ball.dx = 0.0;
    ball.dy = 0.0;
}

/// Run the resolver for one tick.
///
/// Counting and escalation are the caller's job; this only moves the
/// ball and reports what happened.
pub fn resolve(
    player: &mut Player,
    ball: &mut Ball,
    keeper: &Goalkeeper,
    goal: &Goal,
    field: &Field,
) -> ShotTick {
    let mut tick = ShotTick {
        kicked: try_trigger(player, ball),
        outcome: None,
    };

    if !player.in_flight {
        return tick;
    }

    integrate(ball);

    if let Some(outcome) = classify(ball, goal, keeper, field) {
        reset(player, ball, field);
        tick.outcome = Some(outcome);
    }

    tick
}
