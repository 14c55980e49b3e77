/// WorldState: the complete state of one penalty session.
///
/// Owned by the driver in `main` and passed by `&mut` into `step`.
/// The pitch geometry (`field`, `goal`) is fixed at construction; the
/// entities are mutated in place every tick; the counters only grow until
/// the whole session is replaced by `restart`.

use std::time::Instant;

use crate::config::PitchConfig;
use crate::domain::entity::{Ball, Field, Goal, Goalkeeper, Player};
use crate::domain::shot::ShotOutcome;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Waiting for assets / the start command.
    Title,
    Playing,
}

/// Shots, goals and when the session began.
#[derive(Clone, Debug)]
pub struct SessionCounters {
    pub shots_taken: u32,
    pub goals_scored: u32,
    pub started_at: Instant,
}

impl SessionCounters {
    pub fn new(now: Instant) -> Self {
        SessionCounters { shots_taken: 0, goals_scored: 0, started_at: now }
    }

    /// Whole seconds since the session started.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at).as_secs()
    }

    pub fn record(&mut self, outcome: ShotOutcome) {
        self.shots_taken += 1;
        if outcome == ShotOutcome::Scored {
            self.goals_scored += 1;
        }
    }
}

pub struct WorldState {
    // ── Geometry (immutable for the session) ──
    pub field: Field,
    pub goal: Goal,

    // ── Entities ──
    pub player: Player,
    pub ball: Ball,
    pub keeper: Goalkeeper,

    // ── Tracking ──
    pub counters: SessionCounters,
    pub speed_increment: f32,
    pub last_outcome: Option<ShotOutcome>,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,

    /// Settings this session was built from (kept for restart).
    pub setup: PitchConfig,
}

// ── Construction ──

impl WorldState {
    pub fn new(setup: &PitchConfig, now: Instant) -> Self {
        let field = setup.field();
        let goal = setup.goal();
        let (kx, ky) = field.kick_spot();

        WorldState {
            field,
            goal,
            player: Player::new(kx, ky),
            ball: Ball::new(kx, ky, setup.ball_radius),
            keeper: Goalkeeper::on_line(
                &goal, setup.keeper_width, setup.keeper_height, setup.keeper_speed,
            ),
            counters: SessionCounters::new(now),
            speed_increment: setup.speed_increment,
            last_outcome: None,
            phase: Phase::Title,
            tick: 0,
            message: String::new(),
            message_timer: 0,
            setup: setup.clone(),
        }
    }

    /// Title → Playing. Starts the session clock. No-op if already playing.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.phase = Phase::Playing;
        self.counters.started_at = now;
        true
    }

    /// Replace the session with a fresh one from the same setup.
    /// Stays in the current phase.
    pub fn restart(&mut self, now: Instant) {
        let phase = self.phase;
        let setup = self.setup.clone();
        *self = WorldState::new(&setup, now);
        self.phase = phase;
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the HUD message; clears it on expiry.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fresh_session_layout() {
        let w = WorldState::new(&PitchConfig::default(), Instant::now());
        assert_eq!(w.phase, Phase::Title);
        assert_eq!((w.player.x, w.player.y), (400.0, 350.0));
        assert_eq!((w.ball.x, w.ball.y), (400.0, 350.0));
        assert_eq!((w.keeper.x, w.keeper.y), (400.0, 150.0));
        assert_eq!(w.keeper.speed, 3.0);
        assert_eq!(w.counters.shots_taken, 0);
        assert_eq!(w.counters.goals_scored, 0);
    }

    #[test]
    fn start_only_once() {
        let t0 = Instant::now();
        let mut w = WorldState::new(&PitchConfig::default(), t0);
        let t1 = t0 + Duration::from_secs(3);
        assert!(w.start(t1));
        assert_eq!(w.counters.started_at, t1);
        assert!(!w.start(t1 + Duration::from_secs(5)));
        assert_eq!(w.counters.started_at, t1);
    }

    #[test]
    fn counters_record_outcomes() {
        let mut c = SessionCounters::new(Instant::now());
        c.record(ShotOutcome::Saved);
        c.record(ShotOutcome::Scored);
        c.record(ShotOutcome::OutOfBounds);
        assert_eq!(c.shots_taken, 3);
        assert_eq!(c.goals_scored, 1);
    }

    #[test]
    fn elapsed_whole_seconds() {
        let t0 = Instant::now();
        let c = SessionCounters::new(t0);
        assert_eq!(c.elapsed_secs(t0 + Duration::from_millis(2999)), 2);
        assert_eq!(c.elapsed_secs(t0), 0);
    }

    #[test]
    fn restart_resets_counters_and_keeper() {
        let t0 = Instant::now();
        let mut w = WorldState::new(&PitchConfig::default(), t0);
        w.start(t0);
        w.counters.shots_taken = 9;
        w.counters.goals_scored = 4;
        w.keeper.speed = 5.0;
        w.keeper.x = 300.0;

        w.restart(t0 + Duration::from_secs(60));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.counters.shots_taken, 0);
        assert_eq!(w.counters.goals_scored, 0);
        assert_eq!(w.keeper.speed, 3.0);
        assert_eq!(w.keeper.x, 400.0);
        assert_eq!(w.counters.started_at, t0 + Duration::from_secs(60));
    }

    #[test]
    fn message_expires() {
        let mut w = WorldState::new(&PitchConfig::default(), Instant::now());
        w.set_message("GOAL!", 2);
        w.tick_message();
        assert_eq!(w.message, "GOAL!");
        w.tick_message();
        assert!(w.message.is_empty());
    }
}
