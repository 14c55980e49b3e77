/// Keyboard input tracker.
///
/// Every action in this game is one-shot (kick, start, restart, quit), so
/// only key edges matter: a key counts once when it goes from "not held"
/// to "held". Auto-repeat while the key stays down does not fire again.
///
/// Terminals that don't report Release events get timeout-based release
/// detection instead.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went "not held" → "held" during the most recent drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    /// Apply one key event as if read at `now`.
    pub fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Was this key freshly pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn next_frame(kb: &mut InputState) {
        kb.fresh_presses.clear();
        kb.raw_events.clear();
    }

    #[test]
    fn auto_repeat_fires_once() {
        let t0 = Instant::now();
        let mut kb = InputState::new();
        kb.record(press(KeyCode::Left), t0);
        assert!(kb.was_pressed(KeyCode::Left));

        next_frame(&mut kb);
        kb.record(press(KeyCode::Left), t0 + Duration::from_millis(30));
        assert!(!kb.was_pressed(KeyCode::Left));
    }

    #[test]
    fn press_after_timeout_fires_again() {
        let t0 = Instant::now();
        let mut kb = InputState::new();
        kb.record(press(KeyCode::Up), t0);

        let later = t0 + HOLD_TIMEOUT + Duration::from_millis(1);
        kb.expire(later);
        next_frame(&mut kb);
        kb.record(press(KeyCode::Up), later);
        assert!(kb.any_pressed(&[KeyCode::Up, KeyCode::Char('w')]));
    }

    #[test]
    fn release_honored_when_enabled() {
        let t0 = Instant::now();
        let mut kb = InputState::new();
        kb.honor_release = true;
        kb.record(press(KeyCode::Right), t0);

        let mut up = press(KeyCode::Right);
        up.kind = KeyEventKind::Release;
        next_frame(&mut kb);
        kb.record(up, t0);
        kb.record(press(KeyCode::Right), t0);
        assert!(kb.was_pressed(KeyCode::Right));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut kb = InputState::new();
        kb.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(kb.ctrl_c_pressed());
        assert!(!kb.was_pressed(KeyCode::Char('q')));
    }
}
