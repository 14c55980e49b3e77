/// Gamepad input tracker using gilrs.
///
/// Button mapping comes from the `[gamepad]` section of config.toml.
/// Default mapping:
///   D-pad / Left Stick ←  →  Shoot left
///   D-pad / Left Stick ↑  →  Shoot center
///   D-pad / Left Stick →  →  Shoot right
///   X / Y / B             →  Shoot left / center / right
///   Start / A             →  Kick off
///   R1                    →  Restart
///   Select                →  Quit
///
/// All actions are edge-triggered: holding a direction kicks once.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::ShotDirection;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    /// Update `held`, raising `just_pressed` on the rising edge.
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// Action-to-button mapping.
#[derive(Debug, PartialEq)]
struct ActionMap {
    shoot_left: Vec<Btn>,
    shoot_center: Vec<Btn>,
    shoot_right: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    restart: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            shoot_left:   vec![Btn::X],
            shoot_center: vec![Btn::Y],
            shoot_right:  vec![Btn::B],
            confirm:      vec![Btn::Start, Btn::A],
            cancel:       vec![Btn::Select],
            restart:      vec![Btn::R1],
        }
    }
}

/// Directional inputs that aim a shot (D-pad or stick).
#[derive(Clone, Copy, Debug, Default)]
struct Directions {
    left: BtnState,
    up: BtnState,
    right: BtnState,
}

impl Directions {
    fn clear_edges(&mut self) {
        self.left.just_pressed = false;
        self.up.just_pressed = false;
        self.right.just_pressed = false;
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; 10],

    dpad: Directions,
    stick: Directions,
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::warn!("gamepad: unavailable ({e})");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); 10],
            dpad: Directions::default(),
            stick: Directions::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// A pad with no backend attached and nothing pressed.
    #[cfg(test)]
    pub fn disconnected() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            buttons: [BtnState::default(); 10],
            dpad: Directions::default(),
            stick: Directions::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(slot: &mut Vec<Btn>, names: &[String]) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.shoot_left, &cfg.shoot_left);
        apply(&mut map.shoot_center, &cfg.shoot_center);
        apply(&mut map.shoot_right, &cfg.shoot_right);
        apply(&mut map.confirm, &cfg.confirm);
        apply(&mut map.cancel, &cfg.cancel);
        apply(&mut map.restart, &cfg.restart);
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad: connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    log::info!("gamepad: disconnected");
                }
                _ => {}
            }
        }

        self.update_stick();
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        match gilrs_btn {
            Button::DPadLeft  => return self.dpad.left.set(held),
            Button::DPadUp    => return self.dpad.up.set(held),
            Button::DPadRight => return self.dpad.right.set(held),
            _ => {}
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn_index(btn)].set(held);
        }
    }

    /// Derive digital stick directions from the analog axes.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn update_stick(&mut self) {
        self.stick.left.set(self.stick_x < -STICK_DEADZONE);
        self.stick.right.set(self.stick_x > STICK_DEADZONE);
        self.stick.up.set(self.stick_y > STICK_DEADZONE);
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    /// A shot direction pressed this frame, if any. Left wins ties, then center.
    pub fn shoot_pressed(&self) -> Option<ShotDirection> {
        let m = &self.action_map;
        if self.dpad.left.just_pressed || self.stick.left.just_pressed
            || self.any_just_pressed(&m.shoot_left)
        {
            Some(ShotDirection::Left)
        } else if self.dpad.up.just_pressed || self.stick.up.just_pressed
            || self.any_just_pressed(&m.shoot_center)
        {
            Some(ShotDirection::Center)
        } else if self.dpad.right.just_pressed || self.stick.right.just_pressed
            || self.any_just_pressed(&m.shoot_right)
        {
            Some(ShotDirection::Right)
        } else {
            None
        }
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }
    pub fn restart_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.restart)
    }

    /// Simulate a face-button press (rising edge).
    #[cfg(test)]
    pub fn press(&mut self, btn: Btn) {
        self.buttons[btn_index(btn)].set(true);
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }
        self.dpad.clear_edges();
        self.stick.clear_edges();
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in &mut self.buttons { *b = BtnState::default(); }
        self.dpad = Directions::default();
        self.stick = Directions::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> GamepadState {
        GamepadState::disconnected()
    }

    #[test]
    fn button_names_parse() {
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("RB"), Some(Btn::R1));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_mapping() {
        let mut gp = pad();
        let cfg = GamepadConfig {
            shoot_left: vec!["L1".into()],
            shoot_center: vec![],
            shoot_right: vec!["nonsense".into()],
            confirm: vec!["Start".into()],
            cancel: vec!["Select".into()],
            restart: vec!["Y".into()],
        };
        gp.load_button_config(&cfg);
        assert_eq!(gp.action_map.shoot_left, vec![Btn::L1]);
        // empty / unknown keep defaults
        assert_eq!(gp.action_map.shoot_center, vec![Btn::Y]);
        assert_eq!(gp.action_map.shoot_right, vec![Btn::B]);
        assert_eq!(gp.action_map.confirm, vec![Btn::Start]);
        assert_eq!(gp.action_map.restart, vec![Btn::Y]);
    }

    #[test]
    fn button_edge_fires_once() {
        let mut gp = pad();
        gp.buttons[btn_index(Btn::B)].set(true);
        assert_eq!(gp.shoot_pressed(), Some(ShotDirection::Right));

        gp.clear_just_pressed();
        gp.buttons[btn_index(Btn::B)].set(true);
        assert_eq!(gp.shoot_pressed(), None);
    }

    #[test]
    fn stick_maps_to_directions() {
        let mut gp = pad();
        gp.stick_y = 0.9;
        gp.update_stick();
        assert_eq!(gp.shoot_pressed(), Some(ShotDirection::Center));

        gp.clear_just_pressed();
        gp.update_stick();
        assert_eq!(gp.shoot_pressed(), None);

        gp.clear_just_pressed();
        gp.stick_y = 0.0;
        gp.stick_x = -0.5;
        gp.update_stick();
        assert_eq!(gp.shoot_pressed(), Some(ShotDirection::Left));
    }

    #[test]
    fn dpad_and_meta_buttons() {
        let mut gp = pad();
        gp.dpad.right.set(true);
        gp.buttons[btn_index(Btn::Start)].set(true);
        assert_eq!(gp.shoot_pressed(), Some(ShotDirection::Right));
        assert!(gp.confirm_pressed());
        assert!(!gp.restart_pressed());
        assert!(!gp.cancel_pressed());

        gp.release_all();
        assert!(!gp.dpad.right.held);
    }
}
