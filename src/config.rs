/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::difficulty::DEFAULT_SPEED_INCREMENT;
use crate::domain::entity::{Field, Goal};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub general: GeneralConfig,
    pub pitch: PitchConfig,
    pub gamepad: GamepadConfig,
    /// Sprite directory. `None` = not found on disk, use built-in sprites.
    pub sprites_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub tick_rate_hz: u32,
    pub auto_start: bool,
    pub log_file: PathBuf,
}

/// Everything needed to build a fresh session.
#[derive(Clone, Debug, PartialEq)]
pub struct PitchConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub baseline_offset: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    pub goal_y: f32,
    pub keeper_speed: f32,
    pub keeper_width: f32,
    pub keeper_height: f32,
    pub speed_increment: f32,
    pub ball_radius: f32,
}

impl PitchConfig {
    pub fn field(&self) -> Field {
        Field {
            width: self.field_width,
            height: self.field_height,
            baseline_offset: self.baseline_offset,
        }
    }

    pub fn goal(&self) -> Goal {
        Goal::centered(&self.field(), self.goal_width, self.goal_height, self.goal_y)
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        PitchConfig {
            field_width: default_field_width(),
            field_height: default_field_height(),
            baseline_offset: default_baseline_offset(),
            goal_width: default_goal_width(),
            goal_height: default_goal_height(),
            goal_y: default_goal_y(),
            keeper_speed: default_keeper_speed(),
            keeper_width: default_keeper_size(),
            keeper_height: default_keeper_size(),
            speed_increment: DEFAULT_SPEED_INCREMENT,
            ball_radius: default_ball_radius(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub shoot_left: Vec<String>,
    pub shoot_center: Vec<String>,
    pub shoot_right: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub restart: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    field: TomlField,
    #[serde(default)]
    keeper: TomlKeeper,
    #[serde(default)]
    ball: TomlBall,
    #[serde(default)]
    assets: TomlAssets,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tick_rate")]
    tick_rate_hz: u32,
    #[serde(default = "default_auto_start")]
    auto_start: bool,
    #[serde(default = "default_log_file")]
    log_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlField {
    #[serde(default = "default_field_width")]
    width: f32,
    #[serde(default = "default_field_height")]
    height: f32,
    #[serde(default = "default_goal_width")]
    goal_width: f32,
    #[serde(default = "default_goal_height")]
    goal_height: f32,
    #[serde(default = "default_goal_y")]
    goal_y: f32,
    #[serde(default = "default_baseline_offset")]
    baseline_offset: f32,
}

#[derive(Deserialize, Debug)]
struct TomlKeeper {
    #[serde(default = "default_keeper_speed")]
    speed: f32,
    #[serde(default = "default_keeper_size")]
    width: f32,
    #[serde(default = "default_keeper_size")]
    height: f32,
    #[serde(default = "default_speed_increment")]
    speed_increment: f32,
}

#[derive(Deserialize, Debug)]
struct TomlBall {
    #[serde(default = "default_ball_radius")]
    radius: f32,
}

#[derive(Deserialize, Debug)]
struct TomlAssets {
    #[serde(default = "default_sprites_dir")]
    sprites_dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_shoot_left")]
    shoot_left: Vec<String>,
    #[serde(default = "default_shoot_center")]
    shoot_center: Vec<String>,
    #[serde(default = "default_shoot_right")]
    shoot_right: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u32 { 60 }
fn default_auto_start() -> bool { true }
fn default_log_file() -> String { "penalty.log".into() }

fn default_field_width() -> f32 { 800.0 }
fn default_field_height() -> f32 { 400.0 }
fn default_goal_width() -> f32 { 400.0 }
fn default_goal_height() -> f32 { 100.0 }
fn default_goal_y() -> f32 { 50.0 }
fn default_baseline_offset() -> f32 { 50.0 }

fn default_keeper_speed() -> f32 { 3.0 }
fn default_keeper_size() -> f32 { 100.0 }
fn default_speed_increment() -> f32 { DEFAULT_SPEED_INCREMENT }
fn default_ball_radius() -> f32 { 10.0 }

fn default_sprites_dir() -> String { "sprites".into() }

fn default_shoot_left() -> Vec<String> { vec!["X".into()] }
fn default_shoot_center() -> Vec<String> { vec!["Y".into()] }
fn default_shoot_right() -> Vec<String> { vec!["B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_restart() -> Vec<String> { vec!["R1".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            tick_rate_hz: default_tick_rate(),
            auto_start: default_auto_start(),
            log_file: default_log_file(),
        }
    }
}

impl Default for TomlField {
    fn default() -> Self {
        TomlField {
            width: default_field_width(),
            height: default_field_height(),
            goal_width: default_goal_width(),
            goal_height: default_goal_height(),
            goal_y: default_goal_y(),
            baseline_offset: default_baseline_offset(),
        }
    }
}

impl Default for TomlKeeper {
    fn default() -> Self {
        TomlKeeper {
            speed: default_keeper_speed(),
            width: default_keeper_size(),
            height: default_keeper_size(),
            speed_increment: default_speed_increment(),
        }
    }
}

impl Default for TomlBall {
    fn default() -> Self {
        TomlBall { radius: default_ball_radius() }
    }
}

impl Default for TomlAssets {
    fn default() -> Self {
        TomlAssets { sprites_dir: default_sprites_dir() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            shoot_left: default_shoot_left(),
            shoot_center: default_shoot_center(),
            shoot_right: default_shoot_right(),
            confirm: default_confirm(),
            cancel: default_cancel(),
            restart: default_restart(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly (no filesystem search for config.toml).
    /// Relative paths resolve against `base`.
    #[cfg(test)]
    pub fn from_str_in(text: &str, base: &std::path::Path) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, &[base.to_path_buf()]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Sprites directory: absolute path as-is, relative searched in candidate dirs
        let sprites_str = &toml_cfg.assets.sprites_dir;
        let sprites_dir = if PathBuf::from(sprites_str).is_absolute() {
            Some(PathBuf::from(sprites_str)).filter(|p| p.is_dir())
        } else {
            search_dirs.iter()
                .map(|d| d.join(sprites_str))
                .find(|p| p.is_dir())
        };

        let f = &toml_cfg.field;
        let k = &toml_cfg.keeper;

        GameConfig {
            general: GeneralConfig {
                tick_rate_hz: toml_cfg.general.tick_rate_hz.max(1),
                auto_start: toml_cfg.general.auto_start,
                log_file: PathBuf::from(&toml_cfg.general.log_file),
            },
            pitch: PitchConfig {
                field_width: positive_or("field.width", f.width, default_field_width()),
                field_height: positive_or("field.height", f.height, default_field_height()),
                baseline_offset: non_negative_or(
                    "field.baseline_offset", f.baseline_offset, default_baseline_offset(),
                ),
                goal_width: positive_or("field.goal_width", f.goal_width, default_goal_width()),
                goal_height: positive_or("field.goal_height", f.goal_height, default_goal_height()),
                goal_y: non_negative_or("field.goal_y", f.goal_y, default_goal_y()),
                keeper_speed: non_negative_or("keeper.speed", k.speed, 0.0),
                keeper_width: positive_or("keeper.width", k.width, default_keeper_size()),
                keeper_height: positive_or("keeper.height", k.height, default_keeper_size()),
                speed_increment: non_negative_or("keeper.speed_increment", k.speed_increment, 0.0),
                ball_radius: positive_or("ball.radius", toml_cfg.ball.radius, default_ball_radius()),
            },
            gamepad: GamepadConfig {
                shoot_left: toml_cfg.gamepad.shoot_left,
                shoot_center: toml_cfg.gamepad.shoot_center,
                shoot_right: toml_cfg.gamepad.shoot_right,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                restart: toml_cfg.gamepad.restart,
            },
            sprites_dir,
        }
    }
}

/// `value` if finite and > 0, else `fallback`.
fn positive_or(key: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("config: {key} = {value} is not a positive number; using {fallback}");
        fallback
    }
}

/// `value` if finite and >= 0, else `fallback`.
fn non_negative_or(key: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("config: {key} = {value} is out of range; using {fallback}");
        fallback
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/penalty)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/penalty");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    log::info!("config: loaded {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("config: {} parse error: {e}; using defaults", path.display());
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                log::warn!("config: could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn nowhere() -> &'static Path {
        Path::new("/nonexistent-penalty-test-dir")
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_str_in("", nowhere()).unwrap();
        assert_eq!(cfg.general.tick_rate_hz, 60);
        assert!(cfg.general.auto_start);
        assert_eq!(cfg.pitch, PitchConfig::default());
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string(), "A".to_string()]);
        assert!(cfg.sprites_dir.is_none());
    }

    #[test]
    fn partial_section_fills_missing_keys() {
        let text = r#"
            [keeper]
            speed = 4.5

            [field]
            width = 1000.0
        "#;
        let cfg = GameConfig::from_str_in(text, nowhere()).unwrap();
        assert_eq!(cfg.pitch.keeper_speed, 4.5);
        assert_eq!(cfg.pitch.keeper_width, 100.0);
        assert_eq!(cfg.pitch.speed_increment, 0.5);
        assert_eq!(cfg.pitch.field_width, 1000.0);
        assert_eq!(cfg.pitch.field_height, 400.0);
        assert_eq!(cfg.pitch.goal().left(), 300.0);
    }

    #[test]
    fn nonsense_values_are_sanitized() {
        let text = r#"
            [general]
            tick_rate_hz = 0

            [keeper]
            speed = -2.0
            speed_increment = -0.5
        "#;
        let cfg = GameConfig::from_str_in(text, nowhere()).unwrap();
        assert_eq!(cfg.general.tick_rate_hz, 1);
        assert_eq!(cfg.pitch.keeper_speed, 0.0);
        assert_eq!(cfg.pitch.speed_increment, 0.0);
    }

    #[test]
    fn degenerate_geometry_falls_back_to_defaults() {
        let text = r#"
            [field]
            width = 0.0
            height = -400.0
            goal_width = inf
            goal_height = 0.0
            goal_y = -1.0
            baseline_offset = nan

            [keeper]
            width = nan
            height = 0.0
            speed = inf

            [ball]
            radius = -10.0
        "#;
        let cfg = GameConfig::from_str_in(text, nowhere()).unwrap();
        let defaults = PitchConfig::default();
        assert_eq!(cfg.pitch.field_width, defaults.field_width);
        assert_eq!(cfg.pitch.field_height, defaults.field_height);
        assert_eq!(cfg.pitch.goal_width, defaults.goal_width);
        assert_eq!(cfg.pitch.goal_height, defaults.goal_height);
        assert_eq!(cfg.pitch.goal_y, defaults.goal_y);
        assert_eq!(cfg.pitch.baseline_offset, defaults.baseline_offset);
        assert_eq!(cfg.pitch.keeper_width, defaults.keeper_width);
        assert_eq!(cfg.pitch.keeper_height, defaults.keeper_height);
        assert_eq!(cfg.pitch.ball_radius, defaults.ball_radius);
        assert_eq!(cfg.pitch.keeper_speed, 0.0);
    }

    #[test]
    fn nan_keeper_width_cannot_stall_a_session() {
        use crate::sim::mailbox::ShotMailbox;
        use crate::sim::step::step;
        use crate::sim::world::WorldState;
        use std::time::Instant;

        let cfg = GameConfig::from_str_in("[keeper]\nwidth = nan", nowhere()).unwrap();
        let now = Instant::now();
        let mut world = WorldState::new(&cfg.pitch, now);
        world.start(now);
        let mut mailbox = ShotMailbox::new();
        for _ in 0..200 {
            step(&mut world, &mut mailbox);
        }
        assert!(world.keeper.x.is_finite());
        assert!(world.keeper.left_edge() >= world.goal.left());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let text = include_str!("../config.toml");
        let cfg = GameConfig::from_str_in(text, Path::new(env!("CARGO_MANIFEST_DIR"))).unwrap();
        assert_eq!(cfg.pitch, PitchConfig::default());
        assert_eq!(cfg.gamepad.restart, vec!["R1".to_string()]);
        assert_eq!(cfg.general.log_file, PathBuf::from("penalty.log"));
        // sprites/ ships next to config.toml
        assert!(cfg.sprites_dir.is_some());
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(GameConfig::from_str_in("[keeper\nspeed = ", nowhere()).is_err());
    }
}
