/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::ShotDirection;
use domain::shot::ShotOutcome;
use sim::clock::FixedTicker;
use sim::event::GameEvent;
use sim::mailbox::ShotMailbox;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::assets::{AssetEvent, AssetStore, DirSource, EmbeddedSource, SpriteSource};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

const MISSING_SPRITES_MESSAGE: &str = "Some sprites are missing";

/// Banner for the restart key, in ticks.
const RESTART_MESSAGE_TICKS: u32 = 45;

fn main() {
    let config = GameConfig::load();
    logging::init(&config.general.log_file);
    log::info!(
        "penalty {}: {} Hz, keeper speed {} (+{} per goal)",
        env!("CARGO_PKG_VERSION"),
        config.general.tick_rate_hz,
        config.pitch.keeper_speed,
        config.pitch.speed_increment,
    );

    let source: Box<dyn SpriteSource> = match &config.sprites_dir {
        Some(dir) => Box::new(DirSource::new(dir)),
        None => Box::new(EmbeddedSource),
    };
    log::info!("assets: loading from {}", source.describe());
    let (assets, asset_events) = AssetStore::load(source.as_ref());

    let now = Instant::now();
    let mut world = WorldState::new(&config.pitch, now);
    apply_asset_events(&mut world, &asset_events, config.general.auto_start, now);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, &assets, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop: {e}");
        eprintln!("Game error: {e}");
    }

    let c = &world.counters;
    log::info!("session: over, {} goals from {} shots", c.goals_scored, c.shots_taken);

    println!();
    println!("Thanks for playing Penalty!");
    println!("Goals {} / Shots {}", c.goals_scored, c.shots_taken);
}

/// Log the loader's events and auto-start on `Ready`.
/// Without `Ready` the title screen waits for an explicit start.
/// Returns true if the session started.
fn apply_asset_events(
    world: &mut WorldState,
    events: &[AssetEvent],
    auto_start: bool,
    now: Instant,
) -> bool {
    let mut ready = false;
    for event in events {
        match event {
            AssetEvent::Loaded(kind) => log::debug!("assets: {} loaded", kind.name()),
            AssetEvent::Failed { kind, error } => {
                log::warn!("assets: {} failed: {error}", kind.name());
            }
            AssetEvent::Ready => {
                log::info!("assets: ready");
                ready = true;
            }
        }
    }

    if !ready {
        world.set_message(MISSING_SPRITES_MESSAGE, 0);
        return false;
    }
    if auto_start && world.start(now) {
        log::info!("session: auto-start");
        return true;
    }
    false
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    assets: &AssetStore,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.enable_key_release();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad: detected");
    }

    let mut mailbox = ShotMailbox::new();
    let mut ticker = FixedTicker::new(config.general.tick_rate_hz, Instant::now());
    log::debug!("loop: tick interval {:?}", ticker.interval());

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        let now = Instant::now();
        if handle_meta(world, &mut ticker, &mut mailbox, &kb, &gp, now) {
            break;
        }

        if world.phase == Phase::Playing {
            if let Some(dir) = detect_shot_press(&kb, &gp) {
                mailbox.post(dir);
            }
        }

        if ticker.poll(now) {
            let events = step::step(world, &mut mailbox);
            process_sound_events(sound, &events);
            log_events(&events);
        }

        renderer.render(world, assets, now)?;
        std::thread::sleep(ticker.until_next(Instant::now()).min(FRAME_SLEEP));
    }

    log::info!(
        "loop: {} ticks, {} shot commands overwritten before use",
        ticker.ticks(),
        mailbox.overwritten(),
    );
    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Kicked { .. } => sfx.play_kick(),
            GameEvent::Resolved { outcome: ShotOutcome::Scored, .. } => sfx.play_goal(),
            GameEvent::Resolved { outcome: ShotOutcome::Saved, .. } => sfx.play_save(),
            GameEvent::Resolved { outcome: ShotOutcome::OutOfBounds, .. } => sfx.play_miss(),
            _ => {}
        }
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Kicked { direction } => log::debug!("shot: kicked {}", direction.label()),
            GameEvent::Resolved { outcome, shots, goals } => {
                log::info!("shot {shots}: {outcome:?} ({goals} goals)");
            }
            GameEvent::KeeperFaster { speed } => log::info!("keeper: speed now {speed}"),
            GameEvent::KeeperTurned => log::trace!("keeper: turned"),
            GameEvent::AimRejected { direction } => {
                log::debug!("shot: {} ignored, ball in flight", direction.label());
            }
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_CENTER: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_START: &[KeyCode] = &[KeyCode::Enter];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn detect_shot_press(kb: &InputState, gp: &GamepadState) -> Option<ShotDirection> {
    if kb.any_pressed(KEYS_LEFT) {
        Some(ShotDirection::Left)
    } else if kb.any_pressed(KEYS_CENTER) {
        Some(ShotDirection::Center)
    } else if kb.any_pressed(KEYS_RIGHT) {
        Some(ShotDirection::Right)
    } else {
        gp.shoot_pressed()
    }
}

/// Start / restart / quit. Returns true to quit.
fn handle_meta(
    world: &mut WorldState,
    ticker: &mut FixedTicker,
    mailbox: &mut ShotMailbox,
    kb: &InputState,
    gp: &GamepadState,
    now: Instant,
) -> bool {
    if kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
        return true;
    }

    match world.phase {
        Phase::Title => {
            if (kb.any_pressed(KEYS_START) || gp.confirm_pressed()) && world.start(now) {
                world.message.clear();
                world.message_timer = 0;
                mailbox.clear();
                ticker.reset(now);
                log::info!("session: started");
            }
        }
        Phase::Playing => {
            if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
                let c = &world.counters;
                log::info!("session: restart after {} goals from {} shots", c.goals_scored, c.shots_taken);
                world.restart(now);
                world.set_message("RESTART", RESTART_MESSAGE_TICKS);
                mailbox.clear();
                ticker.reset(now);
            }
        }
    }
    false
}
