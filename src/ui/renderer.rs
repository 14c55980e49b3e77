/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The pitch is drawn in field pixels scaled to whatever part of the
/// terminal is left after the HUD and help rows. Sprites are stretched
/// (nearest neighbour) to the entity's pixel size, like an image blit.
/// A sprite that failed to load is skipped.

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::ShotPhase;
use crate::domain::shot::ShotOutcome;
use crate::sim::world::{Phase, WorldState};
use super::assets::{AssetKind, AssetStore, Sprite};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const PITCH_BG: Color = Color::Rgb { r: 28, g: 96, b: 40 };
const PITCH_FG: Color = Color::Rgb { r: 70, g: 150, b: 80 };
const LINE_FG: Color = Color::Rgb { r: 240, g: 240, b: 240 };
const PLAYER_FG: Color = Color::Rgb { r: 235, g: 70, b: 70 };
const KEEPER_FG: Color = Color::Rgb { r: 255, g: 215, b: 40 };
const BALL_FG: Color = Color::White;
const BANNER_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const GOAL_BG: Color = Color::Rgb { r: 90, g: 210, b: 110 };
const SAVE_BG: Color = Color::Rgb { r: 220, g: 100, b: 90 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Sentinel used to invalidate the back buffer so every cell repaints.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Only replace the glyph and foreground; keep what is underneath.
    fn overlay(&mut self, x: usize, y: usize, ch: char, fg: Color) {
        if x < self.width && y < self.height {
            let bg = self.get(x, y).bg;
            self.set(x, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }
}

// ── Viewport: field pixels → terminal cells ──

/// Rows above the pitch: HUD + gap.
const PITCH_ROW: usize = 2;
/// Rows below the pitch: banner + help.
const FOOTER_ROWS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    cols: usize,
    rows: usize,
    /// Field pixels per terminal column / row.
    px_per_col: f32,
    px_per_row: f32,
}

impl Viewport {
    fn fit(term_w: usize, term_h: usize, field_w: f32, field_h: f32) -> Self {
        let cols = term_w.max(1);
        let rows = term_h.saturating_sub(PITCH_ROW + FOOTER_ROWS).max(1);
        Viewport {
            cols,
            rows,
            px_per_col: scale(field_w, cols),
            px_per_row: scale(field_h, rows),
        }
    }

    fn col(&self, x: f32) -> i32 {
        (x / self.px_per_col).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y / self.px_per_row).floor() as i32
    }

    /// Cell box for a rectangle of `w`×`h` pixels centered on (`cx`, `cy`).
    /// Never smaller than one cell.
    fn sprite_box(&self, cx: f32, cy: f32, w: f32, h: f32) -> (i32, i32, usize, usize) {
        let cols = ((w / self.px_per_col).round() as usize).max(1);
        let rows = ((h / self.px_per_row).round() as usize).max(1);
        let left = self.col(cx) - cols as i32 / 2;
        let top = self.row(cy) - rows as i32 / 2;
        (left, top, cols, rows)
    }
}

/// Pixels per cell. A degenerate field maps one pixel to one cell.
fn scale(field_px: f32, cells: usize) -> f32 {
    let s = field_px / cells as f32;
    if s.is_finite() && s > 0.0 { s } else { 1.0 }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    key_release: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.invalidate();
        Ok(())
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_release(&mut self) -> bool {
        if !terminal::supports_keyboard_enhancement().unwrap_or(false) {
            return false;
        }
        self.key_release = execute!(
            self.writer,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        ).is_ok();
        self.key_release
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, assets: &AssetStore, now: Instant) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(world.phase) {
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        match world.phase {
            Phase::Title => compose_title(&mut self.front, world, assets),
            Phase::Playing => compose_game(&mut self.front, world, assets, now),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose_game(buf: &mut FrameBuffer, w: &WorldState, assets: &AssetStore, now: Instant) {
    let vp = Viewport::fit(buf.width, buf.height, w.field.width, w.field.height);

    // ── HUD ──
    buf.fill_row(0, HUD_BG);
    let hud = format!(
        " Goals: {:<4} Shots: {:<4} Time: {}s   Keeper: {:.1} px/tick ",
        w.counters.goals_scored,
        w.counters.shots_taken,
        w.counters.elapsed_secs(now),
        w.keeper.speed,
    );
    buf.put_str(0, 0, &hud, Color::White, HUD_BG);

    // ── Pitch: background, markings, then sprites in draw order ──
    compose_background(buf, &vp, assets.get(AssetKind::Background));
    compose_goal(buf, &vp, w);

    let p = &w.player;
    let k = &w.keeper;
    let b = &w.ball;
    let player_h = k.height; // same nominal sprite size as the keeper
    compose_sprite(buf, &vp, assets.get(AssetKind::Player), p.x, p.y, k.width, player_h, PLAYER_FG);
    compose_sprite(buf, &vp, assets.get(AssetKind::Ball), b.x, b.y, b.radius * 2.0, b.radius * 2.0, BALL_FG);
    compose_sprite(buf, &vp, assets.get(AssetKind::Keeper), k.x, k.y, k.width, k.height, KEEPER_FG);

    // ── Banner ──
    let banner_row = PITCH_ROW + vp.rows;
    if !w.message.is_empty() && banner_row < buf.height {
        let bg = match w.last_outcome {
            Some(ShotOutcome::Scored) => GOAL_BG,
            Some(ShotOutcome::Saved) => SAVE_BG,
            _ => BANNER_BG,
        };
        buf.fill_row(banner_row, bg);
        buf.put_centered(banner_row, &format!(" {} ", w.message), Color::Black, bg);
    }

    // ── Help ──
    let help_row = banner_row + 1;
    if help_row < buf.height {
        let help = match w.player.shot_phase() {
            ShotPhase::InFlight(dir) => format!(" Shooting {}...", dir.label()),
            _ => " ←/A:Left  ↑/W:Center  →/D:Right  │  R:Restart  Q:Quit".to_string(),
        };
        buf.put_str(0, help_row, &help, Color::DarkGrey, BASE_BG);
    }
}

/// Tile the background sprite across the pitch. Skipped if not loaded.
fn compose_background(buf: &mut FrameBuffer, vp: &Viewport, sprite: Option<&Sprite>) {
    let sprite = match sprite { Some(s) => s, None => return };
    for r in 0..vp.rows {
        for c in 0..vp.cols {
            let ch = sprite.at(c, r);
            buf.set(c, PITCH_ROW + r, Cell::new(ch, PITCH_FG, PITCH_BG));
        }
    }
}

/// Goal outline: crossbar on top, posts on the sides, goal line below.
fn compose_goal(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    let g = &w.goal;
    let left = vp.col(g.left()).max(0) as usize;
    let right = (vp.col(g.right()).max(0) as usize).min(vp.cols.saturating_sub(1));
    let top = vp.row(g.y).max(0) as usize;
    let bottom = (vp.row(g.line_y()).max(0) as usize).min(vp.rows.saturating_sub(1));
    if right <= left || bottom <= top {
        return;
    }

    for c in left..=right {
        buf.overlay(c, PITCH_ROW + top, '─', LINE_FG);
        buf.overlay(c, PITCH_ROW + bottom, '═', LINE_FG);
    }
    for r in top..=bottom {
        buf.overlay(left, PITCH_ROW + r, '│', LINE_FG);
        buf.overlay(right, PITCH_ROW + r, '│', LINE_FG);
    }
    buf.overlay(left, PITCH_ROW + top, '┌', LINE_FG);
    buf.overlay(right, PITCH_ROW + top, '┐', LINE_FG);
    buf.overlay(left, PITCH_ROW + bottom, '╘', LINE_FG);
    buf.overlay(right, PITCH_ROW + bottom, '╛', LINE_FG);
}

/// Draw a sprite stretched over a `w`×`h` pixel box centered on (`cx`, `cy`).
/// Transparent (space) cells and cells off the pitch are skipped; so is a
/// sprite that never loaded.
fn compose_sprite(
    buf: &mut FrameBuffer,
    vp: &Viewport,
    sprite: Option<&Sprite>,
    cx: f32, cy: f32, w: f32, h: f32,
    fg: Color,
) {
    let sprite = match sprite { Some(s) => s, None => return };
    let (left, top, cols, rows) = vp.sprite_box(cx, cy, w, h);

    for r in 0..rows {
        let row = top + r as i32;
        if row < 0 || row as usize >= vp.rows { continue; }
        for c in 0..cols {
            let col = left + c as i32;
            if col < 0 || col as usize >= vp.cols { continue; }
            let ch = sprite.sample(c, r, cols, rows);
            if ch == ' ' { continue; }
            buf.overlay(col as usize, PITCH_ROW + row as usize, ch, fg);
        }
    }
}

fn compose_title(buf: &mut FrameBuffer, w: &WorldState, assets: &AssetStore) {
    let mid = buf.height / 2;
    let title_fg = Color::Rgb { r: 255, g: 220, b: 50 };

    buf.put_centered(mid.saturating_sub(4), "◈  P E N A L T Y  ◈", title_fg, BASE_BG);
    buf.put_centered(mid.saturating_sub(2), "Beat the keeper. Every goal makes them faster.", Color::Grey, BASE_BG);

    let status: Vec<String> = AssetKind::ALL
        .iter()
        .map(|k| {
            let mark = if assets.get(*k).is_some() { "ok" } else { "missing" };
            format!("{}:{}", k.name(), mark)
        })
        .collect();
    let status_fg = if assets.all_loaded() { Color::DarkGrey } else { Color::Rgb { r: 230, g: 120, b: 60 } };
    buf.put_centered(mid, &status.join("  "), status_fg, BASE_BG);

    buf.put_centered(mid + 2, "ENTER: Kick off     Q: Quit", Color::White, BASE_BG);

    if !w.message.is_empty() {
        buf.put_centered(mid + 4, &w.message, Color::Black, BANNER_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PitchConfig;
    use crate::ui::assets::EmbeddedSource;

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn viewport_scales_field() {
        let vp = Viewport::fit(80, 24, 800.0, 400.0);
        assert_eq!(vp.cols, 80);
        assert_eq!(vp.rows, 20);
        assert_eq!(vp.px_per_col, 10.0);
        assert_eq!(vp.px_per_row, 20.0);
        assert_eq!(vp.col(400.0), 40);
        assert_eq!(vp.row(150.0), 7);
        // keeper 100x100 centered at (400, 150)
        assert_eq!(vp.sprite_box(400.0, 150.0, 100.0, 100.0), (35, 5, 10, 5));
    }

    #[test]
    fn tiny_terminal_never_divides_by_zero() {
        let vp = Viewport::fit(0, 0, 800.0, 400.0);
        assert_eq!(vp.cols, 1);
        assert_eq!(vp.rows, 1);
        let (_, _, c, r) = vp.sprite_box(0.0, 0.0, 1.0, 1.0);
        assert_eq!((c, r), (1, 1));
    }

    #[test]
    fn zero_sized_field_keeps_sprite_boxes_small() {
        let vp = Viewport::fit(80, 24, 0.0, 0.0);
        assert_eq!(vp.px_per_col, 1.0);
        assert_eq!(vp.px_per_row, 1.0);
        let (_, _, cols, rows) = vp.sprite_box(400.0, 150.0, 100.0, 100.0);
        assert_eq!((cols, rows), (100, 100));
    }

    #[test]
    fn hud_shows_counters() {
        let now = Instant::now();
        let mut w = WorldState::new(&PitchConfig::default(), now);
        w.start(now);
        w.counters.goals_scored = 2;
        w.counters.shots_taken = 5;
        let (assets, _) = AssetStore::load(&EmbeddedSource);

        let mut buf = FrameBuffer::new(80, 24);
        compose_game(&mut buf, &w, &assets, now);
        let hud = row_text(&buf, 0);
        assert!(hud.contains("Goals: 2"));
        assert!(hud.contains("Shots: 5"));
        assert!(hud.contains("Time: 0s"));
    }

    #[test]
    fn missing_sprite_is_skipped() {
        let now = Instant::now();
        let w = WorldState::new(&PitchConfig::default(), now);
        let assets = AssetStore::default(); // nothing loaded

        let mut buf = FrameBuffer::new(80, 24);
        compose_game(&mut buf, &w, &assets, now);
        // Pitch is plain background apart from the goal outline
        let vp = Viewport::fit(80, 24, 800.0, 400.0);
        let keeper_row = PITCH_ROW + vp.row(w.keeper.y - 30.0) as usize;
        let text = row_text(&buf, keeper_row);
        assert!(text.chars().all(|c| c == ' ' || c == '│'));
    }

    #[test]
    fn goal_outline_drawn() {
        let now = Instant::now();
        let w = WorldState::new(&PitchConfig::default(), now);
        let mut buf = FrameBuffer::new(80, 24);
        compose_game(&mut buf, &w, &AssetStore::default(), now);
        let vp = Viewport::fit(80, 24, 800.0, 400.0);
        let top = PITCH_ROW + vp.row(w.goal.y) as usize;
        assert_eq!(buf.get(20, top).ch, '┌');
        assert_eq!(buf.get(60, top).ch, '┐');
    }
}
