//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! world coordinates (y up) into terminal cells (row 0 at the top).

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use wave_survival::compute::wave_hud;
use wave_survival::entities::{Archetype, Enemy, Facing, GameState, GameStatus, ProjectileKind};
use wave_survival::geometry::LevelGeometry;
use wave_survival::stats::{StatKind, MAX_BONUS_TIER};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_WALL: Color = Color::DarkGrey;
const C_HUD: Color = Color::Yellow;
const C_HEALTH: Color = Color::Red;
const C_XP: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
const C_PANEL: Color = Color::White;

/// Rows used above the playfield (HUD + top border).
const TOP: u16 = 2;
/// Rows used below the playfield (bottom border + hint line).
const BOTTOM: u16 = 2;

/// Maps world positions onto the terminal playfield.
struct Viewport {
    cols: u16,
    rows: u16,
    world: Vec2,
}

impl Viewport {
    fn new(width: u16, height: u16, world: Vec2) -> Self {
        Self {
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(TOP + BOTTOM).max(1),
            world,
        }
    }

    /// Terminal cell for a world position, or `None` when off the field.
    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 || p.x > self.world.x || p.y > self.world.y {
            return None;
        }
        let cx = (p.x / self.world.x * f32::from(self.cols)) as u16;
        let cy = ((1.0 - p.y / self.world.y) * f32::from(self.rows)) as u16;
        Some((1 + cx.min(self.cols - 1), TOP + cy.min(self.rows - 1)))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    level: &impl LevelGeometry,
    panel_open: bool,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(width, height, level.size());

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_walls(out, &view, level)?;
    draw_hud(out, state, width)?;

    for enemy in &state.enemies {
        draw_glow(out, &view, enemy)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, &view, enemy)?;
    }
    for p in &state.projectiles {
        if let Some((x, y)) = view.cell(p.pos) {
            let (glyph, color) = match p.kind {
                ProjectileKind::PlayerBullet => ("•", C_BULLET_PLAYER),
                ProjectileKind::EnemyBullet => ("∘", C_BULLET_ENEMY),
            };
            out.queue(cursor::MoveTo(x, y))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    draw_player(out, &view, state)?;
    draw_controls_hint(out, height)?;

    match state.status {
        GameStatus::Countdown => draw_countdown(out, state, width, height)?,
        GameStatus::GameOver => draw_game_over(out, state, width, height)?,
        GameStatus::Playing => {}
    }
    if panel_open && state.status != GameStatus::GameOver {
        draw_upgrade_panel(out, state, width)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border and walls ──────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(BOTTOM)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in TOP..height.saturating_sub(BOTTOM) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

/// Fill every cell whose centre falls inside a wall.
fn draw_walls<W: Write>(
    out: &mut W,
    view: &Viewport,
    level: &impl LevelGeometry,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_WALL))?;
    let cell_w = view.world.x / f32::from(view.cols);
    let cell_h = view.world.y / f32::from(view.rows);
    for row in 0..view.rows {
        for col in 0..view.cols {
            let centre = Vec2::new(
                (f32::from(col) + 0.5) * cell_w,
                view.world.y - (f32::from(row) + 0.5) * cell_h,
            );
            if level.obstacles().iter().any(|w| w.contains(centre)) {
                out.queue(cursor::MoveTo(1 + col, TOP + row))?;
                out.queue(Print("█"))?;
            }
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    let p = &state.player;

    // Health and progression on the left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HEALTH))?;
    out.queue(Print(format!("HP {:>3}/{:<3}", p.health, p.max_health)))?;
    out.queue(style::SetForegroundColor(C_XP))?;
    out.queue(Print(format!(
        "  Lv {}  XP {}/{}  SP {}",
        p.level, p.xp, p.xp_to_next_level, p.skill_points
    )))?;

    // Wave status on the right
    let hud = wave_hud(state);
    let mut right = format!("Wave {}  Left {}/{}", hud.wave, hud.enemies_remaining, hud.wave_size);
    if let Some(secs) = hud.next_wave_in {
        right.push_str(&format!("  Next {:.0}s", secs.ceil()));
    }
    let counts: Vec<String> = Archetype::ALL
        .iter()
        .filter(|a| state.waves.live.get(**a) > 0)
        .map(|a| format!("{}{}", glyph(*a), state.waves.live.get(*a)))
        .collect();
    if !counts.is_empty() {
        right.push_str(&format!("  [{}]", counts.join(" ")));
    }

    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(&right))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn glyph(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Basic => "o",
        Archetype::Tank => "O",
        Archetype::Shooter => "x",
        Archetype::Fast => "v",
        Archetype::Boss => "B",
    }
}

fn enemy_color(enemy: &Enemy) -> Color {
    let (r, g, b) = enemy.stats().light_color;
    // Two-frame archetypes flicker between the light colour and a dimmer one.
    if enemy.anim_frame % 2 == 1 {
        Color::Rgb {
            r: r / 2,
            g: g / 2,
            b: b / 2,
        }
    } else {
        Color::Rgb { r, g, b }
    }
}

/// Faint marks at the edge of an enemy's light, one per axis direction.
fn draw_glow<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let stats = enemy.stats();
    let (r, g, b) = stats.light_color;
    out.queue(style::SetForegroundColor(Color::Rgb {
        r: r / 4,
        g: g / 4,
        b: b / 4,
    }))?;
    for dir in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
        if let Some((x, y)) = view.cell(enemy.pos + dir * stats.light_radius) {
            out.queue(cursor::MoveTo(x, y))?;
            out.queue(Print("·"))?;
        }
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    if let Some((x, y)) = view.cell(enemy.pos) {
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(style::SetForegroundColor(enemy_color(enemy)))?;
        out.queue(Print(glyph(enemy.archetype)))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let Some((x, y)) = view.cell(p.pos) else {
        return Ok(());
    };
    let sprite = match p.facing {
        Facing::Up => "▲",
        Facing::Down => "▼",
        Facing::Left => "◀",
        Facing::Right => "▶",
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "WASD / arrows : Move   SPACE : Shoot   TAB : Upgrades   1-7 : Spend   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_countdown<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines = [
        ("Get ready".to_string(), Color::White),
        (format!("{}", state.countdown.ceil() as u32), Color::Yellow),
    ];
    draw_centered(out, &lines, width, height)
}

/// Stat list with tiers and prices; number keys buy the matching row.
fn draw_upgrade_panel<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    let p = &state.player;
    let col = width.saturating_sub(36);
    out.queue(cursor::MoveTo(col, TOP + 1))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Upgrades ({} SP)", p.skill_points)))?;

    for (i, kind) in StatKind::ALL.iter().enumerate() {
        let stat = p.stats.get(*kind);
        let affordable = !stat.is_maxed() && p.skill_points >= stat.cost;
        let price = if stat.is_maxed() {
            "max".to_string()
        } else {
            format!("{} SP", stat.cost)
        };
        out.queue(cursor::MoveTo(col, TOP + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(if affordable { C_PANEL } else { C_HINT }))?;
        out.queue(Print(format!(
            "[{}] {:<16}+{:>2}/{}  {}",
            i + 1,
            kind.name(),
            stat.bonus,
            MAX_BONUS_TIER,
            price
        )))?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let hud = wave_hud(state);
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (
            format!("Reached wave {} at level {}", hud.wave, state.player.level),
            Color::Yellow,
        ),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}
