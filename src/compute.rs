//! Top-level game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, the level and an RNG handle) and returns a
//! brand-new `GameState`.  Side effects are limited to the injected RNG and
//! log output.

use glam::Vec2;
use log::info;
use rand::Rng;

use crate::animation::facing_from_delta;
use crate::combat::{self, CombatReport};
use crate::config::SimConfig;
use crate::entities::{GameState, GameStatus, Player, Projectile, ProjectileKind};
use crate::geometry::{Aabb, LevelGeometry};
use crate::stats::{StatKind, UpgradeError};
use crate::waves::{WaveDirector, WaveHud};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: the player at `player_start`, the spawn
/// pool sampled from `level`, and the start countdown running.
pub fn init_state(
    config: SimConfig,
    level: &impl LevelGeometry,
    player_start: Vec2,
    rng: &mut impl Rng,
) -> GameState {
    let mut waves = WaveDirector::new(config.waves.clone());
    waves.build_spawn_pool(level, player_start, rng);

    GameState {
        player: Player::new(player_start),
        enemies: Vec::new(),
        projectiles: Vec::new(),
        waves,
        status: GameStatus::Countdown,
        countdown: config.waves.countdown_secs,
        elapsed: 0.0,
        frame: 0,
        config,
    }
}

// ── Input-driven state transitions ──────────────────────────────────────────

/// Move the player along `input` (each axis in -1..=1) for `dt` seconds.
/// Each axis is resolved separately, so sliding along a wall still works.
pub fn move_player(
    state: &GameState,
    input: Vec2,
    dt: f32,
    level: &impl LevelGeometry,
) -> GameState {
    let mut next = state.clone();
    if state.status == GameStatus::GameOver {
        return next;
    }

    let mut step = input.clamp(Vec2::NEG_ONE, Vec2::ONE) * next.player.speed as f32 * dt;
    if step.x != 0.0 && step.y != 0.0 {
        step *= state.config.player.diagonal_factor;
    }
    let Some(facing) = facing_from_delta(step) else {
        return next;
    };

    let player = &mut next.player;
    player.facing = facing;
    player.aim = facing.unit();

    let width = state.config.player.sprite_width;
    for axis_step in [Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
        let candidate = player.pos + axis_step;
        if !level.overlaps(&Aabb::square(candidate, width)) {
            player.pos = candidate;
        }
    }
    player.pos = player.pos.clamp(Vec2::ZERO, level.size());
    next
}

/// Fire a player bullet along the aim direction if the weapon is ready.
/// Weapon numbers are read from the stat table at the moment of firing.
pub fn player_shoot(state: &GameState) -> GameState {
    let player = &state.player;
    if state.status != GameStatus::Playing || !player.is_alive() || player.shot_cooldown > 0.0 {
        return state.clone();
    }

    let stats = &player.stats;
    let bullet = Projectile {
        kind: ProjectileKind::PlayerBullet,
        pos: player.pos,
        dir: player.aim,
        speed: stats.value(StatKind::BulletSpeed) as f32,
        lifetime: stats.get(StatKind::BulletLifetime).scaled(),
        radius: state.config.combat.player_bullet_radius * stats.multiplier(StatKind::AttackRadius),
        damage: stats.value(StatKind::Damage),
    };
    let cooldown = stats.get(StatKind::ReloadSpeed).base / stats.multiplier(StatKind::ReloadSpeed);

    let mut next = state.clone();
    next.projectiles.push(bullet);
    next.player.shot_cooldown = cooldown;
    next
}

/// Spend skill points on the named stat.  A declined upgrade leaves the
/// original state untouched and reports why.
pub fn upgrade_stat(state: &GameState, name: &str) -> Result<GameState, UpgradeError> {
    let mut next = state.clone();
    next.player.upgrade_stat(name)?;
    Ok(next)
}

// ── Per-frame tick ──────────────────────────────────────────────────────────

/// Advance the simulation by `dt` seconds.  All randomness comes through
/// `rng` so callers control determinism (tests use a seeded RNG).
pub fn tick(
    state: &GameState,
    level: &impl LevelGeometry,
    dt: f32,
    rng: &mut impl Rng,
) -> GameState {
    tick_with_report(state, level, dt, rng).0
}

/// [`tick`], also returning what the combat pass did.
pub fn tick_with_report(
    state: &GameState,
    level: &impl LevelGeometry,
    dt: f32,
    rng: &mut impl Rng,
) -> (GameState, CombatReport) {
    let mut report = CombatReport::default();
    let mut next = state.clone();
    if state.status == GameStatus::GameOver {
        return (next, report);
    }

    next.frame += 1;
    next.elapsed += dt;
    next.player.shot_cooldown = (next.player.shot_cooldown - dt).max(0.0);

    // ── Countdown ────────────────────────────────────────────────────────────
    if next.status == GameStatus::Countdown {
        next.countdown -= dt;
        if next.countdown <= 0.0 {
            next.countdown = 0.0;
            next.status = GameStatus::Playing;
            info!("game started");
            let first = next.waves.start(&next.enemies, level, rng);
            next.enemies.extend(first);
        }
        return (next, report);
    }

    // ── 1. Wave pacing ───────────────────────────────────────────────────────
    let spawned = next.waves.update(dt, &next.enemies, level, rng);
    next.enemies.extend(spawned);

    // ── 2. Enemy AI, movement, separation, confinement ───────────────────────
    let cfg = &state.config;
    combat::update_enemies(
        &mut next.enemies,
        &mut next.player,
        &mut next.projectiles,
        dt,
        &cfg.combat,
        &mut report,
    );
    combat::separate_enemies(&mut next.enemies, dt);
    combat::confine_enemies(&mut next.enemies, level, &cfg.arena);

    // ── 3. Projectiles and hits ──────────────────────────────────────────────
    combat::advance_projectiles(&mut next.projectiles, dt);
    let (enemies, projectiles) = combat::resolve_hits(
        std::mem::take(&mut next.enemies),
        std::mem::take(&mut next.projectiles),
        &mut next.player,
        &mut next.waves,
        level,
        cfg.player.sprite_width,
        &mut report,
    );
    next.enemies = enemies;
    next.projectiles = projectiles;

    // ── 4. Player status ─────────────────────────────────────────────────────
    if !next.player.is_alive() {
        next.status = GameStatus::GameOver;
        info!(
            "player died on wave {} at level {}",
            next.waves.wave_number.saturating_sub(1),
            next.player.level
        );
    }

    (next, report)
}

// ── Read-only views ─────────────────────────────────────────────────────────

pub fn wave_hud(state: &GameState) -> WaveHud {
    state.waves.hud(state.enemies.len())
}
