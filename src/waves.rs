//! Wave pacing and composition.
//!
//! The director is a three-state machine: `Idle` until the game starts,
//! `Active` while a wave has enemies alive, `Cleared` while waiting out the
//! spawn interval before the next wave.

use glam::Vec2;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::WaveConfig;
use crate::entities::{Archetype, ArchetypeCounts, Enemy};
use crate::geometry::{Aabb, LevelGeometry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    Idle,
    Active,
    Cleared,
}

/// Wave facts for the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveHud {
    /// Number of the most recently spawned wave (0 before the first).
    pub wave: u32,
    pub enemies_remaining: u32,
    pub wave_size: u32,
    /// Seconds until the next wave, while one is pending.
    pub next_wave_in: Option<f32>,
}

/// Archetypes eligible for ordinary slots in `wave`.
pub fn tier_for_wave(wave: u32) -> &'static [Archetype] {
    match wave {
        0..=2 => &[Archetype::Basic],
        3..=4 => &[Archetype::Basic, Archetype::Fast],
        5..=7 => &[Archetype::Basic, Archetype::Fast, Archetype::Shooter],
        _ => &[
            Archetype::Basic,
            Archetype::Fast,
            Archetype::Shooter,
            Archetype::Tank,
        ],
    }
}

#[derive(Clone, Debug)]
pub struct WaveDirector {
    pub phase: WavePhase,
    /// Number of the next wave to spawn; starts at 1.
    pub wave_number: u32,
    /// Seconds since the current wave was cleared.
    pub spawn_timer: f32,
    /// Enemies planned for the most recent wave.
    pub wave_size: u32,
    pub live: ArchetypeCounts,
    spawn_pool: Vec<Vec2>,
    next_id: u64,
    cfg: WaveConfig,
}

impl WaveDirector {
    pub fn new(cfg: WaveConfig) -> Self {
        Self {
            phase: WavePhase::Idle,
            wave_number: 1,
            spawn_timer: 0.0,
            wave_size: 0,
            live: ArchetypeCounts::default(),
            spawn_pool: Vec::new(),
            next_id: 0,
            cfg,
        }
    }

    pub fn spawn_pool(&self) -> &[Vec2] {
        &self.spawn_pool
    }

    /// Replace the spawn pool with explicit points.
    pub fn with_spawn_pool(mut self, points: Vec<Vec2>) -> Self {
        self.spawn_pool = points;
        self
    }

    /// Sample candidate points inside the arena, keeping those clear of
    /// walls and far enough from the player start.
    pub fn build_spawn_pool(
        &mut self,
        level: &impl LevelGeometry,
        player_start: Vec2,
        rng: &mut impl Rng,
    ) {
        let size = level.size();
        let margin = self.cfg.spawn_pool_margin;
        self.spawn_pool.clear();
        if size.x <= 2.0 * margin || size.y <= 2.0 * margin {
            warn!("arena too small for a spawn pool; using edge spawns");
            return;
        }

        for _ in 0..self.cfg.spawn_point_attempts {
            let p = Vec2::new(
                rng.gen_range(margin..=size.x - margin),
                rng.gen_range(margin..=size.y - margin),
            );
            let probe = Aabb::square(p, self.cfg.spawn_probe_size);
            if level.overlaps(&probe) || p.distance(player_start) < self.cfg.min_spawn_distance {
                continue;
            }
            self.spawn_pool.push(p);
        }
        info!("{} spawn points available", self.spawn_pool.len());
    }

    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.cfg.boss_every > 0 && wave > 0 && wave % self.cfg.boss_every == 0
    }

    /// Enemies requested for `wave` before the cap is applied.
    pub fn planned_count(&self, wave: u32) -> u32 {
        self.cfg.base_enemies + wave.saturating_sub(1) * self.cfg.enemies_per_wave_increase
    }

    /// Leave `Idle` and spawn the first wave.  No-op once started.
    pub fn start(
        &mut self,
        existing: &[Enemy],
        level: &impl LevelGeometry,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        if self.phase != WavePhase::Idle {
            return Vec::new();
        }
        self.spawn_wave(existing, level, rng)
    }

    /// Advance pacing by `dt`.  Returns the enemies of a new wave when one
    /// is due, otherwise nothing.
    pub fn update(
        &mut self,
        dt: f32,
        existing: &[Enemy],
        level: &impl LevelGeometry,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        if self.phase == WavePhase::Active && existing.is_empty() {
            self.phase = WavePhase::Cleared;
            self.spawn_timer = 0.0;
            info!(
                "wave {} cleared; next in {:.1}s",
                self.wave_number - 1,
                self.cfg.spawn_interval
            );
        }

        if self.phase == WavePhase::Cleared {
            self.spawn_timer += dt;
            if self.spawn_timer >= self.cfg.spawn_interval {
                self.spawn_timer = 0.0;
                return self.spawn_wave(existing, level, rng);
            }
        }
        Vec::new()
    }

    /// Compose and place the next wave.  Spawns that land in a wall are
    /// dropped, so the result may be shorter than planned.
    pub fn spawn_wave(
        &mut self,
        existing: &[Enemy],
        level: &impl LevelGeometry,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        let live = existing.len() as u32;
        if live >= self.cfg.max_enemies {
            warn!("enemy cap ({}) reached; wave postponed", self.cfg.max_enemies);
            return Vec::new();
        }

        let wave = self.wave_number;
        let count = self.planned_count(wave).min(self.cfg.max_enemies - live);
        self.wave_size = count;
        self.phase = WavePhase::Active;

        let mut placed: Vec<Enemy> = Vec::with_capacity(count as usize);
        let mut slots = count;
        if self.is_boss_wave(wave) && slots > 0 {
            info!("boss wave {}", wave);
            self.try_place(Archetype::Boss, existing, &mut placed, level, rng);
            slots -= 1;
        }

        let tier = tier_for_wave(wave);
        for _ in 0..slots {
            let archetype = tier.choose(rng).copied().unwrap_or(Archetype::Basic);
            self.try_place(archetype, existing, &mut placed, level, rng);
        }

        for enemy in &placed {
            self.live.increment(enemy.archetype);
        }
        info!(
            "wave {}: {} of {} enemies placed",
            wave,
            placed.len(),
            count
        );
        self.wave_number += 1;
        placed
    }

    fn try_place(
        &mut self,
        archetype: Archetype,
        existing: &[Enemy],
        placed: &mut Vec<Enemy>,
        level: &impl LevelGeometry,
        rng: &mut impl Rng,
    ) {
        let mut pos = self.pick_point(level.size(), rng);

        let crowded = existing
            .iter()
            .chain(placed.iter())
            .any(|e| e.pos.distance(pos) < self.cfg.spawn_spacing);
        if crowded {
            let j = self.cfg.spawn_jitter;
            pos += Vec2::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j));
        }

        if level.overlaps(&Aabb::square(pos, archetype.sprite_width())) {
            warn!("{} spawn at {} is inside a wall; skipped", archetype.name(), pos);
            return;
        }

        placed.push(Enemy::new(self.next_id, archetype, pos));
        self.next_id += 1;
    }

    /// A random pool point, or a random spot just outside a random arena
    /// edge when the pool is empty.
    fn pick_point(&self, size: Vec2, rng: &mut impl Rng) -> Vec2 {
        if let Some(p) = self.spawn_pool.choose(rng) {
            return *p;
        }
        let m = self.cfg.edge_spawn_margin;
        match rng.gen_range(0..4) {
            0 => Vec2::new(rng.gen_range(0.0..=size.x), size.y + m),
            1 => Vec2::new(rng.gen_range(0.0..=size.x), -m),
            2 => Vec2::new(-m, rng.gen_range(0.0..=size.y)),
            _ => Vec2::new(size.x + m, rng.gen_range(0.0..=size.y)),
        }
    }

    pub fn record_death(&mut self, archetype: Archetype) {
        self.live.decrement(archetype);
    }

    pub fn hud(&self, enemies_alive: usize) -> WaveHud {
        let next_wave_in = match self.phase {
            WavePhase::Cleared => Some((self.cfg.spawn_interval - self.spawn_timer).max(0.0)),
            WavePhase::Idle | WavePhase::Active => None,
        };
        WaveHud {
            wave: self.wave_number - 1,
            enemies_remaining: enemies_alive as u32,
            wave_size: self.wave_size,
            next_wave_in,
        }
    }
}
