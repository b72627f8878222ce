//! Per-tick combat resolution: enemy movement and attacks, crowd separation,
//! arena confinement, projectile flight and hit resolution.
//!
//! Nothing is removed from a collection while it is being scanned.  Hits are
//! marked during the scan and the survivors are collected afterwards.

use glam::Vec2;
use log::{debug, info};

use crate::ai::{decide, Intent, Perception};
use crate::animation::{facing_from_delta, frame_index};
use crate::config::{ArenaConfig, CombatConfig};
use crate::entities::{Archetype, Enemy, Player, Projectile, ProjectileKind};
use crate::geometry::{Aabb, LevelGeometry};
use crate::waves::WaveDirector;

/// What happened during one resolution pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombatReport {
    pub kills: Vec<Archetype>,
    pub xp_awarded: u32,
    pub levels_gained: u32,
    pub damage_to_player: i32,
    pub enemy_shots: usize,
}

// ── 1. Enemy movement and attacks ─────────────────────────────────────────────

/// Run every enemy's AI, move it, and carry out its attack intents.
/// Enemy bullets are appended to `projectiles`.
pub fn update_enemies(
    enemies: &mut [Enemy],
    player: &mut Player,
    projectiles: &mut Vec<Projectile>,
    dt: f32,
    cfg: &CombatConfig,
    report: &mut CombatReport,
) {
    for enemy in enemies.iter_mut() {
        enemy.age += dt;
        enemy.since_melee += dt;
        enemy.since_shot += dt;

        let seen = Perception {
            player_pos: player.pos,
            player_alive: player.is_alive(),
            dt,
        };
        let decision = decide(enemy, &seen, cfg);

        let step = decision.velocity * dt;
        enemy.pos += step;
        if let Some(facing) = facing_from_delta(step) {
            enemy.facing = facing;
        }
        enemy.anim_frame = frame_index(enemy.archetype, enemy.facing, enemy.age);

        for intent in decision.intents {
            match intent {
                Intent::Melee { damage } => {
                    player.take_damage(damage);
                    enemy.since_melee = 0.0;
                    report.damage_to_player += damage;
                    debug!(
                        "{} hits player for {} ({} left)",
                        enemy.archetype.name(),
                        damage,
                        player.health
                    );
                }
                Intent::Fire {
                    origin,
                    direction,
                    damage,
                    speed,
                } => {
                    projectiles.push(Projectile {
                        kind: ProjectileKind::EnemyBullet,
                        pos: origin,
                        dir: direction,
                        speed,
                        lifetime: cfg.enemy_bullet_lifetime,
                        radius: cfg.enemy_bullet_radius,
                        damage,
                    });
                    enemy.since_shot = 0.0;
                    report.enemy_shots += 1;
                    debug!("{} fires", enemy.archetype.name());
                }
            }
        }
    }
}

/// Soft pairwise repulsion between overlapping enemies.  Both members of a
/// pair move the same distance in opposite directions, using the mean of
/// their push forces.
pub fn separate_enemies(enemies: &mut [Enemy], dt: f32) {
    for i in 0..enemies.len() {
        for j in (i + 1)..enemies.len() {
            let delta = enemies[i].pos - enemies[j].pos;
            let min_dist = enemies[i].radius() + enemies[j].radius();
            let len = delta.length();
            if len >= min_dist {
                continue;
            }
            let dist = len.max(1.0);
            let overlap = (min_dist - dist) / min_dist;
            // Stacked enemies get split along x.
            let normal = delta.try_normalize().unwrap_or(Vec2::X);
            let force = (enemies[i].stats().push_force + enemies[j].stats().push_force) * 0.5;
            let push = overlap * force * dt;
            enemies[i].pos += normal * push;
            enemies[j].pos -= normal * push;
        }
    }
}

// ── 2. Arena confinement ──────────────────────────────────────────────────────

/// Keep enemies inside the inset arena and nudge any that overlap a wall
/// away from the closest overlapping wall.
pub fn confine_enemies(enemies: &mut [Enemy], level: &impl LevelGeometry, cfg: &ArenaConfig) {
    let size = level.size();
    let lo = Vec2::splat(cfg.edge_inset);
    let hi = (size - lo).max(lo);

    for enemy in enemies.iter_mut() {
        enemy.pos = enemy.pos.clamp(lo, hi);

        let bounds = Aabb::square(enemy.pos, enemy.archetype.sprite_width());
        let nearest = level.overlapping(&bounds).map(|w| w.center()).min_by(|a, b| {
            a.distance_squared(enemy.pos)
                .total_cmp(&b.distance_squared(enemy.pos))
        });
        if let Some(center) = nearest {
            let away = enemy.pos - center;
            enemy.pos += away / away.length().max(1.0) * cfg.wall_push;
        }
    }
}

// ── 3. Projectile flight ──────────────────────────────────────────────────────

pub fn advance_projectiles(projectiles: &mut [Projectile], dt: f32) {
    for p in projectiles.iter_mut() {
        p.pos += p.dir * p.speed * dt;
        p.lifetime -= dt;
    }
}

// ── 4–6. Hits ─────────────────────────────────────────────────────────────────

/// Resolve projectile hits, then sweep out spent projectiles and dead
/// enemies.  Every enemy bullet is checked against the player before any
/// player bullet is checked against walls and enemies.  Each kill is
/// reported to the wave director and pays out XP to the player.
pub fn resolve_hits(
    mut enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    player: &mut Player,
    waves: &mut WaveDirector,
    level: &impl LevelGeometry,
    player_width: f32,
    report: &mut CombatReport,
) -> (Vec<Enemy>, Vec<Projectile>) {
    let mut spent: Vec<bool> = projectiles.iter().map(Projectile::is_expired).collect();
    let mut dead = vec![false; enemies.len()];

    // Enemy bullets against the player.
    for (pi, p) in projectiles.iter().enumerate() {
        if spent[pi] || p.kind != ProjectileKind::EnemyBullet {
            continue;
        }
        if p.pos.distance(player.pos) < p.radius + player_width / 2.0 {
            player.take_damage(p.damage);
            report.damage_to_player += p.damage;
            spent[pi] = true;
            debug!("enemy bullet hits player for {}", p.damage);
        }
    }

    // Player bullets against walls, then enemies.
    for (pi, p) in projectiles.iter().enumerate() {
        if spent[pi] || p.kind != ProjectileKind::PlayerBullet {
            continue;
        }
        let hit_wall = level
            .obstacles()
            .iter()
            .any(|w| p.pos.distance(w.center()) < p.radius + w.width() / 2.0);
        if hit_wall {
            spent[pi] = true;
            continue;
        }

        // First live enemy in iteration order takes the hit.
        let target = enemies.iter().enumerate().position(|(ei, e)| {
            !dead[ei] && p.pos.distance(e.pos) < p.radius + e.archetype.sprite_width() / 2.0
        });
        let Some(ei) = target else {
            continue;
        };
        spent[pi] = true;
        let enemy = &mut enemies[ei];
        let applied = enemy.take_damage(p.damage);
        debug!(
            "{} takes {} ({} left)",
            enemy.archetype.name(),
            applied,
            enemy.health
        );
        if enemy.is_dead() {
            dead[ei] = true;
            let archetype = enemy.archetype;
            let xp = archetype.stats().xp_reward;
            waves.record_death(archetype);
            report.kills.push(archetype);
            report.xp_awarded += xp;
            report.levels_gained += player.add_xp(xp);
            info!("{} destroyed, +{} xp", archetype.name(), xp);
        }
    }

    let enemies = enemies
        .into_iter()
        .zip(dead)
        .filter(|(_, d)| !d)
        .map(|(e, _)| e)
        .collect();
    let projectiles = projectiles
        .into_iter()
        .zip(spent)
        .filter(|(_, s)| !s)
        .map(|(p, _)| p)
        .collect();
    (enemies, projectiles)
}
