//! Per-archetype enemy decisions.
//!
//! The AI never touches the player or the projectile list directly: it
//! returns a velocity and a list of intents, and the combat resolver carries
//! them out.

use glam::Vec2;

use crate::config::CombatConfig;
use crate::entities::{Archetype, Enemy};

/// What an enemy knows about the world this tick.
#[derive(Clone, Copy, Debug)]
pub struct Perception {
    pub player_pos: Vec2,
    pub player_alive: bool,
    pub dt: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Contact hit on the player.
    Melee { damage: i32 },
    /// Spawn an enemy bullet.
    Fire {
        origin: Vec2,
        direction: Vec2,
        damage: i32,
        speed: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decision {
    /// Units per second.
    pub velocity: Vec2,
    pub intents: Vec<Intent>,
}

/// How a movement policy wants to move relative to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steering {
    Approach,
    Retreat,
    Hold,
}

/// Movement policy for an archetype at distance `dist` from the player.
///
/// Shooters keep to the closed band `[range - band, range]`: beyond it they
/// close in, inside its near edge they back off, and within it they stand
/// still so they can fire.  Everyone else, the Boss included, just chases.
pub fn steering(archetype: Archetype, dist: f32, band: f32) -> Steering {
    match archetype {
        Archetype::Shooter => {
            let range = archetype.stats().ranged.map_or(0.0, |r| r.range);
            if dist > range {
                Steering::Approach
            } else if dist < range - band {
                Steering::Retreat
            } else {
                Steering::Hold
            }
        }
        Archetype::Basic | Archetype::Tank | Archetype::Fast | Archetype::Boss => {
            Steering::Approach
        }
    }
}

/// Decide movement and attacks for one enemy.  Cooldown timers on `enemy`
/// must already include this tick's `dt`.
pub fn decide(enemy: &Enemy, seen: &Perception, cfg: &CombatConfig) -> Decision {
    if !seen.player_alive {
        return Decision::default();
    }

    let stats = enemy.stats();
    let to_player = seen.player_pos - enemy.pos;
    let dist = to_player.length().max(1.0);
    let toward = to_player / dist;

    let velocity = match steering(enemy.archetype, dist, cfg.shooter_band) {
        Steering::Approach => toward * stats.speed,
        Steering::Retreat => -toward * stats.speed,
        Steering::Hold => Vec2::ZERO,
    };

    let mut intents = Vec::new();
    let moved = enemy.pos + velocity * seen.dt;

    // Melee reach is measured from where the enemy ends up this tick.
    if moved.distance(seen.player_pos) < cfg.melee_range && enemy.since_melee >= cfg.melee_cooldown
    {
        intents.push(Intent::Melee {
            damage: stats.contact_damage,
        });
    }

    if let Some(ranged) = stats.ranged {
        if dist <= ranged.range && enemy.since_shot >= ranged.cooldown {
            // Point-blank shots fall back to straight down.
            let direction = (seen.player_pos - moved).try_normalize().unwrap_or(Vec2::NEG_Y);
            intents.push(Intent::Fire {
                origin: moved,
                direction,
                damage: ranged.damage,
                speed: ranged.bullet_speed,
            });
        }
    }

    Decision { velocity, intents }
}
