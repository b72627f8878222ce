//! Tunable simulation constants, loadable from a RON file.
//!
//! Every field has a default, so a tuning file only needs the values it
//! overrides:
//!
//! ```ron
//! (
//!     waves: (spawn_interval: 6.0, max_enemies: 30),
//! )
//! ```

use std::fs;
use std::path::Path;

use ron::Options;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub arena: ArenaConfig,
    pub waves: WaveConfig,
    pub combat: CombatConfig,
    pub player: PlayerConfig,
}

impl SimConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron_options().from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    /// Distance enemies are kept from each arena edge.
    pub edge_inset: f32,
    /// Step an enemy is pushed out of a wall per tick.
    pub wall_push: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            edge_inset: 50.0,
            wall_push: 5.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaveConfig {
    pub countdown_secs: f32,
    pub spawn_interval: f32,
    pub base_enemies: u32,
    pub enemies_per_wave_increase: u32,
    pub max_enemies: u32,
    /// A Boss opens every wave whose number is a multiple of this.
    pub boss_every: u32,
    pub spawn_point_attempts: u32,
    /// Spawn points closer than this to the player start are rejected.
    pub min_spawn_distance: f32,
    /// Edge of the square probed for walls when building the spawn pool.
    pub spawn_probe_size: f32,
    /// Spawns closer than this to another enemy get jittered.
    pub spawn_spacing: f32,
    pub spawn_jitter: f32,
    /// How far outside the arena edge-fallback spawns are placed.
    pub edge_spawn_margin: f32,
    /// Spawn pool points are drawn this far inside the arena edges.
    pub spawn_pool_margin: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 5.0,
            spawn_interval: 8.0,
            base_enemies: 3,
            enemies_per_wave_increase: 1,
            max_enemies: 25,
            boss_every: 5,
            spawn_point_attempts: 20,
            min_spawn_distance: 200.0,
            spawn_probe_size: 50.0,
            spawn_spacing: 60.0,
            spawn_jitter: 30.0,
            edge_spawn_margin: 50.0,
            spawn_pool_margin: 100.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombatConfig {
    pub melee_range: f32,
    pub melee_cooldown: f32,
    /// Shooters hold position in `[range - band, range]`.
    pub shooter_band: f32,
    pub enemy_bullet_radius: f32,
    pub enemy_bullet_lifetime: f32,
    pub player_bullet_radius: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            melee_range: 40.0,
            melee_cooldown: 1.0,
            shooter_band: 100.0,
            enemy_bullet_radius: 4.0,
            enemy_bullet_lifetime: 2.0,
            player_bullet_radius: 5.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub sprite_width: f32,
    /// Scale applied to each axis when moving diagonally.
    pub diagonal_factor: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sprite_width: 32.0,
            diagonal_factor: 0.7071,
        }
    }
}
