//! All game entity types and the per-archetype lookup table.  Pure data; the
//! behaviour that mutates these lives in `progression`, `ai` and `combat`.

use glam::Vec2;

use crate::config::SimConfig;
use crate::stats::StatTable;
use crate::waves::WaveDirector;

// ── Archetypes ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    Basic,
    Tank,
    Shooter,
    Fast,
    Boss,
}

/// Fixed ranged-attack profile for archetypes that can shoot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangedAttack {
    pub range: f32,
    pub cooldown: f32,
    pub damage: i32,
    pub bullet_speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArchetypeStats {
    pub health: i32,
    pub speed: f32,
    pub contact_damage: i32,
    pub xp_reward: u32,
    pub scale: f32,
    pub push_force: f32,
    /// Percent of incoming damage that is actually taken.
    pub damage_intake_pct: i32,
    pub ranged: Option<RangedAttack>,
    pub light_color: (u8, u8, u8),
    pub light_radius: f32,
    pub anim_frames: usize,
    pub anim_fps: f32,
}

/// Unscaled sprite edge in world units.
pub const BASE_SPRITE_SIZE: f32 = 16.0;

const BASIC: ArchetypeStats = ArchetypeStats {
    health: 30,
    speed: 120.0,
    contact_damage: 10,
    xp_reward: 10,
    scale: 3.0,
    push_force: 50.0,
    damage_intake_pct: 100,
    ranged: None,
    light_color: (255, 50, 50),
    light_radius: 80.0,
    anim_frames: 2,
    anim_fps: 2.0,
};

const TANK: ArchetypeStats = ArchetypeStats {
    health: 100,
    speed: 60.0,
    contact_damage: 20,
    xp_reward: 25,
    scale: 4.0,
    push_force: 50.0,
    damage_intake_pct: 100,
    ranged: None,
    light_color: (200, 0, 0),
    light_radius: 80.0,
    anim_frames: 2,
    anim_fps: 2.0,
};

const SHOOTER: ArchetypeStats = ArchetypeStats {
    health: 40,
    speed: 100.0,
    contact_damage: 8,
    xp_reward: 15,
    scale: 2.5,
    push_force: 50.0,
    damage_intake_pct: 100,
    ranged: Some(RangedAttack {
        range: 300.0,
        cooldown: 2.0,
        damage: 8,
        bullet_speed: 300.0,
    }),
    light_color: (0, 200, 0),
    light_radius: 80.0,
    anim_frames: 2,
    anim_fps: 2.0,
};

const FAST: ArchetypeStats = ArchetypeStats {
    health: 20,
    speed: 250.0,
    contact_damage: 5,
    xp_reward: 8,
    scale: 3.0,
    push_force: 50.0,
    damage_intake_pct: 100,
    ranged: None,
    light_color: (255, 165, 0),
    light_radius: 80.0,
    anim_frames: 1,
    anim_fps: 1.0,
};

const BOSS: ArchetypeStats = ArchetypeStats {
    health: 500,
    speed: 80.0,
    contact_damage: 30,
    xp_reward: 100,
    scale: 6.0,
    push_force: 50.0,
    damage_intake_pct: 50,
    ranged: Some(RangedAttack {
        range: 400.0,
        cooldown: 1.5,
        damage: 15,
        bullet_speed: 350.0,
    }),
    light_color: (150, 0, 150),
    light_radius: 120.0,
    anim_frames: 1,
    anim_fps: 1.0,
};

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Basic,
        Archetype::Tank,
        Archetype::Shooter,
        Archetype::Fast,
        Archetype::Boss,
    ];

    pub fn stats(self) -> &'static ArchetypeStats {
        match self {
            Archetype::Basic => &BASIC,
            Archetype::Tank => &TANK,
            Archetype::Shooter => &SHOOTER,
            Archetype::Fast => &FAST,
            Archetype::Boss => &BOSS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Basic => "Basic",
            Archetype::Tank => "Tank",
            Archetype::Shooter => "Shooter",
            Archetype::Fast => "Fast",
            Archetype::Boss => "Boss",
        }
    }

    pub fn sprite_width(self) -> f32 {
        BASE_SPRITE_SIZE * self.stats().scale
    }

    pub fn radius(self) -> f32 {
        self.sprite_width() / 2.0
    }

    fn index(self) -> usize {
        match self {
            Archetype::Basic => 0,
            Archetype::Tank => 1,
            Archetype::Shooter => 2,
            Archetype::Fast => 3,
            Archetype::Boss => 4,
        }
    }
}

/// Live enemy count per archetype.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchetypeCounts([u32; 5]);

impl ArchetypeCounts {
    pub fn get(&self, archetype: Archetype) -> u32 {
        self.0[archetype.index()]
    }

    pub fn increment(&mut self, archetype: Archetype) {
        self.0[archetype.index()] += 1;
    }

    pub fn decrement(&mut self, archetype: Archetype) {
        let slot = &mut self.0[archetype.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

// ── Facing ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit vector in world space (y grows upward).
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::Y,
            Facing::Down => Vec2::NEG_Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Max health added by every level-up.
pub const LEVEL_UP_MAX_HEALTH: i32 = 10;
/// Health restored by every level-up.
pub const LEVEL_UP_HEAL: i32 = 20;

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Live movement speed in units per second.
    pub speed: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub skill_points: u32,
    pub stats: StatTable,
    pub facing: Facing,
    pub aim: Vec2,
    /// Seconds until the weapon can fire again.
    pub shot_cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let stats = StatTable::default();
        let facing = Facing::default();
        Self {
            pos,
            health: 100,
            max_health: 100,
            speed: stats.value(crate::stats::StatKind::Speed),
            level: 1,
            xp: 0,
            xp_to_next_level: crate::progression::xp_threshold(1),
            skill_points: 0,
            stats,
            facing,
            aim: facing.unit(),
            shot_cooldown: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract damage, never going below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    /// Stable handle, unique for the lifetime of a game.
    pub id: u64,
    pub archetype: Archetype,
    pub pos: Vec2,
    pub health: i32,
    pub facing: Facing,
    pub anim_frame: usize,
    /// Seconds since spawn; drives animation.
    pub age: f32,
    pub since_melee: f32,
    pub since_shot: f32,
}

impl Enemy {
    pub fn new(id: u64, archetype: Archetype, pos: Vec2) -> Self {
        Self {
            id,
            archetype,
            pos,
            health: archetype.stats().health,
            facing: Facing::default(),
            anim_frame: 0,
            age: 0.0,
            since_melee: 0.0,
            since_shot: 0.0,
        }
    }

    pub fn stats(&self) -> &'static ArchetypeStats {
        self.archetype.stats()
    }

    pub fn radius(&self) -> f32 {
        self.archetype.radius()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply raw damage through the archetype's intake rule; returns the
    /// amount actually subtracted.
    pub fn take_damage(&mut self, raw: i32) -> i32 {
        let applied = raw * self.stats().damage_intake_pct / 100;
        self.health -= applied;
        applied
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    PlayerBullet,
    EnemyBullet,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    /// Unit direction.
    pub dir: Vec2,
    pub speed: f32,
    /// Seconds left; the projectile is removed at <= 0.
    pub lifetime: f32,
    pub radius: f32,
    pub damage: i32,
}

impl Projectile {
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Pre-game countdown; the player may move, no enemies yet.
    Countdown,
    Playing,
    GameOver,
}

/// The entire simulation state.  Cloneable so the per-tick functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub waves: WaveDirector,
    pub status: GameStatus,
    /// Seconds left on the start countdown.
    pub countdown: f32,
    /// Total simulated seconds.
    pub elapsed: f32,
    pub frame: u64,
    pub config: SimConfig,
}
