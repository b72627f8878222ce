//! Level geometry as seen by the simulation: arena bounds plus a set of
//! solid obstacles.  The core only asks overlap questions; where the
//! obstacles come from is up to the host.

use glam::Vec2;
use thiserror::Error;

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Square box of edge `size` centred on `center`.
    pub fn square(center: Vec2, size: f32) -> Self {
        Self::from_center(center, Vec2::splat(size))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Collision queries the simulation needs from the level.
pub trait LevelGeometry {
    /// Arena size (width, height); the arena spans `[0, size]` on each axis.
    fn size(&self) -> Vec2;

    /// Every solid obstacle.
    fn obstacles(&self) -> &[Aabb];

    /// Obstacles overlapping `bounds`.
    fn overlapping<'a>(&'a self, bounds: &'a Aabb) -> Box<dyn Iterator<Item = &'a Aabb> + 'a> {
        Box::new(self.obstacles().iter().filter(move |o| o.overlaps(bounds)))
    }

    fn overlaps(&self, bounds: &Aabb) -> bool {
        self.obstacles().iter().any(|o| o.overlaps(bounds))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level layout is empty")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("tile size must be positive")]
    BadTileSize,
}

/// A rectangular arena built from square wall tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockLevel {
    size: Vec2,
    walls: Vec<Aabb>,
    player_start: Vec2,
}

impl BlockLevel {
    /// An arena with no obstacles; the player starts in the middle.
    pub fn open(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            walls: Vec::new(),
            player_start: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn with_wall(mut self, wall: Aabb) -> Self {
        self.walls.push(wall);
        self
    }

    /// Build from rows of characters, top row first: `#` is a wall tile,
    /// `P` marks the player start, anything else is floor.
    pub fn from_rows(rows: &[&str], tile: f32) -> Result<Self, LevelError> {
        if !(tile > 0.0) {
            return Err(LevelError::BadTileSize);
        }
        let expected = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if expected == 0 {
            return Err(LevelError::Empty);
        }

        let height = rows.len() as f32 * tile;
        let mut level = Self::open(expected as f32 * tile, height);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(LevelError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                // Rows run top-down; world y grows upward.
                let min = Vec2::new(col as f32 * tile, height - (row as f32 + 1.0) * tile);
                match ch {
                    '#' => level.walls.push(Aabb::new(min, min + Vec2::splat(tile))),
                    'P' => level.player_start = min + Vec2::splat(tile / 2.0),
                    _ => {}
                }
            }
        }
        Ok(level)
    }

    pub fn player_start(&self) -> Vec2 {
        self.player_start
    }
}

impl LevelGeometry for BlockLevel {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn obstacles(&self) -> &[Aabb] {
        &self.walls
    }
}
