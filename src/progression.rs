//! Experience, level-ups and spending skill points on stat tiers.

use log::{debug, info};

use crate::entities::{Player, LEVEL_UP_HEAL, LEVEL_UP_MAX_HEALTH};
use crate::stats::{StatKind, UpgradeError};

/// XP needed to leave level 1.
pub const BASE_XP_THRESHOLD: u32 = 100;
/// Growth factor of the XP threshold per level.
pub const XP_GROWTH: f64 = 1.5;
pub const SKILL_POINTS_PER_LEVEL: u32 = 1;

/// XP required to advance from `level` to `level + 1`:
/// `floor(100 * 1.5^(level - 1))`.
pub fn xp_threshold(level: u32) -> u32 {
    let exp = level.saturating_sub(1) as i32;
    (f64::from(BASE_XP_THRESHOLD) * XP_GROWTH.powi(exp)).floor() as u32
}

impl Player {
    /// Award XP and cascade as many level-ups as it pays for.  Returns the
    /// number of levels gained.
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        debug!("+{} xp ({}/{})", amount, self.xp, self.xp_to_next_level);

        let mut gained = 0;
        while self.xp >= self.xp_to_next_level {
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.xp -= self.xp_to_next_level;
        self.level += 1;
        self.skill_points += SKILL_POINTS_PER_LEVEL;
        self.xp_to_next_level = xp_threshold(self.level);

        self.max_health += LEVEL_UP_MAX_HEALTH;
        self.health = (self.health + LEVEL_UP_HEAL).min(self.max_health);

        info!(
            "level {} reached: {} skill points, max health {}",
            self.level, self.skill_points, self.max_health
        );
    }

    /// Spend skill points on one bonus tier of the named stat.  Returns the
    /// new tier, or why the upgrade was declined (nothing changes then).
    pub fn upgrade_stat(&mut self, name: &str) -> Result<u8, UpgradeError> {
        let kind: StatKind = name.parse()?;
        self.upgrade(kind)
    }

    pub fn upgrade(&mut self, kind: StatKind) -> Result<u8, UpgradeError> {
        let stat = self.stats.get(kind);
        if stat.is_maxed() {
            return Err(UpgradeError::MaxedOut(kind));
        }
        if self.skill_points < stat.cost {
            return Err(UpgradeError::InsufficientPoints {
                needed: stat.cost,
                available: self.skill_points,
            });
        }

        self.skill_points -= stat.cost;
        let stat = self.stats.get_mut(kind);
        stat.bonus += 1;
        let tier = stat.bonus;
        self.apply_stat_bonus(kind);

        info!("{} upgraded to +{}%", kind, tier);
        Ok(tier)
    }

    /// Re-derive the live attribute cached from a stat.  Stats without a
    /// cached attribute are read on demand and need nothing here.
    fn apply_stat_bonus(&mut self, kind: StatKind) {
        match kind {
            StatKind::Health => {
                let old_max = self.max_health;
                self.max_health = self.stats.value(StatKind::Health);
                // Keep the same health fraction, rounded down.
                self.health = if old_max > 0 {
                    (i64::from(self.health) * i64::from(self.max_health) / i64::from(old_max))
                        as i32
                } else {
                    self.max_health
                };
            }
            StatKind::Speed => {
                self.speed = self.stats.value(StatKind::Speed);
            }
            _ => {}
        }
    }

    /// `floor(base * (1 + bonus * 0.01))` of the named stat; 0 when unknown.
    pub fn stat_value(&self, name: &str) -> i32 {
        self.stats.value_by_name(name)
    }
}
