//! Upgradeable player attributes and the skill-point price list.
//!
//! Every stat is a base value plus an integer bonus tier (0..=20).  A tier is
//! one percent on top of the base, so the live value of a stat is
//! `floor(base * (1 + tier * 0.01))`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Highest bonus tier a stat can reach.
pub const MAX_BONUS_TIER: u8 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatKind {
    Health,
    Damage,
    Speed,
    AttackRadius,
    ReloadSpeed,
    BulletSpeed,
    BulletLifetime,
}

impl StatKind {
    /// Display / upgrade-panel order.
    pub const ALL: [StatKind; 7] = [
        StatKind::Health,
        StatKind::Damage,
        StatKind::Speed,
        StatKind::AttackRadius,
        StatKind::ReloadSpeed,
        StatKind::BulletSpeed,
        StatKind::BulletLifetime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Health => "health",
            StatKind::Damage => "damage",
            StatKind::Speed => "speed",
            StatKind::AttackRadius => "attack_radius",
            StatKind::ReloadSpeed => "reload_speed",
            StatKind::BulletSpeed => "bullet_speed",
            StatKind::BulletLifetime => "bullet_lifetime",
        }
    }

    fn index(self) -> usize {
        match self {
            StatKind::Health => 0,
            StatKind::Damage => 1,
            StatKind::Speed => 2,
            StatKind::AttackRadius => 3,
            StatKind::ReloadSpeed => 4,
            StatKind::BulletSpeed => 5,
            StatKind::BulletLifetime => 6,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UpgradeError::UnknownStat(s.to_string()))
    }
}

/// Why a stat upgrade was declined.  A declined upgrade never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("unknown stat '{0}'")]
    UnknownStat(String),
    #[error("need {needed} skill points, have {available}")]
    InsufficientPoints { needed: u32, available: u32 },
    #[error("{0} is already at the maximum bonus tier")]
    MaxedOut(StatKind),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stat {
    pub base: f32,
    /// Bonus tier, 0..=MAX_BONUS_TIER.
    pub bonus: u8,
    /// Skill points per tier.
    pub cost: u32,
}

impl Stat {
    fn new(base: f32, cost: u32) -> Self {
        Self { base, bonus: 0, cost }
    }

    pub fn multiplier(&self) -> f32 {
        (100.0 + f32::from(self.bonus)) / 100.0
    }

    // Computed as base * (100 + tier) / 100 in f64 so integral bases floor
    // exactly (300 at tier 3 is 309, not 308.99).
    fn scaled_f64(&self) -> f64 {
        f64::from(self.base) * (100.0 + f64::from(self.bonus)) / 100.0
    }

    /// Unfloored `base * multiplier`, for fractional stats like lifetimes.
    pub fn scaled(&self) -> f32 {
        self.scaled_f64() as f32
    }

    pub fn value(&self) -> i32 {
        self.scaled_f64().floor() as i32
    }

    pub fn is_maxed(&self) -> bool {
        self.bonus >= MAX_BONUS_TIER
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatTable {
    stats: [Stat; 7],
}

impl Default for StatTable {
    fn default() -> Self {
        Self {
            stats: [
                Stat::new(100.0, 1), // health
                Stat::new(10.0, 1),  // damage
                Stat::new(300.0, 1), // speed
                Stat::new(30.0, 2),  // attack_radius
                Stat::new(0.2, 2),   // reload_speed
                Stat::new(500.0, 1), // bullet_speed
                Stat::new(1.5, 2),   // bullet_lifetime
            ],
        }
    }
}

impl StatTable {
    pub fn get(&self, kind: StatKind) -> &Stat {
        &self.stats[kind.index()]
    }

    pub(crate) fn get_mut(&mut self, kind: StatKind) -> &mut Stat {
        &mut self.stats[kind.index()]
    }

    /// `floor(base * (1 + bonus * 0.01))`
    pub fn value(&self, kind: StatKind) -> i32 {
        self.get(kind).value()
    }

    /// Same as [`StatTable::value`] but looked up by name; unknown names read as 0.
    pub fn value_by_name(&self, name: &str) -> i32 {
        name.parse::<StatKind>().map(|k| self.value(k)).unwrap_or(0)
    }

    pub fn multiplier(&self, kind: StatKind) -> f32 {
        self.get(kind).multiplier()
    }

    pub fn bonus(&self, kind: StatKind) -> u8 {
        self.get(kind).bonus
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &Stat)> {
        StatKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs_match_price_list() {
        let t = StatTable::default();
        let costs: Vec<u32> = t.iter().map(|(_, s)| s.cost).collect();
        assert_eq!(costs, vec![1, 1, 1, 2, 2, 1, 2]);
    }

    #[test]
    fn value_floors_scaled_base() {
        let mut t = StatTable::default();
        t.get_mut(StatKind::Speed).bonus = 3;
        // 300 * 1.03 = 309
        assert_eq!(t.value(StatKind::Speed), 309);
        t.get_mut(StatKind::Damage).bonus = 5;
        // 10 * 1.05 = 10.5
        assert_eq!(t.value(StatKind::Damage), 10);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in StatKind::ALL {
            assert_eq!(kind.name().parse::<StatKind>(), Ok(kind));
        }
        assert_eq!(
            "mana".parse::<StatKind>(),
            Err(UpgradeError::UnknownStat("mana".to_string()))
        );
    }

    #[test]
    fn unknown_name_reads_as_zero() {
        let t = StatTable::default();
        assert_eq!(t.value_by_name("luck"), 0);
        assert_eq!(t.value_by_name("bullet_speed"), 500);
    }
}
