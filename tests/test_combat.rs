use glam::Vec2;

use wave_survival::ai::{decide, steering, Intent, Perception, Steering};
use wave_survival::combat::{
    advance_projectiles, confine_enemies, resolve_hits, separate_enemies, update_enemies,
    CombatReport,
};
use wave_survival::config::{ArenaConfig, CombatConfig, WaveConfig};
use wave_survival::entities::{Archetype, Enemy, Facing, Player, Projectile, ProjectileKind};
use wave_survival::geometry::{Aabb, BlockLevel};
use wave_survival::waves::WaveDirector;

const PLAYER_POS: Vec2 = Vec2::new(500.0, 250.0);
const PLAYER_WIDTH: f32 = 32.0;

fn open_level() -> BlockLevel {
    BlockLevel::open(1000.0, 500.0)
}

fn seen(dt: f32) -> Perception {
    Perception {
        player_pos: PLAYER_POS,
        player_alive: true,
        dt,
    }
}

fn bullet(kind: ProjectileKind, pos: Vec2, damage: i32) -> Projectile {
    Projectile {
        kind,
        pos,
        dir: Vec2::X,
        speed: 500.0,
        lifetime: 1.0,
        radius: 5.0,
        damage,
    }
}

// ── AI: steering ──────────────────────────────────────────────────────────────

#[test]
fn chasers_always_approach() {
    for archetype in [Archetype::Basic, Archetype::Tank, Archetype::Fast, Archetype::Boss] {
        assert_eq!(steering(archetype, 10.0, 100.0), Steering::Approach);
        assert_eq!(steering(archetype, 900.0, 100.0), Steering::Approach);
    }
}

#[test]
fn shooter_keeps_its_band() {
    assert_eq!(steering(Archetype::Shooter, 350.0, 100.0), Steering::Approach);
    assert_eq!(steering(Archetype::Shooter, 300.0, 100.0), Steering::Hold);
    assert_eq!(steering(Archetype::Shooter, 250.0, 100.0), Steering::Hold);
    assert_eq!(steering(Archetype::Shooter, 200.0, 100.0), Steering::Hold);
    assert_eq!(steering(Archetype::Shooter, 150.0, 100.0), Steering::Retreat);
}

#[test]
fn basic_moves_straight_at_player() {
    let e = Enemy::new(0, Archetype::Basic, Vec2::new(200.0, 250.0));
    let d = decide(&e, &seen(0.1), &CombatConfig::default());
    assert_eq!(d.velocity, Vec2::new(120.0, 0.0));
    assert!(d.intents.is_empty());
}

#[test]
fn shooter_retreats_when_too_close() {
    let e = Enemy::new(0, Archetype::Shooter, Vec2::new(400.0, 250.0));
    let d = decide(&e, &seen(0.1), &CombatConfig::default());
    assert_eq!(d.velocity, Vec2::new(-100.0, 0.0));
}

#[test]
fn shooter_holds_and_fires_in_band() {
    let mut e = Enemy::new(0, Archetype::Shooter, Vec2::new(250.0, 250.0));
    e.since_shot = 2.0;
    let d = decide(&e, &seen(0.1), &CombatConfig::default());
    assert_eq!(d.velocity, Vec2::ZERO);
    assert_eq!(
        d.intents,
        vec![Intent::Fire {
            origin: Vec2::new(250.0, 250.0),
            direction: Vec2::X,
            damage: 8,
            speed: 300.0,
        }]
    );
}

#[test]
fn shooter_waits_for_cooldown() {
    let mut e = Enemy::new(0, Archetype::Shooter, Vec2::new(250.0, 250.0));
    e.since_shot = 1.9;
    let d = decide(&e, &seen(0.1), &CombatConfig::default());
    assert!(d.intents.is_empty());
}

#[test]
fn boss_chases_and_fires_from_range() {
    let mut e = Enemy::new(0, Archetype::Boss, Vec2::new(500.0, 600.0));
    e.since_shot = 1.5;
    let d = decide(&e, &seen(0.1), &CombatConfig::default());
    assert_eq!(d.velocity, Vec2::new(0.0, -80.0));
    match d.intents.as_slice() {
        [Intent::Fire { direction, damage, speed, .. }] => {
            assert_eq!(*direction, Vec2::NEG_Y);
            assert_eq!(*damage, 15);
            assert_eq!(*speed, 350.0);
        }
        other => panic!("expected one shot, got {:?}", other),
    }
}

#[test]
fn point_blank_shots_still_have_unit_direction() {
    let cfg = CombatConfig::default();
    for offset in [Vec2::new(0.5, 0.0), Vec2::ZERO] {
        let mut e = Enemy::new(0, Archetype::Boss, PLAYER_POS + offset);
        e.since_shot = 1.5;
        let d = decide(&e, &seen(0.0), &cfg);
        let direction = d
            .intents
            .iter()
            .find_map(|i| match i {
                Intent::Fire { direction, .. } => Some(*direction),
                Intent::Melee { .. } => None,
            })
            .unwrap();
        assert!((direction.length() - 1.0).abs() < 1e-5, "{}", direction);
    }
}

#[test]
fn melee_needs_range_and_cooldown() {
    let cfg = CombatConfig::default();
    let mut e = Enemy::new(0, Archetype::Tank, Vec2::new(530.0, 250.0));
    e.since_melee = 0.5;
    assert!(decide(&e, &seen(0.1), &cfg).intents.is_empty());

    e.since_melee = 1.0;
    assert_eq!(
        decide(&e, &seen(0.1), &cfg).intents,
        vec![Intent::Melee { damage: 20 }]
    );

    let far = Enemy::new(1, Archetype::Tank, Vec2::new(600.0, 250.0));
    assert!(decide(&far, &seen(0.1), &cfg).intents.is_empty());
}

#[test]
fn dead_player_is_ignored() {
    let mut e = Enemy::new(0, Archetype::Basic, Vec2::new(510.0, 250.0));
    e.since_melee = 5.0;
    let mut p = seen(0.1);
    p.player_alive = false;
    let d = decide(&e, &p, &CombatConfig::default());
    assert_eq!(d.velocity, Vec2::ZERO);
    assert!(d.intents.is_empty());
}

// ── update_enemies ────────────────────────────────────────────────────────────

#[test]
fn melee_hit_resets_cooldown() {
    let cfg = CombatConfig::default();
    let mut player = Player::new(PLAYER_POS);
    let mut enemies = vec![Enemy::new(0, Archetype::Basic, Vec2::new(530.0, 250.0))];
    enemies[0].since_melee = 1.0;
    let mut projectiles = Vec::new();
    let mut report = CombatReport::default();

    update_enemies(&mut enemies, &mut player, &mut projectiles, 0.01, &cfg, &mut report);
    assert_eq!(player.health, 90);
    assert_eq!(report.damage_to_player, 10);
    assert_eq!(enemies[0].since_melee, 0.0);

    update_enemies(&mut enemies, &mut player, &mut projectiles, 0.01, &cfg, &mut report);
    assert_eq!(player.health, 90);
}

#[test]
fn shooter_fire_becomes_enemy_bullet() {
    let cfg = CombatConfig::default();
    let mut player = Player::new(PLAYER_POS);
    let mut enemies = vec![Enemy::new(0, Archetype::Shooter, Vec2::new(250.0, 250.0))];
    enemies[0].since_shot = 1.95;
    let mut projectiles = Vec::new();
    let mut report = CombatReport::default();

    update_enemies(&mut enemies, &mut player, &mut projectiles, 0.1, &cfg, &mut report);
    assert_eq!(projectiles.len(), 1);
    let b = &projectiles[0];
    assert_eq!(b.kind, ProjectileKind::EnemyBullet);
    assert_eq!(b.damage, 8);
    assert_eq!(b.radius, 4.0);
    assert_eq!(b.lifetime, 2.0);
    assert_eq!(report.enemy_shots, 1);
    assert_eq!(enemies[0].since_shot, 0.0);
}

#[test]
fn moving_enemy_faces_its_heading() {
    let cfg = CombatConfig::default();
    let mut player = Player::new(PLAYER_POS);
    let mut enemies = vec![Enemy::new(0, Archetype::Fast, Vec2::new(100.0, 250.0))];
    let mut projectiles = Vec::new();
    let mut report = CombatReport::default();

    update_enemies(&mut enemies, &mut player, &mut projectiles, 0.1, &cfg, &mut report);
    assert_eq!(enemies[0].pos, Vec2::new(125.0, 250.0));
    assert_eq!(enemies[0].facing, Facing::Right);
}

// ── Separation and confinement ────────────────────────────────────────────────

#[test]
fn overlapping_enemies_move_apart() {
    let mut enemies = vec![
        Enemy::new(0, Archetype::Basic, Vec2::new(100.0, 100.0)),
        Enemy::new(1, Archetype::Tank, Vec2::new(110.0, 105.0)),
    ];
    let before = enemies[0].pos.distance(enemies[1].pos);
    separate_enemies(&mut enemies, 0.1);
    let after = enemies[0].pos.distance(enemies[1].pos);
    assert!(after > before, "{} should exceed {}", after, before);
}

#[test]
fn stacked_enemies_split() {
    let mut enemies = vec![
        Enemy::new(0, Archetype::Basic, Vec2::new(100.0, 100.0)),
        Enemy::new(1, Archetype::Basic, Vec2::new(100.0, 100.0)),
    ];
    separate_enemies(&mut enemies, 0.1);
    assert!(enemies[0].pos.distance(enemies[1].pos) > 0.0);
}

#[test]
fn distant_enemies_are_untouched() {
    let mut enemies = vec![
        Enemy::new(0, Archetype::Basic, Vec2::new(100.0, 100.0)),
        Enemy::new(1, Archetype::Basic, Vec2::new(300.0, 100.0)),
    ];
    separate_enemies(&mut enemies, 0.1);
    assert_eq!(enemies[0].pos, Vec2::new(100.0, 100.0));
    assert_eq!(enemies[1].pos, Vec2::new(300.0, 100.0));
}

#[test]
fn enemies_are_kept_off_the_edges() {
    let mut enemies = vec![Enemy::new(0, Archetype::Basic, Vec2::new(-100.0, 900.0))];
    confine_enemies(&mut enemies, &open_level(), &ArenaConfig::default());
    assert_eq!(enemies[0].pos, Vec2::new(50.0, 450.0));
}

#[test]
fn enemies_are_pushed_out_of_walls() {
    let wall = Aabb::new(Vec2::new(400.0, 200.0), Vec2::new(450.0, 250.0));
    let level = open_level().with_wall(wall);
    let mut enemies = vec![Enemy::new(0, Archetype::Basic, Vec2::new(400.0, 225.0))];
    confine_enemies(&mut enemies, &level, &ArenaConfig::default());
    assert_eq!(enemies[0].pos, Vec2::new(395.0, 225.0));
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectiles_fly_and_age() {
    let mut shots = vec![bullet(ProjectileKind::PlayerBullet, Vec2::new(100.0, 100.0), 10)];
    advance_projectiles(&mut shots, 0.5);
    assert_eq!(shots[0].pos, Vec2::new(350.0, 100.0));
    assert_eq!(shots[0].lifetime, 0.5);
    advance_projectiles(&mut shots, 0.5);
    assert!(shots[0].is_expired());
}

// ── resolve_hits ──────────────────────────────────────────────────────────────

struct Arena {
    player: Player,
    waves: WaveDirector,
    report: CombatReport,
}

impl Arena {
    fn new() -> Self {
        Self {
            player: Player::new(PLAYER_POS),
            waves: WaveDirector::new(WaveConfig::default()),
            report: CombatReport::default(),
        }
    }

    fn resolve(
        &mut self,
        level: &BlockLevel,
        enemies: Vec<Enemy>,
        shots: Vec<Projectile>,
    ) -> (Vec<Enemy>, Vec<Projectile>) {
        resolve_hits(
            enemies,
            shots,
            &mut self.player,
            &mut self.waves,
            level,
            PLAYER_WIDTH,
            &mut self.report,
        )
    }
}

#[test]
fn player_bullet_damages_enemy() {
    let mut arena = Arena::new();
    let enemies = vec![Enemy::new(0, Archetype::Tank, Vec2::new(200.0, 200.0))];
    let shots = vec![bullet(ProjectileKind::PlayerBullet, Vec2::new(190.0, 200.0), 10)];

    let (enemies, shots) = arena.resolve(&open_level(), enemies, shots);
    assert_eq!(enemies[0].health, 90);
    assert!(shots.is_empty());
    assert!(arena.report.kills.is_empty());
}

#[test]
fn kill_awards_xp_and_updates_counts() {
    let mut arena = Arena::new();
    arena.waves.live.increment(Archetype::Basic);
    let mut target = Enemy::new(0, Archetype::Basic, Vec2::new(200.0, 200.0));
    target.health = 10;
    let shots = vec![bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10)];

    let (enemies, _) = arena.resolve(&open_level(), vec![target], shots);
    assert!(enemies.is_empty());
    assert_eq!(arena.player.xp, 10);
    assert_eq!(arena.report.kills, vec![Archetype::Basic]);
    assert_eq!(arena.report.xp_awarded, 10);
    assert_eq!(arena.waves.live.get(Archetype::Basic), 0);
}

#[test]
fn boss_kill_can_cascade_levels() {
    let mut arena = Arena::new();
    arena.player.xp = 90;
    let mut boss = Enemy::new(0, Archetype::Boss, Vec2::new(200.0, 200.0));
    boss.health = 5;
    let shots = vec![bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10)];

    arena.resolve(&open_level(), vec![boss], shots);
    // 190 xp: level 2 at 100, 90 left of 150
    assert_eq!(arena.player.level, 2);
    assert_eq!(arena.player.xp, 90);
    assert_eq!(arena.report.levels_gained, 1);
}

#[test]
fn boss_takes_half_damage() {
    let mut boss = Enemy::new(0, Archetype::Boss, Vec2::ZERO);
    assert_eq!(boss.take_damage(10), 5);
    assert_eq!(boss.health, 495);
}

#[test]
fn one_bullet_hits_one_enemy() {
    let mut arena = Arena::new();
    let enemies = vec![
        Enemy::new(0, Archetype::Basic, Vec2::new(200.0, 200.0)),
        Enemy::new(1, Archetype::Basic, Vec2::new(200.0, 200.0)),
    ];
    let shots = vec![bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10)];

    let (enemies, shots) = arena.resolve(&open_level(), enemies, shots);
    assert_eq!(enemies[0].health, 20);
    assert_eq!(enemies[1].health, 30);
    assert!(shots.is_empty());
}

#[test]
fn two_bullets_can_finish_two_enemies() {
    let mut arena = Arena::new();
    let mut a = Enemy::new(0, Archetype::Fast, Vec2::new(200.0, 200.0));
    let mut b = Enemy::new(1, Archetype::Fast, Vec2::new(200.0, 200.0));
    a.health = 5;
    b.health = 5;
    let shots = vec![
        bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10),
        bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10),
    ];

    let (enemies, shots) = arena.resolve(&open_level(), vec![a, b], shots);
    assert!(enemies.is_empty());
    assert!(shots.is_empty());
    assert_eq!(arena.report.kills.len(), 2);
}

#[test]
fn walls_stop_player_bullets() {
    let mut arena = Arena::new();
    let wall = Aabb::new(Vec2::new(200.0, 200.0), Vec2::new(250.0, 250.0));
    let level = open_level().with_wall(wall);
    let enemies = vec![Enemy::new(0, Archetype::Basic, Vec2::new(225.0, 225.0))];
    let shots = vec![bullet(ProjectileKind::PlayerBullet, Vec2::new(225.0, 225.0), 10)];

    let (enemies, shots) = arena.resolve(&level, enemies, shots);
    assert!(shots.is_empty());
    assert_eq!(enemies[0].health, 30);
}

#[test]
fn expired_bullets_do_no_damage() {
    let mut arena = Arena::new();
    let enemies = vec![Enemy::new(0, Archetype::Basic, Vec2::new(200.0, 200.0))];
    let mut shot = bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10);
    shot.lifetime = 0.0;

    let (enemies, shots) = arena.resolve(&open_level(), enemies, vec![shot]);
    assert!(shots.is_empty());
    assert_eq!(enemies[0].health, 30);
}

#[test]
fn enemy_bullet_hits_player() {
    let mut arena = Arena::new();
    let shots = vec![
        bullet(ProjectileKind::EnemyBullet, PLAYER_POS + Vec2::new(15.0, 0.0), 8),
        bullet(ProjectileKind::EnemyBullet, PLAYER_POS + Vec2::new(100.0, 0.0), 8),
    ];

    let (_, shots) = arena.resolve(&open_level(), Vec::new(), shots);
    assert_eq!(arena.player.health, 92);
    assert_eq!(arena.report.damage_to_player, 8);
    assert_eq!(shots.len(), 1);
}

#[test]
fn enemy_bullets_ignore_enemies() {
    let mut arena = Arena::new();
    let enemies = vec![Enemy::new(0, Archetype::Basic, Vec2::new(200.0, 200.0))];
    let shots = vec![bullet(ProjectileKind::EnemyBullet, Vec2::new(200.0, 200.0), 8)];

    let (enemies, shots) = arena.resolve(&open_level(), enemies, shots);
    assert_eq!(enemies[0].health, 30);
    assert_eq!(shots.len(), 1);
}

#[test]
fn player_health_never_goes_negative() {
    let mut arena = Arena::new();
    arena.player.health = 5;
    let shots = vec![bullet(ProjectileKind::EnemyBullet, PLAYER_POS, 15)];
    arena.resolve(&open_level(), Vec::new(), shots);
    assert_eq!(arena.player.health, 0);
    assert!(!arena.player.is_alive());
}

#[test]
fn incoming_damage_lands_before_kill_rewards() {
    let shots_killing_first = || {
        vec![
            bullet(ProjectileKind::PlayerBullet, Vec2::new(200.0, 200.0), 10),
            bullet(ProjectileKind::EnemyBullet, PLAYER_POS, 8),
        ]
    };
    let mut healths = Vec::new();
    for shots in [shots_killing_first(), shots_killing_first().into_iter().rev().collect()] {
        let mut arena = Arena::new();
        arena.player.health = 5;
        arena.player.xp = 95;
        let mut target = Enemy::new(0, Archetype::Basic, Vec2::new(200.0, 200.0));
        target.health = 5;

        let (enemies, shots) = arena.resolve(&open_level(), vec![target], shots);
        assert!(enemies.is_empty());
        assert!(shots.is_empty());
        assert_eq!(arena.player.level, 2);
        healths.push(arena.player.health);
    }
    // 5 - 8 clamps to 0, then the level-up heals 20
    assert_eq!(healths, vec![20, 20]);
}
