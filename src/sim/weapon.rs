//! Weapons: per-level stat tables, evolution, and firing strategies
//!
//! Each weapon counts its own cooldown down and, when it reaches zero, fires
//! according to its [`FirePattern`] and restarts from the current cooldown
//! stat. Leveling swaps in the next row of the kind's table; evolution swaps
//! in a fixed profile once the weapon is maxed and its catalyst passive is
//! held.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::loadout::PassiveKind;
use super::projectile::{AreaEffect, Faction, Projectile};
use super::state::{EntityId, IdAllocator, World};
use crate::consts::WEAPON_MAX_LEVEL;
use crate::error::LoadoutError;
use crate::{angle_to_dir, direction_to};

/// Angle between neighbouring shots of a fan
const FAN_STEP: f32 = PI / 6.0;
/// Slow applied by evolved frost and holy effects
pub const EVOLVED_SLOW: (f32, f32) = (0.5, 2.0);

/// Weapon kinds the player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    MagicBolt,
    Shuriken,
    SacredGround,
    FireBall,
    IceArrow,
}

/// How a weapon turns a cooldown into damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePattern {
    /// Fan of piercing shots toward the aim point
    AimedFan,
    /// One homing shot at each of the nearest N enemies
    NearestHoming,
    /// Evenly spaced ring with a random rotation
    RadialBurst,
    /// Single player-centred damage field
    Field,
    /// Shots at the nearest N enemies inside range
    NearestInRange,
    /// Fixed directions, more with each level
    Volley,
}

/// Stats for one weapon level (or the evolved profile)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: f32,
    pub cooldown: f32,
    /// Projectiles, targets or directions per volley
    pub count: u32,
    /// Targeting or travel range; 0 when unused
    pub range: f32,
    /// Field radius; 0 when unused
    pub radius: f32,
    pub speed: f32,
    /// Field lifetime; `None` lasts the whole run
    pub duration: Option<f32>,
}

const fn shot(damage: f32, cooldown: f32, count: u32, range: f32, speed: f32) -> WeaponStats {
    WeaponStats {
        damage,
        cooldown,
        count,
        range,
        radius: 0.0,
        speed,
        duration: None,
    }
}

const fn field(damage: f32, cooldown: f32, radius: f32) -> WeaponStats {
    WeaponStats {
        damage,
        cooldown,
        count: 1,
        range: 0.0,
        radius,
        speed: 0.0,
        duration: None,
    }
}

const MAGIC_BOLT: [WeaponStats; 8] = [
    shot(10.0, 1.2, 1, 0.0, 300.0),
    shot(15.0, 1.2, 1, 0.0, 300.0),
    shot(15.0, 1.2, 2, 0.0, 300.0),
    shot(15.0, 1.0, 2, 0.0, 300.0),
    shot(25.0, 1.0, 2, 0.0, 300.0),
    shot(25.0, 1.0, 3, 0.0, 300.0),
    shot(25.0, 0.8, 3, 0.0, 300.0),
    shot(40.0, 0.8, 3, 0.0, 300.0),
];
const CHAIN_LIGHTNING: WeaponStats = shot(60.0, 0.7, 3, 0.0, 350.0);

const SHURIKEN: [WeaponStats; 8] = [
    shot(11.0, 1.5, 1, 0.0, 400.0),
    shot(15.0, 1.5, 2, 0.0, 400.0),
    shot(21.0, 1.5, 3, 0.0, 400.0),
    shot(29.0, 1.3, 4, 0.0, 400.0),
    shot(41.0, 1.3, 5, 0.0, 400.0),
    shot(57.0, 1.1, 6, 0.0, 400.0),
    shot(80.0, 1.1, 7, 0.0, 400.0),
    shot(112.0, 1.0, 8, 0.0, 400.0),
];
const INFINITE_BLADES: WeaponStats = shot(35.0, 0.1, 8, 0.0, 500.0);

const SACRED_GROUND: [WeaponStats; 8] = [
    field(3.0, 2.0, 80.0),
    field(3.0, 2.0, 100.0),
    field(4.0, 2.0, 100.0),
    field(4.0, 2.0, 120.0),
    field(5.0, 2.0, 120.0),
    field(5.0, 2.0, 150.0),
    field(7.0, 2.0, 150.0),
    field(10.0, 2.0, 180.0),
];
const HEAVENS_JUDGMENT: WeaponStats = field(35.0, 2.0, 300.0);

const FIRE_BALL: [WeaponStats; 8] = [
    shot(15.0, 1.5, 1, 300.0, 250.0),
    shot(22.0, 1.5, 1, 300.0, 250.0),
    shot(22.0, 1.2, 1, 300.0, 250.0),
    shot(30.0, 1.2, 1, 350.0, 250.0),
    shot(30.0, 1.0, 1, 350.0, 250.0),
    shot(40.0, 1.0, 1, 350.0, 250.0),
    shot(40.0, 1.0, 1, 400.0, 250.0),
    shot(50.0, 0.8, 1, 400.0, 250.0),
];
const DRAGON_FIRE: WeaponStats = shot(80.0, 0.6, 2, 450.0, 300.0);

const ICE_ARROW: [WeaponStats; 8] = [
    shot(12.0, 0.8, 1, 400.0, 400.0),
    shot(15.0, 0.8, 2, 400.0, 400.0),
    shot(18.0, 0.7, 3, 400.0, 400.0),
    shot(20.0, 0.7, 4, 450.0, 400.0),
    shot(22.0, 0.6, 8, 450.0, 400.0),
    shot(25.0, 0.6, 12, 450.0, 400.0),
    shot(28.0, 0.5, 12, 450.0, 400.0),
    shot(30.0, 0.5, 16, 500.0, 400.0),
];
const GLACIER_SPEAR: WeaponStats = shot(40.0, 0.4, 20, 600.0, 400.0);

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::MagicBolt,
        WeaponKind::Shuriken,
        WeaponKind::SacredGround,
        WeaponKind::FireBall,
        WeaponKind::IceArrow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::MagicBolt => "Magic Bolt",
            WeaponKind::Shuriken => "Shuriken",
            WeaponKind::SacredGround => "Sacred Ground",
            WeaponKind::FireBall => "Fire Ball",
            WeaponKind::IceArrow => "Ice Arrow",
        }
    }

    pub fn evolved_name(self) -> &'static str {
        match self {
            WeaponKind::MagicBolt => "Chain Lightning",
            WeaponKind::Shuriken => "Infinite Blades",
            WeaponKind::SacredGround => "Heaven's Judgment",
            WeaponKind::FireBall => "Dragon Fire",
            WeaponKind::IceArrow => "Glacier Spear",
        }
    }

    /// Lookup ignoring case, spaces, dashes and underscores
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "magicbolt" => Some(WeaponKind::MagicBolt),
            "shuriken" => Some(WeaponKind::Shuriken),
            "sacredground" => Some(WeaponKind::SacredGround),
            "fireball" => Some(WeaponKind::FireBall),
            "icearrow" => Some(WeaponKind::IceArrow),
            _ => None,
        }
    }

    /// Passive item that unlocks evolution
    pub fn catalyst(self) -> PassiveKind {
        match self {
            WeaponKind::MagicBolt | WeaponKind::FireBall => PassiveKind::AmplifyingCrystal,
            WeaponKind::Shuriken => PassiveKind::NinjaScroll,
            WeaponKind::SacredGround | WeaponKind::IceArrow => PassiveKind::RuneTablet,
        }
    }

    fn table(self) -> &'static [WeaponStats; 8] {
        match self {
            WeaponKind::MagicBolt => &MAGIC_BOLT,
            WeaponKind::Shuriken => &SHURIKEN,
            WeaponKind::SacredGround => &SACRED_GROUND,
            WeaponKind::FireBall => &FIRE_BALL,
            WeaponKind::IceArrow => &ICE_ARROW,
        }
    }

    /// Stats at `level`, clamped to the table
    pub fn level_stats(self, level: u32) -> WeaponStats {
        let table = self.table();
        let index = (level.max(1) as usize - 1).min(table.len() - 1);
        table[index]
    }

    pub fn evolved_stats(self) -> WeaponStats {
        match self {
            WeaponKind::MagicBolt => CHAIN_LIGHTNING,
            WeaponKind::Shuriken => INFINITE_BLADES,
            WeaponKind::SacredGround => HEAVENS_JUDGMENT,
            WeaponKind::FireBall => DRAGON_FIRE,
            WeaponKind::IceArrow => GLACIER_SPEAR,
        }
    }
}

/// A held weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: u32,
    pub evolved: bool,
    pub stats: WeaponStats,
    /// Fires when this reaches zero
    pub cooldown_timer: f32,
    /// The live field of a `Field` weapon
    pub field: Option<EntityId>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            level: 1,
            evolved: false,
            stats: kind.level_stats(1),
            cooldown_timer: 0.0,
            field: None,
        }
    }

    pub fn name(&self) -> &'static str {
        if self.evolved {
            self.kind.evolved_name()
        } else {
            self.kind.name()
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= WEAPON_MAX_LEVEL
    }

    /// Whether `level_up` would succeed
    pub fn can_level_up(&self) -> bool {
        !self.evolved && !self.is_max_level()
    }

    /// Move to the next table row. Fails without touching anything at the cap.
    pub fn level_up(&mut self) -> Result<u32, LoadoutError> {
        if !self.can_level_up() {
            return Err(LoadoutError::MaxLevel(self.kind));
        }
        self.level += 1;
        self.stats = self.kind.level_stats(self.level);
        Ok(self.level)
    }

    pub fn can_evolve(&self, passives: &[PassiveKind]) -> bool {
        !self.evolved && self.is_max_level() && passives.contains(&self.kind.catalyst())
    }

    /// One-way swap to the evolved profile. Returns false when nothing changed.
    pub fn evolve(&mut self, passives: &[PassiveKind]) -> bool {
        if !self.can_evolve(passives) {
            return false;
        }
        self.evolved = true;
        self.stats = self.kind.evolved_stats();
        log::info!("{} evolved into {}", self.kind.name(), self.name());
        true
    }

    /// Count the cooldown down; true when the weapon fires this tick
    pub fn advance(&mut self, dt: f32) -> bool {
        self.cooldown_timer -= dt.max(0.0);
        if self.cooldown_timer <= 0.0 {
            self.cooldown_timer = self.stats.cooldown;
            true
        } else {
            false
        }
    }

    pub fn pattern(&self) -> FirePattern {
        match (self.kind, self.evolved) {
            (WeaponKind::MagicBolt, _) => FirePattern::AimedFan,
            (WeaponKind::Shuriken, false) => FirePattern::NearestHoming,
            (WeaponKind::Shuriken, true) => FirePattern::RadialBurst,
            (WeaponKind::SacredGround, _) => FirePattern::Field,
            (WeaponKind::FireBall, _) => FirePattern::NearestInRange,
            (WeaponKind::IceArrow, _) => FirePattern::Volley,
        }
    }
}

/// Living enemies closest to `from`, nearest first. Ties keep list order.
pub fn nearest_enemies(
    enemies: &[Enemy],
    from: Vec2,
    count: usize,
    max_range: Option<f32>,
) -> Vec<&Enemy> {
    let mut candidates: Vec<(f32, &Enemy)> = enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| (e.pos.distance(from), e))
        .filter(|(distance, _)| max_range.is_none_or(|range| *distance <= range))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates.into_iter().take(count).map(|(_, e)| e).collect()
}

/// Angles of an `count`-shot fan centred on `base`
pub fn fan_angles(base: f32, count: u32) -> Vec<f32> {
    if count <= 1 {
        return vec![base];
    }
    let spread = FAN_STEP * (count - 1) as f32;
    (0..count)
        .map(|i| base - spread / 2.0 + FAN_STEP * i as f32)
        .collect()
}

/// Volley directions: the four axes first, then evenly spaced rings
pub fn volley_directions(count: u32) -> Vec<Vec2> {
    const AXES: [Vec2; 4] = [Vec2::X, Vec2::NEG_X, Vec2::NEG_Y, Vec2::Y];
    if count as usize <= AXES.len() {
        return AXES[..count as usize].to_vec();
    }
    (0..count)
        .map(|i| angle_to_dir(TAU * i as f32 / count as f32))
        .collect()
}

/// Tick every held weapon's cooldown and fire the ones that are ready
pub fn fire_weapons(world: &mut World, aim: Option<Vec2>, dt: f32) {
    let World {
        loadout,
        player,
        enemies,
        projectiles,
        area_effects,
        ids,
        rng,
        ..
    } = world;

    let aim_dir = aim
        .map(|point| direction_to(player.pos, point))
        .filter(|dir| *dir != Vec2::ZERO)
        .unwrap_or(player.facing);

    for weapon in &mut loadout.weapons {
        if !weapon.advance(dt) {
            continue;
        }
        let stats = weapon.stats;
        let damage = stats.damage * player.damage_mult;
        let origin = player.pos;
        let before = projectiles.len();

        match weapon.pattern() {
            FirePattern::AimedFan => {
                let base = aim_dir.y.atan2(aim_dir.x);
                for angle in fan_angles(base, stats.count) {
                    let mut p = Projectile::new(
                        ids.next(),
                        Faction::Player,
                        origin,
                        angle_to_dir(angle),
                        stats.speed,
                        damage,
                    );
                    p.penetrating = true;
                    p.chain = weapon.evolved;
                    projectiles.push(p);
                }
            }
            FirePattern::NearestHoming => {
                for target in nearest_enemies(enemies, origin, stats.count as usize, None) {
                    let mut p = Projectile::new(
                        ids.next(),
                        Faction::Player,
                        origin,
                        direction_to(origin, target.pos),
                        stats.speed,
                        damage,
                    );
                    p.homing_target = Some(target.id);
                    projectiles.push(p);
                }
            }
            FirePattern::RadialBurst => {
                let offset = rng.random_range(0.0..TAU);
                for i in 0..stats.count {
                    let angle = offset + TAU * i as f32 / stats.count as f32;
                    projectiles.push(Projectile::new(
                        ids.next(),
                        Faction::Player,
                        origin,
                        angle_to_dir(angle),
                        stats.speed,
                        damage,
                    ));
                }
            }
            FirePattern::Field => {
                sync_field(weapon, player.pos, player.damage_mult, area_effects, ids);
            }
            FirePattern::NearestInRange => {
                let targets =
                    nearest_enemies(enemies, origin, stats.count as usize, Some(stats.range));
                for target in targets {
                    projectiles.push(Projectile::new(
                        ids.next(),
                        Faction::Player,
                        origin,
                        direction_to(origin, target.pos),
                        stats.speed,
                        damage,
                    ));
                }
            }
            FirePattern::Volley => {
                for dir in volley_directions(stats.count) {
                    let mut p =
                        Projectile::new(ids.next(), Faction::Player, origin, dir, stats.speed, damage);
                    p.penetrating = true;
                    p.slow_on_hit = weapon.evolved;
                    p.lifetime = stats.range / stats.speed;
                    projectiles.push(p);
                }
            }
        }

        let fired = projectiles.len() - before;
        if fired > 0 {
            log::debug!("{} fired {} projectile(s)", weapon.name(), fired);
        }
    }
}

/// Reposition and restat a weapon's field, creating it only if it is gone
fn sync_field(
    weapon: &mut Weapon,
    player_pos: Vec2,
    damage_mult: f32,
    area_effects: &mut Vec<AreaEffect>,
    ids: &mut IdAllocator,
) {
    let stats = weapon.stats;
    let slow = weapon.evolved.then_some(EVOLVED_SLOW);
    let existing = weapon
        .field
        .and_then(|id| area_effects.iter_mut().find(|a| a.id == id && a.alive));

    match existing {
        Some(area) => {
            area.center = player_pos;
            area.radius = stats.radius;
            area.damage = stats.damage * damage_mult;
            area.evolved = weapon.evolved;
            area.slow = slow;
        }
        None => {
            let id = ids.next();
            let mut area = AreaEffect::new(id, player_pos, stats.radius, stats.damage * damage_mult);
            area.follows_player = true;
            area.remaining = stats.duration;
            area.evolved = weapon.evolved;
            area.slow = slow;
            area_effects.push(area);
            weapon.field = Some(id);
        }
    }
}

/// Push current stats into every field after a level, evolution or bonus change
pub fn refresh_fields(world: &mut World) {
    let World {
        loadout,
        player,
        area_effects,
        ids,
        ..
    } = world;
    for weapon in &mut loadout.weapons {
        if weapon.pattern() == FirePattern::Field {
            sync_field(weapon, player.pos, player.damage_mult, area_effects, ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::state::RunMode;
    use proptest::prelude::*;

    fn maxed(kind: WeaponKind) -> Weapon {
        let mut weapon = Weapon::new(kind);
        while weapon.level_up().is_ok() {}
        weapon
    }

    fn add_enemy(world: &mut World, kind: EnemyKind, pos: Vec2) -> EntityId {
        let id = world.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, &mut world.rng);
        world.enemies.push(enemy);
        id
    }

    #[test]
    fn test_level_up_walks_table() {
        let mut bolt = Weapon::new(WeaponKind::MagicBolt);
        assert_eq!(bolt.stats.damage, 10.0);
        assert_eq!(bolt.level_up(), Ok(2));
        assert_eq!(bolt.stats.damage, 15.0);
        assert_eq!(bolt.stats.count, 1);
        assert_eq!(bolt.level_up(), Ok(3));
        assert_eq!(bolt.stats.count, 2);
    }

    #[test]
    fn test_level_up_fails_at_max() {
        let mut bolt = maxed(WeaponKind::MagicBolt);
        assert_eq!(bolt.level, WEAPON_MAX_LEVEL);
        let before = bolt.stats;
        assert_eq!(bolt.level_up(), Err(LoadoutError::MaxLevel(WeaponKind::MagicBolt)));
        assert_eq!(bolt.stats, before);
        assert_eq!(bolt.level, WEAPON_MAX_LEVEL);
    }

    #[test]
    fn test_evolution_gates() {
        let crystal = [PassiveKind::AmplifyingCrystal];

        // Below max level
        let mut bolt = Weapon::new(WeaponKind::MagicBolt);
        assert!(!bolt.evolve(&crystal));
        assert!(!bolt.evolved);

        // Wrong passive
        let mut bolt = maxed(WeaponKind::MagicBolt);
        assert!(!bolt.evolve(&[PassiveKind::NinjaScroll]));
        assert!(!bolt.evolved);

        assert!(bolt.evolve(&crystal));
        assert_eq!(bolt.name(), "Chain Lightning");
        assert_eq!(bolt.stats, CHAIN_LIGHTNING);

        // Second call is a no-op
        let snapshot = bolt.clone();
        assert!(!bolt.evolve(&crystal));
        assert_eq!(bolt.stats, snapshot.stats);
        assert!(bolt.level_up().is_err());
    }

    #[test]
    fn test_evolved_shuriken_switches_pattern() {
        let mut shuriken = maxed(WeaponKind::Shuriken);
        assert_eq!(shuriken.pattern(), FirePattern::NearestHoming);
        assert!(shuriken.evolve(&[PassiveKind::NinjaScroll]));
        assert_eq!(shuriken.pattern(), FirePattern::RadialBurst);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(WeaponKind::from_name("Magic Bolt"), Some(WeaponKind::MagicBolt));
        assert_eq!(WeaponKind::from_name("ice_arrow"), Some(WeaponKind::IceArrow));
        assert_eq!(WeaponKind::from_name("FIREBALL"), Some(WeaponKind::FireBall));
        assert_eq!(WeaponKind::from_name("Laser"), None);
    }

    #[test]
    fn test_fan_is_symmetric() {
        let angles = fan_angles(0.0, 3);
        assert_eq!(angles.len(), 3);
        assert!((angles[0] + angles[2]).abs() < 1e-6);
        assert!(angles[1].abs() < 1e-6);
        assert_eq!(fan_angles(1.0, 1), vec![1.0]);
    }

    #[test]
    fn test_volley_directions() {
        assert_eq!(volley_directions(1), vec![Vec2::X]);
        assert_eq!(volley_directions(2), vec![Vec2::X, Vec2::NEG_X]);
        assert_eq!(volley_directions(3).len(), 3);
        assert_eq!(volley_directions(12).len(), 12);
        assert_eq!(volley_directions(20).len(), 20);
    }

    #[test]
    fn test_nearest_first_found_on_tie() {
        let mut world = World::new(5, RunMode::Endless);
        let first = add_enemy(&mut world, EnemyKind::Slime, Vec2::new(10.0, 0.0));
        let _second = add_enemy(&mut world, EnemyKind::Slime, Vec2::new(-10.0, 0.0));
        let far = add_enemy(&mut world, EnemyKind::Slime, Vec2::new(500.0, 0.0));

        let picked = nearest_enemies(&world.enemies, Vec2::ZERO, 1, None);
        assert_eq!(picked[0].id, first);

        let in_range = nearest_enemies(&world.enemies, Vec2::ZERO, 5, Some(100.0));
        assert_eq!(in_range.len(), 2);
        assert!(in_range.iter().all(|e| e.id != far));
    }

    #[test]
    fn test_nearest_skips_dead() {
        let mut world = World::new(5, RunMode::Endless);
        add_enemy(&mut world, EnemyKind::Slime, Vec2::new(10.0, 0.0));
        let live = add_enemy(&mut world, EnemyKind::Slime, Vec2::new(50.0, 0.0));
        world.enemies[0].alive = false;
        let picked = nearest_enemies(&world.enemies, Vec2::ZERO, 3, None);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, live);
    }

    #[test]
    fn test_fire_aimed_fan() {
        let mut world = World::new(5, RunMode::Endless);
        let mut bolt = Weapon::new(WeaponKind::MagicBolt);
        bolt.level_up().unwrap();
        bolt.level_up().unwrap();
        world.loadout.weapons.push(bolt);

        let aim = world.player.pos + Vec2::new(0.0, -100.0);
        fire_weapons(&mut world, Some(aim), 0.016);
        assert_eq!(world.projectiles.len(), 2);
        assert!(world.projectiles.iter().all(|p| p.penetrating && !p.chain));
        assert!(world.projectiles.iter().all(|p| p.dir.y < 0.0));

        // Cooling down
        fire_weapons(&mut world, Some(aim), 0.016);
        assert_eq!(world.projectiles.len(), 2);
    }

    #[test]
    fn test_fire_homing_needs_targets() {
        let mut world = World::new(5, RunMode::Endless);
        world.loadout.weapons.push(Weapon::new(WeaponKind::Shuriken));
        fire_weapons(&mut world, None, 0.016);
        assert!(world.projectiles.is_empty());

        let target = add_enemy(&mut world, EnemyKind::Bat, Vec2::new(100.0, 100.0));
        world.loadout.weapons[0].cooldown_timer = 0.0;
        fire_weapons(&mut world, None, 0.016);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].homing_target, Some(target));
    }

    #[test]
    fn test_fire_ball_respects_range() {
        let mut world = World::new(5, RunMode::Endless);
        world.loadout.weapons.push(Weapon::new(WeaponKind::FireBall));
        let far = world.player.pos + Vec2::new(350.0, 0.0);
        add_enemy(&mut world, EnemyKind::Slime, far);
        fire_weapons(&mut world, None, 0.016);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_field_is_single_instance() {
        let mut world = World::new(5, RunMode::Endless);
        world.loadout.weapons.push(Weapon::new(WeaponKind::SacredGround));

        fire_weapons(&mut world, None, 0.016);
        assert_eq!(world.area_effects.len(), 1);
        let field_id = world.area_effects[0].id;

        world.loadout.weapons[0].level_up().unwrap();
        world.player.pos += Vec2::new(40.0, 0.0);
        world.loadout.weapons[0].cooldown_timer = 0.0;
        fire_weapons(&mut world, None, 0.016);

        assert_eq!(world.area_effects.len(), 1);
        assert_eq!(world.area_effects[0].id, field_id);
        assert_eq!(world.area_effects[0].radius, 100.0);
        assert_eq!(world.area_effects[0].center, world.player.pos);
    }

    #[test]
    fn test_refresh_fields_applies_evolution() {
        let mut world = World::new(5, RunMode::Endless);
        world.loadout.weapons.push(maxed(WeaponKind::SacredGround));
        refresh_fields(&mut world);
        assert_eq!(world.area_effects.len(), 1);
        assert!(world.area_effects[0].slow.is_none());

        assert!(world.loadout.weapons[0].evolve(&[PassiveKind::RuneTablet]));
        refresh_fields(&mut world);
        assert_eq!(world.area_effects.len(), 1);
        assert_eq!(world.area_effects[0].radius, 300.0);
        assert_eq!(world.area_effects[0].slow, Some(EVOLVED_SLOW));
    }

    #[test]
    fn test_damage_multiplier_applies() {
        let mut world = World::new(5, RunMode::Endless);
        world.player.damage_mult = 1.5;
        world.loadout.weapons.push(Weapon::new(WeaponKind::IceArrow));
        fire_weapons(&mut world, None, 0.016);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].damage, 18.0);
    }

    proptest! {
        #[test]
        fn test_cooldown_invariant(
            kind_index in 0usize..5,
            level in 1u32..=8,
            deltas in proptest::collection::vec(0.0f32..0.5, 1..400),
        ) {
            let kind = WeaponKind::ALL[kind_index];
            let mut weapon = Weapon::new(kind);
            while weapon.level < level {
                weapon.level_up().unwrap();
            }
            let cooldown = weapon.stats.cooldown;

            let mut fires = 0u32;
            let mut elapsed = 0.0f64;
            for dt in deltas {
                elapsed += dt as f64;
                if weapon.advance(dt) {
                    fires += 1;
                }
            }
            let allowed = 1 + ((elapsed + 1e-3) / cooldown as f64).floor() as u32;
            prop_assert!(fires <= allowed, "{} fires in {}s at cooldown {}", fires, elapsed, cooldown);
        }

        #[test]
        fn test_level_up_is_monotonic(calls in 0usize..20) {
            let mut weapon = Weapon::new(WeaponKind::Shuriken);
            let mut last = weapon.level;
            for _ in 0..calls {
                let _ = weapon.level_up();
                prop_assert!(weapon.level >= last);
                prop_assert!(weapon.level <= WEAPON_MAX_LEVEL);
                last = weapon.level;
            }
        }
    }
}
