//! Enemy roster, stat tables and per-variant behavior
//!
//! One [`Enemy`] record covers every variant. Shared fields live on the
//! record; variant-specific timers live in [`Behavior`]. Special handling
//! (bosses, loot, contact destruction) is driven by capability flags set at
//! construction, never by checking the kind.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::EntityId;
use crate::consts::{ELITE_CHEST_CHANCE, FIELD_WIDTH};
use crate::{angle_to_dir, direction_to, lerp, move_toward};

/// Slow multiplier regained per second once the slow timer runs out
pub const SLOW_RECOVERY_RATE: f32 = 0.5;

const STRIKER_JITTER: f32 = 12.0;

const BAT_WAVE_AMPLITUDE: f32 = 30.0;

const KITER_MIN_DISTANCE: f32 = 130.0;
const KITER_MAX_DISTANCE: f32 = 200.0;
const KITER_ADVANCE_FACTOR: f32 = 0.7;
const KITER_SHOT_INTERVAL: f32 = 2.0;
const KITER_SHOT_SPEED: f32 = 120.0;
const KITER_SHOT_DAMAGE: f32 = 12.0;

const FORMATION_SPACING: f32 = 40.0;
const FORMATION_WEIGHT: f32 = 0.3;

const BRUTE_ATTACK_INTERVAL: f32 = 3.0;
const BRUTE_ATTACK_RANGE: f32 = 60.0;
const BRUTE_SLAM_DURATION: f32 = 0.5;
const BRUTE_IDLE_DAMAGE_FACTOR: f32 = 0.3;

pub const BOSS_ATTACK_INTERVAL: f32 = 2.5;
pub const BOSS_ENRAGED_ATTACK_INTERVAL: f32 = 1.8;
const BOSS_PATTERN_INTERVAL: f32 = 4.0;
const BOSS_CHARGE_DURATION: f32 = 1.0;
const BOSS_CHARGE_SPEED_FACTOR: f32 = 3.0;
const BOSS_ATTACK_POSE: f32 = 0.25;
const BOSS_SHOT_SPEED: f32 = 200.0;
const BOSS_SHOT_DAMAGE: f32 = 15.0;
const BOSS_SHOT_SPREAD: f32 = 0.3;
const BOSS_ORBIT_RADIUS: f32 = 100.0;
const BOSS_ORBIT_WOBBLE: f32 = 20.0;
const BOSS_ORBIT_ANGULAR_SPEED: f32 = 2.0;

const REAPER_ATTACK_INTERVAL: f32 = 4.0;
const REAPER_CHARGE_DURATION: f32 = 1.5;
const REAPER_SWEEP_DURATION: f32 = 1.0;
const REAPER_SWEEP_HALF_HEIGHT: f32 = 40.0;
/// Reaper health scales with the player's level
pub const REAPER_HEALTH_PER_LEVEL: f32 = 100.0;

/// Default number of rewards in a dropped chest
pub const CHEST_REWARDS: usize = 3;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Basic melee seeker
    Slime,
    /// Fast and fragile
    Runner,
    /// Tanky and slow
    Tank,
    /// Hard-hitting, jittery approach
    Striker,
    /// Erratic flyer
    Bat,
    /// Ranged kiter
    Shaman,
    /// Formation soldier
    Skeleton,
    /// Elite brute with slam windows
    Ogre,
    /// Phase boss
    Warlord,
    /// Timed ultimate boss
    Reaper,
}

/// Base numbers for one enemy kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub experience: u32,
    pub score: u32,
    pub size: Vec2,
}

const fn stats(
    health: f32,
    speed: f32,
    contact_damage: f32,
    experience: u32,
    score: u32,
    w: f32,
    h: f32,
) -> EnemyStats {
    EnemyStats {
        health,
        speed,
        contact_damage,
        experience,
        score,
        size: Vec2::new(w, h),
    }
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Slime => stats(10.0, 50.0, 8.0, 5, 10, 35.0, 35.0),
            EnemyKind::Runner => stats(15.0, 120.0, 6.0, 8, 15, 24.0, 24.0),
            EnemyKind::Tank => stats(50.0, 60.0, 12.0, 15, 25, 32.0, 32.0),
            EnemyKind::Striker => stats(25.0, 85.0, 20.0, 12, 20, 28.0, 28.0),
            EnemyKind::Bat => stats(8.0, 80.0, 6.0, 8, 15, 30.0, 26.0),
            EnemyKind::Shaman => stats(50.0, 45.0, 12.0, 75, 60, 28.0, 32.0),
            EnemyKind::Skeleton => stats(60.0, 70.0, 15.0, 50, 50, 36.0, 42.0),
            EnemyKind::Ogre => stats(500.0, 30.0, 35.0, 100, 200, 48.0, 52.0),
            EnemyKind::Warlord => stats(150.0, 40.0, 25.0, 50, 1000, 48.0, 48.0),
            EnemyKind::Reaper => stats(REAPER_HEALTH_PER_LEVEL, 40.0, 50.0, 500, 5000, 64.0, 80.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Slime => "Slime",
            EnemyKind::Runner => "Runner",
            EnemyKind::Tank => "Tank",
            EnemyKind::Striker => "Striker",
            EnemyKind::Bat => "Bat",
            EnemyKind::Shaman => "Shaman",
            EnemyKind::Skeleton => "Skeleton",
            EnemyKind::Ogre => "Ogre",
            EnemyKind::Warlord => "Warlord",
            EnemyKind::Reaper => "Reaper",
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Warlord | EnemyKind::Reaper)
    }

    pub fn is_elite(self) -> bool {
        matches!(self, EnemyKind::Ogre)
    }

    /// Kinds that spawn in a ring around the player instead of off an edge
    pub fn spawns_near_player(self) -> bool {
        matches!(self, EnemyKind::Shaman | EnemyKind::Warlord | EnemyKind::Reaper)
    }
}

/// Phase boss states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossMode {
    Approach,
    Charging,
    Attacking,
    Circling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBossState {
    pub mode: BossMode,
    /// Set once health drops to half; never cleared
    pub enraged: bool,
    pub attack_interval: f32,
    pub attack_timer: f32,
    pub pattern_timer: f32,
    /// Time spent in the current transient mode
    pub state_timer: f32,
}

impl PhaseBossState {
    fn new() -> Self {
        Self {
            mode: BossMode::Approach,
            enraged: false,
            attack_interval: BOSS_ATTACK_INTERVAL,
            attack_timer: 0.0,
            pattern_timer: 0.0,
            state_timer: 0.0,
        }
    }

    fn enrage(&mut self) {
        self.enraged = true;
        self.attack_interval = BOSS_ENRAGED_ATTACK_INTERVAL;
        if self.mode == BossMode::Approach {
            self.mode = BossMode::Circling;
        }
        log::info!("Warlord enraged");
    }

    /// Mode to fall back to after a charge or attack
    fn cruise_mode(&self) -> BossMode {
        if self.enraged {
            BossMode::Circling
        } else {
            BossMode::Approach
        }
    }
}

/// Ultimate boss states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScytheMode {
    Idle,
    ScytheCharge,
    ScytheSweep,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReaperState {
    pub mode: ScytheMode,
    pub attack_timer: f32,
    pub state_timer: f32,
    /// The current sweep already hit the player
    pub sweep_landed: bool,
}

impl ReaperState {
    fn new() -> Self {
        Self {
            mode: ScytheMode::Idle,
            attack_timer: 0.0,
            state_timer: 0.0,
            sweep_landed: false,
        }
    }
}

/// Variant-specific movement/attack state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Straight at the player
    Seek,
    /// Seek with a small sine wobble
    Jitter { phase: f32 },
    /// Seek plus two out-of-phase sine offsets
    Erratic { wave_time: f32, wave_offset: f32 },
    /// Hold a distance band and shoot
    Kiter { shot_timer: f32 },
    /// Keep a slot beside other living soldiers
    Formation,
    /// Walk up and slam periodically
    Brute { attack_timer: f32, slam_timer: f32 },
    PhaseBoss(PhaseBossState),
    Reaper(ReaperState),
}

/// This soldier's place among the living members of its group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSlot {
    pub index: usize,
    pub count: usize,
    pub centroid: Vec2,
}

/// What an enemy may read while updating
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub player_pos: Vec2,
    pub dt: f32,
    pub formation: Option<FormationSlot>,
}

/// A hostile projectile requested by an enemy this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyShot {
    pub origin: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub experience: u32,
    pub score: u32,
    /// 1.0 = unslowed
    pub slow_multiplier: f32,
    /// Seconds before the slow starts wearing off
    pub slow_timer: f32,
    /// Seconds before this enemy can hurt the player by contact again
    pub contact_cooldown: f32,
    pub is_boss: bool,
    pub drops_loot_on_death: bool,
    pub contact_destructible: bool,
    /// Rewards in the chest this enemy may drop
    pub chest_rewards: usize,
    pub age: f32,
    pub alive: bool,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        let stats = kind.stats();
        let behavior = match kind {
            EnemyKind::Slime | EnemyKind::Runner | EnemyKind::Tank => Behavior::Seek,
            EnemyKind::Striker => Behavior::Jitter {
                phase: rng.random_range(0.0..TAU),
            },
            EnemyKind::Bat => Behavior::Erratic {
                wave_time: 0.0,
                wave_offset: rng.random_range(0.0..TAU),
            },
            EnemyKind::Shaman => Behavior::Kiter { shot_timer: 0.0 },
            EnemyKind::Skeleton => Behavior::Formation,
            EnemyKind::Ogre => Behavior::Brute {
                attack_timer: 0.0,
                slam_timer: 0.0,
            },
            EnemyKind::Warlord => Behavior::PhaseBoss(PhaseBossState::new()),
            EnemyKind::Reaper => Behavior::Reaper(ReaperState::new()),
        };
        let is_boss = kind.is_boss();
        let is_elite = kind.is_elite();

        Self {
            id,
            kind,
            pos,
            size: stats.size,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            contact_damage: stats.contact_damage,
            experience: stats.experience,
            score: stats.score,
            slow_multiplier: 1.0,
            slow_timer: 0.0,
            contact_cooldown: 0.0,
            is_boss,
            drops_loot_on_death: is_boss || is_elite,
            contact_destructible: !is_boss,
            chest_rewards: CHEST_REWARDS,
            age: 0.0,
            alive: true,
            behavior,
        }
    }

    /// Override starting and max health
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self.max_health = health;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn current_speed(&self) -> f32 {
        self.speed * self.slow_multiplier
    }

    /// Probability of a chest on death
    pub fn chest_chance(&self) -> f64 {
        match (self.drops_loot_on_death, self.is_boss) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => ELITE_CHEST_CHANCE,
        }
    }

    /// Apply damage. Returns true only on the call that kills.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if let Behavior::PhaseBoss(boss) = &mut self.behavior {
            if !boss.enraged && self.health <= self.max_health * 0.5 {
                boss.enrage();
            }
        }
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Keep the strongest slow and the longest duration
    pub fn apply_slow(&mut self, factor: f32, duration: f32) {
        self.slow_multiplier = self.slow_multiplier.min(factor);
        self.slow_timer = self.slow_timer.max(duration);
    }

    fn recover_slow(&mut self, dt: f32) {
        if self.slow_timer > 0.0 {
            self.slow_timer = (self.slow_timer - dt).max(0.0);
        } else if self.slow_multiplier < 1.0 {
            self.slow_multiplier = (self.slow_multiplier + dt * SLOW_RECOVERY_RATE).min(1.0);
        }
    }

    /// Damage dealt to the player on touch right now
    pub fn contact_damage(&self) -> f32 {
        match &self.behavior {
            Behavior::Brute { slam_timer, .. } if *slam_timer <= 0.0 => {
                self.contact_damage * BRUTE_IDLE_DAMAGE_FACTOR
            }
            Behavior::Reaper(reaper) if reaper.mode == ScytheMode::ScytheSweep => {
                self.contact_damage * 2.0
            }
            _ => self.contact_damage,
        }
    }

    /// Telegraphed strike area while it can still land
    pub fn strike_zone(&self) -> Option<Rect> {
        match &self.behavior {
            Behavior::Reaper(reaper)
                if reaper.mode == ScytheMode::ScytheSweep && !reaper.sweep_landed =>
            {
                Some(Rect::new(
                    0.0,
                    self.pos.y - REAPER_SWEEP_HALF_HEIGHT,
                    FIELD_WIDTH,
                    REAPER_SWEEP_HALF_HEIGHT * 2.0,
                ))
            }
            _ => None,
        }
    }

    /// Damage of a landed strike
    pub fn strike_damage(&self) -> f32 {
        self.contact_damage * 2.0
    }

    pub fn mark_strike_landed(&mut self) {
        if let Behavior::Reaper(reaper) = &mut self.behavior {
            reaper.sweep_landed = true;
        }
    }

    /// Current attack interval for phase bosses
    pub fn attack_interval(&self) -> Option<f32> {
        match &self.behavior {
            Behavior::PhaseBoss(boss) => Some(boss.attack_interval),
            _ => None,
        }
    }

    /// Advance movement and variant timers by one tick
    pub fn update(&mut self, ctx: &EnemyContext, shots: &mut Vec<EnemyShot>) {
        if !self.alive {
            return;
        }
        let dt = ctx.dt;
        let player = ctx.player_pos;
        self.age += dt;
        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);
        self.recover_slow(dt);
        let speed = self.current_speed();

        match &mut self.behavior {
            Behavior::Seek => {
                self.pos = move_toward(self.pos, player, speed, dt);
            }
            Behavior::Jitter { phase } => {
                self.pos = move_toward(self.pos, player, speed, dt);
                let wobble = (self.age * 10.0 + *phase).sin() * STRIKER_JITTER * dt;
                self.pos += Vec2::splat(wobble);
            }
            Behavior::Erratic {
                wave_time,
                wave_offset,
            } => {
                *wave_time += dt;
                self.pos = move_toward(self.pos, player, speed, dt);
                self.pos.x += (*wave_time * 5.0 + *wave_offset).sin() * BAT_WAVE_AMPLITUDE * dt;
                self.pos.y += (*wave_time * 3.0 + *wave_offset).cos() * BAT_WAVE_AMPLITUDE * dt;
            }
            Behavior::Kiter { shot_timer } => {
                let distance = self.pos.distance(player);
                if distance < KITER_MIN_DISTANCE {
                    self.pos -= direction_to(self.pos, player) * speed * dt;
                } else if distance > KITER_MAX_DISTANCE {
                    self.pos = move_toward(self.pos, player, speed * KITER_ADVANCE_FACTOR, dt);
                }
                *shot_timer += dt;
                if distance <= KITER_MAX_DISTANCE && *shot_timer >= KITER_SHOT_INTERVAL {
                    *shot_timer = 0.0;
                    shots.push(EnemyShot {
                        origin: self.pos,
                        dir: direction_to(self.pos, player),
                        speed: KITER_SHOT_SPEED,
                        damage: KITER_SHOT_DAMAGE,
                    });
                }
            }
            Behavior::Formation => {
                let target = match ctx.formation {
                    Some(slot) if slot.count > 1 => {
                        let forward = direction_to(slot.centroid, player);
                        let side = Vec2::new(-forward.y, forward.x);
                        let offset = (slot.index as f32 - (slot.count as f32 - 1.0) / 2.0)
                            * FORMATION_SPACING;
                        let slot_pos = slot.centroid + side * offset;
                        slot_pos * FORMATION_WEIGHT + player * (1.0 - FORMATION_WEIGHT)
                    }
                    _ => player,
                };
                self.pos = move_toward(self.pos, target, speed, dt);
            }
            Behavior::Brute {
                attack_timer,
                slam_timer,
            } => {
                if *slam_timer > 0.0 {
                    // Planted while slamming
                    *slam_timer = (*slam_timer - dt).max(0.0);
                } else {
                    *attack_timer += dt;
                    let in_range = self.pos.distance(player) <= BRUTE_ATTACK_RANGE;
                    if in_range && *attack_timer >= BRUTE_ATTACK_INTERVAL {
                        *attack_timer = 0.0;
                        *slam_timer = BRUTE_SLAM_DURATION;
                    } else {
                        self.pos = move_toward(self.pos, player, speed, dt);
                    }
                }
            }
            Behavior::PhaseBoss(boss) => {
                boss.attack_timer += dt;
                boss.pattern_timer += dt;
                if !boss.enraged && self.health <= self.max_health * 0.5 {
                    boss.enrage();
                }

                match boss.mode {
                    BossMode::Charging => {
                        boss.state_timer += dt;
                        self.pos =
                            move_toward(self.pos, player, speed * BOSS_CHARGE_SPEED_FACTOR, dt);
                        if boss.state_timer >= BOSS_CHARGE_DURATION {
                            boss.mode = boss.cruise_mode();
                            boss.state_timer = 0.0;
                        }
                    }
                    BossMode::Attacking => {
                        boss.state_timer += dt;
                        if boss.state_timer >= BOSS_ATTACK_POSE {
                            boss.mode = boss.cruise_mode();
                            boss.state_timer = 0.0;
                        }
                    }
                    BossMode::Approach | BossMode::Circling => {
                        if boss.pattern_timer >= BOSS_PATTERN_INTERVAL {
                            boss.pattern_timer = 0.0;
                            boss.state_timer = 0.0;
                            boss.mode = BossMode::Charging;
                        } else if boss.attack_timer >= boss.attack_interval {
                            boss.attack_timer = 0.0;
                            boss.state_timer = 0.0;
                            boss.mode = BossMode::Attacking;
                            let aim = direction_to(self.pos, player);
                            let base = aim.y.atan2(aim.x);
                            let count = if boss.enraged { 3 } else { 1 };
                            for i in 0..count {
                                let angle = if count == 1 {
                                    base
                                } else {
                                    let t = i as f32 / (count - 1) as f32;
                                    base + lerp(-BOSS_SHOT_SPREAD, BOSS_SHOT_SPREAD, t)
                                };
                                shots.push(EnemyShot {
                                    origin: self.pos,
                                    dir: angle_to_dir(angle),
                                    speed: BOSS_SHOT_SPEED,
                                    damage: BOSS_SHOT_DAMAGE,
                                });
                            }
                        } else if boss.mode == BossMode::Circling {
                            let from_player = self.pos - player;
                            let angle = from_player.y.atan2(from_player.x)
                                + BOSS_ORBIT_ANGULAR_SPEED * dt;
                            let radius =
                                BOSS_ORBIT_RADIUS + (self.age * 1.5).sin() * BOSS_ORBIT_WOBBLE;
                            let target = player + angle_to_dir(angle) * radius;
                            self.pos = move_toward(self.pos, target, speed * 2.0, dt);
                        } else {
                            self.pos = move_toward(self.pos, player, speed, dt);
                        }
                    }
                }
            }
            Behavior::Reaper(reaper) => match reaper.mode {
                ScytheMode::Idle => {
                    reaper.attack_timer += dt;
                    self.pos = move_toward(self.pos, player, speed, dt);
                    if reaper.attack_timer >= REAPER_ATTACK_INTERVAL {
                        reaper.mode = ScytheMode::ScytheCharge;
                        reaper.state_timer = 0.0;
                    }
                }
                ScytheMode::ScytheCharge => {
                    reaper.state_timer += dt;
                    if reaper.state_timer >= REAPER_CHARGE_DURATION {
                        reaper.mode = ScytheMode::ScytheSweep;
                        reaper.state_timer = 0.0;
                        reaper.sweep_landed = false;
                    }
                }
                ScytheMode::ScytheSweep => {
                    reaper.state_timer += dt;
                    if reaper.state_timer >= REAPER_SWEEP_DURATION {
                        reaper.mode = ScytheMode::Idle;
                        reaper.state_timer = 0.0;
                        reaper.attack_timer = 0.0;
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn(kind: EnemyKind, pos: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(3);
        Enemy::new(1, kind, pos, &mut rng)
    }

    fn ctx(player_pos: Vec2, dt: f32) -> EnemyContext {
        EnemyContext {
            player_pos,
            dt,
            formation: None,
        }
    }

    #[test]
    fn test_capability_flags() {
        let slime = spawn(EnemyKind::Slime, Vec2::ZERO);
        assert!(!slime.is_boss && slime.contact_destructible && !slime.drops_loot_on_death);

        let ogre = spawn(EnemyKind::Ogre, Vec2::ZERO);
        assert!(!ogre.is_boss && ogre.contact_destructible && ogre.drops_loot_on_death);
        assert_eq!(ogre.chest_chance(), ELITE_CHEST_CHANCE);

        let warlord = spawn(EnemyKind::Warlord, Vec2::ZERO);
        assert!(warlord.is_boss && !warlord.contact_destructible);
        assert_eq!(warlord.chest_chance(), 1.0);
    }

    #[test]
    fn test_seek_moves_toward_player() {
        let mut slime = spawn(EnemyKind::Slime, Vec2::new(0.0, 0.0));
        let mut shots = Vec::new();
        slime.update(&ctx(Vec2::new(100.0, 0.0), 0.5), &mut shots);
        assert!((slime.pos.x - 25.0).abs() < 1e-4);
        assert!(shots.is_empty());
    }

    fn bat_with_offset(wave_offset: f32) -> Enemy {
        let mut bat = spawn(EnemyKind::Bat, Vec2::ZERO);
        bat.behavior = Behavior::Erratic {
            wave_time: 0.0,
            wave_offset,
        };
        bat
    }

    #[test]
    fn test_erratic_flyer_weaves_around_seek() {
        let player = Vec2::new(1000.0, 0.0);
        let dt = 0.1;
        let mut bat = bat_with_offset(0.0);
        let seek = crate::move_toward(bat.pos, player, bat.speed, dt);
        let mut shots = Vec::new();
        bat.update(&ctx(player, dt), &mut shots);

        let offset = bat.pos - seek;
        let expected = Vec2::new((0.5f32).sin(), (0.3f32).cos()) * BAT_WAVE_AMPLITUDE * dt;
        assert!((offset - expected).length() < 1e-4, "offset {:?}", offset);
        assert!(offset.x.abs() <= BAT_WAVE_AMPLITUDE * dt);
        assert!(offset.y.abs() <= BAT_WAVE_AMPLITUDE * dt);
        assert!(offset.length() > 0.0);
    }

    #[test]
    fn test_erratic_path_depends_only_on_offset() {
        let player = Vec2::new(400.0, 300.0);
        let mut first = bat_with_offset(1.3);
        let mut second = bat_with_offset(1.3);
        let mut other = bat_with_offset(2.9);
        let mut shots = Vec::new();
        for _ in 0..30 {
            first.update(&ctx(player, 1.0 / 60.0), &mut shots);
            second.update(&ctx(player, 1.0 / 60.0), &mut shots);
            other.update(&ctx(player, 1.0 / 60.0), &mut shots);
        }
        assert_eq!(first.pos, second.pos);
        assert_ne!(first.pos, other.pos);
    }

    #[test]
    fn test_striker_jitters_diagonally() {
        let player = Vec2::new(0.0, 500.0);
        let dt = 0.05;
        let mut striker = spawn(EnemyKind::Striker, Vec2::ZERO);
        striker.behavior = Behavior::Jitter { phase: 0.0 };
        let seek = crate::move_toward(striker.pos, player, striker.speed, dt);
        let mut shots = Vec::new();
        striker.update(&ctx(player, dt), &mut shots);

        let wobble = (dt * 10.0).sin() * STRIKER_JITTER * dt;
        let offset = striker.pos - seek;
        assert!((offset.x - wobble).abs() < 1e-5);
        assert!((offset.y - wobble).abs() < 1e-5);
        assert!(wobble.abs() <= STRIKER_JITTER * dt);
    }

    #[test]
    fn test_slow_holds_then_recovers() {
        let mut slime = spawn(EnemyKind::Slime, Vec2::ZERO);
        slime.apply_slow(0.5, 1.0);
        slime.apply_slow(0.8, 0.2);
        assert_eq!(slime.slow_multiplier, 0.5);
        assert_eq!(slime.slow_timer, 1.0);

        let mut shots = Vec::new();
        slime.update(&ctx(Vec2::new(500.0, 0.0), 1.0), &mut shots);
        assert_eq!(slime.slow_multiplier, 0.5);

        // Timer spent, now recovering at half a unit per second
        slime.update(&ctx(Vec2::new(500.0, 0.0), 0.5), &mut shots);
        assert!((slime.slow_multiplier - 0.75).abs() < 1e-6);
        slime.update(&ctx(Vec2::new(500.0, 0.0), 2.0), &mut shots);
        assert_eq!(slime.slow_multiplier, 1.0);
    }

    #[test]
    fn test_take_damage_kills_once() {
        let mut bat = spawn(EnemyKind::Bat, Vec2::ZERO);
        assert!(!bat.take_damage(3.0));
        assert!(bat.take_damage(10.0));
        assert!(!bat.alive);
        assert!(!bat.take_damage(10.0));
    }

    #[test]
    fn test_kiter_retreats_and_fires() {
        let mut shaman = spawn(EnemyKind::Shaman, Vec2::new(100.0, 0.0));
        let mut shots = Vec::new();
        let player = Vec2::ZERO;

        shaman.update(&ctx(player, 1.0), &mut shots);
        assert!(shaman.pos.x > 100.0, "too close, should back off");
        assert!(shots.is_empty());

        shaman.update(&ctx(player, 1.0), &mut shots);
        assert_eq!(shots.len(), 1);
        assert!(shots[0].dir.x < 0.0, "aimed at the player");
        assert_eq!(shots[0].damage, KITER_SHOT_DAMAGE);
    }

    #[test]
    fn test_kiter_holds_fire_out_of_range() {
        let mut shaman = spawn(EnemyKind::Shaman, Vec2::new(600.0, 0.0));
        let mut shots = Vec::new();
        for _ in 0..10 {
            shaman.update(&ctx(Vec2::ZERO, 0.5), &mut shots);
        }
        assert!(shots.is_empty());
        assert!(shaman.pos.x < 600.0);
    }

    #[test]
    fn test_formation_offsets_soldiers_sideways() {
        let player = Vec2::new(0.0, 0.0);
        let centroid = Vec2::new(200.0, 0.0);
        let mut left = spawn(EnemyKind::Skeleton, centroid);
        let mut right = spawn(EnemyKind::Skeleton, centroid);
        let mut shots = Vec::new();

        let slot = |index| EnemyContext {
            player_pos: player,
            dt: 0.1,
            formation: Some(FormationSlot {
                index,
                count: 2,
                centroid,
            }),
        };
        left.update(&slot(0), &mut shots);
        right.update(&slot(1), &mut shots);

        assert!(left.pos.x < 200.0 && right.pos.x < 200.0);
        assert!((left.pos.y + right.pos.y).abs() < 1e-4, "mirrored about the axis");
        assert!(left.pos.y != right.pos.y);
    }

    #[test]
    fn test_brute_slam_window() {
        let mut ogre = spawn(EnemyKind::Ogre, Vec2::new(40.0, 0.0));
        let mut shots = Vec::new();
        let idle_damage = ogre.contact_damage();
        assert!((idle_damage - 35.0 * BRUTE_IDLE_DAMAGE_FACTOR).abs() < 1e-4);

        // Stand the player next to it so it never moves out of range
        for _ in 0..31 {
            ogre.update(&ctx(Vec2::new(40.0, 0.0), 0.1), &mut shots);
        }
        assert_eq!(ogre.contact_damage(), 35.0);
    }

    #[test]
    fn test_phase_boss_enrage_is_permanent() {
        let mut boss = spawn(EnemyKind::Warlord, Vec2::ZERO);
        assert_eq!(boss.max_health, 150.0);
        assert_eq!(boss.attack_interval(), Some(BOSS_ATTACK_INTERVAL));

        boss.take_damage(80.0);
        assert_eq!(boss.health, 70.0);
        assert_eq!(boss.attack_interval(), Some(BOSS_ENRAGED_ATTACK_INTERVAL));

        boss.health = boss.max_health;
        let mut shots = Vec::new();
        boss.update(&ctx(Vec2::new(300.0, 0.0), 0.1), &mut shots);
        assert_eq!(boss.attack_interval(), Some(BOSS_ENRAGED_ATTACK_INTERVAL));
    }

    #[test]
    fn test_phase_boss_attacks_then_charges_on_timers() {
        let mut boss = spawn(EnemyKind::Warlord, Vec2::ZERO);
        let player = Vec2::new(1000.0, 0.0);
        let mut shots = Vec::new();
        let mode = |boss: &Enemy| match boss.behavior {
            Behavior::PhaseBoss(state) => state.mode,
            _ => panic!("not a phase boss"),
        };

        // Attack timer hits 2.5s on tick 20
        for _ in 0..20 {
            boss.update(&ctx(player, 0.125), &mut shots);
        }
        assert_eq!(shots.len(), 1);
        assert_eq!(mode(&boss), BossMode::Attacking);

        // Pattern timer hits 4.0s on tick 32 regardless of distance
        for _ in 0..12 {
            boss.update(&ctx(player, 0.125), &mut shots);
        }
        assert_eq!(mode(&boss), BossMode::Charging);
        assert_eq!(shots.len(), 1);
    }

    #[test]
    fn test_enraged_boss_fires_spread() {
        let mut boss = spawn(EnemyKind::Warlord, Vec2::ZERO);
        boss.take_damage(100.0);
        let mut shots = Vec::new();
        for _ in 0..20 {
            boss.update(&ctx(Vec2::new(300.0, 0.0), 0.125), &mut shots);
        }
        assert_eq!(shots.len(), 3);
    }

    #[test]
    fn test_reaper_sweep_cycle() {
        let mut reaper = spawn(EnemyKind::Reaper, Vec2::new(600.0, 300.0));
        let player = Vec2::new(600.0, 300.0);
        let mut shots = Vec::new();
        assert!(reaper.strike_zone().is_none());

        // 4s idle, then 1.5s charge
        for _ in 0..32 {
            reaper.update(&ctx(player, 0.125), &mut shots);
        }
        assert!(reaper.strike_zone().is_none());
        for _ in 0..12 {
            reaper.update(&ctx(player, 0.125), &mut shots);
        }
        let zone = reaper.strike_zone().expect("sweep active");
        assert_eq!(zone.x, 0.0);
        assert_eq!(zone.w, FIELD_WIDTH);
        assert_eq!(zone.h, 80.0);
        assert_eq!(reaper.contact_damage(), 100.0);

        reaper.mark_strike_landed();
        assert!(reaper.strike_zone().is_none());

        for _ in 0..8 {
            reaper.update(&ctx(player, 0.125), &mut shots);
        }
        assert_eq!(reaper.contact_damage(), 50.0);
    }
}
