//! Time-driven enemy spawning
//!
//! The wave table partitions elapsed time into seven bands. The active band
//! decides which kinds spawn, with what weights, how often and up to what
//! population. Boss timestamps are tracked separately and fire once each.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, REAPER_HEALTH_PER_LEVEL};
use super::state::{GameEvent, World};
use crate::angle_to_dir;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, SPAWN_MARGIN, TIMER_EPSILON};

/// Ring around the player used for near spawns
pub const NEAR_SPAWN_MIN: f32 = 200.0;
pub const NEAR_SPAWN_MAX: f32 = 400.0;
const NEAR_SPAWN_ATTEMPTS: usize = 8;

/// Elite bosses get this much more health and a bigger chest
const ELITE_BOSS_HEALTH_MULT: f32 = 4.0;
const ELITE_BOSS_CHEST_REWARDS: usize = 5;

/// Coarse difficulty band of a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Early,
    Mid,
    Late,
}

/// One row of the wave table
#[derive(Debug, Clone, Copy)]
pub struct WaveSpec {
    /// Inclusive start, seconds
    pub start: f64,
    /// Exclusive end, seconds
    pub end: f64,
    pub tier: Tier,
    pub weights: &'static [(EnemyKind, u32)],
    /// Seconds between spawn rounds
    pub base_interval: f32,
    /// Population cap before the difficulty multiplier
    pub max_enemies: u32,
}

/// `1 / rate`, never faster than ten rounds a second
const fn interval(rate: f32) -> f32 {
    let interval = 1.0 / rate;
    if interval < 0.1 { 0.1 } else { interval }
}

pub const WAVES: [WaveSpec; 7] = [
    WaveSpec {
        start: 0.0,
        end: 180.0,
        tier: Tier::Early,
        weights: &[(EnemyKind::Slime, 5), (EnemyKind::Bat, 3), (EnemyKind::Runner, 2)],
        base_interval: interval(0.5),
        max_enemies: 15,
    },
    WaveSpec {
        start: 180.0,
        end: 300.0,
        tier: Tier::Early,
        weights: &[
            (EnemyKind::Slime, 4),
            (EnemyKind::Bat, 3),
            (EnemyKind::Runner, 2),
            (EnemyKind::Tank, 1),
            (EnemyKind::Skeleton, 2),
        ],
        base_interval: interval(0.8),
        max_enemies: 25,
    },
    WaveSpec {
        start: 300.0,
        end: 600.0,
        tier: Tier::Mid,
        weights: &[
            (EnemyKind::Slime, 2),
            (EnemyKind::Bat, 3),
            (EnemyKind::Skeleton, 3),
            (EnemyKind::Shaman, 2),
            (EnemyKind::Tank, 2),
            (EnemyKind::Striker, 1),
        ],
        base_interval: interval(1.2),
        max_enemies: 40,
    },
    WaveSpec {
        start: 600.0,
        end: 900.0,
        tier: Tier::Mid,
        weights: &[
            (EnemyKind::Bat, 2),
            (EnemyKind::Skeleton, 3),
            (EnemyKind::Shaman, 3),
            (EnemyKind::Tank, 2),
            (EnemyKind::Striker, 2),
            (EnemyKind::Ogre, 1),
        ],
        base_interval: interval(1.8),
        max_enemies: 60,
    },
    WaveSpec {
        start: 900.0,
        end: 1200.0,
        tier: Tier::Late,
        weights: &[
            (EnemyKind::Skeleton, 3),
            (EnemyKind::Shaman, 3),
            (EnemyKind::Striker, 3),
            (EnemyKind::Ogre, 2),
        ],
        base_interval: interval(2.5),
        max_enemies: 80,
    },
    WaveSpec {
        start: 1200.0,
        end: 1800.0,
        tier: Tier::Late,
        weights: &[(EnemyKind::Shaman, 3), (EnemyKind::Striker, 3), (EnemyKind::Ogre, 3)],
        base_interval: interval(3.0),
        max_enemies: 100,
    },
    WaveSpec {
        start: 1800.0,
        end: f64::INFINITY,
        tier: Tier::Late,
        weights: &[(EnemyKind::Ogre, 2), (EnemyKind::Striker, 1)],
        base_interval: interval(4.0),
        max_enemies: 150,
    },
];

/// Simultaneous spawns per round, stepping up at these times
pub const SPAWN_COUNT_STEPS: [(f64, u32); 4] = [(0.0, 1), (180.0, 2), (600.0, 3), (1200.0, 4)];

/// Absolute boss times, seconds
pub const BOSS_TIMESTAMPS: [u32; 5] = [300, 600, 900, 1200, 1800];

/// Which boss a timestamp brings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossTier {
    Warlord,
    EliteWarlord,
    Reaper,
}

impl BossTier {
    pub fn for_time(seconds: u32) -> Self {
        if seconds >= 1800 {
            BossTier::Reaper
        } else if seconds >= 900 {
            BossTier::EliteWarlord
        } else {
            BossTier::Warlord
        }
    }

    pub fn kind(self) -> EnemyKind {
        match self {
            BossTier::Warlord | BossTier::EliteWarlord => EnemyKind::Warlord,
            BossTier::Reaper => EnemyKind::Reaper,
        }
    }
}

pub fn wave_index_at(game_time: f64) -> usize {
    WAVES
        .iter()
        .position(|w| game_time >= w.start && game_time < w.end)
        .unwrap_or(WAVES.len() - 1)
}

pub fn wave_at(game_time: f64) -> &'static WaveSpec {
    &WAVES[wave_index_at(game_time)]
}

pub fn spawn_count_at(game_time: f64) -> u32 {
    SPAWN_COUNT_STEPS
        .iter()
        .rev()
        .find(|(start, _)| game_time >= *start)
        .map_or(1, |(_, count)| *count)
}

/// +10% per elapsed minute
pub fn difficulty_multiplier(game_time: f64) -> f64 {
    1.0 + (game_time / 60.0).floor() * 0.1
}

pub fn enemy_cap_at(game_time: f64) -> usize {
    (wave_at(game_time).max_enemies as f64 * difficulty_multiplier(game_time)).floor() as usize
}

/// Spawn cadence and one-shot boss triggers
#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    pub spawn_timer: f32,
    /// Boss timestamps already used this run
    pub fired: BTreeSet<u32>,
    pub current_wave: usize,
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boss timestamps reached but not yet fired, marked fired
    pub fn due_bosses(&mut self, game_time: f64) -> Vec<(u32, BossTier)> {
        let mut due = Vec::new();
        for &at in &BOSS_TIMESTAMPS {
            if game_time >= at as f64 && self.fired.insert(at) {
                due.push((at, BossTier::for_time(at)));
            }
        }
        due
    }

    /// Advance the spawn timer and inject bosses and regular enemies.
    /// Returns how many enemies were added.
    pub fn update(&mut self, world: &mut World, dt: f32) -> usize {
        let game_time = world.game_time;
        let mut spawned = 0;

        let wave = wave_index_at(game_time);
        if wave != self.current_wave {
            self.current_wave = wave;
            world.events.push(GameEvent::WaveChanged { index: wave });
            log::info!(
                "Wave {} begins at {:.0}s ({:?} tier)",
                wave + 1,
                game_time,
                WAVES[wave].tier
            );
        }

        for (at, tier) in self.due_bosses(game_time) {
            spawn_boss(world, tier);
            log::info!("Boss {:?} triggered by the {}s mark", tier, at);
            spawned += 1;
        }

        self.spawn_timer += dt;
        let spec = &WAVES[wave];
        if self.spawn_timer >= spec.base_interval - TIMER_EPSILON {
            // Carry the overshoot; never bank more than one interval
            self.spawn_timer = (self.spawn_timer - spec.base_interval).min(spec.base_interval);
            let cap = enemy_cap_at(game_time);
            for _ in 0..spawn_count_at(game_time) {
                if world.alive_enemy_count() >= cap {
                    log::debug!("Enemy cap {} reached, skipping spawn", cap);
                    break;
                }
                let kind = pick_kind(spec, &mut world.rng);
                spawn_enemy(world, kind);
                spawned += 1;
            }
        }
        spawned
    }
}

/// Weighted draw from the wave's kind list
fn pick_kind(spec: &WaveSpec, rng: &mut impl Rng) -> EnemyKind {
    match WeightedIndex::new(spec.weights.iter().map(|(_, weight)| *weight)) {
        Ok(dist) => spec.weights[dist.sample(rng)].0,
        Err(_) => EnemyKind::Slime,
    }
}

/// Just outside a random edge of the field
pub fn edge_spawn_position(rng: &mut impl Rng) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..FIELD_WIDTH), -SPAWN_MARGIN),
        1 => Vec2::new(FIELD_WIDTH + SPAWN_MARGIN, rng.random_range(0.0..FIELD_HEIGHT)),
        2 => Vec2::new(rng.random_range(0.0..FIELD_WIDTH), FIELD_HEIGHT + SPAWN_MARGIN),
        _ => Vec2::new(-SPAWN_MARGIN, rng.random_range(0.0..FIELD_HEIGHT)),
    }
}

/// On-field point in the ring around the player; falls back to an edge
pub fn near_spawn_position(player_pos: Vec2, rng: &mut impl Rng) -> Vec2 {
    for _ in 0..NEAR_SPAWN_ATTEMPTS {
        let angle = rng.random_range(0.0..TAU);
        let distance = rng.random_range(NEAR_SPAWN_MIN..NEAR_SPAWN_MAX);
        let raw = player_pos + angle_to_dir(angle) * distance;
        let pos = Vec2::new(
            raw.x.clamp(SPAWN_MARGIN, FIELD_WIDTH - SPAWN_MARGIN),
            raw.y.clamp(SPAWN_MARGIN, FIELD_HEIGHT - SPAWN_MARGIN),
        );
        if pos.distance(player_pos) >= NEAR_SPAWN_MIN {
            return pos;
        }
    }
    edge_spawn_position(rng)
}

fn spawn_position(world: &mut World, kind: EnemyKind) -> Vec2 {
    if kind.spawns_near_player() {
        near_spawn_position(world.player.pos, &mut world.rng)
    } else {
        edge_spawn_position(&mut world.rng)
    }
}

/// Add one regular enemy of `kind`
pub fn spawn_enemy(world: &mut World, kind: EnemyKind) {
    let pos = spawn_position(world, kind);
    let id = world.next_entity_id();
    let enemy = Enemy::new(id, kind, pos, &mut world.rng);
    log::debug!("Spawned {} #{} at ({:.0}, {:.0})", kind.name(), id, pos.x, pos.y);
    world.enemies.push(enemy);
}

/// Add the boss for `tier`
pub fn spawn_boss(world: &mut World, tier: BossTier) {
    let kind = tier.kind();
    let pos = spawn_position(world, kind);
    let id = world.next_entity_id();
    let base = Enemy::new(id, kind, pos, &mut world.rng);
    let boss = match tier {
        BossTier::Warlord => base,
        BossTier::EliteWarlord => {
            let health = base.max_health * ELITE_BOSS_HEALTH_MULT;
            Enemy {
                chest_rewards: ELITE_BOSS_CHEST_REWARDS,
                ..base.with_health(health)
            }
        }
        BossTier::Reaper => base.with_health(REAPER_HEALTH_PER_LEVEL * world.level as f32),
    };
    log::debug!("Spawned boss {} #{} with {:.0} health", kind.name(), id, boss.max_health);
    world.enemies.push(boss);
    world.events.push(GameEvent::BossSpawned { id, kind });
}
