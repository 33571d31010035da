//! World state and core simulation types
//!
//! Everything a run mutates lives in [`World`]. Subsystems borrow it for the
//! duration of one call and keep entity ids, never references, across ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, clamp_to_field};
use super::enemy::{Enemy, EnemyKind};
use super::loadout::Loadout;
use super::loot::{ExperienceGem, TreasureChest};
use super::progression::{Reward, experience_threshold};
use super::projectile::{AreaEffect, Projectile};
use super::weapon::WeaponKind;
use crate::consts::*;

/// Stable entity identifier, unique for the lifetime of a run
pub type EntityId = u32;

/// How a run ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum RunMode {
    /// Only player death ends the run
    #[default]
    Endless,
    /// Surviving `limit_secs` wins the run
    Timed { limit_secs: f64 },
}

/// Terminal result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Playing,
    /// Waiting for the player to pick one of `World::pending_rewards`
    LevelUp,
    /// Run ended
    GameOver(RunOutcome),
}

impl RunPhase {
    /// Level-up selection and game over both freeze the world
    pub fn is_paused(&self) -> bool {
        !matches!(self, RunPhase::Playing)
    }
}

/// Things that happened during the last tick, drained by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDamaged { id: EntityId, amount: f32 },
    PlayerDamaged { amount: f32 },
    EnemyKilled { id: EntityId, kind: EnemyKind },
    WaveChanged { index: usize },
    BossSpawned { id: EntityId, kind: EnemyKind },
    BossDefeated { id: EntityId, kind: EnemyKind },
    ChestOpened { id: EntityId },
    LevelUp { level: u32 },
    WeaponEvolved { kind: WeaponKind },
    RunOver { outcome: RunOutcome },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Unit-length or zero
    pub movement: Vec2,
    /// Last non-zero movement direction
    pub facing: Vec2,
    pub base_speed: f32,
    /// Multiplier applied to all outgoing weapon damage
    pub damage_mult: f32,
    pub speed_mult: f32,
    /// Multiplier on gem attraction range
    pub magnet_mult: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            movement: Vec2::ZERO,
            facing: Vec2::X,
            base_speed: PLAYER_SPEED,
            damage_mult: 1.0,
            speed_mult: 1.0,
            magnet_mult: 1.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_mult
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Move along `input` (any length; diagonals are normalized) and stay on the field
    pub fn steer(&mut self, input: Vec2, dt: f32) {
        self.movement = input.normalize_or_zero();
        if self.movement != Vec2::ZERO {
            self.facing = self.movement;
        }
        self.pos = clamp_to_field(self.pos + self.movement * self.speed() * dt, self.size);
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// End-of-run numbers for the shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub survived_secs: f64,
    pub score: u64,
    pub kills: u32,
    pub level: u32,
    pub outcome: Option<RunOutcome>,
}

/// Monotonic id source
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: EntityId,
}

impl IdAllocator {
    pub fn next(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub rng: Pcg32,
    pub mode: RunMode,
    /// Seconds of unpaused play
    pub game_time: f64,
    pub phase: RunPhase,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player and hostile projectiles
    pub projectiles: Vec<Projectile>,
    pub area_effects: Vec<AreaEffect>,
    pub gems: Vec<ExperienceGem>,
    pub chests: Vec<TreasureChest>,
    pub loadout: Loadout,

    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    /// Options offered while in `RunPhase::LevelUp`
    pub pending_rewards: Vec<Reward>,

    pub score: u64,
    pub kills: u32,

    /// Cleared at the start of every tick
    pub events: Vec<GameEvent>,
    pub ids: IdAllocator,
}

impl World {
    /// Fresh run: player centered, no weapons, level 1
    pub fn new(seed: u64, mode: RunMode) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode,
            game_time: 0.0,
            phase: RunPhase::Playing,
            player: Player::new(Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0)),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            area_effects: Vec::new(),
            gems: Vec::new(),
            chests: Vec::new(),
            loadout: Loadout::new(),
            level: 1,
            experience: 0,
            experience_to_next: experience_threshold(1),
            pending_rewards: Vec::new(),
            score: 0,
            kills: 0,
            events: Vec::new(),
            ids: IdAllocator::default(),
        }
    }

    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next()
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id && e.alive)
    }

    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, RunPhase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            RunPhase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            survived_secs: self.game_time,
            score: self.score,
            kills: self.kills,
            level: self.level,
            outcome: self.outcome(),
        }
    }

    /// Drop every entity whose alive flag is cleared
    pub fn purge(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.projectiles.retain(|p| p.alive);
        self.area_effects.retain(|a| a.alive);
        self.gems.retain(|g| g.alive);
        self.chests.retain(|c| c.alive);
    }

    /// Sort collections by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.area_effects.sort_by_key(|a| a.id);
        self.gems.sort_by_key(|g| g.id);
        self.chests.sort_by_key(|c| c.id);
    }

    /// End the run once, recording the outcome
    pub fn finish(&mut self, outcome: RunOutcome) {
        if self.is_over() {
            return;
        }
        self.phase = RunPhase::GameOver(outcome);
        self.pending_rewards.clear();
        self.events.push(GameEvent::RunOver { outcome });
        log::info!(
            "Run over ({:?}) at {:.1}s: level {}, {} kills, score {}",
            outcome,
            self.game_time,
            self.level,
            self.kills,
            self.score
        );
    }
}
