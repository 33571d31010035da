//! Experience gems and treasure chests

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::EntityId;
use crate::move_toward;

/// Base distance at which a gem starts flying to the player
pub const GEM_MAGNET_RANGE: f32 = 80.0;
pub const GEM_MAGNET_SPEED: f32 = 200.0;
pub const CHEST_SIZE: Vec2 = Vec2::new(32.0, 24.0);

/// Chest heal amount
pub const CHEST_HEAL: f32 = 30.0;
/// Chest experience bonus
pub const CHEST_EXPERIENCE: u32 = 50;

/// Gem size class, fixed by the dropping enemy's experience value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GemTier {
    Small,
    Medium,
    Large,
}

impl GemTier {
    pub fn from_experience(experience: u32) -> Self {
        if experience >= 50 {
            GemTier::Large
        } else if experience >= 25 {
            GemTier::Medium
        } else {
            GemTier::Small
        }
    }

    /// Experience granted on pickup
    pub fn value(self) -> u32 {
        match self {
            GemTier::Small => 25,
            GemTier::Medium => 50,
            GemTier::Large => 100,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            GemTier::Small => 12.0,
            GemTier::Medium => 14.0,
            GemTier::Large => 16.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceGem {
    pub id: EntityId,
    pub pos: Vec2,
    pub tier: GemTier,
    pub value: u32,
    /// Once set, the gem chases the player until collected
    pub attracted: bool,
    pub alive: bool,
}

impl ExperienceGem {
    pub fn new(id: EntityId, pos: Vec2, source_experience: u32) -> Self {
        let tier = GemTier::from_experience(source_experience);
        Self {
            id,
            pos,
            tier,
            value: tier.value(),
            attracted: false,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.tier.size()))
    }

    pub fn advance(&mut self, dt: f32, player_pos: Vec2, magnet_mult: f32) {
        if !self.alive {
            return;
        }
        if !self.attracted && self.pos.distance(player_pos) <= GEM_MAGNET_RANGE * magnet_mult {
            self.attracted = true;
        }
        if self.attracted {
            self.pos = move_toward(self.pos, player_pos, GEM_MAGNET_SPEED, dt);
        }
    }
}

/// One entry in a chest, resolved against the loadout when opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestReward {
    Heal,
    PassiveUnlock,
    WeaponLevelUp,
    ExperienceBonus,
}

impl ChestReward {
    pub const ALL: [ChestReward; 4] = [
        ChestReward::Heal,
        ChestReward::PassiveUnlock,
        ChestReward::WeaponLevelUp,
        ChestReward::ExperienceBonus,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasureChest {
    pub id: EntityId,
    pub pos: Vec2,
    pub rewards: Vec<ChestReward>,
    pub alive: bool,
}

impl TreasureChest {
    /// Chest with `count` rewards drawn uniformly (repeats allowed)
    pub fn roll(id: EntityId, pos: Vec2, count: usize, rng: &mut impl Rng) -> Self {
        let rewards = (0..count)
            .map(|_| ChestReward::ALL[rng.random_range(0..ChestReward::ALL.len())])
            .collect();
        Self {
            id,
            pos,
            rewards,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, CHEST_SIZE)
    }
}
