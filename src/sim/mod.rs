//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! The step length is supplied by the caller each tick.

pub mod collision;
pub mod combat;
pub mod enemy;
pub mod loadout;
pub mod loot;
pub mod progression;
pub mod projectile;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod view;
pub mod weapon;

pub use collision::{Rect, aabb_overlap};
pub use enemy::{Enemy, EnemyKind};
pub use loadout::{Loadout, PassiveKind};
pub use loot::{ChestReward, ExperienceGem, GemTier, TreasureChest};
pub use progression::{Reward, RewardCategory, experience_threshold};
pub use projectile::{AreaEffect, Faction, Projectile};
pub use spawn::SpawnDirector;
pub use state::{
    EntityId, GameEvent, Player, RunMode, RunOutcome, RunPhase, RunSummary, World,
};
pub use tick::{TickInput, tick};
pub use view::WorldView;
pub use weapon::{Weapon, WeaponKind};
