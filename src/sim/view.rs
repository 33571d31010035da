//! Read-only snapshot handed to renderers once per tick

use serde::Serialize;

use super::enemy::Enemy;
use super::loadout::Loadout;
use super::loot::{ExperienceGem, TreasureChest};
use super::progression::Reward;
use super::projectile::{AreaEffect, Projectile};
use super::state::{Player, RunPhase, World};

/// Borrowed view of everything a renderer may draw
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WorldView<'a> {
    pub game_time: f64,
    pub phase: RunPhase,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub score: u64,
    pub kills: u32,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub area_effects: &'a [AreaEffect],
    pub gems: &'a [ExperienceGem],
    pub chests: &'a [TreasureChest],
    pub loadout: &'a Loadout,
    /// Non-empty only during level-up selection
    pub pending_rewards: &'a [Reward],
}

impl World {
    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            game_time: self.game_time,
            phase: self.phase,
            level: self.level,
            experience: self.experience,
            experience_to_next: self.experience_to_next,
            score: self.score,
            kills: self.kills,
            player: &self.player,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            area_effects: &self.area_effects,
            gems: &self.gems,
            chests: &self.chests,
            loadout: &self.loadout,
            pending_rewards: &self.pending_rewards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RunMode;

    #[test]
    fn test_view_serializes() {
        let mut world = World::new(1, RunMode::Endless);
        world.loadout.add_weapon_by_name("Fire Ball").unwrap();
        let json = serde_json::to_value(world.view()).unwrap();
        assert_eq!(json["level"], 1);
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["loadout"]["weapons"][0]["kind"], "FireBall");
        assert!(json["enemies"].as_array().unwrap().is_empty());
    }
}
