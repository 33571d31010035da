//! Experience, level-ups and rewards
//!
//! Gems feed `World::experience`. Crossing the threshold raises the level,
//! recomputes the threshold and rolls up to four distinct reward options with
//! a weighted sampler over the four reward categories. While options are
//! pending the run sits in [`RunPhase::LevelUp`].

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::loadout::PassiveKind;
use super::loot::{CHEST_EXPERIENCE, CHEST_HEAL, ChestReward};
use super::state::{GameEvent, RunPhase, World};
use super::weapon::{WeaponKind, refresh_fields};

/// Options offered per level-up
pub const MAX_REWARD_OPTIONS: usize = 4;
/// Full heal is only offered below this health
pub const FULL_HEAL_HEALTH_GATE: f32 = 70.0;

const MIGHT_BONUS: f32 = 0.1;
const SWIFTNESS_BONUS: f32 = 0.1;
const MAGNET_MULT: f32 = 3.0;

/// Experience needed to go from `level` to `level + 1`
pub fn experience_threshold(level: u32) -> u32 {
    (100.0 * (level as f64).powf(1.5)).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardCategory {
    WeaponUpgrade,
    NewWeapon,
    Passive,
    Special,
}

impl RewardCategory {
    pub const ALL: [RewardCategory; 4] = [
        RewardCategory::WeaponUpgrade,
        RewardCategory::NewWeapon,
        RewardCategory::Passive,
        RewardCategory::Special,
    ];

    pub fn weight(self) -> u32 {
        match self {
            RewardCategory::WeaponUpgrade => 4,
            RewardCategory::NewWeapon => 3,
            RewardCategory::Passive => 2,
            RewardCategory::Special => 1,
        }
    }
}

/// A level-up option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    UpgradeWeapon(WeaponKind),
    NewWeapon(WeaponKind),
    Passive(PassiveKind),
    FullHeal,
}

impl Reward {
    pub fn category(self) -> RewardCategory {
        match self {
            Reward::UpgradeWeapon(_) => RewardCategory::WeaponUpgrade,
            Reward::NewWeapon(_) => RewardCategory::NewWeapon,
            Reward::Passive(_) => RewardCategory::Passive,
            Reward::FullHeal => RewardCategory::Special,
        }
    }

    pub fn label(self) -> String {
        match self {
            Reward::UpgradeWeapon(kind) => format!("Upgrade {}", kind.name()),
            Reward::NewWeapon(kind) => format!("New weapon: {}", kind.name()),
            Reward::Passive(kind) => format!("Passive: {}", kind.name()),
            Reward::FullHeal => "Full heal".to_string(),
        }
    }
}

/// Everything that could be offered right now
pub fn reward_candidates(world: &World) -> Vec<Reward> {
    let loadout = &world.loadout;
    let mut candidates: Vec<Reward> = loadout
        .upgradable_weapons()
        .into_iter()
        .map(Reward::UpgradeWeapon)
        .collect();
    candidates.extend(loadout.available_weapons().into_iter().map(Reward::NewWeapon));
    candidates.extend(loadout.available_passives().into_iter().map(Reward::Passive));
    if world.player.health < FULL_HEAL_HEALTH_GATE {
        candidates.push(Reward::FullHeal);
    }
    candidates
}

/// Draw up to `max` distinct rewards: pick a category by weight among the
/// non-empty ones, then an entry of that category uniformly.
pub fn sample_options(candidates: &[Reward], max: usize, rng: &mut impl Rng) -> Vec<Reward> {
    let mut pools: Vec<(RewardCategory, Vec<Reward>)> = RewardCategory::ALL
        .into_iter()
        .map(|category| {
            let pool = candidates
                .iter()
                .copied()
                .filter(|r| r.category() == category)
                .collect();
            (category, pool)
        })
        .collect();

    let mut options = Vec::with_capacity(max);
    while options.len() < max {
        pools.retain(|(_, pool)| !pool.is_empty());
        let Ok(dist) = WeightedIndex::new(pools.iter().map(|(category, _)| category.weight()))
        else {
            break;
        };
        let pool = &mut pools[dist.sample(rng)].1;
        let pick = rng.random_range(0..pool.len());
        options.push(pool.swap_remove(pick));
    }
    options
}

/// Consume experience for any crossed thresholds. Stops at the first level
/// that has options to offer and pauses for selection.
pub fn check_level_up(world: &mut World) {
    while !world.is_over() && world.experience >= world.experience_to_next {
        world.experience -= world.experience_to_next;
        world.level += 1;
        world.experience_to_next = experience_threshold(world.level);
        world.events.push(GameEvent::LevelUp { level: world.level });

        let candidates = reward_candidates(world);
        let options = sample_options(&candidates, MAX_REWARD_OPTIONS, &mut world.rng);
        log::info!(
            "Level {} reached ({} option(s), next at {})",
            world.level,
            options.len(),
            world.experience_to_next
        );
        if !options.is_empty() {
            world.pending_rewards = options;
            world.phase = RunPhase::LevelUp;
            break;
        }
    }
}

/// Take option `index` and resume play. Ignored outside level-up selection.
pub fn choose_reward(world: &mut World, index: usize) -> bool {
    if world.phase != RunPhase::LevelUp {
        return false;
    }
    let Some(reward) = world.pending_rewards.get(index).copied() else {
        log::debug!("No level-up option at index {index}");
        return false;
    };
    world.pending_rewards.clear();
    world.phase = RunPhase::Playing;
    log::info!("Chose {}", reward.label());
    apply_reward(world, reward);
    true
}

pub fn apply_reward(world: &mut World, reward: Reward) {
    match reward {
        Reward::UpgradeWeapon(kind) => match world.loadout.level_weapon(kind) {
            Ok(true) => world.events.push(GameEvent::WeaponEvolved { kind }),
            Ok(false) => {}
            Err(err) => log::warn!("Upgrade rejected: {err}"),
        },
        Reward::NewWeapon(kind) => {
            if let Err(err) = world.loadout.add_weapon(kind) {
                log::warn!("New weapon rejected: {err}");
            }
        }
        Reward::Passive(kind) => {
            grant_passive(world, kind);
        }
        Reward::FullHeal => {
            let max = world.player.max_health;
            world.player.heal(max);
        }
    }
    refresh_fields(world);
}

/// Add a passive and apply its stat bonus and any evolutions it unlocks
pub fn grant_passive(world: &mut World, kind: PassiveKind) -> bool {
    let evolved = match world.loadout.add_passive(kind) {
        Ok(evolved) => evolved,
        Err(err) => {
            log::warn!("Passive rejected: {err}");
            return false;
        }
    };
    let player = &mut world.player;
    match kind {
        PassiveKind::Might => player.damage_mult += MIGHT_BONUS,
        PassiveKind::Swiftness => player.speed_mult += SWIFTNESS_BONUS,
        PassiveKind::Magnet => player.magnet_mult = MAGNET_MULT,
        PassiveKind::AmplifyingCrystal | PassiveKind::NinjaScroll | PassiveKind::RuneTablet => {}
    }
    world
        .events
        .extend(evolved.into_iter().map(|kind| GameEvent::WeaponEvolved { kind }));
    true
}

/// Resolve one chest entry against the current loadout
pub fn apply_chest_reward(world: &mut World, reward: ChestReward) {
    match reward {
        ChestReward::Heal => world.player.heal(CHEST_HEAL),
        ChestReward::PassiveUnlock => {
            let available = world.loadout.available_passives();
            if available.is_empty() {
                log::debug!("Chest passive skipped, nothing left to unlock");
                return;
            }
            let kind = available[world.rng.random_range(0..available.len())];
            grant_passive(world, kind);
            refresh_fields(world);
        }
        ChestReward::WeaponLevelUp => {
            let upgradable = world.loadout.upgradable_weapons();
            if upgradable.is_empty() {
                log::debug!("Chest level-up skipped, nothing upgradable");
                return;
            }
            let kind = upgradable[world.rng.random_range(0..upgradable.len())];
            apply_reward(world, Reward::UpgradeWeapon(kind));
        }
        ChestReward::ExperienceBonus => world.experience += CHEST_EXPERIENCE,
    }
}
