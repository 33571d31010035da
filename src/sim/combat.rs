//! Collision resolution
//!
//! Six passes in a fixed order, each settled before the next starts:
//!
//! 1. player projectiles vs enemies
//! 2. area effect pulses vs enemies
//! 3. enemy contact vs player
//! 4. hostile projectiles and telegraphed strikes vs player
//! 5. gems vs player
//! 6. chests vs player
//!
//! An enemy killed in one pass is already flagged dead when the next pass
//! runs, so it cannot be hit or collided with twice.

use glam::Vec2;
use rand::Rng;

use super::enemy::Enemy;
use super::loot::{ExperienceGem, TreasureChest};
use super::progression::apply_chest_reward;
use super::projectile::Faction;
use super::state::{EntityId, GameEvent, World};
use super::weapon::EVOLVED_SLOW;
use crate::consts::{CHAIN_DAMAGE_FRACTION, CHAIN_RADIUS, CHAIN_TARGETS, CONTACT_COOLDOWN};

/// Run every pass for this tick
pub fn resolve(world: &mut World) {
    let killed = projectiles_vs_enemies(world);
    settle_deaths(world, &killed);

    let killed = areas_vs_enemies(world);
    settle_deaths(world, &killed);

    enemy_contact(world);
    hostile_hits(world);
    collect_gems(world);
    open_chests(world);
}

/// Damage one enemy and record the event. Returns true if this killed it.
fn hit_enemy(enemy: &mut Enemy, amount: f32, events: &mut Vec<GameEvent>) -> bool {
    events.push(GameEvent::EnemyDamaged {
        id: enemy.id,
        amount,
    });
    enemy.take_damage(amount)
}

/// First `CHAIN_TARGETS` living enemies near `center`, skipping `except`
fn chain_targets(enemies: &[Enemy], center: Vec2, except: usize) -> Vec<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(i, e)| *i != except && e.alive && e.pos.distance(center) <= CHAIN_RADIUS)
        .map(|(i, _)| i)
        .take(CHAIN_TARGETS)
        .collect()
}

fn projectiles_vs_enemies(world: &mut World) -> Vec<EntityId> {
    let World {
        projectiles,
        enemies,
        events,
        ..
    } = world;
    let mut killed = Vec::new();

    for projectile in projectiles.iter_mut() {
        if projectile.faction != Faction::Player {
            continue;
        }
        for index in 0..enemies.len() {
            if !projectile.alive {
                break;
            }
            let enemy = &mut enemies[index];
            if !enemy.alive
                || !projectile.can_hit(enemy.id)
                || !projectile.bounds().overlaps(&enemy.bounds())
            {
                continue;
            }

            if hit_enemy(enemy, projectile.damage, events) {
                killed.push(enemy.id);
            }
            if projectile.slow_on_hit {
                enemy.apply_slow(EVOLVED_SLOW.0, EVOLVED_SLOW.1);
            }
            let hit_pos = enemy.pos;
            projectile.register_hit(enemy.id);

            if projectile.chain {
                let splash = chain_damage(projectile.damage);
                for other in chain_targets(enemies, hit_pos, index) {
                    if hit_enemy(&mut enemies[other], splash, events) {
                        killed.push(enemies[other].id);
                    }
                }
            }
        }
    }
    killed
}

/// Whole-point share of a hit passed on to chain targets
fn chain_damage(damage: f32) -> f32 {
    (f64::from(damage) * CHAIN_DAMAGE_FRACTION).floor() as f32
}

fn areas_vs_enemies(world: &mut World) -> Vec<EntityId> {
    let World {
        area_effects,
        enemies,
        events,
        ..
    } = world;
    let mut killed = Vec::new();

    for area in area_effects.iter_mut() {
        if !area.take_pulse() {
            continue;
        }
        let zone = area.bounds();
        for enemy in enemies.iter_mut() {
            if !enemy.alive || !zone.overlaps(&enemy.bounds()) {
                continue;
            }
            if hit_enemy(enemy, area.damage, events) {
                killed.push(enemy.id);
            }
            if let Some((factor, duration)) = area.slow {
                enemy.apply_slow(factor, duration);
            }
        }
    }
    killed
}

/// Drop loot and count the kill for every enemy in `killed`
fn settle_deaths(world: &mut World, killed: &[EntityId]) {
    for &id in killed {
        let Some(enemy) = world.enemies.iter().find(|e| e.id == id) else {
            continue;
        };
        let (kind, pos, experience, score, is_boss, chance, rewards) = (
            enemy.kind,
            enemy.pos,
            enemy.experience,
            enemy.score,
            enemy.is_boss,
            enemy.chest_chance(),
            enemy.chest_rewards,
        );

        let gem_id = world.next_entity_id();
        world.gems.push(ExperienceGem::new(gem_id, pos, experience));
        world.score += u64::from(score);
        world.kills += 1;
        world.events.push(GameEvent::EnemyKilled { id, kind });

        if chance > 0.0 && world.rng.random_bool(chance) {
            let chest_id = world.next_entity_id();
            let chest = TreasureChest::roll(chest_id, pos, rewards, &mut world.rng);
            world.chests.push(chest);
        }
        if is_boss {
            world.events.push(GameEvent::BossDefeated { id, kind });
            log::info!("{} defeated", kind.name());
        }
    }
}

fn enemy_contact(world: &mut World) {
    let World {
        player,
        enemies,
        events,
        ..
    } = world;
    let body = player.bounds();

    for enemy in enemies.iter_mut() {
        if !enemy.alive || enemy.contact_cooldown > 0.0 || !body.overlaps(&enemy.bounds()) {
            continue;
        }
        let amount = enemy.contact_damage();
        player.take_damage(amount);
        events.push(GameEvent::PlayerDamaged { amount });

        // Contact kills give no loot
        if enemy.contact_destructible {
            enemy.alive = false;
        } else {
            enemy.contact_cooldown = CONTACT_COOLDOWN;
        }
    }
}

fn hostile_hits(world: &mut World) {
    let World {
        player,
        enemies,
        projectiles,
        events,
        ..
    } = world;
    let body = player.bounds();

    for projectile in projectiles.iter_mut() {
        if projectile.faction != Faction::Hostile
            || !projectile.alive
            || !body.overlaps(&projectile.bounds())
        {
            continue;
        }
        player.take_damage(projectile.damage);
        events.push(GameEvent::PlayerDamaged {
            amount: projectile.damage,
        });
        projectile.alive = false;
    }

    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        let Some(zone) = enemy.strike_zone() else {
            continue;
        };
        if zone.overlaps(&body) {
            let amount = enemy.strike_damage();
            player.take_damage(amount);
            events.push(GameEvent::PlayerDamaged { amount });
            enemy.mark_strike_landed();
        }
    }
}

fn collect_gems(world: &mut World) {
    let body = world.player.bounds();
    for gem in world.gems.iter_mut() {
        if gem.alive && body.overlaps(&gem.bounds()) {
            gem.alive = false;
            world.experience += gem.value;
        }
    }
}

fn open_chests(world: &mut World) {
    let body = world.player.bounds();
    for index in 0..world.chests.len() {
        let chest = &mut world.chests[index];
        if !chest.alive || !body.overlaps(&chest.bounds()) {
            continue;
        }
        chest.alive = false;
        let id = chest.id;
        let rewards = std::mem::take(&mut chest.rewards);
        log::info!("Chest opened with {} reward(s)", rewards.len());
        world.events.push(GameEvent::ChestOpened { id });
        for reward in rewards {
            apply_chest_reward(world, reward);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::loot::ChestReward;
    use crate::sim::projectile::Projectile;
    use crate::sim::state::RunMode;

    fn world() -> World {
        World::new(7, RunMode::Endless)
    }

    fn add_enemy(world: &mut World, kind: EnemyKind, pos: Vec2) -> usize {
        let id = world.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, &mut world.rng);
        world.enemies.push(enemy);
        world.enemies.len() - 1
    }

    fn add_shot(world: &mut World, pos: Vec2, damage: f32) -> usize {
        let id = world.next_entity_id();
        let shot = Projectile::new(id, Faction::Player, pos, Vec2::X, 0.0, damage);
        world.projectiles.push(shot);
        world.projectiles.len() - 1
    }

    const FAR: Vec2 = Vec2::new(100.0, 100.0);

    #[test]
    fn test_non_penetrating_projectile_hits_once() {
        let mut world = world();
        let e = add_enemy(&mut world, EnemyKind::Tank, FAR);
        let p = add_shot(&mut world, FAR, 5.0);
        resolve(&mut world);
        assert!(!world.projectiles[p].alive);
        assert_eq!(world.enemies[e].health, 45.0);
    }

    #[test]
    fn test_penetrating_projectile_survives() {
        let mut world = world();
        let e = add_enemy(&mut world, EnemyKind::Tank, FAR);
        let p = add_shot(&mut world, FAR, 5.0);
        world.projectiles[p].penetrating = true;
        resolve(&mut world);
        assert!(world.projectiles[p].alive);
        assert_eq!(world.enemies[e].health, 45.0);

        // Same tick again: rehit delay still running
        resolve(&mut world);
        assert_eq!(world.enemies[e].health, 45.0);
    }

    #[test]
    fn test_kill_drops_one_gem_and_scores() {
        let mut world = world();
        add_enemy(&mut world, EnemyKind::Slime, FAR);
        add_shot(&mut world, FAR, 50.0);
        resolve(&mut world);
        assert_eq!(world.gems.len(), 1);
        assert_eq!(world.gems[0].value, 25);
        assert_eq!(world.score, 10);
        assert_eq!(world.kills, 1);
        assert!(world.chests.is_empty());
    }

    #[test]
    fn test_contact_destroys_ordinary_enemy() {
        let mut world = world();
        let center = world.player.pos;
        let e = add_enemy(&mut world, EnemyKind::Slime, center);
        world.enemies[e].contact_damage = 10.0;
        resolve(&mut world);
        assert_eq!(world.player.health, 90.0);
        assert!(!world.enemies[e].alive);
        assert!(world.gems.is_empty(), "contact kills drop nothing");
        assert_eq!(world.kills, 0);
    }

    #[test]
    fn test_elite_is_destroyed_on_contact_without_loot() {
        let mut world = world();
        let center = world.player.pos;
        let e = add_enemy(&mut world, EnemyKind::Ogre, center);
        let damage = world.enemies[e].contact_damage();
        resolve(&mut world);
        assert_eq!(world.player.health, 100.0 - damage);
        assert!(!world.enemies[e].alive);
        assert!(world.gems.is_empty() && world.chests.is_empty());
        assert_eq!(world.kills, 0);
    }

    #[test]
    fn test_boss_survives_contact() {
        let mut world = world();
        let center = world.player.pos;
        let e = add_enemy(&mut world, EnemyKind::Warlord, center);
        resolve(&mut world);
        assert_eq!(world.player.health, 75.0);
        assert!(world.enemies[e].alive);

        // Cooldown blocks an immediate second hit
        resolve(&mut world);
        assert_eq!(world.player.health, 75.0);
    }

    #[test]
    fn test_chain_damage() {
        let mut world = world();
        let first = add_enemy(&mut world, EnemyKind::Tank, FAR);
        let near: Vec<usize> = (1..=4)
            .map(|i| add_enemy(&mut world, EnemyKind::Tank, FAR + Vec2::new(0.0, 30.0 * i as f32)))
            .collect();
        let out_of_range = add_enemy(&mut world, EnemyKind::Tank, FAR + Vec2::new(400.0, 0.0));
        let p = add_shot(&mut world, FAR, 10.0);
        world.projectiles[p].chain = true;

        resolve(&mut world);
        assert_eq!(world.enemies[first].health, 40.0);
        for &i in &near[..3] {
            assert_eq!(world.enemies[i].health, 43.0);
        }
        assert_eq!(world.enemies[near[3]].health, 50.0, "only three chain targets");
        assert_eq!(world.enemies[out_of_range].health, 50.0);
    }

    #[test]
    fn test_chain_damage_rounds_down() {
        assert_eq!(chain_damage(10.0), 7.0);
        assert_eq!(chain_damage(15.0), 10.0);
        assert_eq!(chain_damage(25.0), 17.0);
        assert_eq!(chain_damage(1.0), 0.0);
    }

    #[test]
    fn test_area_pulse_is_tick_gated() {
        let mut world = world();
        let e = add_enemy(&mut world, EnemyKind::Tank, FAR);
        let id = world.next_entity_id();
        let mut area = crate::sim::projectile::AreaEffect::new(id, FAR, 50.0, 4.0);
        area.slow = Some((0.5, 1.0));
        world.area_effects.push(area);

        resolve(&mut world);
        assert_eq!(world.enemies[e].health, 50.0);

        world.area_effects[0].advance(2.0, Vec2::ZERO);
        resolve(&mut world);
        assert_eq!(world.enemies[e].health, 46.0);
        assert_eq!(world.enemies[e].slow_multiplier, 0.5);
        resolve(&mut world);
        assert_eq!(world.enemies[e].health, 46.0);
    }

    #[test]
    fn test_gem_pickup() {
        let mut world = world();
        let id = world.next_entity_id();
        let pos = world.player.pos;
        world.gems.push(ExperienceGem::new(id, pos, 30));
        resolve(&mut world);
        assert_eq!(world.experience, 50);
        assert!(!world.gems[0].alive);
    }

    #[test]
    fn test_chest_pickup_applies_rewards() {
        let mut world = world();
        world.player.health = 40.0;
        let id = world.next_entity_id();
        let pos = world.player.pos;
        world.chests.push(TreasureChest {
            id,
            pos,
            rewards: vec![ChestReward::Heal, ChestReward::ExperienceBonus],
            alive: true,
        });
        resolve(&mut world);
        assert_eq!(world.player.health, 70.0);
        assert_eq!(world.experience, 50);
        assert!(!world.chests[0].alive);
        assert!(world.events.contains(&GameEvent::ChestOpened { id }));
    }

    #[test]
    fn test_boss_kill_drops_chest() {
        let mut world = world();
        let e = add_enemy(&mut world, EnemyKind::Warlord, FAR);
        add_shot(&mut world, FAR, 1000.0);
        resolve(&mut world);
        assert!(!world.enemies[e].alive);
        assert_eq!(world.chests.len(), 1);
        assert_eq!(world.chests[0].rewards.len(), 3);
        assert!(
            world
                .events
                .iter()
                .any(|ev| matches!(ev, GameEvent::BossDefeated { .. }))
        );
    }

    #[test]
    fn test_hostile_shot_hits_player() {
        let mut world = world();
        let id = world.next_entity_id();
        let pos = world.player.pos;
        world
            .projectiles
            .push(Projectile::new(id, Faction::Hostile, pos, Vec2::X, 0.0, 12.0));
        resolve(&mut world);
        assert_eq!(world.player.health, 88.0);
        assert!(!world.projectiles[0].alive);
    }

    #[test]
    fn test_sweep_lands_once_for_double_damage() {
        let mut world = world();
        let pos = Vec2::new(100.0, world.player.pos.y);
        let e = add_enemy(&mut world, EnemyKind::Reaper, pos);
        if let crate::sim::enemy::Behavior::Reaper(reaper) = &mut world.enemies[e].behavior {
            reaper.mode = crate::sim::enemy::ScytheMode::ScytheSweep;
        }
        resolve(&mut world);
        assert_eq!(world.player.health, 0.0);

        world.player.health = 100.0;
        resolve(&mut world);
        assert_eq!(world.player.health, 100.0, "strike already landed");
    }
}
