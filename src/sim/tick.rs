//! Per-tick orchestration
//!
//! Advances a [`World`] by one variable timestep in a fixed subsystem order,
//! so identical seeds, inputs and deltas always give identical worlds.

use std::collections::BTreeMap;

use glam::Vec2;

use super::collision::outside_field;
use super::combat;
use super::enemy::{Behavior, EnemyContext, EnemyKind, FormationSlot};
use super::progression::{check_level_up, choose_reward};
use super::projectile::{Faction, Projectile};
use super::spawn::SpawnDirector;
use super::state::{RunMode, RunOutcome, RunPhase, World};
use super::weapon::fire_weapons;
use crate::consts::ENEMY_DESPAWN_MARGIN;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement, any length; normalized by the player
    pub movement: Vec2,
    /// Aim point in field coordinates
    pub aim: Option<Vec2>,
    /// Level-up option picked by number
    pub select: Option<usize>,
    /// Primary action edge; takes the first level-up option
    pub confirm: bool,
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut World, director: &mut SpawnDirector, input: &TickInput, dt: f32) {
    world.events.clear();
    let dt = dt.max(0.0);

    match world.phase {
        RunPhase::GameOver(_) => return,
        RunPhase::LevelUp => {
            let choice = input.select.or(input.confirm.then_some(0));
            if let Some(index) = choice {
                choose_reward(world, index);
            }
            return;
        }
        RunPhase::Playing => {}
    }

    world.game_time += f64::from(dt);

    // Player
    world.player.steer(input.movement, dt);

    // Spawning; newcomers wait for the next tick to move
    let settled_enemies = world.enemies.len();
    director.update(world, dt);

    // Enemy AI
    let settled_projectiles = world.projectiles.len();
    update_enemies(world, settled_enemies, dt);

    // Advance entities
    let player_pos = world.player.pos;
    let magnet_mult = world.player.magnet_mult;
    {
        let World {
            projectiles,
            area_effects,
            gems,
            enemies,
            ..
        } = world;
        for projectile in projectiles[..settled_projectiles].iter_mut() {
            projectile.advance(dt, enemies.as_slice());
        }
        for area in area_effects.iter_mut() {
            area.advance(dt, player_pos);
        }
        for gem in gems.iter_mut() {
            gem.advance(dt, player_pos, magnet_mult);
        }
    }

    // Weapons
    fire_weapons(world, input.aim, dt);

    // Collisions
    combat::resolve(world);

    // Run end
    if world.player.is_dead() {
        world.finish(RunOutcome::Defeat);
    } else if let RunMode::Timed { limit_secs } = world.mode {
        if world.game_time >= limit_secs {
            world.finish(RunOutcome::Victory);
        }
    }

    // Progression
    check_level_up(world);

    world.purge();
    world.normalize_order();
}

/// Update the first `count` enemies, turn their shots into hostile
/// projectiles and drop regular enemies that wandered far off the field
fn update_enemies(world: &mut World, count: usize, dt: f32) {
    let player_pos = world.player.pos;
    let slots = formation_slots(world, count);
    let mut shots = Vec::new();

    for (enemy, formation) in world.enemies[..count].iter_mut().zip(slots) {
        let ctx = EnemyContext {
            player_pos,
            dt,
            formation,
        };
        enemy.update(&ctx, &mut shots);
        if enemy.alive && !enemy.is_boss && outside_field(enemy.pos, ENEMY_DESPAWN_MARGIN) {
            log::debug!("{} #{} left the field", enemy.kind.name(), enemy.id);
            enemy.alive = false;
        }
    }

    for shot in shots {
        let id = world.next_entity_id();
        let projectile =
            Projectile::new(id, Faction::Hostile, shot.origin, shot.dir, shot.speed, shot.damage);
        world.projectiles.push(projectile);
    }
}

/// Index, size and centroid of each living formation soldier's group.
/// Groups are per kind and ordered by position in the enemy list.
fn formation_slots(world: &World, count: usize) -> Vec<Option<FormationSlot>> {
    let enemies = &world.enemies[..count];
    let in_formation =
        |i: usize| enemies[i].alive && matches!(enemies[i].behavior, Behavior::Formation);

    let mut groups: BTreeMap<EnemyKind, Vec<usize>> = BTreeMap::new();
    for i in (0..enemies.len()).filter(|&i| in_formation(i)) {
        groups.entry(enemies[i].kind).or_default().push(i);
    }

    let mut slots = vec![None; enemies.len()];
    for members in groups.values() {
        let centroid =
            members.iter().map(|&i| enemies[i].pos).sum::<Vec2>() / members.len() as f32;
        for (index, &i) in members.iter().enumerate() {
            slots[i] = Some(FormationSlot {
                index,
                count: members.len(),
                centroid,
            });
        }
    }
    slots
}
