//! Projectiles and area effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, outside_field};
use super::enemy::Enemy;
use super::state::EntityId;
use crate::consts::{PROJECTILE_DESPAWN_MARGIN, TIMER_EPSILON};
use crate::direction_to;

/// Seconds a projectile lives unless something else removes it first
pub const PROJECTILE_LIFETIME: f32 = 6.0;
/// Default projectile box edge
pub const PROJECTILE_SIZE: f32 = 6.0;
/// A piercing projectile ignores an enemy it already hit for this long
pub const PIERCE_REHIT_DELAY: f32 = 0.25;
/// Seconds between damage pulses of an area effect
pub const AREA_TICK_INTERVAL: f32 = 2.0;

/// Who a projectile can hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Fired by the player's weapons; hits enemies
    Player,
    /// Fired by enemies; hits the player
    Hostile,
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub faction: Faction,
    pub pos: Vec2,
    /// Unit vector
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub size: Vec2,
    pub penetrating: bool,
    /// Weak reference, re-resolved every tick
    pub homing_target: Option<EntityId>,
    pub chain: bool,
    pub slow_on_hit: bool,
    /// Seconds left
    pub lifetime: f32,
    /// Enemies recently pierced and the seconds until they can be hit again
    pub recent_hits: Vec<(EntityId, f32)>,
    pub alive: bool,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        faction: Faction,
        pos: Vec2,
        dir: Vec2,
        speed: f32,
        damage: f32,
    ) -> Self {
        Self {
            id,
            faction,
            pos,
            dir: dir.normalize_or_zero(),
            speed,
            damage,
            size: Vec2::splat(PROJECTILE_SIZE),
            penetrating: false,
            homing_target: None,
            chain: false,
            slow_on_hit: false,
            lifetime: PROJECTILE_LIFETIME,
            recent_hits: Vec::new(),
            alive: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Steer toward a live homing target, move, and expire
    pub fn advance(&mut self, dt: f32, enemies: &[Enemy]) {
        if !self.alive {
            return;
        }

        if let Some(target_id) = self.homing_target {
            match enemies.iter().find(|e| e.id == target_id && e.alive) {
                Some(target) => {
                    let dir = direction_to(self.pos, target.pos);
                    if dir != Vec2::ZERO {
                        self.dir = dir;
                    }
                }
                // Dead target: keep flying straight
                None => self.homing_target = None,
            }
        }

        self.pos += self.dir * self.speed * dt;
        self.lifetime -= dt;
        for (_, wait) in &mut self.recent_hits {
            *wait -= dt;
        }
        self.recent_hits.retain(|(_, wait)| *wait > 0.0);

        if self.lifetime <= 0.0 || outside_field(self.pos, PROJECTILE_DESPAWN_MARGIN) {
            self.alive = false;
        }
    }

    pub fn can_hit(&self, enemy: EntityId) -> bool {
        self.alive && !self.recent_hits.iter().any(|(id, _)| *id == enemy)
    }

    /// Resolve one hit: piercing shots remember the target, others are spent
    pub fn register_hit(&mut self, enemy: EntityId) {
        if self.penetrating {
            self.recent_hits.push((enemy, PIERCE_REHIT_DELAY));
        } else {
            self.alive = false;
        }
    }
}

/// A damage zone, optionally riding on the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEffect {
    pub id: EntityId,
    pub center: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub tick_interval: f32,
    pub tick_timer: f32,
    /// `None` means it lasts until removed
    pub remaining: Option<f32>,
    pub follows_player: bool,
    pub evolved: bool,
    /// Slow factor and duration applied on each pulse
    pub slow: Option<(f32, f32)>,
    pub alive: bool,
}

impl AreaEffect {
    pub fn new(id: EntityId, center: Vec2, radius: f32, damage: f32) -> Self {
        Self {
            id,
            center,
            radius,
            damage,
            tick_interval: AREA_TICK_INTERVAL,
            tick_timer: 0.0,
            remaining: None,
            follows_player: false,
            evolved: false,
            slow: None,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.center, self.radius)
    }

    pub fn advance(&mut self, dt: f32, player_pos: Vec2) {
        if !self.alive {
            return;
        }
        if self.follows_player {
            self.center = player_pos;
        }
        self.tick_timer += dt;
        if let Some(remaining) = &mut self.remaining {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.alive = false;
            }
        }
    }

    /// Consume a pending damage pulse, if one is due
    pub fn take_pulse(&mut self) -> bool {
        if self.alive && self.tick_timer >= self.tick_interval - TIMER_EPSILON {
            self.tick_timer = (self.tick_timer - self.tick_interval).min(self.tick_interval);
            true
        } else {
            false
        }
    }
}
