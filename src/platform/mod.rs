//! Platform abstraction layer
//!
//! The session polls input and pushes snapshots through these traits; it
//! never owns devices or windows. Two headless providers live here for the
//! native runner and tests.

use std::collections::VecDeque;

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{RunPhase, WorldView};

/// Movement axes as held keys (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Discrete key presses the session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscreteKey {
    Escape,
    /// Number row, 1-based
    Digit(u8),
}

/// Polled input device
pub trait InputProvider {
    fn is_movement_held(&self, direction: Direction) -> bool;
    /// Aim point in field coordinates
    fn aim_point(&self) -> Vec2;
    /// True once per press
    fn primary_action_edge(&mut self) -> bool;
    /// Discrete presses since the last poll, oldest first
    fn drain_discrete_keys(&mut self) -> Vec<DiscreteKey>;
}

/// Receives one snapshot per update
pub trait Renderer {
    fn render(&mut self, view: &WorldView<'_>);
}

/// Sum of held directions; opposite keys cancel
pub fn movement_vector(input: &impl InputProvider) -> Vec2 {
    Direction::ALL
        .into_iter()
        .filter(|d| input.is_movement_held(*d))
        .map(Direction::vector)
        .sum()
}

/// Input fed by the caller, for tests and replays
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    pub held: Vec<Direction>,
    pub aim: Vec2,
    /// Consumed by the next `primary_action_edge`
    pub primary: bool,
    pub keys: VecDeque<DiscreteKey>,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self {
            held: Vec::new(),
            aim: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            primary: false,
            keys: VecDeque::new(),
        }
    }
}

impl ScriptedInput {
    pub fn press(&mut self, key: DiscreteKey) {
        self.keys.push_back(key);
    }
}

impl InputProvider for ScriptedInput {
    fn is_movement_held(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }

    fn aim_point(&self) -> Vec2 {
        self.aim
    }

    fn primary_action_edge(&mut self) -> bool {
        std::mem::take(&mut self.primary)
    }

    fn drain_discrete_keys(&mut self) -> Vec<DiscreteKey> {
        self.keys.drain(..).collect()
    }
}

/// Enemies closer than this push the autopilot away
const THREAT_RADIUS: f32 = 220.0;
/// Distance from the walls where the autopilot starts steering back in
const WALL_BUFFER: f32 = 120.0;
/// Per-axis dead zone before a direction counts as held
const AXIS_DEAD_ZONE: f32 = 0.25;

/// Simple kiting bot: watches the last snapshot, backs away from nearby
/// enemies, aims at the closest one and takes the first level-up option.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    desired: Vec2,
    aim: Vec2,
    confirm_pending: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the next input from a snapshot
    pub fn observe(&mut self, view: &WorldView<'_>) {
        let me = view.player.pos;

        let mut push = Vec2::ZERO;
        let mut nearest: Option<(f32, Vec2)> = None;
        for enemy in view.enemies.iter().filter(|e| e.alive) {
            let offset = me - enemy.pos;
            let distance = offset.length();
            if distance < THREAT_RADIUS && distance > f32::EPSILON {
                push += offset / distance * (1.0 - distance / THREAT_RADIUS);
            }
            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, enemy.pos));
            }
        }

        // Drift back toward the middle near walls
        if me.x < WALL_BUFFER {
            push.x += 1.0;
        } else if me.x > FIELD_WIDTH - WALL_BUFFER {
            push.x -= 1.0;
        }
        if me.y < WALL_BUFFER {
            push.y += 1.0;
        } else if me.y > FIELD_HEIGHT - WALL_BUFFER {
            push.y -= 1.0;
        }

        // Go collect gems when nothing is close
        if push == Vec2::ZERO {
            if let Some(gem) = view.gems.iter().min_by(|a, b| {
                a.pos.distance(me).total_cmp(&b.pos.distance(me))
            }) {
                push = gem.pos - me;
            }
        }

        self.desired = push.normalize_or_zero();
        self.aim = nearest.map_or(me + Vec2::X, |(_, pos)| pos);
        self.confirm_pending = view.phase == RunPhase::LevelUp;
    }
}

impl InputProvider for Autopilot {
    fn is_movement_held(&self, direction: Direction) -> bool {
        self.desired.dot(direction.vector()) > AXIS_DEAD_ZONE
    }

    fn aim_point(&self) -> Vec2 {
        self.aim
    }

    fn primary_action_edge(&mut self) -> bool {
        std::mem::take(&mut self.confirm_pending)
    }

    fn drain_discrete_keys(&mut self) -> Vec<DiscreteKey> {
        Vec::new()
    }
}

impl Renderer for Autopilot {
    fn render(&mut self, view: &WorldView<'_>) {
        self.observe(view);
    }
}
