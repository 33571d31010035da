//! Horde Survivor - simulation core for a survive-the-endless-horde arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, weapons, combat, progression)
//! - `session`: Run lifecycle facade the host shell talks to
//! - `platform`: Input/renderer collaborator traits and headless providers
//! - `audio`: Named sound cues and the sink they are sent to
//! - `settings`: Host-side run settings

pub mod audio;
pub mod error;
pub mod logging;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, SoundCue};
pub use error::{LoadoutError, SettingsError};
pub use session::Session;
pub use settings::{RunMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default fixed step used by headless hosts (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest delta a single update will simulate (hitches are clamped)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Slack for interval timers summed from f32 frame deltas
    pub const TIMER_EPSILON: f32 = 1e-4;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 720.0;
    /// Off-field margin for edge spawns
    pub const SPAWN_MARGIN: f32 = 50.0;
    /// Projectiles further than this outside the field are dropped
    pub const PROJECTILE_DESPAWN_MARGIN: f32 = 50.0;
    /// Non-boss enemies further than this outside the field are dropped
    pub const ENEMY_DESPAWN_MARGIN: f32 = 300.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Loadout capacity
    pub const MAX_WEAPONS: usize = 6;
    pub const MAX_PASSIVES: usize = 6;
    /// Weapon level ceiling before evolution
    pub const WEAPON_MAX_LEVEL: u32 = 8;

    /// Chain damage: targets, search radius, damage fraction
    pub const CHAIN_TARGETS: usize = 3;
    pub const CHAIN_RADIUS: f32 = 150.0;
    pub const CHAIN_DAMAGE_FRACTION: f64 = 0.7;

    /// Chance an elite drops a chest on death
    pub const ELITE_CHEST_CHANCE: f64 = 0.3;

    /// Seconds an undestroyed enemy waits before its next contact hit
    pub const CONTACT_COOLDOWN: f32 = 0.5;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit vector pointing at `angle` radians
#[inline]
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Direction from `from` to `to`, or zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Step `pos` toward `target` by `speed * dt`, stopping on arrival
#[inline]
pub fn move_toward(pos: Vec2, target: Vec2, speed: f32, dt: f32) -> Vec2 {
    let to_target = target - pos;
    let step = speed * dt;
    if to_target.length() <= step {
        target
    } else {
        pos + to_target.normalize_or_zero() * step
    }
}
