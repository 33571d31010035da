//! Domain error types
//!
//! None of these are fatal to a run: the tick loop logs and drops them.

use thiserror::Error;

use crate::sim::loadout::PassiveKind;
use crate::sim::weapon::WeaponKind;

/// Rejected loadout change. The loadout is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadoutError {
    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),
    #[error("unknown passive item `{0}`")]
    UnknownPassive(String),
    #[error("all {capacity} weapon slots are in use")]
    WeaponSlotsFull { capacity: usize },
    #[error("all {capacity} passive slots are in use")]
    PassiveSlotsFull { capacity: usize },
    #[error("{0:?} is already held")]
    WeaponAlreadyHeld(WeaponKind),
    #[error("{0:?} is already held")]
    PassiveAlreadyHeld(PassiveKind),
    #[error("{0:?} is not held")]
    WeaponNotHeld(WeaponKind),
    #[error("{0:?} cannot level further")]
    MaxLevel(WeaponKind),
}

/// Failure loading host-side settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
