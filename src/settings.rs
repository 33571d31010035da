//! Run settings supplied by the host
//!
//! Loaded from JSON on the native runner. Missing fields fall back to
//! defaults, so a settings file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::AudioManager;
use crate::error::SettingsError;
use crate::sim::World;
use crate::sim::weapon::WeaponKind;

pub use crate::sim::state::RunMode;

/// Per-run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for the run
    pub seed: u64,
    pub mode: RunMode,
    /// Weapon names granted at start; unknown names are skipped
    pub starting_weapons: Vec<String>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,
            mode: RunMode::Endless,
            starting_weapons: vec![WeaponKind::MagicBolt.name().to_string()],
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Fresh world for these settings, starting weapons equipped
    pub fn new_world(&self) -> World {
        let mut world = World::new(self.seed, self.mode);
        for name in &self.starting_weapons {
            if let Err(err) = world.loadout.add_weapon_by_name(name) {
                log::warn!("Skipping starting weapon: {err}");
            }
        }
        world
    }

    pub fn apply_audio(&self, audio: &mut AudioManager) {
        audio.set_master_volume(self.master_volume);
        audio.set_sfx_volume(self.sfx_volume);
        audio.set_muted(self.muted);
    }
}
