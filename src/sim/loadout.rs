//! Weapon and passive slots
//!
//! Every operation either succeeds completely or returns a [`LoadoutError`]
//! and leaves the loadout exactly as it was.

use serde::{Deserialize, Serialize};

use super::weapon::{Weapon, WeaponKind};
use crate::consts::{MAX_PASSIVES, MAX_WEAPONS};
use crate::error::LoadoutError;

/// Passive items. The first three unlock weapon evolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PassiveKind {
    AmplifyingCrystal,
    NinjaScroll,
    RuneTablet,
    /// +10% weapon damage
    Might,
    /// +10% move speed
    Swiftness,
    /// Triple gem pickup range
    Magnet,
}

impl PassiveKind {
    pub const ALL: [PassiveKind; 6] = [
        PassiveKind::AmplifyingCrystal,
        PassiveKind::NinjaScroll,
        PassiveKind::RuneTablet,
        PassiveKind::Might,
        PassiveKind::Swiftness,
        PassiveKind::Magnet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassiveKind::AmplifyingCrystal => "Amplifying Crystal",
            PassiveKind::NinjaScroll => "Ninja Scroll",
            PassiveKind::RuneTablet => "Rune Tablet",
            PassiveKind::Might => "Might",
            PassiveKind::Swiftness => "Swiftness",
            PassiveKind::Magnet => "Magnet",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let key = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "amplifyingcrystal" => Some(PassiveKind::AmplifyingCrystal),
            "ninjascroll" => Some(PassiveKind::NinjaScroll),
            "runetablet" => Some(PassiveKind::RuneTablet),
            "might" => Some(PassiveKind::Might),
            "swiftness" => Some(PassiveKind::Swiftness),
            "magnet" => Some(PassiveKind::Magnet),
            _ => None,
        }
    }
}

/// What the player is carrying
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub weapons: Vec<Weapon>,
    pub passives: Vec<PassiveKind>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }

    pub fn has_passive(&self, kind: PassiveKind) -> bool {
        self.passives.contains(&kind)
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn add_weapon(&mut self, kind: WeaponKind) -> Result<(), LoadoutError> {
        if self.has_weapon(kind) {
            return Err(LoadoutError::WeaponAlreadyHeld(kind));
        }
        if self.weapons.len() >= MAX_WEAPONS {
            return Err(LoadoutError::WeaponSlotsFull {
                capacity: MAX_WEAPONS,
            });
        }
        self.weapons.push(Weapon::new(kind));
        log::info!("Weapon added: {}", kind.name());
        Ok(())
    }

    /// Add by display or config name. Unknown names are logged and rejected.
    pub fn add_weapon_by_name(&mut self, name: &str) -> Result<WeaponKind, LoadoutError> {
        let Some(kind) = WeaponKind::from_name(name) else {
            log::warn!("Unknown weapon requested: {name}");
            return Err(LoadoutError::UnknownWeapon(name.to_string()));
        };
        self.add_weapon(kind)?;
        Ok(kind)
    }

    /// Add a passive, then evolve anything it unlocks. Returns evolved kinds.
    pub fn add_passive(&mut self, kind: PassiveKind) -> Result<Vec<WeaponKind>, LoadoutError> {
        if self.has_passive(kind) {
            return Err(LoadoutError::PassiveAlreadyHeld(kind));
        }
        if self.passives.len() >= MAX_PASSIVES {
            return Err(LoadoutError::PassiveSlotsFull {
                capacity: MAX_PASSIVES,
            });
        }
        self.passives.push(kind);
        log::info!("Passive added: {}", kind.name());
        Ok(self.evolve_ready())
    }

    pub fn add_passive_by_name(&mut self, name: &str) -> Result<PassiveKind, LoadoutError> {
        let Some(kind) = PassiveKind::from_name(name) else {
            log::warn!("Unknown passive requested: {name}");
            return Err(LoadoutError::UnknownPassive(name.to_string()));
        };
        self.add_passive(kind)?;
        Ok(kind)
    }

    /// Level a held weapon. Returns whether it evolved as a result.
    pub fn level_weapon(&mut self, kind: WeaponKind) -> Result<bool, LoadoutError> {
        let weapon = self
            .weapons
            .iter_mut()
            .find(|w| w.kind == kind)
            .ok_or(LoadoutError::WeaponNotHeld(kind))?;
        weapon.level_up()?;
        Ok(weapon.evolve(&self.passives))
    }

    /// Evolve every weapon whose gate is open
    pub fn evolve_ready(&mut self) -> Vec<WeaponKind> {
        let passives = &self.passives;
        self.weapons
            .iter_mut()
            .filter_map(|w| w.evolve(passives).then_some(w.kind))
            .collect()
    }

    /// Held weapons that can still level
    pub fn upgradable_weapons(&self) -> Vec<WeaponKind> {
        self.weapons
            .iter()
            .filter(|w| w.can_level_up())
            .map(|w| w.kind)
            .collect()
    }

    /// Weapons that could be added right now
    pub fn available_weapons(&self) -> Vec<WeaponKind> {
        if self.weapons.len() >= MAX_WEAPONS {
            return Vec::new();
        }
        WeaponKind::ALL
            .into_iter()
            .filter(|k| !self.has_weapon(*k))
            .collect()
    }

    /// Passives that could be added right now
    pub fn available_passives(&self) -> Vec<PassiveKind> {
        if self.passives.len() >= MAX_PASSIVES {
            return Vec::new();
        }
        PassiveKind::ALL
            .into_iter()
            .filter(|k| !self.has_passive(*k))
            .collect()
    }
}
