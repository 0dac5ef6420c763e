//! Character Themes
//!
//! A theme bundles the actor template and the pursuer template that get
//! spawned together. Selecting one destroys the previous pair and rewires
//! pursuit onto the fresh actor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::engine::hooks::PrefabRef;

/// One selectable actor/pursuer pairing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    /// Display name
    pub name: String,
    /// Template for the controllable actor
    pub actor_prefab: PrefabRef,
    /// Template for the hostile agent
    pub pursuer_prefab: PrefabRef,
}

/// Immutable theme list plus the spawn points shared by every theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    /// Selectable themes, by index
    pub themes: Vec<ThemeDefinition>,
    /// Where the actor appears
    pub actor_spawn: Vec3,
    /// Where the pursuer appears
    pub pursuer_spawn: Vec3,
}

impl ThemeCatalog {
    /// Number of themes.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// True when no theme is configured.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Theme at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&ThemeDefinition> {
        self.themes.get(index)
    }

    /// Clamp an arbitrary index into the valid range.
    ///
    /// Callers must not use the result on an empty catalog.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.len().saturating_sub(1))
    }
}
