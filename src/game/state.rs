//! Round State Definitions
//!
//! All state types for a collection round. The collectible registry uses a
//! BTreeMap so iteration order is deterministic; the "first found" relabel
//! rule depends on it.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::engine::hooks::CollectibleId;

// =============================================================================
// COIN COLOR
// =============================================================================

/// Color tag carried by every collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CoinColor {
    /// Red coin
    Red = 0,
    /// Green coin
    Green = 1,
    /// Blue coin
    Blue = 2,
    /// Yellow coin
    Yellow = 3,
}

impl CoinColor {
    /// Every color, in tag order.
    pub const ALL: [CoinColor; 4] = [
        CoinColor::Red,
        CoinColor::Green,
        CoinColor::Blue,
        CoinColor::Yellow,
    ];

    /// Display color (RGBA, 0..=1) for visuals and HUD tinting.
    pub fn rgba(self) -> [f32; 4] {
        match self {
            CoinColor::Red => [1.0, 0.0, 0.0, 1.0],
            CoinColor::Green => [0.0, 1.0, 0.0, 1.0],
            CoinColor::Blue => [0.0, 0.0, 1.0, 1.0],
            CoinColor::Yellow => [1.0, 0.92, 0.016, 1.0],
        }
    }

    /// Uppercase name for HUD strings.
    pub fn display_name(self) -> &'static str {
        match self {
            CoinColor::Red => "RED",
            CoinColor::Green => "GREEN",
            CoinColor::Blue => "BLUE",
            CoinColor::Yellow => "YELLOW",
        }
    }

    /// Get from index (0-3).
    pub fn from_index(index: u8) -> Option<CoinColor> {
        match index {
            0 => Some(CoinColor::Red),
            1 => Some(CoinColor::Green),
            2 => Some(CoinColor::Blue),
            3 => Some(CoinColor::Yellow),
            _ => None,
        }
    }
}

// =============================================================================
// COLLECTIBLE
// =============================================================================

/// A registered collectible.
///
/// Deactivated (not removed) on collection; removed only by a respawn or a
/// scene reload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Collectible {
    /// Registry handle
    pub id: CollectibleId,

    /// World position it was placed at
    pub position: Vec3,

    /// Current color tag (relabeling may change it)
    pub color: CoinColor,

    /// False once collected
    pub active: bool,
}

impl Collectible {
    /// Create a fresh, active collectible.
    pub fn new(id: CollectibleId, position: Vec3, color: CoinColor) -> Self {
        Self {
            id,
            position,
            color,
            active: true,
        }
    }
}

// =============================================================================
// COLLECTIBLE REGISTRY
// =============================================================================

/// The coordinator-owned collectible map.
///
/// Replaces find-by-tag scene scans: collectibles are registered on
/// creation and dropped on respawn, and every lookup goes through here.
/// Ids are allocated from a monotonic counter and never reused.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollectibleRegistry {
    items: BTreeMap<CollectibleId, Collectible>,
    next_id: u32,
}

impl CollectibleRegistry {
    /// Register a new collectible and return its id.
    pub fn register(&mut self, position: Vec3, color: CoinColor) -> CollectibleId {
        let id = CollectibleId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, Collectible::new(id, position, color));
        id
    }

    /// Drop every collectible, returning the removed ids so the caller can
    /// tear down their visuals.
    pub fn remove_all(&mut self) -> Vec<CollectibleId> {
        let ids: Vec<CollectibleId> = self.items.keys().copied().collect();
        self.items.clear();
        ids
    }

    /// Look up a collectible.
    pub fn get(&self, id: CollectibleId) -> Option<&Collectible> {
        self.items.get(&id)
    }

    /// Look up a collectible mutably.
    pub fn get_mut(&mut self, id: CollectibleId) -> Option<&mut Collectible> {
        self.items.get_mut(&id)
    }

    /// All registered collectibles, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.items.values()
    }

    /// Active collectibles, in id order.
    pub fn active(&self) -> impl Iterator<Item = &Collectible> {
        self.items.values().filter(|c| c.active)
    }

    /// Number of active collectibles.
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Total registered (active or not).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The set of colors present among active collectibles.
    pub fn active_colors(&self) -> BTreeSet<CoinColor> {
        self.active().map(|c| c.color).collect()
    }

    /// Is any active collectible of this color?
    pub fn any_active_of(&self, color: CoinColor) -> bool {
        self.active().any(|c| c.color == color)
    }

    /// First active collectible in id order, mutably.
    pub fn first_active_mut(&mut self) -> Option<&mut Collectible> {
        self.items.values_mut().find(|c| c.active)
    }
}

// =============================================================================
// ROUND PHASE
// =============================================================================

/// Why a round was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Countdown reached zero
    TimeExpired,
    /// The pursuer reached the player
    Captured,
}

/// Coordinator round phase.
///
/// `Idle → Running → {Won, Lost}`; terminal states are left only through
/// re-initialization (`advance_level`, `restart`), never directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    /// Start/menu overlay is up, nothing counts down
    #[default]
    Idle,
    /// Round in progress
    Running,
    /// All collectibles gathered
    Won,
    /// Timed out or captured
    Lost(LossCause),
}

impl RoundPhase {
    /// Is the round actively being played?
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, RoundPhase::Running)
    }

    /// Has the round reached a terminal state?
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::Won | RoundPhase::Lost(_))
    }
}

// =============================================================================
// ROUND STATE
// =============================================================================

/// Mutable round state. Exactly one instance, owned by the coordinator.
///
/// Invariant: `phase != Running` implies the countdown is frozen and no
/// score mutation is accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundState {
    /// Net score (mismatches subtract, so it can go negative)
    pub score: i32,

    /// Countdown remaining, clamped at 0
    pub time_left: f32,

    /// The color currently being rewarded
    pub target_color: CoinColor,

    /// Where the round is in its lifecycle
    pub phase: RoundPhase,

    /// Accumulator driving the coarse all-collected sweep
    pub level_check_accumulator: f32,

    /// 1-based level number
    pub level: u32,
}

impl RoundState {
    /// Fresh state for a round of `start_time` seconds.
    pub fn new(start_time: f32) -> Self {
        Self {
            score: 0,
            time_left: start_time.max(0.0),
            target_color: CoinColor::Red,
            phase: RoundPhase::Idle,
            level_check_accumulator: 0.0,
            level: 1,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
