//! Round Events
//!
//! Signals the coordinator emits for observers: UI glue, demo logging,
//! tests. Events accumulate on the coordinator and are drained with
//! `take_events` once per tick by the embedding.

use serde::{Deserialize, Serialize};

use crate::engine::hooks::CollectibleId;
use crate::game::state::{CoinColor, LossCause};

/// A signal emitted by the round coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A collectible was scored.
    Collected {
        /// Which collectible
        id: CollectibleId,
        /// Its color at collection time
        color: CoinColor,
        /// Did it match the target color?
        matched: bool,
        /// Score after applying the delta
        score: i32,
    },

    /// A new target color was picked.
    TargetChanged {
        /// The color now being rewarded
        color: CoinColor,
        /// Collectible relabeled to keep the target reachable, if any
        repainted: Option<CollectibleId>,
    },

    /// The round entered `Running`.
    RoundStarted {
        /// Current level number
        level: u32,
    },

    /// Every collectible was gathered.
    RoundWon {
        /// Final score
        score: i32,
    },

    /// The round ended in defeat.
    RoundLost {
        /// Timeout or capture
        cause: LossCause,
        /// Final score
        score: i32,
    },

    /// A won round rolled over into the next level.
    LevelAdvanced {
        /// New level number
        level: u32,
        /// Collectibles actually placed for it
        collectible_count: u32,
    },

    /// An actor/pursuer theme was applied.
    ThemeApplied {
        /// Index into the theme catalog
        index: usize,
        /// Theme display name
        name: String,
    },
}
