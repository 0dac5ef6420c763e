//! # Chroma Chase Gameplay Core
//!
//! Round-based color-collection gameplay: a player gathers colored coins
//! while a pursuer hunts them down and a chase camera follows the action.
//! The round coordinator owns all of the nontrivial state.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CHROMA CHASE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Shared math primitives                   │
//! │  └── math.rs      - Damped smoothing, heading, look rotation │
//! │                                                              │
//! │  game/            - Gameplay logic (engine-agnostic)         │
//! │  ├── state.rs     - Colors, collectible registry, round state│
//! │  ├── events.rs    - Coordinator event stream                 │
//! │  ├── coordinator.rs - Round state machine and scoring (core) │
//! │  ├── spawner.rs   - Best-effort spaced coin placement        │
//! │  ├── pursuer.rs   - Nav-driven pursuit, capture reporting    │
//! │  ├── camera.rs    - Collision-aware chase camera             │
//! │  └── theme.rs     - Actor/pursuer theme catalog              │
//! │                                                              │
//! │  engine/          - Host boundary (side effects live here)   │
//! │  ├── hooks.rs     - SceneQuery + EngineHooks traits          │
//! │  └── harness.rs   - Headless host for tests and the demo     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Engine boundary
//!
//! Everything under `game/` mutates the world only through the
//! [`EngineHooks`](engine::hooks::EngineHooks) trait and reads it only
//! through [`SceneQuery`](engine::hooks::SceneQuery). The coordinator is a
//! plain value handed by reference to the collaborators that need it; there
//! is no global instance and no engine lifecycle magic. Scene-setup code
//! decides when to construct, initialize and refresh each piece.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod engine;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, ShutdownMode};
pub use engine::hooks::{ActorId, ActorKind, CollectibleId, EngineHooks, EngineHost, SceneQuery};
pub use game::coordinator::RoundCoordinator;
pub use game::state::{CoinColor, LossCause, RoundPhase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Demo/test tick rate (Hz); the host drives the real cadence
pub const TICK_RATE: u32 = 60;
