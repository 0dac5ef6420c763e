//! Gameplay Logic
//!
//! Engine-agnostic game code. Side effects go through the traits in
//! [`crate::engine::hooks`]; nothing in here talks to a real engine.
//!
//! ## Module Structure
//!
//! - `state`: colors, collectible registry, round state
//! - `events`: the coordinator's outbound event stream
//! - `coordinator`: round state machine and scoring (the core)
//! - `spawner`: best-effort spaced coin placement
//! - `pursuer`: nav-driven pursuit and capture reporting
//! - `camera`: collision-aware chase camera
//! - `theme`: actor/pursuer theme catalog

pub mod camera;
pub mod coordinator;
pub mod events;
pub mod pursuer;
pub mod spawner;
pub mod state;
pub mod theme;

// Re-export key types
pub use camera::{CameraConfig, ChaseCamera};
pub use coordinator::{RoundConfig, RoundCoordinator};
pub use events::RoundEvent;
pub use pursuer::PursuerAgent;
pub use spawner::{Spawner, SpawnerConfig};
pub use state::{CoinColor, Collectible, CollectibleRegistry, LossCause, RoundPhase, RoundState};
pub use theme::{ThemeCatalog, ThemeDefinition};
