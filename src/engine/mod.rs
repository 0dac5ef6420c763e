//! Engine Boundary
//!
//! Everything non-deterministic or engine-owned crosses through here. The
//! gameplay modules read the scene via [`hooks::SceneQuery`] and mutate it
//! via [`hooks::EngineHooks`]; [`harness::HeadlessScene`] implements both for
//! tests and the demo binary.

pub mod harness;
pub mod hooks;

pub use harness::HeadlessScene;
pub use hooks::{ActorId, ActorKind, CollectibleId, EngineHooks, EngineHost, SceneQuery};
