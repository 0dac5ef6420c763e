//! Engine Interface Traits
//!
//! The narrow surface the gameplay core needs from a host engine. A real
//! binding forwards these to the engine; the headless harness implements
//! them in memory. Splitting reads ([`SceneQuery`]) from writes
//! ([`EngineHooks`]) keeps borrow patterns simple: a tick typically holds
//! `&dyn SceneQuery` and `&mut dyn EngineHooks` side by side.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::state::CoinColor;

/// Handle to an engine-side entity (player actor, pursuer agent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Handle to a registered collectible.
///
/// Allocated by the coordinator's registry (monotonic counter), never by the
/// engine. Implements `Ord` so registry iteration order is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectibleId(pub u32);

/// Broad entity categories the camera and contact logic care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorKind {
    /// The controllable actor the camera follows and the pursuer hunts.
    Player,
    /// The hostile agent.
    Pursuer,
}

/// Name of an engine-side template to instantiate actors from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabRef(pub String);

impl PrefabRef {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Name of an engine-side behavior that can be enabled or disabled
/// (movement, pursuit, input handling, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BehaviorRef(pub String);

/// One-shot audio cues the coordinator can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Target-colored coin collected
    Correct,
    /// Off-color coin collected
    Wrong,
    /// Countdown reached zero
    TimeUp,
}

/// HUD text fields the coordinator writes to.
///
/// A host without one of these simply ignores the write; a missing HUD
/// element is never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HudField {
    /// Running score readout
    Score,
    /// Countdown readout (MM:SS)
    Timer,
    /// Current target color / terminal banner line
    Target,
    /// Final score shown on the end panels
    FinalScore,
}

/// Overlay panels toggled by the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelKind {
    /// Start menu shown before the first round
    Start,
    /// Options overlay reachable from the start menu
    Options,
    /// Round-lost overlay
    GameOver,
    /// Round-won overlay
    LevelComplete,
}

/// Read-only scene access.
pub trait SceneQuery {
    /// World position of an actor, if it still exists.
    fn position(&self, actor: ActorId) -> Option<Vec3>;

    /// World-space velocity of an actor, if it still exists.
    fn velocity(&self, actor: ActorId) -> Option<Vec3>;

    /// First live actor of the given kind, if any.
    fn find_actor(&self, kind: ActorKind) -> Option<ActorId>;

    /// Does a sphere at `center` overlap any obstacle volume?
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> bool;

    /// Sweep a sphere of `radius` from `origin` along normalized `dir` for
    /// up to `max_dist`. Returns the hit distance, if anything is struck.
    fn sphere_cast(&self, origin: Vec3, dir: Vec3, radius: f32, max_dist: f32) -> Option<f32>;

    /// Global simulation time scale (0 = paused).
    fn time_scale(&self) -> f32;
}

/// Combined surface for gameplay code that both reads and mutates the
/// scene in one call (the coordinator tick, the spawner, the pursuer).
/// Implemented automatically for any full host.
pub trait EngineHost: SceneQuery + EngineHooks {}

impl<T: SceneQuery + EngineHooks> EngineHost for T {}

/// Mutating engine services.
///
/// All calls are fire-and-forget: there are no fatal errors at this
/// boundary, a host absorbs whatever it cannot honor.
pub trait EngineHooks {
    /// Play a one-shot audio cue.
    fn play_sound(&mut self, cue: SoundCue);

    /// Pause/resume all audio output.
    fn set_muted(&mut self, muted: bool);

    /// Replace the text of a HUD field.
    fn set_hud_text(&mut self, field: HudField, text: &str);

    /// Tint a HUD field (RGBA, 0..=1).
    fn set_hud_tint(&mut self, field: HudField, rgba: [f32; 4]);

    /// Show or hide an overlay panel.
    fn set_panel_visible(&mut self, panel: PanelKind, visible: bool);

    /// Set the global simulation time scale (0 freezes the world).
    fn set_time_scale(&mut self, scale: f32);

    /// Tear down and rebuild the whole scene.
    fn reload_scene(&mut self);

    /// Ask the host to end the run. What that means is up to the embedding
    /// (see [`crate::config::ShutdownMode`]).
    fn request_shutdown(&mut self);

    /// Instantiate an actor from a template at `position`.
    fn spawn_actor(&mut self, prefab: &PrefabRef, kind: ActorKind, position: Vec3) -> ActorId;

    /// Destroy a previously spawned actor.
    fn despawn_actor(&mut self, actor: ActorId);

    /// Enable or disable a named behavior.
    fn set_behavior_enabled(&mut self, behavior: &BehaviorRef, enabled: bool);

    /// Steer a navigation agent toward `destination`.
    fn nav_set_destination(&mut self, agent: ActorId, destination: Vec3);

    /// A collectible was registered: create its visual.
    fn collectible_spawned(
        &mut self,
        id: CollectibleId,
        prefab: &PrefabRef,
        position: Vec3,
        color: CoinColor,
    );

    /// A collectible was collected: hide its visual (entity stays registered).
    fn collectible_hidden(&mut self, id: CollectibleId);

    /// A collectible changed color: re-render its visual.
    fn collectible_restyled(&mut self, id: CollectibleId, color: CoinColor);

    /// A collectible was destroyed (respawn/level transition).
    fn collectible_removed(&mut self, id: CollectibleId);
}
