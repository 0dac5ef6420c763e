//! Pursuit Agent
//!
//! Steers a hostile agent toward its tracked target through the host's
//! navigation service, and reports capture to the coordinator exactly once
//! per wiring (edge-triggered, so post-round contact spam goes nowhere).

use tracing::debug;

use crate::engine::hooks::{ActorId, EngineHooks, EngineHost, SceneQuery};
use crate::game::coordinator::RoundCoordinator;

/// Hostile agent chasing a tracked actor.
#[derive(Clone, Debug, Default)]
pub struct PursuerAgent {
    agent: Option<ActorId>,
    target: Option<ActorId>,
    caught_fired: bool,
}

impl PursuerAgent {
    /// An unwired pursuer. Does nothing until [`Self::rewire`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point an engine agent at a tracked target, rearming capture.
    pub fn rewire(&mut self, agent: ActorId, target: ActorId) {
        debug!(agent = agent.0, target = target.0, "pursuer rewired");
        self.agent = Some(agent);
        self.target = Some(target);
        self.caught_fired = false;
    }

    /// Drop the wiring entirely (scene teardown).
    pub fn clear(&mut self) {
        self.agent = None;
        self.target = None;
        self.caught_fired = false;
    }

    /// Engine agent being steered, if wired.
    pub fn agent(&self) -> Option<ActorId> {
        self.agent
    }

    /// Currently tracked target, if any.
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// Per-tick steering. A paused world (time scale 0) is a no-op.
    pub fn tick(&mut self, host: &mut dyn EngineHost) {
        if host.time_scale() <= 0.0 {
            return;
        }
        let (Some(agent), Some(target)) = (self.agent, self.target) else {
            return;
        };
        if let Some(pos) = host.position(target) {
            host.nav_set_destination(agent, pos);
        }
    }

    /// Contact notification from the host (enter-only).
    ///
    /// Fires the capture report at most once until rewired; the coordinator
    /// additionally ignores it outside a running round.
    pub fn on_contact(
        &mut self,
        other: ActorId,
        coordinator: &mut RoundCoordinator,
        host: &mut dyn EngineHost,
    ) {
        if self.caught_fired || self.target != Some(other) {
            return;
        }
        self.caught_fired = true;
        coordinator.on_caught(host);
    }
}
