//! Round Coordinator
//!
//! The heart of the game. Owns the score, the countdown, the target color,
//! the collectible registry and the phase machine, and turns collection and
//! capture reports into state transitions and host side effects.
//!
//! There is exactly one coordinator per scene. It is constructed explicitly
//! by scene-setup code and handed by reference to whatever needs it: no
//! global accessor, no engine lifecycle hooks.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::hooks::{
    ActorId, ActorKind, BehaviorRef, CollectibleId, EngineHooks, EngineHost, HudField, PanelKind,
    SceneQuery, SoundCue,
};
use crate::game::events::RoundEvent;
use crate::game::pursuer::PursuerAgent;
use crate::game::spawner::Spawner;
use crate::game::state::{CoinColor, CollectibleRegistry, LossCause, RoundPhase, RoundState};
use crate::game::theme::ThemeCatalog;

/// Coordinator settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Countdown at round start, seconds
    pub start_time_seconds: f32,

    /// Cadence of the all-collected sweep, seconds
    pub sweep_interval: f32,

    /// Default collectible count increase per level
    pub level_increment: i32,

    /// Hold in `Idle` behind the start menu until play is pressed
    pub start_in_menu: bool,

    /// Behaviors switched off when a round is lost
    pub suspend_on_end: Vec<BehaviorRef>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            start_time_seconds: 60.0,
            sweep_interval: 1.0,
            level_increment: 2,
            start_in_menu: true,
            suspend_on_end: vec![
                BehaviorRef("player_movement".to_owned()),
                BehaviorRef("pursuit".to_owned()),
            ],
        }
    }
}

/// The round/level state machine and scoring coordinator.
pub struct RoundCoordinator {
    config: RoundConfig,
    themes: ThemeCatalog,
    state: RoundState,
    registry: CollectibleRegistry,
    rng: Pcg32,
    muted: bool,
    current_theme: usize,
    current_actor: Option<ActorId>,
    current_pursuer: Option<ActorId>,
    pending_events: Vec<RoundEvent>,
}

impl RoundCoordinator {
    /// Build a coordinator. Call [`Self::init`] once the scene (spawner
    /// output included) is in place.
    pub fn new(config: RoundConfig, themes: ThemeCatalog, seed: u64) -> Self {
        let state = RoundState::new(config.start_time_seconds);
        Self {
            config,
            themes,
            state,
            registry: CollectibleRegistry::default(),
            rng: Pcg32::seed_from_u64(seed),
            muted: false,
            current_theme: 0,
            current_actor: None,
            current_pursuer: None,
            pending_events: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Full round state (read-only).
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    /// Current score.
    pub fn score(&self) -> i32 {
        self.state.score
    }

    /// Seconds left on the countdown.
    pub fn time_left(&self) -> f32 {
        self.state.time_left
    }

    /// The color currently being rewarded.
    pub fn target_color(&self) -> CoinColor {
        self.state.target_color
    }

    /// Collectible registry (read-only).
    pub fn registry(&self) -> &CollectibleRegistry {
        &self.registry
    }

    /// Mutable registry access for scene-setup code (spawner population).
    pub fn registry_mut(&mut self) -> &mut CollectibleRegistry {
        &mut self.registry
    }

    /// The actor spawned by the current theme, if any.
    pub fn current_actor(&self) -> Option<ActorId> {
        self.current_actor
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_event(&mut self, event: RoundEvent) {
        self.pending_events.push(event);
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RoundState {
        &mut self.state
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Explicit initialization, invoked by scene-setup code after the
    /// spawner has populated the registry. Safe to call again after a
    /// [`Self::restart`].
    pub fn init(&mut self, pursuer: &mut PursuerAgent, host: &mut dyn EngineHost) {
        self.state = RoundState::new(self.config.start_time_seconds);
        self.refresh_score_hud(host);
        self.refresh_timer_hud(host);
        self.pick_new_target(host);

        host.set_panel_visible(PanelKind::GameOver, false);
        host.set_panel_visible(PanelKind::LevelComplete, false);
        host.set_panel_visible(PanelKind::Options, false);

        self.select_theme(self.current_theme, pursuer, host);

        if self.config.start_in_menu {
            host.set_panel_visible(PanelKind::Start, true);
            host.set_time_scale(0.0);
        } else {
            self.begin_running(host);
        }
    }

    fn begin_running(&mut self, host: &mut dyn EngineHost) {
        self.state.phase = RoundPhase::Running;
        host.set_time_scale(1.0);
        self.push_event(RoundEvent::RoundStarted {
            level: self.state.level,
        });
        info!(level = self.state.level, "round running");
    }

    // =========================================================================
    // Per-tick
    // =========================================================================

    /// Per-tick countdown and win sweep. `dt` is unscaled wall time; the
    /// world time scale is read from the host each tick, so a paused world
    /// freezes the countdown no matter who paused it.
    pub fn tick(&mut self, dt: f32, host: &mut dyn EngineHost) {
        if !self.state.phase.is_running() {
            return;
        }
        let scale = host.time_scale();
        if scale <= 0.0 {
            return;
        }
        let dt = dt * scale;

        // Countdown first: a timeout beats an all-collected in the same tick.
        self.state.time_left -= dt;
        if self.state.time_left <= 0.0 {
            self.state.time_left = 0.0;
            self.refresh_timer_hud(host);
            self.on_time_up(host);
            return;
        }
        self.refresh_timer_hud(host);

        // All-collected sweep on a coarse cadence; scanning the registry
        // every frame buys nothing.
        self.state.level_check_accumulator += dt;
        if self.state.level_check_accumulator >= self.config.sweep_interval {
            self.state.level_check_accumulator = 0.0;
            if self.registry.active_count() == 0 {
                self.on_all_collected(host);
            }
        }
    }

    // =========================================================================
    // Incoming reports
    // =========================================================================

    /// Score a collection report. No-op unless `Running`.
    pub fn on_collected(&mut self, id: CollectibleId, host: &mut dyn EngineHost) {
        if !self.state.phase.is_running() {
            return;
        }
        let Some(item) = self.registry.get_mut(id) else {
            warn!(id = id.0, "collection report for unknown collectible");
            return;
        };
        if !item.active {
            // Duplicate report (e.g. two contacts in one physics step)
            return;
        }
        item.active = false;
        let color = item.color;
        host.collectible_hidden(id);

        let matched = color == self.state.target_color;
        if matched {
            self.state.score += 1;
            host.play_sound(SoundCue::Correct);
        } else {
            self.state.score -= 1;
            host.play_sound(SoundCue::Wrong);
        }
        self.refresh_score_hud(host);
        self.push_event(RoundEvent::Collected {
            id,
            color,
            matched,
            score: self.state.score,
        });

        self.pick_new_target(host);
    }

    /// Capture report from the pursuer. No-op unless `Running`.
    pub fn on_caught(&mut self, host: &mut dyn EngineHost) {
        if !self.state.phase.is_running() {
            return;
        }
        host.set_hud_text(HudField::Target, "CAUGHT!");
        self.end_round_lost(LossCause::Captured, host);
    }

    fn on_time_up(&mut self, host: &mut dyn EngineHost) {
        host.play_sound(SoundCue::TimeUp);
        host.set_hud_text(HudField::Target, "TIME'S UP!");
        self.end_round_lost(LossCause::TimeExpired, host);
    }

    fn end_round_lost(&mut self, cause: LossCause, host: &mut dyn EngineHost) {
        self.state.phase = RoundPhase::Lost(cause);
        for behavior in &self.config.suspend_on_end {
            host.set_behavior_enabled(behavior, false);
        }
        host.set_time_scale(0.0);
        host.set_panel_visible(PanelKind::GameOver, true);
        host.set_hud_text(
            HudField::FinalScore,
            &format!("Final Score: {}", self.state.score),
        );
        self.push_event(RoundEvent::RoundLost {
            cause,
            score: self.state.score,
        });
        info!(?cause, score = self.state.score, "round lost");
    }

    fn on_all_collected(&mut self, host: &mut dyn EngineHost) {
        self.state.phase = RoundPhase::Won;
        host.set_time_scale(0.0);
        host.set_hud_text(HudField::Target, "LEVEL COMPLETE!");
        host.set_panel_visible(PanelKind::LevelComplete, true);
        host.set_hud_text(
            HudField::FinalScore,
            &format!("Final Score: {}", self.state.score),
        );
        self.push_event(RoundEvent::RoundWon {
            score: self.state.score,
        });
        info!(score = self.state.score, "level complete");
    }

    // =========================================================================
    // Target picking
    // =========================================================================

    /// Pick a fresh target among the colors of active collectibles, falling
    /// back to the whole palette when none are active (keeps the round
    /// progressing mid-transition), then repair the reachability invariant.
    pub fn pick_new_target(&mut self, host: &mut dyn EngineHost) {
        let colors = self.registry.active_colors();
        self.state.target_color = if colors.is_empty() {
            let idx = self.rng.gen_range(0..CoinColor::ALL.len());
            CoinColor::ALL[idx]
        } else {
            let idx = self.rng.gen_range(0..colors.len());
            colors
                .into_iter()
                .nth(idx)
                .unwrap_or(self.state.target_color)
        };

        let repainted = self.ensure_target_reachable();
        if let Some(id) = repainted {
            host.collectible_restyled(id, self.state.target_color);
        }

        host.set_hud_text(
            HudField::Target,
            &format!("Catch: {}", self.state.target_color.display_name()),
        );
        host.set_hud_tint(HudField::Target, self.state.target_color.rgba());
        self.push_event(RoundEvent::TargetChanged {
            color: self.state.target_color,
            repainted,
        });
    }

    /// Relabel the first active collectible (lowest id) when none matches
    /// the target. O(n) over the registry, but picks happen on collection
    /// events, not every tick, so the scan is cheap where it counts.
    fn ensure_target_reachable(&mut self) -> Option<CollectibleId> {
        if self.registry.any_active_of(self.state.target_color) {
            return None;
        }
        let target = self.state.target_color;
        self.registry.first_active_mut().map(|item| {
            item.color = target;
            item.id
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Roll a won round over into the next level: more coins, fresh timer,
    /// back to `Running`. Ignored outside `Won`.
    pub fn advance_level(
        &mut self,
        increment: i32,
        spawner: &mut Spawner,
        host: &mut dyn EngineHost,
    ) {
        if self.state.phase != RoundPhase::Won {
            warn!(phase = ?self.state.phase, "advance_level ignored outside Won");
            return;
        }
        host.set_panel_visible(PanelKind::GameOver, false);
        host.set_panel_visible(PanelKind::LevelComplete, false);

        let new_count = (i64::from(spawner.count()) + i64::from(increment)).max(0) as u32;
        let placed = spawner.respawn_all(new_count, &mut self.registry, host);

        self.state.level += 1;
        self.state.time_left = self.config.start_time_seconds.max(0.0);
        self.state.level_check_accumulator = 0.0;
        self.refresh_timer_hud(host);
        self.pick_new_target(host);

        self.push_event(RoundEvent::LevelAdvanced {
            level: self.state.level,
            collectible_count: placed,
        });
        self.begin_running(host);
        info!(level = self.state.level, coins = placed, "advanced level");
    }

    /// Roll over using the configured default increment.
    pub fn advance_level_default(&mut self, spawner: &mut Spawner, host: &mut dyn EngineHost) {
        self.advance_level(self.config.level_increment, spawner, host);
    }

    /// Unconditional full reset: reload the scene and drop back to the
    /// initial state. The embedder is expected to rebuild the scene
    /// afterwards (spawner population, [`Self::init`]).
    pub fn restart(&mut self, host: &mut dyn EngineHost) {
        host.set_time_scale(1.0);
        host.reload_scene();
        self.registry = CollectibleRegistry::default();
        self.state = RoundState::new(self.config.start_time_seconds);
        self.current_actor = None;
        self.current_pursuer = None;
        self.pending_events.clear();
        info!("round restarted");
    }

    /// Swap the actor/pursuer pairing. Valid in any phase; the start menu
    /// calls this before the first round begins.
    pub fn select_theme(
        &mut self,
        index: usize,
        pursuer: &mut PursuerAgent,
        host: &mut dyn EngineHost,
    ) {
        if self.themes.is_empty() {
            warn!("theme catalog is empty; selection skipped");
            return;
        }
        let index = self.themes.clamp_index(index);
        self.current_theme = index;
        let Some(theme) = self.themes.get(index).cloned() else {
            return;
        };

        if let Some(actor) = self.current_actor.take() {
            host.despawn_actor(actor);
        }
        if let Some(agent) = self.current_pursuer.take() {
            host.despawn_actor(agent);
        }

        let actor = host.spawn_actor(&theme.actor_prefab, ActorKind::Player, self.themes.actor_spawn);
        let agent = host.spawn_actor(
            &theme.pursuer_prefab,
            ActorKind::Pursuer,
            self.themes.pursuer_spawn,
        );
        self.current_actor = Some(actor);
        self.current_pursuer = Some(agent);
        pursuer.rewire(agent, actor);

        info!(index, name = %theme.name, "theme switched");
        self.push_event(RoundEvent::ThemeApplied {
            index,
            name: theme.name,
        });
    }

    // =========================================================================
    // Menu surface
    // =========================================================================

    /// Leave the start menu and begin the round. No-op outside `Idle`.
    pub fn on_play_pressed(&mut self, host: &mut dyn EngineHost) {
        if self.state.phase != RoundPhase::Idle {
            return;
        }
        host.set_panel_visible(PanelKind::Start, false);
        self.begin_running(host);
    }

    /// Open the options overlay from the start menu.
    pub fn on_options_pressed(&mut self, host: &mut dyn EngineHost) {
        host.set_panel_visible(PanelKind::Options, true);
        host.set_panel_visible(PanelKind::Start, false);
    }

    /// Close the options overlay, returning to the start menu.
    pub fn on_close_options(&mut self, host: &mut dyn EngineHost) {
        host.set_panel_visible(PanelKind::Options, false);
        host.set_panel_visible(PanelKind::Start, true);
    }

    /// Toggle global audio mute.
    pub fn on_mute_toggle(&mut self, host: &mut dyn EngineHost) {
        self.muted = !self.muted;
        host.set_muted(self.muted);
    }

    /// Exit control: route to the host's shutdown abstraction.
    pub fn on_quit_pressed(&mut self, host: &mut dyn EngineHost) {
        host.request_shutdown();
    }

    // =========================================================================
    // HUD
    // =========================================================================

    fn refresh_score_hud(&self, host: &mut dyn EngineHost) {
        host.set_hud_text(HudField::Score, &format!("Score: {}", self.state.score));
    }

    fn refresh_timer_hud(&self, host: &mut dyn EngineHost) {
        let secs = self.state.time_left.ceil().max(0.0) as u32;
        host.set_hud_text(
            HudField::Timer,
            &format!("{:02}:{:02}", secs / 60, secs % 60),
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
