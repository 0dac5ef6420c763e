//! Headless Host
//!
//! In-memory implementation of the engine boundary, used by the demo binary
//! and the test suites. Every side effect is recorded so tests can assert on
//! what the gameplay code asked the engine to do.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use crate::config::ShutdownMode;
use crate::core::math::move_towards;
use crate::engine::hooks::{
    ActorId, ActorKind, BehaviorRef, CollectibleId, EngineHooks, HudField, PanelKind, PrefabRef,
    SceneQuery, SoundCue,
};
use crate::game::state::CoinColor;

/// An actor instance tracked by the headless scene.
#[derive(Clone, Debug)]
pub struct ActorRecord {
    /// Category used by `find_actor` and contact logic
    pub kind: ActorKind,
    /// Template this actor was instantiated from
    pub prefab: String,
    /// World position
    pub position: Vec3,
    /// World velocity (set by whoever moves the actor)
    pub velocity: Vec3,
}

/// A collectible visual tracked by the headless scene.
#[derive(Clone, Debug)]
pub struct CollectibleVisual {
    /// World position
    pub position: Vec3,
    /// Rendered color tag
    pub color: CoinColor,
    /// False once hidden by collection
    pub visible: bool,
}

/// Headless engine host.
///
/// Obstacles are axis-free spheres, navigation is straight-line stepping;
/// enough fidelity to drive the gameplay logic end to end without an engine.
pub struct HeadlessScene {
    mode: ShutdownMode,
    actors: BTreeMap<ActorId, ActorRecord>,
    next_actor: u32,
    obstacles: Vec<(Vec3, f32)>,
    nav_targets: BTreeMap<ActorId, Vec3>,
    collectibles: BTreeMap<CollectibleId, CollectibleVisual>,
    time_scale: f32,
    muted: bool,
    hud: BTreeMap<HudField, String>,
    hud_tints: BTreeMap<HudField, [f32; 4]>,
    panels: BTreeMap<PanelKind, bool>,
    sounds: Vec<SoundCue>,
    disabled_behaviors: BTreeSet<BehaviorRef>,
    reloads: u32,
    shutdown: bool,
}

impl HeadlessScene {
    /// Create an empty scene at time scale 1.
    pub fn new(mode: ShutdownMode) -> Self {
        Self {
            mode,
            actors: BTreeMap::new(),
            next_actor: 0,
            obstacles: Vec::new(),
            nav_targets: BTreeMap::new(),
            collectibles: BTreeMap::new(),
            time_scale: 1.0,
            muted: false,
            hud: BTreeMap::new(),
            hud_tints: BTreeMap::new(),
            panels: BTreeMap::new(),
            sounds: Vec::new(),
            disabled_behaviors: BTreeSet::new(),
            reloads: 0,
            shutdown: false,
        }
    }

    /// Add a spherical obstacle volume.
    pub fn add_obstacle(&mut self, center: Vec3, radius: f32) {
        self.obstacles.push((center, radius));
    }

    /// Teleport an actor (demo player control).
    pub fn set_position(&mut self, actor: ActorId, position: Vec3) {
        if let Some(rec) = self.actors.get_mut(&actor) {
            rec.position = position;
        }
    }

    /// Set an actor's reported velocity (demo player control).
    pub fn set_velocity(&mut self, actor: ActorId, velocity: Vec3) {
        if let Some(rec) = self.actors.get_mut(&actor) {
            rec.velocity = velocity;
        }
    }

    /// Advance all navigation agents toward their destinations.
    ///
    /// Straight-line stepping at `speed`, scaled by the world time scale
    /// like a real engine would scale its nav tick.
    pub fn step_navigation(&mut self, dt: f32, speed: f32) {
        let step = speed * dt * self.time_scale;
        if step <= 0.0 {
            return;
        }
        for (agent, dest) in &self.nav_targets {
            if let Some(rec) = self.actors.get_mut(agent) {
                let before = rec.position;
                rec.position = move_towards(before, *dest, step);
                rec.velocity = if dt > 0.0 {
                    (rec.position - before) / dt
                } else {
                    Vec3::ZERO
                };
            }
        }
    }

    /// Actor record, if alive.
    pub fn actor(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&id)
    }

    /// Number of live actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Collectible visual, if the engine still tracks one for `id`.
    pub fn collectible(&self, id: CollectibleId) -> Option<&CollectibleVisual> {
        self.collectibles.get(&id)
    }

    /// Visible collectible count.
    pub fn visible_collectibles(&self) -> usize {
        self.collectibles.values().filter(|c| c.visible).count()
    }

    /// Current text of a HUD field.
    pub fn hud_text(&self, field: HudField) -> Option<&str> {
        self.hud.get(&field).map(String::as_str)
    }

    /// Current tint of a HUD field.
    pub fn hud_tint(&self, field: HudField) -> Option<[f32; 4]> {
        self.hud_tints.get(&field).copied()
    }

    /// Is a panel currently shown?
    pub fn panel_visible(&self, panel: PanelKind) -> bool {
        self.panels.get(&panel).copied().unwrap_or(false)
    }

    /// All cues played so far, in order.
    pub fn sounds(&self) -> &[SoundCue] {
        &self.sounds
    }

    /// Is audio muted?
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Is a named behavior currently disabled?
    pub fn behavior_disabled(&self, behavior: &BehaviorRef) -> bool {
        self.disabled_behaviors.contains(behavior)
    }

    /// Latest nav destination issued for an agent.
    pub fn nav_target(&self, agent: ActorId) -> Option<Vec3> {
        self.nav_targets.get(&agent).copied()
    }

    /// How many times the scene was reloaded.
    pub fn reload_count(&self) -> u32 {
        self.reloads
    }

    /// Has a shutdown been requested?
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown
    }

    /// Should the hosting run loop stop now?
    ///
    /// Only a standalone embedding exits on shutdown; a test harness keeps
    /// running and lets the embedder inspect [`Self::shutdown_requested`].
    pub fn should_exit(&self) -> bool {
        self.shutdown && self.mode == ShutdownMode::Standalone
    }
}

impl SceneQuery for HeadlessScene {
    fn position(&self, actor: ActorId) -> Option<Vec3> {
        self.actors.get(&actor).map(|a| a.position)
    }

    fn velocity(&self, actor: ActorId) -> Option<Vec3> {
        self.actors.get(&actor).map(|a| a.velocity)
    }

    fn find_actor(&self, kind: ActorKind) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|(_, rec)| rec.kind == kind)
            .map(|(id, _)| *id)
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|(c, r)| center.distance_squared(*c) < (r + radius) * (r + radius))
    }

    fn sphere_cast(&self, origin: Vec3, dir: Vec3, radius: f32, max_dist: f32) -> Option<f32> {
        let mut nearest: Option<f32> = None;
        for (center, r) in &self.obstacles {
            // Sweeping a sphere equals a ray against the obstacle inflated
            // by the cast radius.
            let inflated = r + radius;
            let m = origin - *center;
            let b = m.dot(dir);
            let c = m.length_squared() - inflated * inflated;
            if c > 0.0 && b > 0.0 {
                continue; // outside and pointing away
            }
            let disc = b * b - c;
            if disc < 0.0 {
                continue;
            }
            let t = (-b - disc.sqrt()).max(0.0);
            if t <= max_dist && nearest.is_none_or(|n| t < n) {
                nearest = Some(t);
            }
        }
        nearest
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

impl EngineHooks for HeadlessScene {
    fn play_sound(&mut self, cue: SoundCue) {
        if !self.muted {
            self.sounds.push(cue);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_hud_text(&mut self, field: HudField, text: &str) {
        self.hud.insert(field, text.to_owned());
    }

    fn set_hud_tint(&mut self, field: HudField, rgba: [f32; 4]) {
        self.hud_tints.insert(field, rgba);
    }

    fn set_panel_visible(&mut self, panel: PanelKind, visible: bool) {
        self.panels.insert(panel, visible);
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    fn reload_scene(&mut self) {
        self.reloads += 1;
        self.actors.clear();
        self.nav_targets.clear();
        self.collectibles.clear();
        self.panels.clear();
        self.disabled_behaviors.clear();
        self.time_scale = 1.0;
    }

    fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    fn spawn_actor(&mut self, prefab: &PrefabRef, kind: ActorKind, position: Vec3) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        self.actors.insert(
            id,
            ActorRecord {
                kind,
                prefab: prefab.0.clone(),
                position,
                velocity: Vec3::ZERO,
            },
        );
        id
    }

    fn despawn_actor(&mut self, actor: ActorId) {
        self.actors.remove(&actor);
        self.nav_targets.remove(&actor);
    }

    fn set_behavior_enabled(&mut self, behavior: &BehaviorRef, enabled: bool) {
        if enabled {
            self.disabled_behaviors.remove(behavior);
        } else {
            self.disabled_behaviors.insert(behavior.clone());
        }
    }

    fn nav_set_destination(&mut self, agent: ActorId, destination: Vec3) {
        if self.actors.contains_key(&agent) {
            self.nav_targets.insert(agent, destination);
        }
    }

    fn collectible_spawned(
        &mut self,
        id: CollectibleId,
        _prefab: &PrefabRef,
        position: Vec3,
        color: CoinColor,
    ) {
        self.collectibles.insert(
            id,
            CollectibleVisual {
                position,
                color,
                visible: true,
            },
        );
    }

    fn collectible_hidden(&mut self, id: CollectibleId) {
        if let Some(vis) = self.collectibles.get_mut(&id) {
            vis.visible = false;
        }
    }

    fn collectible_restyled(&mut self, id: CollectibleId, color: CoinColor) {
        if let Some(vis) = self.collectibles.get_mut(&id) {
            vis.color = color;
        }
    }

    fn collectible_removed(&mut self, id: CollectibleId) {
        self.collectibles.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> HeadlessScene {
        HeadlessScene::new(ShutdownMode::Harness)
    }

    #[test]
    fn test_spawn_and_find_actor() {
        let mut s = scene();
        let prefab = PrefabRef::new("knight");
        let id = s.spawn_actor(&prefab, ActorKind::Player, Vec3::ZERO);

        assert_eq!(s.find_actor(ActorKind::Player), Some(id));
        assert_eq!(s.find_actor(ActorKind::Pursuer), None);

        s.despawn_actor(id);
        assert_eq!(s.find_actor(ActorKind::Player), None);
    }

    #[test]
    fn test_overlap_sphere() {
        let mut s = scene();
        s.add_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0);

        assert!(s.overlap_sphere(Vec3::new(4.0, 0.0, 0.0), 0.35));
        assert!(!s.overlap_sphere(Vec3::ZERO, 0.35));
    }

    #[test]
    fn test_sphere_cast_hits_nearest() {
        let mut s = scene();
        s.add_obstacle(Vec3::new(10.0, 0.0, 0.0), 1.0);
        s.add_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0);

        let hit = s
            .sphere_cast(Vec3::ZERO, Vec3::X, 0.2, 20.0)
            .expect("should hit");
        // Nearest surface: 5.0 - (1.0 + 0.2)
        assert!((hit - 3.8).abs() < 1e-4);

        // Cast pointing away misses
        assert!(s.sphere_cast(Vec3::ZERO, -Vec3::X, 0.2, 20.0).is_none());
        // Out of range misses
        assert!(s.sphere_cast(Vec3::ZERO, Vec3::X, 0.2, 2.0).is_none());
    }

    #[test]
    fn test_navigation_steps_and_respects_pause() {
        let mut s = scene();
        let id = s.spawn_actor(&PrefabRef::new("ghost"), ActorKind::Pursuer, Vec3::ZERO);
        s.nav_set_destination(id, Vec3::new(10.0, 0.0, 0.0));

        s.step_navigation(1.0, 2.0);
        let pos = s.position(id).unwrap();
        assert!((pos.x - 2.0).abs() < 1e-5);

        s.set_time_scale(0.0);
        s.step_navigation(1.0, 2.0);
        assert_eq!(s.position(id).unwrap(), pos);
    }

    #[test]
    fn test_muted_drops_sounds() {
        let mut s = scene();
        s.play_sound(SoundCue::Correct);
        s.set_muted(true);
        s.play_sound(SoundCue::Wrong);

        assert_eq!(s.sounds(), &[SoundCue::Correct]);
    }

    #[test]
    fn test_shutdown_mode_gates_exit() {
        let mut harness = HeadlessScene::new(ShutdownMode::Harness);
        harness.request_shutdown();
        assert!(harness.shutdown_requested());
        assert!(!harness.should_exit());

        let mut standalone = HeadlessScene::new(ShutdownMode::Standalone);
        standalone.request_shutdown();
        assert!(standalone.should_exit());
    }
}
