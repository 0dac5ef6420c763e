//! Chase Camera
//!
//! Follows the tracked actor from behind along its travel heading, pulls in
//! when geometry blocks the view, critically damps position and slerps
//! rotation toward the focus point. Reads the scene, never mutates it.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::math::{horizontal, look_rotation, smooth_damp};
use crate::engine::hooks::{ActorId, ActorKind, SceneQuery};

/// How far in front of an obstruction the camera settles.
const OCCLUSION_BACKOFF: f32 = 0.05;

/// Framing and smoothing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Distance behind the target along its heading
    pub follow_distance: f32,

    /// Height above the target
    pub height: f32,

    /// Vertical offset of the look-at focus point
    pub look_up_offset: f32,

    /// Position smoothing time constant
    pub position_smooth_time: f32,

    /// Rotation slerp rate (per second)
    pub rotation_smooth_speed: f32,

    /// Below this horizontal speed the last heading is kept, so the camera
    /// does not spin while the target idles
    pub min_heading_speed: f32,

    /// Radius of the occlusion sweep
    pub collision_radius: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_distance: 7.0,
            height: 3.0,
            look_up_offset: 1.2,
            position_smooth_time: 0.12,
            rotation_smooth_speed: 10.0,
            min_heading_speed: 0.15,
            collision_radius: 0.2,
        }
    }
}

/// Smoothed, collision-avoiding follow camera.
#[derive(Clone, Debug)]
pub struct ChaseCamera {
    config: CameraConfig,
    target: Option<ActorId>,
    last_heading: Vec3,
    smooth_velocity: Vec3,
    position: Vec3,
    rotation: Quat,
}

impl ChaseCamera {
    /// Camera at the origin, heading +Z, no target yet.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            target: None,
            last_heading: Vec3::Z,
            smooth_velocity: Vec3::ZERO,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Current camera position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current camera rotation.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Currently tracked actor, if any.
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// Track a specific actor instead of auto-acquiring one.
    pub fn set_target(&mut self, target: ActorId) {
        self.target = Some(target);
    }

    /// Late-tick update. `dt` is already time-scaled; zero freezes the
    /// camera along with the rest of the world.
    pub fn late_tick(&mut self, dt: f32, scene: &dyn SceneQuery) {
        if dt <= 0.0 {
            return;
        }

        // Re-acquire when the tracked actor is gone (destroyed, theme swap)
        let target = match self.target.filter(|t| scene.position(*t).is_some()) {
            Some(t) => t,
            None => {
                let Some(found) = scene.find_actor(ActorKind::Player) else {
                    return;
                };
                debug!(actor = found.0, "camera acquired target");
                self.target = Some(found);
                found
            }
        };
        let Some(target_pos) = scene.position(target) else {
            return;
        };

        // Heading from horizontal velocity, kept when the target idles
        let flat_vel = horizontal(scene.velocity(target).unwrap_or(Vec3::ZERO));
        let min_speed = self.config.min_heading_speed;
        if flat_vel.length_squared() > min_speed * min_speed {
            self.last_heading = flat_vel.normalize();
        }
        let heading = self.last_heading;

        let raw_desired =
            target_pos - heading * self.config.follow_distance + Vec3::Y * self.config.height;
        let focus = target_pos + Vec3::Y * self.config.look_up_offset;

        // Pull in when something blocks the focus-to-camera line
        let to_camera = raw_desired - focus;
        let cam_dist = to_camera.length();
        let mut desired = raw_desired;
        if cam_dist > 1e-3 {
            let dir = to_camera / cam_dist;
            if let Some(hit) =
                scene.sphere_cast(focus, dir, self.config.collision_radius, cam_dist)
            {
                desired = focus + dir * (hit - OCCLUSION_BACKOFF).max(0.0);
            }
        }

        self.position = smooth_damp(
            self.position,
            desired,
            &mut self.smooth_velocity,
            self.config.position_smooth_time,
            dt,
        );

        let target_rot = look_rotation(focus - self.position, Vec3::Y);
        let t = (self.config.rotation_smooth_speed * dt).min(1.0);
        self.rotation = self.rotation.slerp(target_rot, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShutdownMode;
    use crate::engine::harness::HeadlessScene;
    use crate::engine::hooks::{EngineHooks, PrefabRef};

    const DT: f32 = 1.0 / 60.0;

    fn scene_with_player(pos: Vec3) -> (HeadlessScene, ActorId) {
        let mut scene = HeadlessScene::new(ShutdownMode::Harness);
        let id = scene.spawn_actor(&PrefabRef::new("hero"), ActorKind::Player, pos);
        (scene, id)
    }

    fn settle(camera: &mut ChaseCamera, scene: &HeadlessScene, ticks: u32) {
        for _ in 0..ticks {
            camera.late_tick(DT, scene);
        }
    }

    #[test]
    fn test_camera_settles_behind_moving_target() {
        let (mut scene, player) = scene_with_player(Vec3::new(0.0, 0.5, 0.0));
        // Moving along +X: heading becomes +X, camera should sit at -X
        scene.set_velocity(player, Vec3::new(3.0, 0.0, 0.0));

        let mut camera = ChaseCamera::new(CameraConfig::default());
        settle(&mut camera, &scene, 600);

        let pos = camera.position();
        assert!(pos.x < -5.0, "camera should trail behind, got {pos:?}");
        assert!((pos.y - 3.5).abs() < 0.1, "camera height off, got {pos:?}");

        // Looking roughly toward the focus point
        let fwd = camera.rotation() * Vec3::Z;
        let to_focus = (Vec3::new(0.0, 1.7, 0.0) - pos).normalize();
        assert!(fwd.dot(to_focus) > 0.99);
    }

    #[test]
    fn test_heading_retained_when_target_stops() {
        let (mut scene, player) = scene_with_player(Vec3::ZERO);
        scene.set_velocity(player, Vec3::new(0.0, 0.0, 4.0));

        let mut camera = ChaseCamera::new(CameraConfig::default());
        settle(&mut camera, &scene, 120);
        let heading_before = camera.last_heading;

        // Stop (below the heading threshold): heading must not change
        scene.set_velocity(player, Vec3::new(0.05, 0.0, 0.0));
        settle(&mut camera, &scene, 120);
        assert_eq!(camera.last_heading, heading_before);
    }

    #[test]
    fn test_occlusion_pulls_camera_in() {
        let (mut scene, player) = scene_with_player(Vec3::ZERO);
        scene.set_velocity(player, Vec3::new(3.0, 0.0, 0.0));
        // Wall between the focus point and the trailing camera spot
        scene.add_obstacle(Vec3::new(-4.0, 2.0, 0.0), 1.0);

        let mut camera = ChaseCamera::new(CameraConfig::default());
        settle(&mut camera, &scene, 600);

        let focus = Vec3::new(0.0, 1.2, 0.0);
        let unobstructed = Vec3::new(-7.0, 3.0, 0.0);
        assert!(
            camera.position().distance(focus) < unobstructed.distance(focus) - 0.5,
            "camera did not pull in: {:?}",
            camera.position()
        );
    }

    #[test]
    fn test_reacquires_target_after_despawn() {
        let (mut scene, player) = scene_with_player(Vec3::ZERO);

        let mut camera = ChaseCamera::new(CameraConfig::default());
        camera.late_tick(DT, &scene);
        assert_eq!(camera.target(), Some(player));

        // Theme swap: old actor gone, a new one appears elsewhere
        scene.despawn_actor(player);
        let fresh = scene.spawn_actor(
            &PrefabRef::new("hero2"),
            ActorKind::Player,
            Vec3::new(5.0, 0.5, 5.0),
        );
        camera.late_tick(DT, &scene);
        assert_eq!(camera.target(), Some(fresh));
    }

    #[test]
    fn test_zero_dt_freezes_camera() {
        let (scene, _) = scene_with_player(Vec3::ZERO);
        let mut camera = ChaseCamera::new(CameraConfig::default());
        camera.late_tick(DT, &scene);
        let snap = (camera.position(), camera.rotation());

        camera.late_tick(0.0, &scene);
        assert_eq!((camera.position(), camera.rotation()), snap);
    }
}
