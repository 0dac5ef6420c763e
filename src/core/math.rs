//! Float Math Helpers
//!
//! Small building blocks shared by the chase camera, the pursuit stepper and
//! the demo driver. Everything operates on `glam` types.

use glam::{Mat3, Quat, Vec3};

/// Critically damped spring smoothing toward a target position.
///
/// The classic Game Programming Gems smoother: eases in and out without
/// overshooting for sane timesteps, no spring constants to hand-tune.
/// `velocity` is carried across calls by the caller.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * exp;
    target + (change + temp) * exp
}

/// Project a vector onto the ground plane (zero the vertical component).
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Step `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let dist = to_target.length();
    if dist <= max_delta || dist < 1e-6 {
        target
    } else {
        current + to_target / dist * max_delta
    }
}

/// Rotation pointing local +Z along `forward`, keeping `up` as close to
/// vertical as the forward direction allows.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let r = up.cross(f);
    let right = if r.length_squared() < 1e-8 {
        // forward is (anti)parallel to up
        f.any_orthonormal_vector()
    } else {
        r.normalize()
    };
    let new_up = f.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, new_up, f))
}
