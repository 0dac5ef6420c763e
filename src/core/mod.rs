//! Shared primitives used across the gameplay modules.

pub mod math;

pub use math::{horizontal, look_rotation, move_towards, smooth_damp};
