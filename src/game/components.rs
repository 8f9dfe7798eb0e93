use bevy::prelude::*;

use super::physics::Gait;

// ── Marker components ───────────────────────────────────────────────

#[derive(Component)]
pub struct Player;

/// The visible ground plane; its height follows `Tuning::ground_height`.
#[derive(Component)]
pub struct Ground;

/// Marker for the third-person camera entity.
#[derive(Component)]
pub struct MainCamera;

// ── Character runtime state ─────────────────────────────────────────

/// Body state owned by the ground mover.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct KinematicBody {
    pub grounded: bool,
    pub ground_height: f32,
}

/// Velocities derived from intent on the last fixed tick.
/// Facing lives in the player's `Transform::rotation`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MotionState {
    pub gait: Gait,
    pub horizontal_velocity: Vec3,
    pub vertical_velocity: f32,
}
