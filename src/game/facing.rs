use bevy::prelude::*;

use super::components::Player;
use super::intent::Intent;
use super::physics::ground_direction;
use crate::config::tuning::Tuning;

/// Yaw-only rotation whose forward (-Z) points along `direction`.
/// `None` for a zero or non-finite direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if !flat.is_finite() || flat == Vec3::ZERO {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

/// Turn `current` toward the movement direction. Holds facing when idle.
pub fn update_facing(current: Quat, intent: &Intent, rotation_multiplier: f32, dt: f32) -> Quat {
    if !intent.is_moving() {
        return current;
    }
    let Some(target) = look_rotation(ground_direction(intent.move_axis)) else {
        return current;
    };
    let t = (rotation_multiplier * dt).clamp(0.0, 1.0);
    if !t.is_finite() {
        return current;
    }
    current.slerp(target, t)
}

/// FacingSet: rotate players toward where they are heading.
pub fn rotate_toward_movement(
    tuning: Res<Tuning>,
    time: Res<Time>,
    mut query: Query<(&Intent, &mut Transform), With<Player>>,
) {
    let dt = time.delta_secs();
    for (intent, mut transform) in &mut query {
        let facing = update_facing(transform.rotation, intent, tuning.rotation_multiplier, dt);
        if facing != transform.rotation {
            transform.rotation = facing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(axis: Vec2) -> Intent {
        Intent {
            move_axis: axis,
            ..default()
        }
    }

    fn forward(rotation: Quat) -> Vec3 {
        rotation * Vec3::NEG_Z
    }

    #[test]
    fn zero_axis_leaves_facing_unchanged() {
        let start = Quat::from_rotation_y(0.7);
        let facing = update_facing(start, &heading(Vec2::ZERO), 5.0, 0.1);
        assert_eq!(facing, start);
    }

    #[test]
    fn look_rotation_rejects_zero_direction() {
        assert!(look_rotation(Vec3::ZERO).is_none());
        assert!(look_rotation(Vec3::Y).is_none());
        assert!(look_rotation(Vec3::new(f32::NAN, 0.0, 1.0)).is_none());
    }

    #[test]
    fn look_rotation_faces_direction() {
        let rot = look_rotation(Vec3::X).unwrap();
        assert!((forward(rot) - Vec3::X).length() < 1e-5);

        let rot = look_rotation(Vec3::Z).unwrap();
        assert!((forward(rot) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn full_factor_snaps_to_target() {
        let facing = update_facing(Quat::IDENTITY, &heading(Vec2::new(1.0, 0.0)), 5.0, 1.0);
        assert!((forward(facing) - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn partial_factor_turns_part_way() {
        let facing = update_facing(Quat::IDENTITY, &heading(Vec2::new(1.0, 0.0)), 5.0, 0.05);
        let angle = facing.angle_between(Quat::IDENTITY);
        let quarter = std::f32::consts::FRAC_PI_2;
        assert!(angle > 0.0);
        assert!(angle < quarter);
    }

    #[test]
    fn repeated_ticks_converge() {
        let intent = heading(Vec2::new(-1.0, -1.0));
        let mut facing = Quat::IDENTITY;
        for _ in 0..200 {
            facing = update_facing(facing, &intent, 5.0, 1.0 / 60.0);
        }
        let expected = Vec3::new(-1.0, 0.0, 1.0).normalize();
        assert!((forward(facing) - expected).length() < 1e-3);
    }
}
