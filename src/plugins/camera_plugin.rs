use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::camera::{self, FollowCamera};
use crate::game::components::MainCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera);
        app.add_systems(
            Update,
            (
                camera::apply_camera_tuning,
                camera::camera_controls,
                camera::follow_player,
            )
                .chain(),
        );
    }
}

fn setup_camera(mut commands: Commands, tuning: Res<Tuning>) {
    let follow = FollowCamera::from_tuning(&tuning);
    let eye = follow.desired_eye(Vec3::ZERO);
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y),
        follow,
    ));
}
