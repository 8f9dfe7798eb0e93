use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::prelude::*;

use super::components::{MainCamera, Player};
use super::types::Zoom;
use crate::config::tuning::Tuning;

/// Third-person follow camera: sits at `offset * zoom` from the target,
/// orbited around the vertical axis by `yaw`, always looking at the target.
#[derive(Component, Debug, Clone)]
pub struct FollowCamera {
    pub offset: Vec3,
    pub zoom: Zoom,
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Degrees per second.
    pub turn_speed: f32,
    pub yaw: f32,
    pub smoothing: f32,
}

impl FollowCamera {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            offset: tuning.camera_offset(),
            zoom: Zoom::clamped(tuning.camera_zoom, tuning.camera_min_zoom, tuning.camera_max_zoom),
            zoom_speed: tuning.camera_zoom_speed,
            min_zoom: tuning.camera_min_zoom,
            max_zoom: tuning.camera_max_zoom,
            turn_speed: tuning.camera_turn_speed,
            yaw: 0.0,
            smoothing: tuning.camera_smoothing,
        }
    }

    /// Take reloaded tuning values, keeping the current orbit and zoom.
    pub fn retune(&mut self, tuning: &Tuning) {
        let (yaw, zoom) = (self.yaw, self.zoom.0);
        *self = Self::from_tuning(tuning);
        self.yaw = yaw;
        self.zoom = Zoom::clamped(zoom, self.min_zoom, self.max_zoom);
    }

    /// Positive scroll zooms in.
    pub fn zoom_by(&mut self, scroll: f32) {
        let next = self.zoom.0 - scroll * self.zoom_speed;
        self.zoom = Zoom::clamped(next, self.min_zoom, self.max_zoom);
    }

    /// `direction` is -1, 0 or 1.
    pub fn orbit(&mut self, direction: f32, dt: f32) {
        self.yaw += (self.turn_speed * direction * dt).to_radians();
    }

    pub fn desired_eye(&self, target: Vec3) -> Vec3 {
        target + Quat::from_rotation_y(self.yaw) * (self.offset * self.zoom.0)
    }

    /// Next eye position; snaps when smoothing is 0.
    pub fn follow(&self, current: Vec3, target: Vec3, dt: f32) -> Vec3 {
        let desired = self.desired_eye(target);
        if self.smoothing <= 0.0 {
            return desired;
        }
        current.lerp(desired, (self.smoothing * dt).clamp(0.0, 1.0))
    }
}

/// Update: push a reloaded tuning into the follow cameras.
pub fn apply_camera_tuning(tuning: Res<Tuning>, mut cameras: Query<&mut FollowCamera, With<MainCamera>>) {
    if !tuning.is_changed() {
        return;
    }
    for mut camera in &mut cameras {
        camera.retune(&tuning);
    }
}

/// Update: mouse wheel zoom, Z/C orbit.
pub fn camera_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    scroll: Res<AccumulatedMouseScroll>,
    time: Res<Time>,
    mut cameras: Query<&mut FollowCamera, With<MainCamera>>,
) {
    let direction = (keyboard.pressed(KeyCode::KeyZ) as i8 - keyboard.pressed(KeyCode::KeyC) as i8) as f32;
    for mut camera in &mut cameras {
        if scroll.delta.y != 0.0 {
            camera.zoom_by(scroll.delta.y);
        }
        if direction != 0.0 {
            camera.orbit(direction, time.delta_secs());
        }
    }
}

/// Update: place the camera behind the player and look at them.
pub fn follow_player(
    time: Res<Time>,
    player: Query<&Transform, With<Player>>,
    mut cameras: Query<(&mut Transform, &FollowCamera), (With<MainCamera>, Without<Player>)>,
) {
    let Ok(player_tf) = player.single() else {
        return;
    };
    let target = player_tf.translation;
    for (mut transform, camera) in &mut cameras {
        transform.translation = camera.follow(transform.translation, target, time.delta_secs());
        transform.look_at(target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FollowCamera {
        FollowCamera::from_tuning(&Tuning::default())
    }

    #[test]
    fn eye_is_offset_times_zoom() {
        let cam = camera();
        let eye = cam.desired_eye(Vec3::new(1.0, 0.0, 1.0));
        assert!((eye - Vec3::new(1.0, 4.5, 7.75)).length() < 1e-5);
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut cam = camera();
        for _ in 0..20 {
            cam.zoom_by(1.0);
        }
        assert_eq!(cam.zoom, Zoom(0.5));
        for _ in 0..20 {
            cam.zoom_by(-1.0);
        }
        assert_eq!(cam.zoom, Zoom(3.0));
    }

    #[test]
    fn orbit_rotates_around_target() {
        let mut cam = camera();
        cam.orbit(1.0, 0.9);
        let eye = cam.desired_eye(Vec3::ZERO);
        let flat = Vec2::new(eye.x, eye.z).length();
        assert!((cam.yaw - 90f32.to_radians()).abs() < 1e-5);
        assert!((flat - 4.5 * 1.5).abs() < 1e-4);
        assert!((eye.y - 4.5).abs() < 1e-5);
    }

    #[test]
    fn retune_keeps_orbit_and_clamps_zoom() {
        let mut cam = camera();
        cam.orbit(1.0, 0.9);
        cam.zoom_by(-3.0);
        assert_eq!(cam.zoom, Zoom(3.0));

        let tuning = Tuning {
            camera_offset: [0.0, 2.0, 3.0],
            camera_max_zoom: 2.0,
            camera_smoothing: 4.0,
            ..Tuning::default()
        };
        let yaw = cam.yaw;
        cam.retune(&tuning);

        assert_eq!(cam.yaw, yaw);
        assert_eq!(cam.zoom, Zoom(2.0));
        assert_eq!(cam.offset, Vec3::new(0.0, 2.0, 3.0));
        assert_eq!(cam.smoothing, 4.0);
    }

    #[test]
    fn inverted_range_from_tuning_does_not_panic() {
        let tuning = Tuning {
            camera_min_zoom: 3.0,
            camera_max_zoom: 0.5,
            ..Tuning::default()
        };
        let mut cam = FollowCamera::from_tuning(&tuning);
        assert_eq!(cam.zoom, Zoom(1.5));
        cam.zoom_by(10.0);
        assert_eq!(cam.zoom, Zoom(0.5));
    }

    #[test]
    fn snaps_without_smoothing() {
        let cam = camera();
        let eye = cam.follow(Vec3::splat(100.0), Vec3::ZERO, 1.0 / 60.0);
        assert_eq!(eye, cam.desired_eye(Vec3::ZERO));
    }

    #[test]
    fn smoothing_approaches_gradually() {
        let mut cam = camera();
        cam.smoothing = 6.0;
        let start = Vec3::ZERO;
        let desired = cam.desired_eye(Vec3::ZERO);
        let eye = cam.follow(start, Vec3::ZERO, 0.1);
        assert!(eye.distance(desired) < start.distance(desired));
        assert!(eye.distance(desired) > 0.0);
    }
}
