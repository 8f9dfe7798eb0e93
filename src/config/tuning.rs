use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::game::physics::MotionParams;

/// All tunable controller parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub dt: f32,
    pub walk_multiplier: f32,
    pub run_multiplier: f32,
    pub block_multiplier: f32,
    /// Slerp factor per second toward the movement direction.
    pub rotation_multiplier: f32,
    /// Small downward bias while grounded, keeps ground contact stable.
    pub grounded_gravity: f32,
    /// Fixed (not integrated) downward velocity while airborne.
    pub airborne_gravity: f32,
    pub ground_height: f32,
    pub interact_radius: f32,
    pub inventory_capacity: usize,
    /// How long one attack swing plays after the trigger is consumed.
    pub attack_swing_secs: f32,
    pub camera_offset: [f32; 3],
    pub camera_zoom: f32,
    pub camera_zoom_speed: f32,
    pub camera_min_zoom: f32,
    pub camera_max_zoom: f32,
    /// Orbit speed in degrees per second.
    pub camera_turn_speed: f32,
    /// 0 = snap to the follow position every frame.
    pub camera_smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            walk_multiplier: 1.5,
            run_multiplier: 3.0,
            block_multiplier: 0.5,
            rotation_multiplier: 5.0,
            grounded_gravity: -0.05,
            airborne_gravity: -9.8,
            ground_height: 0.0,
            interact_radius: 0.75,
            inventory_capacity: 4,
            attack_swing_secs: 0.6,
            camera_offset: [0.0, 3.0, 4.5],
            camera_zoom: 1.5,
            camera_zoom_speed: 0.5,
            camera_min_zoom: 0.5,
            camera_max_zoom: 3.0,
            camera_turn_speed: 100.0,
            camera_smoothing: 0.0,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("wayfarer")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    /// Parse a RON document; missing fields take their default value and
    /// out-of-range values are repaired.
    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<Self>(contents).map(Self::sanitized)
    }

    /// Replace values that would stall the fixed loop or break the camera.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.dt.is_finite() || self.dt <= 0.0 {
            warn!("tuning: dt {} is not a positive duration, using {}", self.dt, defaults.dt);
            self.dt = defaults.dt;
        }
        if !self.interact_radius.is_finite() || self.interact_radius <= 0.0 {
            warn!(
                "tuning: interact_radius {} is invalid, using {}",
                self.interact_radius, defaults.interact_radius
            );
            self.interact_radius = defaults.interact_radius;
        }

        let (min, max) = (self.camera_min_zoom, self.camera_max_zoom);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
            warn!(
                "tuning: camera zoom range [{min}, {max}] is invalid, using [{}, {}]",
                defaults.camera_min_zoom, defaults.camera_max_zoom
            );
            self.camera_min_zoom = defaults.camera_min_zoom;
            self.camera_max_zoom = defaults.camera_max_zoom;
        } else if min > max {
            warn!("tuning: camera zoom range [{min}, {max}] is inverted, swapping");
            self.camera_min_zoom = max;
            self.camera_max_zoom = min;
        }
        if !self.camera_zoom.is_finite() {
            warn!("tuning: camera_zoom {} is invalid, using {}", self.camera_zoom, defaults.camera_zoom);
            self.camera_zoom = defaults.camera_zoom;
        }
        self.camera_zoom = self.camera_zoom.clamp(self.camera_min_zoom, self.camera_max_zoom);
        self
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }

    pub fn motion_params(&self) -> MotionParams {
        MotionParams {
            walk_multiplier: self.walk_multiplier,
            run_multiplier: self.run_multiplier,
            block_multiplier: self.block_multiplier,
            grounded_gravity: self.grounded_gravity,
            airborne_gravity: self.airborne_gravity,
        }
    }

    pub fn camera_offset(&self) -> Vec3 {
        Vec3::from_array(self.camera_offset)
    }
}
