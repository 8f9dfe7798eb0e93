use serde::{Deserialize, Serialize};

/// Duration in seconds. Always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f32);

impl Seconds {
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }

    /// Decrement by dt, clamped to 0.
    pub fn dec(self, dt: f32) -> Self {
        Self((self.0 - dt).max(0.0))
    }

    pub fn is_expired(self) -> bool {
        self.0 <= 0.0
    }
}

/// Camera zoom factor, kept inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Zoom(pub f32);

impl Zoom {
    /// Tolerates an inverted range. A NaN bound is ignored.
    pub fn clamped(v: f32, min: f32, max: f32) -> Self {
        let (lo, hi) = if max < min { (max, min) } else { (min, max) };
        Self(v.max(lo).min(hi))
    }
}
