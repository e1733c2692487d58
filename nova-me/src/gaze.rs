//! Gaze lock configuration and composition

use serde::{Deserialize, Serialize};

pub const PARAM_EYE_BALL_X: &str = "ParamEyeBallX";
pub const PARAM_EYE_BALL_Y: &str = "ParamEyeBallY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GazeOffset {
    pub x: f32,
    pub y: f32,
}

impl GazeOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// When off, configuration changes are stored but nothing is written
    pub lock_enabled: bool,
    pub target: GazeOffset,
    pub center: GazeOffset,
    pub invert_x: bool,
    pub invert_y: bool,
    pub x_param: String,
    pub y_param: String,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            lock_enabled: true,
            target: GazeOffset::default(),
            center: GazeOffset::default(),
            invert_x: false,
            invert_y: false,
            x_param: PARAM_EYE_BALL_X.to_string(),
            y_param: PARAM_EYE_BALL_Y.to_string(),
        }
    }
}

impl GazeConfig {
    /// Eye position to write, or `None` while the lock is off.
    /// Each axis is `target + center`, optionally negated, clamped to [-1, 1].
    pub fn resolve(&self) -> Option<GazeOffset> {
        if !self.lock_enabled {
            return None;
        }
        Some(GazeOffset {
            x: compose_axis(self.target.x, self.center.x, self.invert_x),
            y: compose_axis(self.target.y, self.center.y, self.invert_y),
        })
    }

    pub fn merge(&mut self, update: GazeConfigUpdate) {
        if let Some(lock_enabled) = update.lock_enabled {
            self.lock_enabled = lock_enabled;
        }
        if let Some(target) = update.target {
            self.target = target;
        }
        if let Some(center) = update.center {
            self.center = center;
        }
        if let Some(invert_x) = update.invert_x {
            self.invert_x = invert_x;
        }
        if let Some(invert_y) = update.invert_y {
            self.invert_y = invert_y;
        }
        if let Some(x_param) = update.x_param {
            self.x_param = x_param;
        }
        if let Some(y_param) = update.y_param {
            self.y_param = y_param;
        }
    }
}

fn compose_axis(target: f32, center: f32, invert: bool) -> f32 {
    let raw = target + center;
    let raw = if invert { -raw } else { raw };
    if raw.is_finite() {
        raw.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Partial gaze configuration; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfigUpdate {
    pub lock_enabled: Option<bool>,
    pub target: Option<GazeOffset>,
    pub center: Option<GazeOffset>,
    pub invert_x: Option<bool>,
    pub invert_y: Option<bool>,
    pub x_param: Option<String>,
    pub y_param: Option<String>,
}
