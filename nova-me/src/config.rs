//! Configuration for the avatar controller

use crate::emotion::{default_presets, default_rest_pose, EmotionPreset};
use crate::gaze::GazeConfig;
use nova_core::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const PARAM_MOUTH_OPEN_Y: &str = "ParamMouthOpenY";

/// Avatar controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Derive an expression from the emotion when the directive names none
    pub auto_expression: bool,

    /// Emotion -> expression name used by `auto_expression`
    pub expressions: HashMap<Emotion, String>,

    /// Fade for emotion preset writes, seconds
    pub emotion_fade_secs: f64,

    /// Fade for gaze writes, seconds
    pub gaze_fade_secs: f64,

    /// Parameter driven by `set_lip_sync`
    pub lip_sync_param: String,

    pub presets: HashMap<Emotion, EmotionPreset>,

    /// Values preset offsets are measured from
    pub rest_pose: HashMap<String, f32>,

    pub gaze: GazeConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_expression: true,
            expressions: Emotion::ALL
                .iter()
                .map(|emotion| (*emotion, emotion.as_str().to_string()))
                .collect(),
            emotion_fade_secs: 0.3,
            gaze_fade_secs: 0.2,
            lip_sync_param: PARAM_MOUTH_OPEN_Y.to_string(),
            presets: default_presets(),
            rest_pose: default_rest_pose(),
            gaze: GazeConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, fade) in [
            ("emotion_fade_secs", self.emotion_fade_secs),
            ("gaze_fade_secs", self.gaze_fade_secs),
        ] {
            if !fade.is_finite() || fade < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }

        if self.lip_sync_param.trim().is_empty() {
            return Err("lip_sync_param cannot be empty".to_string());
        }
        if self.gaze.x_param.trim().is_empty() || self.gaze.y_param.trim().is_empty() {
            return Err("gaze parameter ids cannot be empty".to_string());
        }

        for (emotion, preset) in &self.presets {
            if let Some(bad) = preset.offsets.iter().find(|p| !p.offset.is_finite()) {
                return Err(format!("{} preset has a non-finite offset for {}", emotion, bad.id));
            }
        }
        if self.rest_pose.values().any(|v| !v.is_finite()) {
            return Err("rest_pose values must be finite".to_string());
        }

        Ok(())
    }

    /// Expression implied by `emotion`, if the table has one
    pub fn expression_for(&self, emotion: Emotion) -> Option<&str> {
        self.expressions.get(&emotion).map(String::as_str)
    }
}
