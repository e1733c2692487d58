//! Configuration for lip-sync analysis

use serde::{Deserialize, Serialize};

/// Lip-sync analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSyncConfig {
    /// Samples per analysis window
    pub window_size: usize,

    /// RMS multiplier applied before clamping to 1
    pub gain: f32,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            gain: 2.2,
        }
    }
}

impl LipSyncConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window_size == 0 || self.window_size > 32_768 {
            return Err(format!("window_size must be 1-32768, got {}", self.window_size));
        }
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(format!("gain must be a positive number, got {}", self.gain));
        }
        Ok(())
    }
}
