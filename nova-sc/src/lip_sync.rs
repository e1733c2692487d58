//! Mouth-openness signal from the loudness of the playing speech

use crate::config::LipSyncConfig;
use crate::error::AudioError;
use crate::source::{AnalysisTap, AudioSource};
use tracing::debug;

pub struct LipSyncAnalyzer {
    config: LipSyncConfig,
    tap: Option<Box<dyn AnalysisTap>>,
    buffer: Vec<f32>,
}

impl LipSyncAnalyzer {
    pub fn new(config: LipSyncConfig) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::Config)?;
        Ok(Self {
            config,
            tap: None,
            buffer: Vec::new(),
        })
    }

    /// Attach to `source`, replacing any previous connection
    pub fn connect(&mut self, source: &dyn AudioSource) {
        self.disconnect();
        self.tap = Some(source.attach_tap(self.config.window_size));
        self.buffer = vec![0.0; self.config.window_size];
        debug!("Lip-sync connected with a {} sample window", self.config.window_size);
    }

    /// `min(1, rms × gain)` over the latest window, 0 while disconnected
    pub fn get_value(&mut self) -> f32 {
        let tap = match self.tap {
            Some(ref mut tap) => tap,
            None => return 0.0,
        };
        if self.buffer.is_empty() {
            return 0.0;
        }

        tap.read_time_domain(&mut self.buffer);
        let sum: f32 = self.buffer.iter().map(|v| v * v).sum();
        let rms = (sum / self.buffer.len() as f32).sqrt();
        (rms * self.config.gain).min(1.0)
    }

    /// Tear down the tap and release the buffer; no-op when not connected
    pub fn disconnect(&mut self) {
        if let Some(mut tap) = self.tap.take() {
            tap.detach();
            debug!("Lip-sync disconnected");
        }
        self.buffer = Vec::new();
    }

    pub fn is_connected(&self) -> bool {
        self.tap.is_some()
    }

    pub fn config(&self) -> &LipSyncConfig {
        &self.config
    }
}

impl Drop for LipSyncAnalyzer {
    fn drop(&mut self) {
        self.disconnect();
    }
}
