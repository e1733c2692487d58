//! Local stand-in for a real voice: a sine tone whose length follows the text

use crate::config::SpeechRequest;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use crate::placeholder::encode_mono_pcm16;
use async_trait::async_trait;
use bytes::Bytes;
use std::f64::consts::PI;

const BASE_FREQUENCY: f64 = 220.0;
const AMPLITUDE: f64 = 0.2;

pub struct ToneTtsEngine {
    sample_rate: u32,
}

impl ToneTtsEngine {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// 40 ms per character, between 0.6 and 4 seconds
    pub fn duration(text: &str) -> f64 {
        let chars = text.chars().count().max(1) as f64;
        (0.04 * chars).clamp(0.6, 4.0)
    }

    /// 220 Hz shifted 5% per pitch step, limited to one octave either way
    pub fn frequency(pitch: Option<f64>) -> f64 {
        match pitch {
            Some(pitch) if pitch.is_finite() => BASE_FREQUENCY * (1.0 + pitch * 0.05).clamp(0.5, 2.0),
            _ => BASE_FREQUENCY,
        }
    }

    pub fn render(&self, request: &SpeechRequest) -> Result<Bytes, SpeechError> {
        let rate = self.sample_rate as f64;
        let freq = Self::frequency(request.pitch);
        let count = (rate * Self::duration(&request.text)) as usize;

        let samples = (0..count).map(move |i| {
            let phase = 2.0 * PI * freq * i as f64 / rate;
            (AMPLITUDE * 32767.0 * phase.sin()) as i16
        });
        encode_mono_pcm16(samples, self.sample_rate)
    }
}

#[async_trait]
impl TtsEngine for ToneTtsEngine {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, SpeechError> {
        self.render(request)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "tone"
    }
}
