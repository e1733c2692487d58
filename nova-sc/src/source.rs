//! Audio sources the lip-sync analyzer can attach to

use crate::error::AudioError;
use hound::{SampleFormat, WavReader};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Read side of an analysis tap on a playing source
pub trait AnalysisTap: Send {
    /// Fill `out` with the most recent samples in [-1, 1], oldest first.
    /// Missing history (start of playback, detached tap) reads as silence.
    fn read_time_domain(&mut self, out: &mut [f32]);

    /// Stop observing the source; later reads are silent
    fn detach(&mut self);
}

/// Something that is playing, or about to play, speech audio
pub trait AudioSource {
    fn attach_tap(&self, window: usize) -> Box<dyn AnalysisTap>;
}

struct Track {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// Decoded mono track with a playhead moved by the caller's playback loop
#[derive(Clone)]
pub struct WavPlayback {
    track: Arc<Track>,
    playhead: Arc<AtomicUsize>,
}

impl WavPlayback {
    /// Decode WAV bytes (integer PCM or 32-bit float), averaging channels to mono
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        let reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(AudioError::Format("WAV declares zero channels".to_string()));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let channels = spec.channels as usize;
        let mono = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Self::from_samples(mono, spec.sample_rate)
    }

    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::Format("sample rate cannot be 0".to_string()));
        }
        let samples = samples
            .into_iter()
            .map(|s| if s.is_finite() { s.clamp(-1.0, 1.0) } else { 0.0 })
            .collect();

        Ok(Self {
            track: Arc::new(Track {
                samples,
                sample_rate,
            }),
            playhead: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.track.sample_rate
    }

    pub fn len_samples(&self) -> usize {
        self.track.samples.len()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.len_samples() as f64 / self.sample_rate() as f64)
    }

    pub fn position(&self) -> Duration {
        Duration::from_secs_f64(self.playhead.load(Ordering::Acquire) as f64 / self.sample_rate() as f64)
    }

    pub fn seek(&self, to: Duration) {
        let index = self.index_for(to);
        self.playhead.store(index, Ordering::Release);
    }

    /// Move the playhead forward, stopping at the end of the track
    pub fn advance(&self, by: Duration) {
        let step = self.index_for(by);
        let len = self.len_samples();
        let _ = self
            .playhead
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |at| Some(at.saturating_add(step).min(len)));
    }

    pub fn is_finished(&self) -> bool {
        self.playhead.load(Ordering::Acquire) >= self.len_samples()
    }

    fn index_for(&self, at: Duration) -> usize {
        let index = at.as_nanos() * self.sample_rate() as u128 / 1_000_000_000;
        usize::try_from(index).unwrap_or(usize::MAX).min(self.len_samples())
    }
}

impl AudioSource for WavPlayback {
    fn attach_tap(&self, window: usize) -> Box<dyn AnalysisTap> {
        Box::new(PlaybackTap {
            source: Some(self.clone()),
            window,
        })
    }
}

struct PlaybackTap {
    source: Option<WavPlayback>,
    window: usize,
}

impl AnalysisTap for PlaybackTap {
    fn read_time_domain(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        let source = match self.source {
            Some(ref source) if !source.is_finished() => source,
            _ => return,
        };

        let samples = &source.track.samples;
        let end = source.playhead.load(Ordering::Acquire).min(samples.len());
        let wanted = out.len().min(self.window);
        let start = end.saturating_sub(wanted);
        let recent = &samples[start..end];

        let offset = out.len() - recent.len();
        out[offset..].copy_from_slice(recent);
    }

    fn detach(&mut self) {
        self.source = None;
    }
}
