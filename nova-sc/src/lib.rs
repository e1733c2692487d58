//! nova-sc: audio analysis for avatar lip-sync
//!
//! A [`LipSyncAnalyzer`] attaches a tap to whatever is currently playing and turns
//! the most recent waveform window into a mouth-openness value in [0, 1].
//! Polling cadence belongs to the caller.

pub mod config;
pub mod error;
pub mod lip_sync;
pub mod source;


pub use config::LipSyncConfig;
pub use error::AudioError;
pub use lip_sync::LipSyncAnalyzer;
pub use source::{AnalysisTap, AudioSource, WavPlayback};
