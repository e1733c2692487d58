//! Silent WAV substituted whenever real speech is unavailable

use crate::error::SpeechError;
use bytes::Bytes;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

const SECONDS_PER_CHAR: f64 = 0.04;
const MIN_SECONDS: f64 = 1.0;
const MAX_SECONDS: f64 = 3.0;

/// Placeholder length for `text`: 40 ms per character, kept within 1 to 3 seconds
pub fn placeholder_duration(text: &str) -> f64 {
    let chars = text.chars().count() as f64;
    (chars * SECONDS_PER_CHAR).clamp(MIN_SECONDS, MAX_SECONDS)
}

/// Mono 16-bit silence sized from the text length
pub fn placeholder_wav(text: &str, sample_rate: u32) -> Result<Bytes, SpeechError> {
    let samples = ((placeholder_duration(text) * sample_rate as f64).floor() as usize).max(1);
    encode_mono_pcm16(std::iter::repeat(0i16).take(samples), sample_rate)
}

pub(crate) fn encode_mono_pcm16<I>(samples: I, sample_rate: u32) -> Result<Bytes, SpeechError>
where
    I: IntoIterator<Item = i16>,
{
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(Bytes::from(cursor.into_inner()))
}
