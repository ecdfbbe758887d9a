//! WAV file input
//!
//! Reads PCM recordings into float sample buffers via `hound`. Only 8-bit
//! unsigned and 16-bit signed integer PCM are supported; anything else is a
//! fatal input error. Multi-channel recordings are reduced to channel 0
//! with a warning. 8-bit audio is stored unsigned in the container, so it
//! is DC-recentered before conversion.

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

#[derive(Debug, Snafu)]
pub enum WavError {
    /// Container missing or unreadable
    #[snafu(display("failed to open WAV file '{path}': {source}"))]
    Open { path: String, source: hound::Error },

    /// Sample payload could not be read
    #[snafu(display("failed to read samples from '{path}': {source}"))]
    Read { path: String, source: hound::Error },

    /// Only 8-bit and 16-bit integer PCM are supported
    #[snafu(display("unsupported sample width: {bits}-bit {format:?}"))]
    UnsupportedSampleWidth {
        bits: u16,
        format: hound::SampleFormat,
    },
}

/// Mono audio buffer with its sample rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

/// Read a WAV file into an [`AudioBuffer`].
pub fn read_wav_file(path: &str) -> Result<AudioBuffer, WavError> {
    let mut reader = hound::WavReader::open(path).context(OpenSnafu { path })?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels > 1 {
        warn!(channels, "multi-channel recording, using channel 0 only");
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 8) => {
            // hound hands back the raw byte as i8; recover the unsigned
            // value and recenter around zero.
            let raw: Result<Vec<i8>, _> = reader.samples::<i8>().collect();
            raw.context(ReadSnafu { path })?
                .into_iter()
                .map(|v| v as u8 as f32 - 128.0)
                .collect()
        }
        (hound::SampleFormat::Int, 16) => {
            let raw: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
            raw.context(ReadSnafu { path })?
                .into_iter()
                .map(|v| v as f32)
                .collect()
        }
        (format, bits) => {
            return Err(WavError::UnsupportedSampleWidth { bits, format });
        }
    };

    let samples: Vec<f32> = if channels > 1 {
        interleaved.into_iter().step_by(channels).collect()
    } else {
        interleaved
    };

    debug!(
        sample_rate = spec.sample_rate,
        samples = samples.len(),
        "read WAV file"
    );

    Ok(AudioBuffer {
        sample_rate: spec.sample_rate,
        samples,
    })
}
