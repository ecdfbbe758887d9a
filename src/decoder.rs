//! Blind Morse decoder
//!
//! Runs the complete decode pipeline on a raw sample buffer: pitch
//! estimation, bandpass conditioning, envelope extraction, binarization,
//! run measurement, duration clustering, grouping, and translation.
//! Timing is learned from the recording itself, so no prior knowledge of
//! the sender's speed or tone frequency is required.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cluster::{ClusterError, ClusterPolicy};
use crate::envelope::{binarize, smoothed_power};
use crate::filter::bandpass;
use crate::group::{group_words, MorseWord};
use crate::pitch::dominant_frequency;
use crate::runs::measure_runs;
use crate::symbol::{classify_spaces, classify_symbols, SpaceClassification, Symbol};
use crate::translate::{transcription, translate};

/// Result text when no keyed signal is found in the recording.
pub const NO_SIGNAL_TEXT: &str = "No signal detected";

/// Result text when durations cannot be clustered.
pub const DECODE_ERROR_TEXT: &str = "Error decoding";

/// Configuration for the Morse decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Envelope smoothing window as a fraction of the sample rate
    pub envelope_window_fraction: f32,
    /// Binarization threshold as a fraction of the envelope peak
    pub threshold_fraction: f32,
    /// Dot length assumed when only one on-duration value exists (ms)
    pub dot_fallback_ms: f32,
    /// Gap-to-intra-centroid ratio that promotes a gap to a word break
    pub word_gap_ratio: f32,
    /// Clustering restarts and seed
    pub clustering: ClusterPolicy,
    /// Attach plotting data to the result
    pub visualization: bool,
    /// Maximum points per visualization series
    pub visualization_points: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            envelope_window_fraction: 0.01,
            threshold_fraction: 0.5,
            dot_fallback_ms: 100.0,
            word_gap_ratio: 5.0,
            clustering: ClusterPolicy::default(),
            visualization: true,
            visualization_points: 2000,
        }
    }
}

/// Decoded Morse message with optional plotting data
#[derive(Debug, Clone, Serialize)]
pub struct DecodedMessage {
    /// Dots and dashes, letters space-separated, words "/"-separated
    pub morse: String,
    /// Translated plain text
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
}

/// Decimated signal traces for plotting
#[derive(Debug, Clone, Default, Serialize)]
pub struct Visualization {
    /// Filtered audio, decimated
    pub audio: Vec<f32>,
    /// Normalized envelope, decimated
    pub envelope: Vec<f32>,
    /// Binarized envelope, decimated
    pub square: Vec<u8>,
    /// Threshold in normalized envelope units
    pub threshold: f32,
    /// Per-run durations and cluster labels
    pub clustering: ClusteringInfo,
}

/// Cluster labels assigned to each measured run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusteringInfo {
    pub on: Vec<OnRunInfo>,
    pub off: Vec<OffRunInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnRunInfo {
    /// Run length in samples
    pub duration: usize,
    /// '.' or '-'
    pub label: char,
}

#[derive(Debug, Clone, Serialize)]
pub struct OffRunInfo {
    /// Run length in samples
    pub duration: usize,
    /// 0 intra-character, 1 letter gap, 2 word gap, -1 unknown
    pub label: i8,
}

struct DecodeOutcome {
    symbols: Vec<Symbol>,
    spaces: SpaceClassification,
    words: Vec<MorseWord>,
}

/// Decode a Morse transmission from a raw sample buffer.
///
/// Never fails: degenerate input yields a [`DecodedMessage`] with
/// [`NO_SIGNAL_TEXT`] or [`DECODE_ERROR_TEXT`] as its text.
pub fn decode_signal(samples: &[f32], sample_rate: u32, config: &DecoderConfig) -> DecodedMessage {
    let start = Instant::now();

    let pitch = dominant_frequency(samples, sample_rate);
    debug!(pitch_hz = pitch, "estimated carrier pitch");

    let filtered = bandpass(samples, sample_rate, pitch);

    let window_len = ((sample_rate as f32 * config.envelope_window_fraction) as usize).max(1);
    let envelope = smoothed_power(&filtered, window_len);
    let (square, threshold) = binarize(&envelope, None, config.threshold_fraction);

    let runs = measure_runs(&square);
    if runs.on.is_empty() {
        debug!(elapsed = ?start.elapsed(), "no keyed signal found");
        return DecodedMessage {
            morse: String::new(),
            text: NO_SIGNAL_TEXT.to_string(),
            visualization: build_visualization(
                config, &filtered, &envelope, &square, threshold, &[], &[], &runs.on, &runs.off,
            ),
        };
    }

    let outcome = match classify_and_group(&runs.on, &runs.off, sample_rate, config) {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(%error, "duration clustering failed");
            return DecodedMessage {
                morse: String::new(),
                text: DECODE_ERROR_TEXT.to_string(),
                visualization: build_visualization(
                    config, &filtered, &envelope, &square, threshold, &[], &[], &runs.on,
                    &runs.off,
                ),
            };
        }
    };

    let morse = transcription(&outcome.words);
    let text = translate(&outcome.words);
    debug!(elapsed = ?start.elapsed(), morse, text, "decode complete");

    let space_codes: Vec<i8> = outcome.spaces.labels.iter().map(|l| l.code()).collect();
    DecodedMessage {
        morse,
        text,
        visualization: build_visualization(
            config,
            &filtered,
            &envelope,
            &square,
            threshold,
            &outcome.symbols,
            &space_codes,
            &runs.on,
            &runs.off,
        ),
    }
}

fn classify_and_group(
    on: &[usize],
    off: &[usize],
    sample_rate: u32,
    config: &DecoderConfig,
) -> Result<DecodeOutcome, ClusterError> {
    let symbols = classify_symbols(on, sample_rate, config.dot_fallback_ms, config.clustering)?;
    let spaces = classify_spaces(off, config.word_gap_ratio, config.clustering)?;
    let words = group_words(&symbols, &spaces);
    Ok(DecodeOutcome {
        symbols,
        spaces,
        words,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_visualization(
    config: &DecoderConfig,
    filtered: &[f32],
    envelope: &[f32],
    square: &[u8],
    threshold: f32,
    symbols: &[Symbol],
    space_labels: &[i8],
    on: &[usize],
    off: &[usize],
) -> Option<Visualization> {
    if !config.visualization {
        return None;
    }

    let peak = envelope.iter().cloned().fold(0.0f32, f32::max);
    let normalized: Vec<f32> = if peak > 0.0 {
        envelope.iter().map(|&v| v / peak).collect()
    } else {
        envelope.to_vec()
    };
    let normalized_threshold = if peak > 0.0 {
        threshold / peak
    } else {
        config.threshold_fraction
    };

    let on_info = on
        .iter()
        .enumerate()
        .map(|(i, &duration)| OnRunInfo {
            duration,
            label: symbols.get(i).map_or('?', |s| s.glyph()),
        })
        .collect();
    let off_info = off
        .iter()
        .enumerate()
        .map(|(i, &duration)| OffRunInfo {
            duration,
            label: space_labels.get(i).copied().unwrap_or(-1),
        })
        .collect();

    Some(Visualization {
        audio: decimate(filtered, config.visualization_points),
        envelope: decimate(&normalized, config.visualization_points),
        square: decimate(square, config.visualization_points),
        threshold: normalized_threshold,
        clustering: ClusteringInfo {
            on: on_info,
            off: off_info,
        },
    })
}

fn decimate<T: Copy>(series: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 || series.len() <= max_points {
        return series.to_vec();
    }
    let stride = series.len().div_ceil(max_points);
    series.iter().copied().step_by(stride).collect()
}
