//! Dominant tone estimation via spectral peak search.

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::debug;

/// Longest stretch of signal analyzed for the spectral peak, in seconds.
const ANALYSIS_SECONDS: usize = 2;

/// Peaks below this fraction of the DC magnitude are treated as numerical
/// noise on a DC-only window.
const DC_REJECT_RATIO: f32 = 1e-4;

/// Estimate the dominant tone frequency of `samples` in Hz.
///
/// Analyzes at most the first [`ANALYSIS_SECONDS`] of signal. The DC bin is
/// ignored and the magnitude peak over the first half of the spectrum wins.
/// Returns 0.0 for an empty, silent, or DC-only analysis window; the result
/// is always finite and non-negative.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    if samples.is_empty() || sample_rate == 0 {
        return 0.0;
    }

    let n = samples.len().min(sample_rate as usize * ANALYSIS_SECONDS);
    let mut buffer: Vec<Complex<f32>> = samples[..n]
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let dc_magnitude = buffer[0].norm();

    let mut peak_bin = 0usize;
    let mut peak_magnitude = 0.0f32;
    for (bin, value) in buffer.iter().enumerate().take(n / 2).skip(1) {
        let magnitude = value.norm();
        if magnitude > peak_magnitude {
            peak_magnitude = magnitude;
            peak_bin = bin;
        }
    }

    if peak_magnitude <= 0.0 || peak_magnitude < DC_REJECT_RATIO * dc_magnitude {
        debug!("no spectral peak above the DC floor");
        return 0.0;
    }

    let frequency = peak_bin as f32 * sample_rate as f32 / n as f32;
    debug!(frequency_hz = frequency, "detected dominant frequency");
    frequency
}
