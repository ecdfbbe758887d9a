//! Envelope extraction and binarization.
//!
//! The envelope is a Hann-smoothed RMS power curve: square the signal,
//! convolve with a sum-normalized Hann window in "same" mode, clamp the
//! floating-point residue, take the square root. A relative threshold then
//! turns the envelope into a 0/1 square wave without any amplitude
//! calibration.

use tracing::debug;

/// Envelope peaks at or below this value are treated as silence. Keeps
/// numerical residue from the bandpass stage from binarizing into phantom
/// runs on a signal-free buffer.
pub const SILENCE_FLOOR: f32 = 1e-6;

/// Symmetric Hann window of length `len`.
pub fn hann_window(len: usize) -> Vec<f32> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..len)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / (len - 1) as f32;
                0.5 - 0.5 * phase.cos()
            })
            .collect(),
    }
}

/// Smoothed RMS power envelope of `samples`, same length as the input.
///
/// `window_len` is derived by the caller as 1% of the sample rate, floored
/// at one sample.
pub fn smoothed_power(samples: &[f32], window_len: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut window = hann_window(window_len);
    let sum: f32 = window.iter().sum();
    if sum == 0.0 {
        return vec![0.0; samples.len()];
    }
    for w in &mut window {
        *w /= sum;
    }

    let squared: Vec<f32> = samples.iter().map(|&s| s * s).collect();
    let mut convolved = convolve_same(&squared, &window);
    for value in &mut convolved {
        // Floating-point error can push the power fractionally negative.
        *value = value.max(0.0).sqrt();
    }
    convolved
}

/// Centered "same"-mode convolution; the output has `signal.len()` samples.
fn convolve_same(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    let n = signal.len();
    let m = kernel.len();
    let half = (m - 1) / 2;

    let mut out = vec![0.0f32; n];
    for (i, slot) in out.iter_mut().enumerate() {
        let k = i + half;
        let j_lo = k.saturating_sub(m - 1);
        let j_hi = k.min(n - 1);
        let mut acc = 0.0f64;
        for j in j_lo..=j_hi {
            acc += signal[j] as f64 * kernel[k - j] as f64;
        }
        *slot = acc as f32;
    }
    out
}

/// Threshold `envelope` into a 0/1 square wave.
///
/// The threshold is `peak_fraction` of the envelope maximum unless an
/// explicit value is supplied. A silent envelope binarizes to all zeros with
/// a zero threshold.
pub fn binarize(envelope: &[f32], threshold: Option<f32>, peak_fraction: f32) -> (Vec<u8>, f32) {
    if envelope.is_empty() {
        return (Vec::new(), 0.0);
    }

    let peak = envelope.iter().fold(0.0f32, |acc, &v| acc.max(v));
    if peak <= SILENCE_FLOOR {
        debug!(peak, "envelope below silence floor");
        return (vec![0; envelope.len()], 0.0);
    }

    let threshold = threshold.unwrap_or(peak_fraction * peak);
    let square = envelope
        .iter()
        .map(|&v| u8::from(v > threshold))
        .collect();
    (square, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_hann_window_shape() {
        let w = hann_window(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-6);
        assert!(w[7].abs() < 1e-6);
        // Symmetric
        for i in 0..4 {
            assert!((w[i] - w[7 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hann_window_degenerate_lengths() {
        assert!(hann_window(0).is_empty());
        assert_eq!(hann_window(1), vec![1.0]);
    }

    #[test]
    fn test_smoothed_power_length_and_level() {
        // Constant tone: the envelope approaches the RMS level A/sqrt(2).
        let samples: Vec<f32> = (0..4410)
            .map(|i| (2.0 * PI * 800.0 * i as f32 / 44100.0).sin())
            .collect();
        let envelope = smoothed_power(&samples, 441);
        assert_eq!(envelope.len(), samples.len());

        let mid = envelope[1000];
        assert!((mid - 1.0 / 2.0f32.sqrt()).abs() < 0.05, "got {mid}");
    }

    #[test]
    fn test_smoothed_power_non_negative() {
        let samples: Vec<f32> = (0..1000).map(|i| ((i % 7) as f32) - 3.0).collect();
        for value in smoothed_power(&samples, 50) {
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn test_smoothed_power_empty() {
        assert!(smoothed_power(&[], 441).is_empty());
    }

    #[test]
    fn test_binarize_relative_threshold() {
        let envelope = [0.0, 1.0, 4.0, 1.0, 0.0];
        let (square, threshold) = binarize(&envelope, None, 0.5);
        assert_eq!(threshold, 2.0);
        assert_eq!(square, vec![0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_binarize_explicit_threshold() {
        let envelope = [0.0, 1.0, 4.0, 1.0, 0.0];
        let (square, threshold) = binarize(&envelope, Some(0.5), 0.5);
        assert_eq!(threshold, 0.5);
        assert_eq!(square, vec![0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_binarize_silence() {
        let envelope = [0.0f32; 16];
        let (square, threshold) = binarize(&envelope, None, 0.5);
        assert_eq!(square, vec![0; 16]);
        assert_eq!(threshold, 0.0);
    }

    #[test]
    fn test_binarize_numerical_dust_is_silence() {
        let envelope = [1e-9f32; 16];
        let (square, _) = binarize(&envelope, None, 0.5);
        assert_eq!(square, vec![0; 16]);
    }
}
