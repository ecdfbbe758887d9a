//! Bandpass conditioning around the detected tone.
//!
//! A 4th-order bandpass (two cascaded biquad sections) suppresses out-of-band
//! noise before envelope extraction. The filter runs forward and backward
//! with fresh state each direction, so no group delay shifts the edge
//! positions the duration extractor depends on. If the requested band is
//! degenerate the stage logs a warning and passes the signal through
//! unchanged.

use biquad::{Biquad, Coefficients, DirectForm2Transposed, Type};
use tracing::{debug, warn};

/// Half-width of the passband around the detected tone, in Hz.
const PASSBAND_HALF_WIDTH_HZ: f32 = 100.0;
/// Lowest allowed position of the passband's low edge.
const LOW_EDGE_FLOOR_HZ: f32 = 50.0;
/// Margin kept below Nyquist when the high edge is clamped.
const NYQUIST_MARGIN_HZ: f32 = 100.0;
/// Settling pad as a multiple of the reciprocal bandwidth.
const SETTLE_FACTOR: f32 = 8.0;

/// Bandpass-filter `samples` around `center_hz`, zero phase.
///
/// The passband is [center-100, center+100] Hz with the low edge clamped to
/// at least 50 Hz and the high edge clamped below Nyquist. Both ends of the buffer
/// are padded with their edge value while the filter settles, so a step at
/// the buffer boundary does not ring into the measurement.
pub fn bandpass(samples: &[f32], sample_rate: u32, center_hz: f32) -> Vec<f32> {
    if samples.is_empty() || sample_rate == 0 {
        return samples.to_vec();
    }

    let nyquist = sample_rate as f32 / 2.0;
    let mut lowcut = center_hz - PASSBAND_HALF_WIDTH_HZ;
    let mut highcut = center_hz + PASSBAND_HALF_WIDTH_HZ;
    if lowcut <= LOW_EDGE_FLOOR_HZ {
        lowcut = LOW_EDGE_FLOOR_HZ;
    }
    if highcut >= nyquist {
        highcut = nyquist - NYQUIST_MARGIN_HZ;
    }

    if lowcut >= highcut || highcut >= nyquist {
        warn!(lowcut, highcut, "degenerate passband, skipping filter");
        return samples.to_vec();
    }

    // Geometric center keeps the band symmetric on a log axis.
    let f0 = (lowcut as f64 * highcut as f64).sqrt();
    let q = f0 / (highcut - lowcut) as f64;

    // from_normalized_params expects f0 as a fraction of Nyquist.
    let normalized_f0 = 2.0 * f0 / sample_rate as f64;
    let coefficients = match Coefficients::<f64>::from_normalized_params(
        Type::BandPass,
        normalized_f0,
        q,
    ) {
        Ok(c) => c,
        Err(e) => {
            warn!(?e, "filter design failed, skipping filter");
            return samples.to_vec();
        }
    };

    debug!(lowcut, highcut, "applying zero-phase bandpass");

    let pad = ((SETTLE_FACTOR * sample_rate as f32 / (highcut - lowcut)) as usize).max(1);
    let first = samples[0] as f64;
    let last = samples[samples.len() - 1] as f64;

    let mut extended: Vec<f64> = Vec::with_capacity(samples.len() + 2 * pad);
    extended.extend(std::iter::repeat(first).take(pad));
    extended.extend(samples.iter().map(|&s| s as f64));
    extended.extend(std::iter::repeat(last).take(pad));

    // Forward pass, then the same cascade over the reversed signal.
    let forward = run_cascade(&extended, coefficients);
    let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
    reversed = run_cascade(&reversed, coefficients);
    reversed.reverse();

    reversed[pad..pad + samples.len()]
        .iter()
        .map(|&s| s as f32)
        .collect()
}

fn run_cascade(samples: &[f64], coefficients: Coefficients<f64>) -> Vec<f64> {
    let mut first = DirectForm2Transposed::<f64>::new(coefficients);
    let mut second = DirectForm2Transposed::<f64>::new(coefficients);
    samples
        .iter()
        .map(|&x| second.run(first.run(x)))
        .collect()
}
