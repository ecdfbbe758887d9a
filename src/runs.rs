//! On/off run measurement from the binarized square wave.
//!
//! Rising and falling edges come from the first difference of the 0/1
//! sequence. A sequence that starts "on" gets a virtual rising edge at index
//! -1 and one that ends "on" gets a virtual falling edge at the last index,
//! so runs truncated by the recording window still count. A falling edge
//! with no prior rising edge closes a run that began before recording and is
//! discarded.

/// Interleaved run lengths in samples. `off` holds the gaps between
/// consecutive on-runs, so `off.len()` is one less than `on.len()` before
/// positivity filtering.
#[derive(Debug, Clone, Default)]
pub struct RunDurations {
    pub on: Vec<usize>,
    pub off: Vec<usize>,
}

/// Measure on-run and off-run durations of `square`.
///
/// Returns empty sequences when no complete on-run exists. All returned
/// durations are strictly positive.
pub fn measure_runs(square: &[u8]) -> RunDurations {
    if square.is_empty() {
        return RunDurations::default();
    }

    let mut rising: Vec<i64> = Vec::new();
    let mut falling: Vec<i64> = Vec::new();
    for i in 0..square.len() - 1 {
        match (square[i], square[i + 1]) {
            (0, 1) => rising.push(i as i64),
            (1, 0) => falling.push(i as i64),
            _ => {}
        }
    }

    let starts_on = square[0] == 1;
    let ends_on = square[square.len() - 1] == 1;

    if starts_on {
        rising.insert(0, -1);
    }
    if ends_on {
        falling.push(square.len() as i64 - 1);
    }

    if !starts_on && !rising.is_empty() && !falling.is_empty() && falling[0] < rising[0] {
        falling.remove(0);
    }

    let paired = rising.len().min(falling.len());
    rising.truncate(paired);
    falling.truncate(paired);

    if rising.is_empty() {
        return RunDurations::default();
    }

    let on = rising
        .iter()
        .zip(&falling)
        .map(|(&r, &f)| f - r)
        .filter(|&d| d > 0)
        .map(|d| d as usize)
        .collect();

    let off = rising
        .windows(2)
        .zip(&falling)
        .map(|(pair, &f)| pair[1] - f)
        .filter(|&d| d > 0)
        .map(|d| d as usize)
        .collect();

    RunDurations { on, off }
}
