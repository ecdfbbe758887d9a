//! Dot/dash and gap classification by duration clustering.
//!
//! On-durations split into two clusters (dot and dash); off-durations split
//! into up to three (intra-character, inter-letter, inter-word). Both
//! classifiers fall back to fixed heuristics when the measured durations
//! lack the variety to cluster, which is the only guarantee of graceful
//! degradation on short or monotone transmissions.

use tracing::debug;

use crate::cluster::{kmeans_1d, ClusterError, ClusterPolicy};

/// One keyed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn glyph(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// Classification of one silent gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceLabel {
    IntraChar,
    InterLetter,
    InterWord,
    Unknown,
}

impl SpaceLabel {
    /// Integer code used by the structured output: 0, 1, 2, or -1.
    pub fn code(&self) -> i8 {
        match self {
            SpaceLabel::IntraChar => 0,
            SpaceLabel::InterLetter => 1,
            SpaceLabel::InterWord => 2,
            SpaceLabel::Unknown => -1,
        }
    }
}

/// Fitted space classification, reused verbatim by the grouper so labels
/// can never drift between stages.
#[derive(Debug, Clone)]
pub struct SpaceClassification {
    /// One label per off-run, input order preserved
    pub labels: Vec<SpaceLabel>,
    /// Cluster centroids sorted ascending
    pub centroids: Vec<f32>,
    /// Cluster index assigned to [intra, letter, word], -1 where no cluster
    /// exists for the slot
    pub assignment: [i32; 3],
}

impl SpaceClassification {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            centroids: Vec::new(),
            assignment: [-1, -1, -1],
        }
    }
}

/// Classify on-run durations into dots and dashes.
///
/// With at least two distinct durations a 2-means fit decides: the smaller
/// centroid is the dot. A single-valued sequence cannot cluster, so the one
/// duration is compared against `dot_fallback_ms` instead.
pub fn classify_symbols(
    on_durations: &[usize],
    sample_rate: u32,
    dot_fallback_ms: f32,
    policy: ClusterPolicy,
) -> Result<Vec<Symbol>, ClusterError> {
    if on_durations.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<f32> = on_durations.iter().map(|&d| d as f32).collect();
    let mut distinct = values.clone();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    if distinct.len() < 2 {
        let threshold_samples = dot_fallback_ms / 1000.0 * sample_rate as f32;
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        let symbol = if mean < threshold_samples {
            Symbol::Dot
        } else {
            Symbol::Dash
        };
        debug!(mean, threshold_samples, ?symbol, "single duration value, using fallback");
        return Ok(vec![symbol; on_durations.len()]);
    }

    let fit = kmeans_1d(&values, 2, policy)?;
    let dot_cluster = if fit.centroids[0] <= fit.centroids[1] { 0 } else { 1 };

    Ok(fit
        .labels
        .iter()
        .map(|&label| {
            if label == dot_cluster {
                Symbol::Dot
            } else {
                Symbol::Dash
            }
        })
        .collect())
}

/// Classify off-run durations into gap kinds.
///
/// Fits k = min(3, distinct) clusters and assigns intra-character,
/// inter-letter and inter-word to the centroids in ascending order. When
/// only two clusters exist no word gap was found structurally, so any gap
/// labeled inter-letter that exceeds `word_gap_ratio` times the intra
/// centroid is promoted to inter-word: standard keying puts letter gaps
/// near 3 units and word gaps near 7, and the default ratio of 5 sits
/// between them.
pub fn classify_spaces(
    off_durations: &[usize],
    word_gap_ratio: f32,
    policy: ClusterPolicy,
) -> Result<SpaceClassification, ClusterError> {
    if off_durations.is_empty() {
        return Ok(SpaceClassification::empty());
    }

    let values: Vec<f32> = off_durations.iter().map(|&d| d as f32).collect();
    let mut distinct = values.clone();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    let k = distinct.len().min(3);
    let fit = kmeans_1d(&values, k, policy)?;

    // argsort of centroids, ascending
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| fit.centroids[a].total_cmp(&fit.centroids[b]));

    let mut assignment = [-1i32; 3];
    for (slot, &cluster) in order.iter().enumerate().take(3) {
        assignment[slot] = cluster as i32;
    }

    let slot_of = |cluster: usize| -> SpaceLabel {
        match order.iter().position(|&c| c == cluster) {
            Some(0) => SpaceLabel::IntraChar,
            Some(1) => SpaceLabel::InterLetter,
            Some(2) => SpaceLabel::InterWord,
            _ => SpaceLabel::Unknown,
        }
    };

    let mut labels: Vec<SpaceLabel> = fit.labels.iter().map(|&c| slot_of(c)).collect();

    if k == 2 {
        let intra_centroid = fit.centroids[order[0]];
        let word_threshold = intra_centroid * word_gap_ratio;
        for (label, &duration) in labels.iter_mut().zip(off_durations) {
            if *label == SpaceLabel::InterLetter && duration as f32 > word_threshold {
                debug!(duration, word_threshold, "promoting letter gap to word gap");
                *label = SpaceLabel::InterWord;
            }
        }
    }

    let mut centroids = fit.centroids.clone();
    centroids.sort_by(|a, b| a.total_cmp(b));

    Ok(SpaceClassification {
        labels,
        centroids,
        assignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ClusterPolicy {
        ClusterPolicy::default()
    }

    #[test]
    fn test_symbols_two_clusters() {
        let on = [50, 150, 50, 150, 50];
        let symbols = classify_symbols(&on, 44100, 100.0, policy()).unwrap();
        assert_eq!(
            symbols,
            vec![Symbol::Dot, Symbol::Dash, Symbol::Dot, Symbol::Dash, Symbol::Dot]
        );
    }

    #[test]
    fn test_symbols_order_independent() {
        let on = [150, 50, 150, 50];
        let symbols = classify_symbols(&on, 44100, 100.0, policy()).unwrap();
        assert_eq!(
            symbols,
            vec![Symbol::Dash, Symbol::Dot, Symbol::Dash, Symbol::Dot]
        );
    }

    #[test]
    fn test_symbols_single_value_short_is_dot() {
        // 50 samples at 44100 Hz is ~1 ms, far below the 100 ms fallback.
        let on = [50, 50, 50];
        let symbols = classify_symbols(&on, 44100, 100.0, policy()).unwrap();
        assert_eq!(symbols, vec![Symbol::Dot; 3]);
    }

    #[test]
    fn test_symbols_single_value_long_is_dash() {
        // 8820 samples at 44100 Hz is 200 ms.
        let on = [8820, 8820];
        let symbols = classify_symbols(&on, 44100, 100.0, policy()).unwrap();
        assert_eq!(symbols, vec![Symbol::Dash; 2]);
    }

    #[test]
    fn test_symbols_empty() {
        let symbols = classify_symbols(&[], 44100, 100.0, policy()).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_spaces_three_clusters() {
        let off = [100, 100, 300, 100, 700, 300, 100];
        let spaces = classify_spaces(&off, 5.0, policy()).unwrap();
        assert_eq!(
            spaces.labels,
            vec![
                SpaceLabel::IntraChar,
                SpaceLabel::IntraChar,
                SpaceLabel::InterLetter,
                SpaceLabel::IntraChar,
                SpaceLabel::InterWord,
                SpaceLabel::InterLetter,
                SpaceLabel::IntraChar,
            ]
        );
        assert_eq!(spaces.centroids, vec![100.0, 300.0, 700.0]);
        assert!(spaces.assignment.iter().all(|&a| a >= 0));
    }

    #[test]
    fn test_spaces_two_cluster_promotion() {
        // Only two natural clusters; 200 > 5 x 30 relabels to a word gap.
        let off = [30, 30, 200];
        let spaces = classify_spaces(&off, 5.0, policy()).unwrap();
        assert_eq!(
            spaces.labels,
            vec![
                SpaceLabel::IntraChar,
                SpaceLabel::IntraChar,
                SpaceLabel::InterWord,
            ]
        );
    }

    #[test]
    fn test_spaces_two_cluster_no_promotion() {
        // 90 < 5 x 30 stays a letter gap.
        let off = [30, 30, 90];
        let spaces = classify_spaces(&off, 5.0, policy()).unwrap();
        assert_eq!(
            spaces.labels,
            vec![
                SpaceLabel::IntraChar,
                SpaceLabel::IntraChar,
                SpaceLabel::InterLetter,
            ]
        );
    }

    #[test]
    fn test_spaces_single_cluster() {
        let off = [100, 100, 100];
        let spaces = classify_spaces(&off, 5.0, policy()).unwrap();
        assert_eq!(spaces.labels, vec![SpaceLabel::IntraChar; 3]);
        assert_eq!(spaces.assignment[1], -1);
        assert_eq!(spaces.assignment[2], -1);
    }

    #[test]
    fn test_spaces_empty() {
        let spaces = classify_spaces(&[], 5.0, policy()).unwrap();
        assert!(spaces.labels.is_empty());
        assert_eq!(spaces.assignment, [-1, -1, -1]);
    }
}
