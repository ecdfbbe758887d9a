//! Character and word assembly from classified symbols and gaps.

use crate::symbol::{SpaceClassification, SpaceLabel, Symbol};

/// Ordered dot/dash sequence forming one character. Never empty.
pub type MorseCharacter = Vec<Symbol>;

/// Ordered character sequence forming one word. Never empty.
pub type MorseWord = Vec<MorseCharacter>;

/// Partition `symbols` into words using the fitted gap labels.
///
/// A character boundary sits at every off-run not labeled intra-character;
/// when no intra-character cluster exists at all, every off-run is a
/// boundary. Word boundaries are the subset labeled inter-word. The labels
/// come straight from the space classifier's fit, never from a fresh
/// clustering, so boundary decisions cannot drift from the classification.
pub fn group_words(symbols: &[Symbol], spaces: &SpaceClassification) -> Vec<MorseWord> {
    if symbols.is_empty() {
        return Vec::new();
    }

    let intra_missing = spaces.assignment[0] < 0;

    let mut words: Vec<MorseWord> = Vec::new();
    let mut word: MorseWord = Vec::new();
    let mut character: MorseCharacter = Vec::new();

    for (i, &symbol) in symbols.iter().enumerate() {
        character.push(symbol);

        // The trailing symbol has no gap after it.
        let Some(&label) = spaces.labels.get(i) else {
            continue;
        };

        if intra_missing || label != SpaceLabel::IntraChar {
            if !character.is_empty() {
                word.push(std::mem::take(&mut character));
            }
            if label == SpaceLabel::InterWord && !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
        }
    }

    if !character.is_empty() {
        word.push(character);
    }
    if !word.is_empty() {
        words.push(word);
    }

    words
}
