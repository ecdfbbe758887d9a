//! Fixed Morse code table and message rendering.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::group::MorseWord;
use crate::symbol::Symbol;

lazy_static! {
    static ref MORSE_TABLE: HashMap<&'static str, char> = {
        let mut table = HashMap::new();
        table.insert(".-", 'A');
        table.insert("-...", 'B');
        table.insert("-.-.", 'C');
        table.insert("-..", 'D');
        table.insert(".", 'E');
        table.insert("..-.", 'F');
        table.insert("--.", 'G');
        table.insert("....", 'H');
        table.insert("..", 'I');
        table.insert(".---", 'J');
        table.insert("-.-", 'K');
        table.insert(".-..", 'L');
        table.insert("--", 'M');
        table.insert("-.", 'N');
        table.insert("---", 'O');
        table.insert(".--.", 'P');
        table.insert("--.-", 'Q');
        table.insert(".-.", 'R');
        table.insert("...", 'S');
        table.insert("-", 'T');
        table.insert("..-", 'U');
        table.insert("...-", 'V');
        table.insert(".--", 'W');
        table.insert("-..-", 'X');
        table.insert("-.--", 'Y');
        table.insert("--..", 'Z');
        table.insert("-----", '0');
        table.insert(".----", '1');
        table.insert("..---", '2');
        table.insert("...--", '3');
        table.insert("....-", '4');
        table.insert(".....", '5');
        table.insert("-....", '6');
        table.insert("--...", '7');
        table.insert("---..", '8');
        table.insert("----.", '9');
        table.insert(".-.-.-", '.');
        table
    };
}

/// Render one character as its dot/dash string.
pub fn character_string(character: &[Symbol]) -> String {
    character.iter().map(Symbol::glyph).collect()
}

/// Decoded text; `?` stands in for any dot/dash string missing from the
/// table. Words are joined with a single space.
pub fn translate(words: &[MorseWord]) -> String {
    words
        .iter()
        .map(|word| {
            word.iter()
                .map(|character| {
                    MORSE_TABLE
                        .get(character_string(character).as_str())
                        .copied()
                        .unwrap_or('?')
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable transcription: characters space-separated within a word,
/// words separated by ` / `.
pub fn transcription(words: &[MorseWord]) -> String {
    words
        .iter()
        .map(|word| {
            word.iter()
                .map(|character| character_string(character))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOT: Symbol = Symbol::Dot;
    const DASH: Symbol = Symbol::Dash;

    fn sos() -> MorseWord {
        vec![
            vec![DOT, DOT, DOT],
            vec![DASH, DASH, DASH],
            vec![DOT, DOT, DOT],
        ]
    }

    #[test]
    fn test_translate_sos() {
        assert_eq!(translate(&[sos()]), "SOS");
    }

    #[test]
    fn test_translate_two_words() {
        let hi = vec![vec![DOT, DOT, DOT, DOT], vec![DOT, DOT]];
        let words = vec![hi, sos()];
        assert_eq!(translate(&words), "HI SOS");
    }

    #[test]
    fn test_translate_digits_and_period() {
        let word = vec![
            vec![DOT, DASH, DASH, DASH, DASH],
            vec![DASH, DASH, DASH, DASH, DASH],
            vec![DOT, DASH, DOT, DASH, DOT, DASH],
        ];
        assert_eq!(translate(&[word]), "10.");
    }

    #[test]
    fn test_unmapped_becomes_question_mark() {
        let word = vec![vec![DOT; 7]];
        assert_eq!(translate(&[word]), "?");
    }

    #[test]
    fn test_transcription() {
        let hi = vec![vec![DOT, DOT, DOT, DOT], vec![DOT, DOT]];
        let words = vec![hi, sos()];
        assert_eq!(transcription(&words), ".... .. / ... --- ...");
    }

    #[test]
    fn test_empty() {
        assert_eq!(translate(&[]), "");
        assert_eq!(transcription(&[]), "");
    }
}
