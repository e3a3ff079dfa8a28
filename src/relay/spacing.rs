//! Whitespace repair across streamed token fragments
//!
//! Upstream tokenizers emit fragments that are meant to be concatenated, but
//! some servers drop the separating space between words or glue words across
//! a case change. [`normalize_piece`] fixes one fragment at a time, given the
//! last meaningful character already sent to the client.

use regex::Regex;
use std::sync::LazyLock;

use super::mojibake::fix_mojibake;

/// Characters that always attach to the preceding token
pub const ATTACHING_CHARS: [char; 11] = [
    ',', '.', ':', ';', '?', '!', '\'', '\u{2019}', '\u{201d}', '%', ')',
];

static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("case boundary pattern"));

static CARRIAGE_RETURNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n?").expect("carriage return pattern"));

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("horizontal space pattern"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern"));

static PUNCT_OR_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{P}\p{S}]$").expect("punctuation pattern"));

/// A fragment ready to be sent, plus the marker to carry into the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPiece {
    pub text: String,
    /// Last non-whitespace character of the output so far, `Some('\n')` when
    /// the output currently ends in a line break, `None` before any output
    pub last_char: Option<char>,
}

/// Normalize one fragment
///
/// Steps: repair mojibake, split `lowerUpper` boundaries, unify line endings,
/// collapse horizontal whitespace and runs of blank lines, then prepend a
/// single space when the fragment would otherwise glue onto the previous one.
pub fn normalize_piece(last_char: Option<char>, piece: &str) -> NormalizedPiece {
    if piece.is_empty() {
        return NormalizedPiece {
            text: String::new(),
            last_char,
        };
    }

    let text = fix_mojibake(piece);
    let text = CASE_BOUNDARY.replace_all(&text, "$1 $2");
    let text = CARRIAGE_RETURNS.replace_all(&text, "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let mut text = BLANK_LINES.replace_all(&text, "\n\n").into_owned();

    if needs_leading_space(last_char, &text) {
        text.insert(0, ' ');
    }

    let last_char = trailing_marker(&text).or(last_char);
    NormalizedPiece { text, last_char }
}

fn needs_leading_space(last_char: Option<char>, text: &str) -> bool {
    let Some(prev) = last_char else {
        return false;
    };
    let Some(first) = first_significant(text) else {
        return false;
    };

    if first == '\n' || is_punct_or_symbol(first) {
        return false;
    }
    // Already separated from the previous fragment.
    if text.starts_with(char::is_whitespace) {
        return false;
    }
    if text.trim_start().starts_with(ATTACHING_CHARS) {
        return false;
    }

    let glued_words = !prev.is_whitespace() && prev.is_alphanumeric() && first.is_alphanumeric();
    let case_step = prev.is_lowercase() && first.is_uppercase();
    glued_words || case_step
}

/// First character that is either a line break or not whitespace
fn first_significant(text: &str) -> Option<char> {
    text.chars().find(|c| *c == '\n' || !c.is_whitespace())
}

/// Scanning backwards, the first line break or non-whitespace character
fn trailing_marker(text: &str) -> Option<char> {
    text.chars().rev().find(|c| *c == '\n' || !c.is_whitespace())
}

/// Unicode general category P* or S*
pub fn is_punct_or_symbol(c: char) -> bool {
    let mut buf = [0u8; 4];
    PUNCT_OR_SYMBOL.is_match(c.encode_utf8(&mut buf))
}
