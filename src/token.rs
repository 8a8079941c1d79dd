//! At the heart of a [`TransitionTable`](crate::TransitionTable) is a [`Token`]. In fact, this is
//! just a String. Two tokens are the same only if their strings are exactly equal; there is no
//! case folding or stemming.
//!
//! The reference tokenizer is [`split_whitespace()`]. If you want punctuation and spacing to be
//! tokens of their own, use [`split_word_bounds()`], which is the output of
//! [`unicode_segmentation::UnicodeSegmentation::split_word_bounds()`].

use unicode_segmentation::UnicodeSegmentation;

/// Representation of a string segment.
pub type Token = String;

/// A borrowed version of [`Token`]; if [`Token`] is [`String`], then [`TokenRef`] is `&str`.
pub type TokenRef<'a> = &'a str;

/// A borrowed pair of adjacent tokens, `(predecessor, successor)`.
pub type BigramRef<'a> = (TokenRef<'a>, TokenRef<'a>);

/// Splits `text` on runs of whitespace. Empty pieces are never produced.
///
/// ```
/// # use bigramish::token::split_whitespace;
/// assert_eq!(split_whitespace("  ROMEO:\n Juliet  "), vec!["ROMEO:", "Juliet"]);
/// ```
pub fn split_whitespace(text: &str) -> Vec<Token> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Splits `text` on word bounds. Spaces and symbols are tokens too, so joining the result with
/// `""` gives back `text`.
pub fn split_word_bounds(text: &str) -> Vec<Token> {
    text.split_word_bounds().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_drops_all_spacing() {
        assert_eq!(
            split_whitespace("First Citizen:\nBefore we proceed\tany further,"),
            vec!["First", "Citizen:", "Before", "we", "proceed", "any", "further,"]
        );
        assert!(split_whitespace(" \n\t ").is_empty());
    }

    #[test]
    fn word_bounds_keep_spacing() {
        let s = "I am-full!of?cats";
        let tokens = split_word_bounds(s);
        assert_eq!(
            tokens,
            vec!["I", " ", "am", "-", "full", "!", "of", "?", "cats"]
        );
        assert_eq!(tokens.join(""), s);
    }
}
