//! Text analysis chains.
//!
//! Each [`Analyzer`] turns text into a stream of [`Token`]s carrying byte offsets
//! into the original text and a position. N-gram style analyzers emit every gram
//! of a word (or phrase) at the same position with the offsets of the whole word,
//! so a highlighter groups them back into the original span.

mod phonetic;

use once_cell::sync::Lazy;
use regex::Regex;

pub use phonetic::soundex;

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*").expect("word pattern is valid")
});

static PHRASE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,!?;:\r\n]+").expect("phrase break pattern is valid"));

/// A single analyzed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The indexed term.
    pub term: String,
    /// Start byte offset in the analyzed text.
    pub start: usize,
    /// End byte offset (exclusive) in the analyzed text.
    pub end: usize,
    /// Token position; stacked tokens share a position.
    pub position: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(term: impl Into<String>, start: usize, end: usize, position: usize) -> Self {
        Self {
            term: term.into(),
            start,
            end,
            position,
        }
    }
}

/// An analysis chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analyzer {
    /// Word tokens, lowercased.
    Standard,
    /// Phrases split at punctuation, lowercased, leading-edge grams.
    EdgeNGram {
        /// Shortest gram in characters.
        min: usize,
        /// Longest gram in characters.
        max: usize,
    },
    /// Word tokens, lowercased, every inner gram.
    NGram {
        /// Shortest gram in characters.
        min: usize,
        /// Longest gram in characters.
        max: usize,
    },
    /// Word tokens replaced by their Soundex code.
    Phonetic,
}

impl Analyzer {
    /// Edge n-grams of 3 to 50 characters.
    pub const AUTOCOMPLETE_EDGE: Analyzer = Analyzer::EdgeNGram { min: 3, max: 50 };

    /// N-grams of 3 to 20 characters.
    pub const AUTOCOMPLETE_NGRAM: Analyzer = Analyzer::NGram { min: 3, max: 20 };

    /// Runs the chain over `text`.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        match *self {
            Analyzer::Standard => words(text),
            Analyzer::EdgeNGram { min, max } => phrases(text)
                .into_iter()
                .flat_map(|t| edge_grams(t, min, max))
                .collect(),
            Analyzer::NGram { min, max } => words(text)
                .into_iter()
                .flat_map(|t| inner_grams(t, min, max))
                .collect(),
            Analyzer::Phonetic => words(text)
                .into_iter()
                .map(|mut t| {
                    if let Some(code) = soundex(&t.term) {
                        t.term = code;
                    }
                    t
                })
                .collect(),
        }
    }
}

/// Lowercased word tokens with consecutive positions.
fn words(text: &str) -> Vec<Token> {
    WORD.find_iter(text)
        .enumerate()
        .map(|(position, m)| Token::new(m.as_str().to_lowercase(), m.start(), m.end(), position))
        .collect()
}

/// Lowercased, trimmed phrases between punctuation with consecutive positions.
fn phrases(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = 0;

    let push = |from: usize, to: usize, tokens: &mut Vec<Token>| {
        let piece = &text[from..to];
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            return;
        }
        let lead = piece.len() - piece.trim_start().len();
        let begin = from + lead;
        let position = tokens.len();
        tokens.push(Token::new(
            trimmed.to_lowercase(),
            begin,
            begin + trimmed.len(),
            position,
        ));
    };

    for m in PHRASE_BREAK.find_iter(text) {
        push(start, m.start(), &mut tokens);
        start = m.end();
    }
    push(start, text.len(), &mut tokens);

    tokens
}

/// Char boundary byte indexes of `s`, including `s.len()`.
fn boundaries(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect()
}

fn edge_grams(token: Token, min: usize, max: usize) -> Vec<Token> {
    let bounds = boundaries(&token.term);
    let chars = bounds.len() - 1;

    (min..=max.min(chars))
        .map(|len| {
            Token::new(
                &token.term[..bounds[len]],
                token.start,
                token.end,
                token.position,
            )
        })
        .collect()
}

fn inner_grams(token: Token, min: usize, max: usize) -> Vec<Token> {
    let bounds = boundaries(&token.term);
    let chars = bounds.len() - 1;
    let mut grams = Vec::new();

    for from in 0..chars {
        for len in min..=max {
            if from + len > chars {
                break;
            }
            grams.push(Token::new(
                &token.term[bounds[from]..bounds[from + len]],
                token.start,
                token.end,
                token.position,
            ));
        }
    }

    grams
}
