//! Full-text search configuration.
//!
//! Every setting can be given programmatically, as a command line flag of an
//! embedding binary (the struct is a flattenable [`clap::Args`]), or through
//! the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FTS_SUGGEST_MAX_RESULTS` | 20 | Hits fetched per suggestion request |
//! | `FTS_SUGGEST_SLOP` | 2 | Phrase slop of the suggestion query |
//! | `FTS_EXACT_BOOST` | 4.0 | Boost of the standard content field |
//! | `FTS_EDGE_NGRAM_BOOST` | 2.0 | Boost of the edge n-gram field |
//! | `FTS_NGRAM_BOOST` | 1.0 | Boost of the n-gram field |
//! | `FTS_PHONETIC_BOOST` | 0.5 | Boost of the phonetic field |
//! | `FTS_EXACT_MATCH_BONUS` | 1.0 | Added when a span equals the typed text |
//! | `FTS_PARTIAL_MATCH_PENALTY` | 0.5 | Subtracted from partial-match scores |
//! | `FTS_PARTIAL_MATCH_MAX_LEN` | 100 | Longest span considered for partial matches |
//! | `FTS_HIGHLIGHT_MAX_DOC_CHARS` | 51200 | Characters analyzed per stored text |
//! | `FTS_LOG_LEVEL` | info | Log level |
//!
//! # Example
//!
//! ```rust
//! use helios_fulltext::FulltextConfig;
//!
//! let config = FulltextConfig {
//!     suggest_max_results: 50,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Args;

use crate::highlight::DEFAULT_MAX_DOC_CHARS;
use crate::query::{BoostedField, fields};

/// Tuning for searches and keyword suggestions.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct FulltextConfig {
    /// Maximum number of index hits examined per suggestion request.
    #[arg(long, env = "FTS_SUGGEST_MAX_RESULTS", default_value = "20")]
    pub suggest_max_results: usize,

    /// Positional slop of the suggestion phrase query.
    #[arg(long, env = "FTS_SUGGEST_SLOP", default_value = "2")]
    pub suggest_slop: u32,

    /// Boost of standard-analyzed content matches.
    #[arg(long, env = "FTS_EXACT_BOOST", default_value = "4.0")]
    pub exact_boost: f32,

    /// Boost of edge n-gram content matches.
    #[arg(long, env = "FTS_EDGE_NGRAM_BOOST", default_value = "2.0")]
    pub edge_ngram_boost: f32,

    /// Boost of n-gram content matches.
    #[arg(long, env = "FTS_NGRAM_BOOST", default_value = "1.0")]
    pub ngram_boost: f32,

    /// Boost of phonetic content matches.
    #[arg(long, env = "FTS_PHONETIC_BOOST", default_value = "0.5")]
    pub phonetic_boost: f32,

    /// Bonus for a span equal to the typed text, ignoring case.
    #[arg(long, env = "FTS_EXACT_MATCH_BONUS", default_value = "1.0")]
    pub exact_match_bonus: f32,

    /// Penalty applied to candidates derived from partial matches.
    #[arg(long, env = "FTS_PARTIAL_MATCH_PENALTY", default_value = "0.5")]
    pub partial_match_penalty: f32,

    /// Spans of this many characters or more never yield partial matches.
    #[arg(long, env = "FTS_PARTIAL_MATCH_MAX_LEN", default_value = "100")]
    pub partial_match_max_len: usize,

    /// Leading characters of each stored text fed to the highlighter.
    #[arg(long, env = "FTS_HIGHLIGHT_MAX_DOC_CHARS", default_value = "51200")]
    pub highlight_max_doc_chars: usize,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long = "fts-log-level", env = "FTS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for FulltextConfig {
    fn default() -> Self {
        Self {
            suggest_max_results: 20,
            suggest_slop: 2,
            exact_boost: 4.0,
            edge_ngram_boost: 2.0,
            ngram_boost: 1.0,
            phonetic_boost: 0.5,
            exact_match_bonus: 1.0,
            partial_match_penalty: 0.5,
            partial_match_max_len: 100,
            highlight_max_doc_chars: DEFAULT_MAX_DOC_CHARS,
            log_level: "info".to_string(),
        }
    }
}

impl FulltextConfig {
    /// Returns the suggestion query fields with their boosts.
    pub fn suggest_fields(&self) -> Vec<BoostedField> {
        vec![
            BoostedField::new(fields::CONTENT_TEXT, self.exact_boost),
            BoostedField::new(fields::CONTENT_TEXT_EDGE_NGRAM, self.edge_ngram_boost),
            BoostedField::new(fields::CONTENT_TEXT_NGRAM, self.ngram_boost),
            BoostedField::new(fields::CONTENT_TEXT_PHONETIC, self.phonetic_boost),
        ]
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.suggest_max_results == 0 {
            errors.push("Suggest max results cannot be 0".to_string());
        }

        let boosts = [
            ("Exact", self.exact_boost),
            ("Edge n-gram", self.edge_ngram_boost),
            ("N-gram", self.ngram_boost),
            ("Phonetic", self.phonetic_boost),
        ];
        for (name, boost) in boosts {
            if !boost.is_finite() || boost <= 0.0 {
                errors.push(format!("{} boost must be a positive number", name));
            }
        }

        if !self.exact_match_bonus.is_finite() || self.exact_match_bonus < 0.0 {
            errors.push("Exact match bonus cannot be negative".to_string());
        }

        if !self.partial_match_penalty.is_finite() || self.partial_match_penalty < 0.0 {
            errors.push("Partial match penalty cannot be negative".to_string());
        }

        if self.highlight_max_doc_chars == 0 {
            errors.push("Highlight max doc chars cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        fulltext: FulltextConfig,
    }

    #[test]
    fn test_default_config() {
        let config = FulltextConfig::default();
        assert_eq!(config.suggest_max_results, 20);
        assert_eq!(config.suggest_slop, 2);
        assert_eq!(config.highlight_max_doc_chars, 50 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_defaults_match_default() {
        let cli = Cli::try_parse_from(["fts"]).unwrap();
        assert_eq!(cli.fulltext, FulltextConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from(["fts", "--suggest-max-results", "5", "--phonetic-boost", "0.25"])
            .unwrap();
        assert_eq!(cli.fulltext.suggest_max_results, 5);
        assert_eq!(cli.fulltext.phonetic_boost, 0.25);
    }

    #[test]
    fn test_suggest_fields() {
        let fields = FulltextConfig::default().suggest_fields();
        let boosts: Vec<f32> = fields.iter().map(|f| f.boost).collect();
        assert_eq!(boosts, vec![4.0, 2.0, 1.0, 0.5]);
        assert_eq!(fields[0].field, "content_text");
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = FulltextConfig {
            suggest_max_results: 0,
            ngram_boost: 0.0,
            partial_match_penalty: -1.0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
