use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Marker signaling a critic-review fetch failure
///
/// A review list whose first element carries this marker holds no usable
/// sentiment signal and scores neutral.
pub const ERROR_SENTINEL_MARKER: &str = "Error";

/// Compound-score normalization constant
const NORMALIZATION_ALPHA: f32 = 15.0;

/// Tokens that flip the valence of the word directly after them
const NEGATORS: [&str; 7] = ["not", "no", "never", "neither", "nor", "cannot", "hardly"];

/// Errors raised while loading the lexicon artifact; these abort startup
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse lexicon artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("lexicon artifact contains no entries")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct LexiconArtifact {
    version: u32,
    entries: HashMap<String, f32>,
}

/// Word-polarity lexicon, a versioned swappable artifact loaded at startup
pub struct Lexicon {
    entries: HashMap<String, f32>,
}

impl Lexicon {
    /// Loads the lexicon from its JSON artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LexiconError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: LexiconArtifact =
            serde_json::from_str(&raw).map_err(|source| LexiconError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        if artifact.entries.is_empty() {
            return Err(LexiconError::Empty);
        }

        tracing::info!(
            entries = artifact.entries.len(),
            version = artifact.version,
            "Loaded sentiment lexicon"
        );

        Ok(Self {
            entries: artifact.entries,
        })
    }

    /// Builds a lexicon from in-memory entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    fn valence(&self, token: &str) -> Option<f32> {
        self.entries.get(token).copied()
    }
}

/// Lexicon-based polarity scorer for short critic-review snippets
///
/// Pure and deterministic: the same lexicon and inputs always produce the
/// same score.
pub struct SentimentScorer {
    lexicon: Lexicon,
}

impl SentimentScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Aggregate sentiment of a review list, in [-1, 1]
    ///
    /// An empty list, or one whose first element carries the fetch-error
    /// sentinel marker, scores neutral `0.0`. Otherwise returns the
    /// arithmetic mean of the per-review compound scores.
    pub fn score(&self, reviews: &[String]) -> f32 {
        if reviews.is_empty() {
            return 0.0;
        }
        if reviews[0].contains(ERROR_SENTINEL_MARKER) {
            return 0.0;
        }

        let total: f32 = reviews.iter().map(|r| self.compound(r)).sum();
        total / reviews.len() as f32
    }

    /// Compound polarity of one snippet, in (-1, 1)
    ///
    /// Valence sum over lexicon hits, with a sign flip for a token directly
    /// preceded by a negator, normalized by `s / sqrt(s^2 + alpha)`.
    fn compound(&self, text: &str) -> f32 {
        let tokens = tokenize(text);

        let mut sum = 0.0_f32;
        for (i, token) in tokens.iter().enumerate() {
            if let Some(valence) = self.lexicon.valence(token) {
                let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
                sum += if negated { -valence } else { valence };
            }
        }

        if sum == 0.0 {
            0.0
        } else {
            sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()
        }
    }
}

/// Lowercased alphanumeric word tokens
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SentimentScorer {
        SentimentScorer::new(Lexicon::from_entries([
            ("great".to_string(), 3.1),
            ("masterpiece".to_string(), 3.4),
            ("good".to_string(), 1.9),
            ("dull".to_string(), -1.8),
            ("terrible".to_string(), -2.5),
            ("mess".to_string(), -2.1),
        ]))
    }

    #[test]
    fn test_empty_reviews_score_neutral() {
        assert_eq!(scorer().score(&[]), 0.0);
    }

    #[test]
    fn test_error_sentinel_scores_neutral() {
        let reviews = vec!["Error: Rotten Tomatoes page not found for X".to_string()];
        assert_eq!(scorer().score(&reviews), 0.0);
    }

    #[test]
    fn test_sentinel_only_checked_on_first_element() {
        let reviews = vec![
            "A great film".to_string(),
            "Error: transient".to_string(),
        ];
        assert!(scorer().score(&reviews) != 0.0);
    }

    #[test]
    fn test_positive_reviews_score_positive() {
        let reviews = vec![
            "A great film, a masterpiece even".to_string(),
            "Really good".to_string(),
        ];
        let score = scorer().score(&reviews);
        assert!(score > 0.2, "expected clearly positive, got {}", score);
    }

    #[test]
    fn test_negative_reviews_score_negative() {
        let reviews = vec!["A dull, terrible mess".to_string()];
        assert!(scorer().score(&reviews) < 0.0);
    }

    #[test]
    fn test_negation_flips_valence() {
        let positive = scorer().score(&["great".to_string()]);
        let negated = scorer().score(&["not great".to_string()]);
        assert!(positive > 0.0);
        assert!((negated + positive).abs() < 1e-6);
    }

    #[test]
    fn test_score_is_mean_over_reviews() {
        let s = scorer();
        let one = s.score(&["great".to_string()]);
        let two = s.score(&["great".to_string(), "not great".to_string()]);
        assert!(one > 0.0);
        assert!(two.abs() < 1e-6);
    }

    #[test]
    fn test_unknown_words_score_neutral() {
        let reviews = vec!["No reviews available.".to_string()];
        assert_eq!(scorer().score(&reviews), 0.0);
    }

    #[test]
    fn test_compound_is_bounded() {
        let reviews = vec!["great great great great masterpiece".to_string(); 3];
        let score = scorer().score(&reviews);
        assert!(score < 1.0 && score > 0.0);
    }

    #[test]
    fn test_score_deterministic() {
        let reviews = vec!["good but dull".to_string()];
        assert_eq!(scorer().score(&reviews), scorer().score(&reviews));
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_case() {
        assert_eq!(tokenize("Great, GREAT film!"), vec!["great", "great", "film"]);
    }
}
