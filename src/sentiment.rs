//! Polarity scoring for comment text. The club only needs a single number per
//! comment, so the seam is one method; the VADER lexicon ships with the binary.

use thiserror::Error;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Lowest score a scorer may return.
pub const MIN_SCORE: f64 = -1.0;
/// Highest score a scorer may return.
pub const MAX_SCORE: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("sentiment analyzer returned no compound score")]
    Missing,
    #[error("sentiment score {0} is outside [-1, 1]")]
    OutOfRange(f64),
}

/// Anything that turns text into a polarity in `[MIN_SCORE, MAX_SCORE]`.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> Result<f64, ScoreError>;
}

/// Scorer backed by the VADER lexicon; reports the normalized compound value.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().ok_or(ScoreError::Missing)?;
        check_range(compound)
    }
}

/// Reject NaN and anything outside the documented range so a bad score never
/// reaches the database.
pub fn check_range(score: f64) -> Result<f64, ScoreError> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(ScoreError::OutOfRange(score))
    }
}
