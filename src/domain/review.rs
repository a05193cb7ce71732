//! Review data model and its display projections

use crate::domain::types::{timestamp_format, ReviewId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A customer review. Immutable once loaded or created.
///
/// Field names on the wire follow the dataset's column headers
/// (`ReviewId`, `Location`, `Timestamp`, `ReviewBody`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "ReviewId")]
    pub id: ReviewId,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "ReviewBody")]
    pub body: String,
}

/// Sentiment breakdown for a piece of text.
///
/// `neg`, `neu` and `pos` are proportions in [0, 1] summing to ~1;
/// `compound` is the normalized overall valence in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScores {
    /// Score assigned to text that carries no sentiment (including empty text)
    pub const NEUTRAL: SentimentScores =
        SentimentScores { neg: 0.0, neu: 1.0, pos: 0.0, compound: 0.0 };
}

impl Default for SentimentScores {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Display record: a review plus its sentiment. Never stored back on the review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedReview<'a> {
    #[serde(rename = "ReviewId")]
    pub id: &'a ReviewId,
    #[serde(rename = "ReviewBody")]
    pub body: &'a str,
    #[serde(rename = "Location")]
    pub location: &'a str,
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub sentiment: SentimentScores,
}

impl<'a> AnnotatedReview<'a> {
    pub fn new(review: &'a Review, sentiment: SentimentScores) -> Self {
        Self {
            id: &review.id,
            body: &review.body,
            location: &review.location,
            timestamp: review.timestamp,
            sentiment,
        }
    }
}
