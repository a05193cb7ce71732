//! Domain models - core review types
//!
//! This module contains the canonical data types used throughout the system:
//! - `Review` - a stored or newly submitted customer review
//! - `AnnotatedReview` - display projection of a review with its sentiment
//! - `SentimentScores` - neg/neu/pos/compound breakdown
//! - `ReviewId` - opaque review identifier
//! - `KNOWN_CITIES` - allowlist for submissions

pub mod cities;
pub mod review;
pub mod types;

// Re-export commonly used types at module level
pub use cities::KNOWN_CITIES;
pub use review::{AnnotatedReview, Review, SentimentScores};
pub use types::{format_timestamp, ReviewId, DATE_FORMAT, TIMESTAMP_FORMAT};
