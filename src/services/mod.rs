//! Services - review query, annotation and submission logic
//!
//! This module contains the core business logic:
//! - `dates` - query date parsing and range normalization
//! - `filter` - location and date-range filtering over the store
//! - `sentiment` - sentiment scoring capability and lexicon scorer
//! - `annotator` - text normalization and review annotation
//! - `submission` - new review validation
//!
//! `ReviewService` ties them together. It is built once at startup and
//! shared read-only between request handlers.

pub mod annotator;
pub mod dates;
pub mod filter;
pub mod sentiment;
pub mod submission;

use crate::domain::{AnnotatedReview, Review};
use crate::infra::Config;
use crate::io::store::ReviewStore;
use std::sync::Arc;
use tracing::{debug, info};

// Re-export commonly used types
pub use annotator::{ReviewAnnotator, TextNormalizer};
pub use dates::{normalize_range, parse_date, DateRange, InvalidDateFormat, InvalidDatePolicy};
pub use filter::{filter_reviews, LocationQuery};
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use submission::{SubmissionValidator, ValidationError};

/// Raw query parameters for listing reviews (all optional, blank means absent)
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewQuery<'q> {
    pub start_date: Option<&'q str>,
    pub end_date: Option<&'q str>,
    pub location: Option<&'q str>,
}

/// The review pipeline with all of its collaborators injected
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<ReviewStore>,
    annotator: ReviewAnnotator,
    validator: SubmissionValidator,
    date_policy: InvalidDatePolicy,
}

impl ReviewService {
    pub fn new(
        store: Arc<ReviewStore>,
        annotator: ReviewAnnotator,
        validator: SubmissionValidator,
        date_policy: InvalidDatePolicy,
    ) -> Self {
        Self { store, annotator, validator, date_policy }
    }

    /// Build the pipeline from configuration: load the dataset, the scorer
    /// lexicon and the city allowlist. Any load failure aborts startup.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = ReviewStore::load_csv(config.reviews_file())?;

        let scorer: Arc<dyn SentimentScorer> = match config.lexicon_file() {
            Some(path) => Arc::new(LexiconScorer::from_file(path)?),
            None => Arc::new(LexiconScorer::default()),
        };
        let annotator = ReviewAnnotator::new(TextNormalizer::default(), scorer);
        let validator = SubmissionValidator::new(config.cities().iter().cloned());

        info!(
            reviews = %store.len(),
            cities = %config.cities().len(),
            invalid_date_policy = %config.invalid_date_policy().as_str(),
            "review_service_ready"
        );
        Ok(Self::new(Arc::new(store), annotator, validator, config.invalid_date_policy()))
    }

    pub fn store(&self) -> &ReviewStore {
        &self.store
    }

    pub fn date_policy(&self) -> InvalidDatePolicy {
        self.date_policy
    }

    /// Filter the store by the query, then annotate each match with its sentiment
    pub fn query(&self, query: &ReviewQuery<'_>) -> Result<Vec<AnnotatedReview<'_>>, InvalidDateFormat> {
        let range = normalize_range(query.start_date, query.end_date, self.date_policy)?;
        let location = query.location.map(LocationQuery::parse);

        let matched = filter_reviews(self.store.reviews(), &range, location.as_ref());
        debug!(
            start = ?range.start,
            end = ?range.end,
            location = ?query.location,
            matched = %matched.len(),
            "reviews_filtered"
        );

        Ok(self.annotator.annotate(&matched))
    }

    /// Validate a submission and build the (unpersisted) review
    pub fn submit(&self, location: Option<&str>, body: Option<&str>) -> Result<Review, ValidationError> {
        self.validator.validate_and_build(location, body)
    }
}
