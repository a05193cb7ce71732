//! Validation and construction of newly submitted reviews
//!
//! Checks run in a fixed order and the first failure wins:
//! location present, location allowlisted, body present.
//! A valid submission gets a fresh id and the current local time; it is
//! returned to the caller and never added to the review store.

use crate::domain::{Review, ReviewId, KNOWN_CITIES};
use chrono::{Local, NaiveDateTime, SubsecRound};
use rustc_hash::FxHashSet;
use thiserror::Error;

/// Client input errors; `Display` is the message sent back on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing location")]
    MissingLocation,
    #[error("invalid location")]
    InvalidLocation,
    #[error("no review body")]
    MissingBody,
}

impl ValidationError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationError::MissingLocation => "missing_location",
            ValidationError::InvalidLocation => "invalid_location",
            ValidationError::MissingBody => "missing_body",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionValidator {
    cities: FxHashSet<String>,
}

impl Default for SubmissionValidator {
    fn default() -> Self {
        Self::new(KNOWN_CITIES.iter().map(|c| c.to_string()))
    }
}

impl SubmissionValidator {
    pub fn new(cities: impl IntoIterator<Item = String>) -> Self {
        Self { cities: cities.into_iter().collect() }
    }

    pub fn is_known_city(&self, location: &str) -> bool {
        self.cities.contains(location)
    }

    /// Validate a submission and stamp it with the current local time
    pub fn validate_and_build(
        &self,
        location: Option<&str>,
        body: Option<&str>,
    ) -> Result<Review, ValidationError> {
        self.validate_and_build_at(location, body, Local::now().naive_local())
    }

    /// Same as `validate_and_build` with an explicit clock value
    pub fn validate_and_build_at(
        &self,
        location: Option<&str>,
        body: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Review, ValidationError> {
        let location = location.filter(|l| !l.is_empty()).ok_or(ValidationError::MissingLocation)?;
        if !self.is_known_city(location) {
            return Err(ValidationError::InvalidLocation);
        }
        let body = body.filter(|b| !b.is_empty()).ok_or(ValidationError::MissingBody)?;

        Ok(Review {
            id: ReviewId::generate(),
            location: location.to_string(),
            timestamp: now.trunc_subsecs(0),
            body: body.to_string(),
        })
    }
}
