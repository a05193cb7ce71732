//! Review store - immutable snapshot of the review dataset
//!
//! Loaded once at startup from CSV (`ReviewId, ReviewBody, Location, Timestamp`,
//! extra columns ignored) and sorted by timestamp, newest first. Equal
//! timestamps keep their file order. Any unreadable row or unparsable
//! timestamp aborts the load.

use crate::domain::Review;
use anyhow::Context;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ReviewStore {
    reviews: Vec<Review>,
}

impl ReviewStore {
    /// Build a store, ordering reviews by timestamp descending
    pub fn new(mut reviews: Vec<Review>) -> Self {
        reviews.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { reviews }
    }

    /// Load the dataset from a CSV file
    pub fn load_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open review dataset {}", path.display()))?;
        let store = Self::from_reader(file)
            .with_context(|| format!("Failed to load review dataset {}", path.display()))?;

        info!(
            file = %path.display(),
            reviews = %store.len(),
            newest = ?store.reviews.first().map(|r| r.timestamp),
            oldest = ?store.reviews.last().map(|r| r.timestamp),
            "review_store_loaded"
        );
        Ok(store)
    }

    /// Parse CSV from any reader (header row required)
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let mut reviews = Vec::new();

        for (row, result) in reader.deserialize::<Review>().enumerate() {
            let review = result.with_context(|| format!("Invalid review on data row {}", row + 1))?;
            reviews.push(review);
        }

        Ok(Self::new(reviews))
    }

    /// Reviews in store order (timestamp descending)
    #[inline]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}
