//! Review annotation: text normalization + sentiment scoring
//!
//! Review bodies are tokenized (punctuation and contractions split off),
//! English stop-words are dropped case-insensitively, and the remaining tokens
//! are rejoined with single spaces before being handed to the scorer.

use crate::domain::{AnnotatedReview, Review, SentimentScores};
use crate::services::sentiment::SentimentScorer;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// English stop-words removed before scoring
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Contraction suffixes split into their own token (`we're` -> `we` `'re`)
const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Tokenizer plus stop-word filter
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: FxHashSet<&'static str>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self { stop_words: STOP_WORDS.iter().copied().collect() }
    }
}

impl TextNormalizer {
    /// Split text into word and punctuation tokens
    pub fn tokenize(text: &str) -> Vec<&str> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            let is_punct = |c: char| c.is_ascii_punctuation() && c != '\'';
            let core_start = chunk.find(|c: char| !is_punct(c)).unwrap_or(chunk.len());
            let core_end = chunk.rfind(|c: char| !is_punct(c)).map_or(core_start, |i| {
                i + chunk[i..].chars().next().map_or(1, char::len_utf8)
            });

            push_punctuation(&chunk[..core_start], &mut tokens);
            if core_start < core_end {
                push_word(&chunk[core_start..core_end], &mut tokens);
            }
            push_punctuation(&chunk[core_end.max(core_start)..], &mut tokens);
        }
        tokens
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token.to_lowercase().as_str())
    }

    /// Tokenize, drop stop-words, rejoin with single spaces
    pub fn normalize(&self, text: &str) -> String {
        Self::tokenize(text)
            .into_iter()
            .filter(|t| !self.is_stop_word(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn push_punctuation<'a>(punct: &'a str, tokens: &mut Vec<&'a str>) {
    tokens.extend(punct.char_indices().map(|(i, c)| &punct[i..i + c.len_utf8()]));
}

fn push_word<'a>(word: &'a str, tokens: &mut Vec<&'a str>) {
    let lower = word.to_ascii_lowercase();
    if lower.len() > 3 && lower.ends_with("n't") {
        let split = word.len() - 3;
        tokens.push(&word[..split]);
        tokens.push(&word[split..]);
        return;
    }
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let split = word.len() - clitic.len();
            tokens.push(&word[..split]);
            tokens.push(&word[split..]);
            return;
        }
    }
    tokens.push(word);
}

/// Maps reviews to display records carrying their sentiment
#[derive(Clone)]
pub struct ReviewAnnotator {
    normalizer: TextNormalizer,
    scorer: Arc<dyn SentimentScorer>,
}

impl ReviewAnnotator {
    pub fn new(normalizer: TextNormalizer, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { normalizer, scorer }
    }

    /// Sentiment of a single review body (normalized before scoring)
    pub fn sentiment(&self, body: &str) -> SentimentScores {
        self.scorer.polarity_scores(&self.normalizer.normalize(body))
    }

    /// Annotate reviews, keeping their order
    pub fn annotate<'a>(&self, reviews: &[&'a Review]) -> Vec<AnnotatedReview<'a>> {
        reviews.iter().map(|r| AnnotatedReview::new(r, self.sentiment(&r.body))).collect()
    }
}
