//! Lexicon-based sentiment scoring
//!
//! `SentimentScorer` is the capability the annotator depends on: text in,
//! `{neg, neu, pos, compound}` out. `LexiconScorer` implements it with a
//! valence lexicon (VADER scale, roughly -4..4) plus the usual heuristics:
//! booster/dampener words, negation within a three-word window, ALL-CAPS
//! emphasis, "but" contrast and exclamation emphasis.
//!
//! Empty text, or text without any sentiment-bearing word, scores as
//! `SentimentScores::NEUTRAL`. Scoring never fails.

use crate::domain::SentimentScores;
use anyhow::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs;
use std::path::Path;
use tracing::info;

/// Scores text into a neg/neu/pos/compound breakdown
pub trait SentimentScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> SentimentScores;
}

const BOOST_INCR: f64 = 0.293;
const BOOST_DECR: f64 = -0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
/// Normalization constant approximating the max expected raw sum
const ALPHA: f64 = 15.0;
const BUT_BEFORE: f64 = 0.5;
const BUT_AFTER: f64 = 1.5;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Decay applied to boosters one, two and three words back
const WINDOW_DECAY: [f64; 3] = [1.0, 0.95, 0.9];

const BUILTIN_LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("charming", 2.3),
    ("clean", 1.7),
    ("comfortable", 1.5),
    ("cozy", 1.6),
    ("cute", 2.0),
    ("delicious", 2.7),
    ("delight", 2.9),
    ("delightful", 2.8),
    ("easy", 1.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("exceptional", 2.9),
    ("fabulous", 2.4),
    ("fantastic", 2.6),
    ("fast", 1.0),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("fresh", 1.3),
    ("friendly", 2.2),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("incredible", 2.5),
    ("like", 2.0),
    ("liked", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("outstanding", 3.0),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("polite", 1.7),
    ("recommend", 1.5),
    ("recommended", 1.7),
    ("satisfied", 1.8),
    ("superb", 3.1),
    ("sweet", 2.0),
    ("tasty", 2.2),
    ("terrific", 2.7),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("welcoming", 1.9),
    ("wonderful", 2.7),
    ("worth", 0.9),
    ("wow", 2.8),
    ("yummy", 2.4),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("awful", -2.0),
    ("bad", -2.5),
    ("bland", -1.2),
    ("boring", -1.3),
    ("broken", -2.1),
    ("cold", -0.3),
    ("complain", -1.5),
    ("complaint", -1.2),
    ("confused", -1.3),
    ("crowded", -1.0),
    ("dirty", -1.9),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disgusting", -2.4),
    ("dislike", -1.6),
    ("expensive", -0.9),
    ("fail", -2.5),
    ("failed", -2.3),
    ("gross", -2.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("lousy", -2.5),
    ("mediocre", -1.0),
    ("mess", -1.5),
    ("nasty", -2.6),
    ("overpriced", -1.6),
    ("pathetic", -2.6),
    ("poor", -2.1),
    ("problem", -1.7),
    ("rude", -2.0),
    ("sad", -2.1),
    ("slow", -0.9),
    ("sorry", -0.3),
    ("stale", -1.5),
    ("terrible", -2.1),
    ("unfriendly", -1.5),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const BOOSTERS: &[&str] = &[
    "absolutely",
    "amazingly",
    "awfully",
    "completely",
    "considerably",
    "decidedly",
    "deeply",
    "enormously",
    "entirely",
    "especially",
    "exceptionally",
    "extremely",
    "fabulously",
    "fully",
    "greatly",
    "highly",
    "hugely",
    "incredibly",
    "intensely",
    "majorly",
    "more",
    "most",
    "particularly",
    "purely",
    "quite",
    "really",
    "remarkably",
    "so",
    "substantially",
    "thoroughly",
    "totally",
    "tremendously",
    "unbelievably",
    "unusually",
    "utterly",
    "very",
];

const DAMPENERS: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "kinda",
    "less",
    "little",
    "marginally",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope", "nor",
    "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
    "rarely", "seldom", "despite",
];

/// Valence-lexicon sentiment scorer
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: FxHashMap<String, f64>,
    boosters: FxHashMap<&'static str, f64>,
    negations: FxHashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::with_lexicon(
            BUILTIN_LEXICON.iter().map(|&(word, valence)| (word.to_string(), valence)).collect(),
        )
    }
}

impl LexiconScorer {
    pub fn with_lexicon(lexicon: FxHashMap<String, f64>) -> Self {
        let boosters = BOOSTERS
            .iter()
            .map(|&w| (w, BOOST_INCR))
            .chain(DAMPENERS.iter().map(|&w| (w, BOOST_DECR)))
            .collect();
        let negations = NEGATIONS.iter().copied().collect();
        Self { lexicon, boosters, negations }
    }

    /// Load a VADER-format lexicon file (`word<TAB>mean-valence[<TAB>...]`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let lexicon = parse_lexicon(&content)
            .with_context(|| format!("Failed to parse lexicon file {}", path.display()))?;

        info!(file = %path.display(), words = %lexicon.len(), "sentiment_lexicon_loaded");
        Ok(Self::with_lexicon(lexicon))
    }

    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }

    fn is_negation(&self, lower: &str) -> bool {
        self.negations.contains(lower) || lower.contains("n't")
    }

    /// Valence of one word given the words before it
    fn word_valence(&self, words: &[&str], lowers: &[String], i: usize, caps_differ: bool) -> f64 {
        let lower = lowers[i].as_str();
        if self.boosters.contains_key(lower) {
            return 0.0;
        }
        let Some(&base) = self.lexicon.get(lower) else {
            return 0.0;
        };

        let mut valence = base;
        if caps_differ && is_all_caps(words[i]) {
            valence += CAPS_INCR.copysign(valence);
        }

        let mut negated = false;
        for (back, decay) in WINDOW_DECAY.iter().enumerate() {
            let Some(j) = i.checked_sub(back + 1) else { break };
            let prev = lowers[j].as_str();
            if !self.lexicon.contains_key(prev) {
                if let Some(&scalar) = self.boosters.get(prev) {
                    let mut scalar = if valence < 0.0 { -scalar } else { scalar };
                    if caps_differ && is_all_caps(words[j]) {
                        scalar += CAPS_INCR.copysign(valence);
                    }
                    valence += scalar * decay;
                }
            }
            negated |= self.is_negation(prev);
        }
        if negated {
            valence *= NEGATION_SCALAR;
        }
        valence
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> SentimentScores {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
            .filter(|w| w.chars().count() > 1)
            .collect();
        if words.is_empty() {
            return SentimentScores::NEUTRAL;
        }

        let lowers: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let caps_differ = {
            let caps = words.iter().filter(|w| is_all_caps(w)).count();
            caps > 0 && caps < words.len()
        };

        let mut valences: Vec<f64> =
            (0..words.len()).map(|i| self.word_valence(&words, &lowers, i, caps_differ)).collect();

        if let Some(but) = lowers.iter().position(|w| w == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < but {
                    *v *= BUT_BEFORE;
                } else if i > but {
                    *v *= BUT_AFTER;
                }
            }
        }

        score_valences(&valences, exclamation_emphasis(text))
    }
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn exclamation_emphasis(text: &str) -> f64 {
    text.matches('!').count().min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_INCR
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valences(valences: &[f64], emphasis: f64) -> SentimentScores {
    let sum: f64 = valences.iter().sum();
    if sum == 0.0 && valences.iter().all(|v| *v == 0.0) {
        return SentimentScores::NEUTRAL;
    }
    let compound = if sum > 0.0 {
        normalize(sum + emphasis)
    } else if sum < 0.0 {
        normalize(sum - emphasis)
    } else {
        0.0
    };

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &v in valences {
        if v > 0.0 {
            pos_sum += v + 1.0;
        } else if v < 0.0 {
            neg_sum += v - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    SentimentScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

fn parse_lexicon(content: &str) -> anyhow::Result<FxHashMap<String, f64>> {
    let mut lexicon = FxHashMap::default();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut cols = line.split('\t');
        let word = cols.next().unwrap_or_default().trim();
        let valence = cols
            .next()
            .with_context(|| format!("line {}: missing valence column", line_no + 1))?
            .trim()
            .parse::<f64>()
            .with_context(|| format!("line {}: invalid valence", line_no + 1))?;
        lexicon.insert(word.to_lowercase(), valence);
    }
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn scorer() -> LexiconScorer {
        LexiconScorer::default()
    }

    fn assert_proportions(s: &SentimentScores) {
        for v in [s.neg, s.neu, s.pos] {
            assert!((0.0..=1.0).contains(&v), "{s:?}");
        }
        assert!((s.neg + s.neu + s.pos - 1.0).abs() < 0.01, "{s:?}");
        assert!((-1.0..=1.0).contains(&s.compound), "{s:?}");
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(scorer().polarity_scores(""), SentimentScores::NEUTRAL);
        assert_eq!(scorer().polarity_scores("   . ! "), SentimentScores::NEUTRAL);
    }

    #[test]
    fn test_text_without_sentiment_words_is_neutral() {
        assert_eq!(scorer().polarity_scores("table chair window"), SentimentScores::NEUTRAL);
    }

    #[test]
    fn test_positive_and_negative_polarity() {
        let pos = scorer().polarity_scores("Loved food great service");
        assert!(pos.compound > 0.5, "{pos:?}");
        assert!(pos.pos > pos.neg);
        assert_proportions(&pos);

        let neg = scorer().polarity_scores("terrible food rude staff");
        assert!(neg.compound < -0.5, "{neg:?}");
        assert!(neg.neg > neg.pos);
        assert_proportions(&neg);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let plain = scorer().polarity_scores("food good");
        let negated = scorer().polarity_scores("food n't good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0, "{negated:?}");
    }

    #[test]
    fn test_booster_and_caps_intensify() {
        let plain = scorer().polarity_scores("service good");
        let boosted = scorer().polarity_scores("service extremely good");
        let shouted = scorer().polarity_scores("service GOOD");
        assert!(boosted.compound > plain.compound);
        assert!(shouted.compound > plain.compound);
    }

    #[test]
    fn test_exclamation_adds_emphasis() {
        let calm = scorer().polarity_scores("great place");
        let excited = scorer().polarity_scores("great place !!!");
        assert!(excited.compound > calm.compound);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let s = scorer().polarity_scores("food good but service terrible");
        assert!(s.compound < 0.0, "{s:?}");
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let text = "Absolutely loved the tacos but parking awful";
        assert_eq!(scorer().polarity_scores(text), scorer().polarity_scores(text));
    }

    #[test]
    fn test_lexicon_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "splendid\t2.5\t0.5\t[2, 3, 2]").unwrap();
        writeln!(file, "meh\t-0.8\t0.4\t[-1, -1, 0]").unwrap();
        writeln!(file).unwrap();
        file.flush().unwrap();

        let scorer = LexiconScorer::from_file(file.path()).unwrap();
        assert_eq!(scorer.lexicon_len(), 2);
        assert!(scorer.polarity_scores("splendid evening").compound > 0.0);
        assert!(scorer.polarity_scores("meh evening").compound < 0.0);
        // built-in words are replaced, not merged
        assert_eq!(scorer.polarity_scores("great evening"), SentimentScores::NEUTRAL);
    }

    #[test]
    fn test_lexicon_file_with_bad_valence_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "good\tvery").unwrap();
        file.flush().unwrap();

        let err = LexiconScorer::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }
}
