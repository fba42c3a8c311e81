//! Term-weighted text similarity between a requirement and a candidate batch.
//!
//! The vector model is fitted jointly over `[requirement] + candidates` on
//! every call and thrown away afterwards. Nothing is cached between runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::matching::MatchError;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
        "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
        "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
        "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
        "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
        "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
        "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
        "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
        "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
        "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
        "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
        "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
        "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
        "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
        "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
        "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
        "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
        "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
        "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
        "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
        "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
        "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
        "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
        "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityConfig {
    pub max_features: usize,
    /// Inclusive (min, max) n-gram length.
    pub ngram_range: (usize, usize),
    pub min_df: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            max_features: 8000,
            ngram_range: (1, 3),
            min_df: 2,
        }
    }
}

/// Scores each candidate text against a requirement text, in `[0, 1]`.
/// The returned vector is index-aligned with `candidates`.
pub trait TextSimilarity: Send + Sync {
    fn similarity(&self, requirement: &str, candidates: &[&str]) -> Vec<f64>;
}

/// TF-IDF cosine similarity. Holds configuration only.
#[derive(Debug, Clone, Default)]
pub struct TfIdfSimilarity {
    config: SimilarityConfig,
}

impl TfIdfSimilarity {
    pub fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    /// Like [`TextSimilarity::similarity`] but surfaces a degenerate fit.
    pub fn try_similarity(
        &self,
        requirement: &str,
        candidates: &[&str],
    ) -> Result<Vec<f64>, MatchError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Vec<String>> = std::iter::once(requirement)
            .chain(candidates.iter().copied())
            .map(|doc| analyze(doc, self.config.ngram_range))
            .collect();

        let model = TfIdfModel::fit(&documents, &self.config)?;
        let rows: Vec<SparseRow> = documents.iter().map(|d| model.transform(d)).collect();
        let (job, rest) = rows.split_first().ok_or_else(|| {
            MatchError::ModelDegenerate("no documents to fit".to_string())
        })?;

        Ok(rest
            .iter()
            .map(|row| {
                let score = dot(job, row);
                if score.is_finite() {
                    score.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect())
    }
}

impl TextSimilarity for TfIdfSimilarity {
    fn similarity(&self, requirement: &str, candidates: &[&str]) -> Vec<f64> {
        match self.try_similarity(requirement, candidates) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, candidates = candidates.len(), "text similarity degraded to zero");
                vec![0.0; candidates.len()]
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vector model
// ────────────────────────────────────────────────────────────────────────────

type SparseRow = BTreeMap<usize, f64>;

struct TfIdfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfModel {
    fn fit(documents: &[Vec<String>], config: &SimilarityConfig) -> Result<Self, MatchError> {
        let n_docs = documents.len();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();

        for terms in documents {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *corpus_freq.entry(term.as_str()).or_default() += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_default() += 1;
                }
            }
        }

        if doc_freq.is_empty() {
            return Err(MatchError::ModelDegenerate(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }
        if n_docs < config.min_df {
            return Err(MatchError::ModelDegenerate(format!(
                "{n_docs} documents cannot satisfy min_df {}",
                config.min_df
            )));
        }

        let mut kept: Vec<&str> = doc_freq
            .iter()
            .filter(|(_, df)| **df >= config.min_df)
            .map(|(term, _)| *term)
            .collect();
        if kept.is_empty() {
            return Err(MatchError::ModelDegenerate(
                "no terms remain after pruning".to_string(),
            ));
        }

        if kept.len() > config.max_features {
            kept.sort_by(|a, b| corpus_freq[b].cmp(&corpus_freq[a]).then_with(|| a.cmp(b)));
            kept.truncate(config.max_features);
        }
        kept.sort_unstable();

        let idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq[term] as f64;
                ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Raw counts times idf, L2-normalized. Out-of-vocabulary terms are skipped.
    fn transform(&self, terms: &[String]) -> SparseRow {
        let mut row = SparseRow::new();
        for term in terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                *row.entry(idx).or_default() += 1.0;
            }
        }
        for (idx, weight) in row.iter_mut() {
            *weight *= self.idf[*idx];
        }
        let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.values_mut().for_each(|w| *w /= norm);
        }
        row
    }
}

fn dot(a: &SparseRow, b: &SparseRow) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(idx, w)| large.get(idx).map(|v| w * v))
        .sum()
}

/// Lower-cases, tokenizes, drops stop words and emits n-grams: unigrams
/// first, then each longer n in turn.
fn analyze(text: &str, (min_n, max_n): (usize, usize)) -> Vec<String> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .collect();

    let mut terms = Vec::new();
    let mut start = min_n.max(1);
    if start == 1 {
        terms.extend(tokens.iter().map(|t| t.to_string()));
        start = 2;
    }
    for n in start..=max_n.min(tokens.len()) {
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}
