//! Semantic similarity between a job posting and a résumé.
//!
//! `AppState` holds an `Arc<dyn SimilarityScorer>`; `TfIdfSimilarity` is the
//! default backend.

use std::collections::{HashMap, HashSet};

use crate::extraction::text::content_words;

/// Similarity in `[0, 1]` between two texts. Implement this to swap backends
/// without touching handlers.
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f32;

    /// Short backend name reported alongside the score.
    fn backend(&self) -> &'static str;
}

/// Cosine similarity of L2-normalised TF-IDF vectors built over the
/// two-document corpus `{a, b}`, with smoothed idf `ln((1 + n) / (1 + df)) + 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TfIdfSimilarity;

type Vector = HashMap<String, f64>;

fn term_counts(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for word in content_words(text) {
        *counts.entry(word).or_insert(0.0) += 1.0;
    }
    counts
}

fn weigh(counts: HashMap<String, f64>, idf: &HashMap<String, f64>) -> Vector {
    let mut vector: Vector = counts
        .into_iter()
        .map(|(term, tf)| {
            let weight = tf * idf.get(&term).copied().unwrap_or(1.0);
            (term, weight)
        })
        .collect();

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.values_mut().for_each(|w| *w /= norm);
    }
    vector
}

impl SimilarityScorer for TfIdfSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let docs = [term_counts(a), term_counts(b)];
        if docs.iter().any(HashMap::is_empty) {
            return 0.0;
        }

        let n = docs.len() as f64;
        let vocabulary: HashSet<&String> = docs.iter().flat_map(|d| d.keys()).collect();
        let idf: HashMap<String, f64> = vocabulary
            .into_iter()
            .map(|term| {
                let df = docs.iter().filter(|d| d.contains_key(term)).count() as f64;
                (term.clone(), ((1.0 + n) / (1.0 + df)).ln() + 1.0)
            })
            .collect();

        let [da, db] = docs;
        let va = weigh(da, &idf);
        let vb = weigh(db, &idf);

        let dot: f64 = va
            .iter()
            .filter_map(|(term, wa)| vb.get(term).map(|wb| wa * wb))
            .sum();
        dot.clamp(0.0, 1.0) as f32
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}
