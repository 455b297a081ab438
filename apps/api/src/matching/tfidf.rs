//! TF-IDF vector space with the same defaults as scikit-learn's `TfidfVectorizer`:
//! lowercase, tokens of two or more word characters, raw term counts, smoothed
//! IDF and L2-normalized rows.

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("token pattern compiles");
}

/// Sparse document vector keyed by term. Ordered so sums are reproducible.
pub type TermVector = BTreeMap<String, f64>;

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `ln((1 + n) / (1 + df)) + 1`
pub fn smoothed_idf(documents: usize, document_frequency: usize) -> f64 {
    ((1.0 + documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Builds one normalized TF-IDF vector per document, over the vocabulary of all of them.
pub fn fit_transform(documents: &[&str]) -> Vec<TermVector> {
    let counts: Vec<HashMap<String, usize>> = documents
        .iter()
        .map(|doc| {
            let mut tf = HashMap::new();
            for token in tokenize(doc) {
                *tf.entry(token).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let n = documents.len();
    counts
        .iter()
        .map(|tf| {
            let mut vector: TermVector = tf
                .iter()
                .map(|(term, &count)| {
                    let idf = smoothed_idf(n, document_frequency[term.as_str()]);
                    (term.clone(), count as f64 * idf)
                })
                .collect();
            normalize(&mut vector);
            vector
        })
        .collect()
}

fn normalize(vector: &mut TermVector) {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

/// Cosine similarity in [0, 1]; a zero vector is similar to nothing.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_matches_sklearn_pattern() {
        assert_eq!(
            tokenize("C and R are Rust's, a-OK?"),
            vec!["and", "are", "rust", "ok"]
        );
        assert_eq!(tokenize("snake_case 42 x"), vec!["snake_case", "42"]);
        assert!(tokenize("a b c").is_empty());
    }

    #[test]
    fn test_idf_for_term_in_every_document_is_one() {
        assert!((smoothed_idf(4, 4) - 1.0).abs() < 1e-12);
        assert!(smoothed_idf(4, 1) > smoothed_idf(4, 2));
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vectors = fit_transform(&["rust tokio axum", "python pandas", "rust rust python"]);
        for v in &vectors {
            let norm = v.values().map(|w| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "norm was {norm}");
        }
    }

    #[test]
    fn test_rarer_terms_weigh_more() {
        let vectors = fit_transform(&["common rare", "common", "common"]);
        assert!(vectors[0]["rare"] > vectors[0]["common"]);
    }

    #[test]
    fn test_cosine_bounds() {
        let vectors = fit_transform(&["rust developer", "rust developer", "gardening tips", ""]);
        assert!((cosine_similarity(&vectors[0], &vectors[1]) - 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&vectors[0], &vectors[2]), 0.0);
        assert_eq!(cosine_similarity(&vectors[0], &vectors[3]), 0.0);
    }
}
