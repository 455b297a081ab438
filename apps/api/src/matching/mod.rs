//! Match engine: ranks resumes against a job description by TF-IDF cosine similarity.

pub mod tfidf;

use crate::errors::AppError;
use crate::models::match_record::MatchResult;

use self::tfidf::{cosine_similarity, fit_transform};

/// How many resumes a ranking keeps.
pub const TOP_MATCHES: usize = 5;

/// A resume to rank: its display name and extracted text.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub text: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Ranks `candidates` against `query`.
///
/// The vector space is built over the query and every candidate together.
/// Output is sorted by similarity descending (ties keep input order), holds at
/// most [`TOP_MATCHES`] entries, and scores are percentages rounded to two decimals.
pub fn rank(query: &str, candidates: &[Candidate]) -> Result<Vec<MatchResult>, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::MissingInput("job description is empty".to_string()));
    }
    if candidates.is_empty() {
        return Err(AppError::MissingInput("no resumes to rank".to_string()));
    }

    let documents: Vec<&str> = std::iter::once(query)
        .chain(candidates.iter().map(|c| c.text.as_str()))
        .collect();
    let vectors = fit_transform(&documents);
    let (query_vector, resume_vectors) = vectors.split_first().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("vector space is missing the query row"))
    })?;

    let mut scored: Vec<(usize, f64)> = resume_vectors
        .iter()
        .map(|v| cosine_similarity(query_vector, v))
        .enumerate()
        .collect();
    // sort_by is stable, so equal scores stay in upload order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .take(TOP_MATCHES)
        .map(|(i, similarity)| MatchResult {
            resume_name: candidates[i].name.clone(),
            similarity: to_percentage(similarity),
        })
        .collect())
}

fn to_percentage(similarity: f64) -> f64 {
    (similarity * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "data scientist with Python experience";

    fn assert_descending(results: &[MatchResult]) {
        for pair in results.windows(2) {
            assert!(
                pair[0].similarity >= pair[1].similarity,
                "{} < {}",
                pair[0].similarity,
                pair[1].similarity
            );
        }
    }

    #[test]
    fn test_exact_copy_scores_one_hundred() {
        let candidates = vec![
            Candidate::new("chef.txt", "line cook and pastry chef"),
            Candidate::new("copy.txt", QUERY),
            Candidate::new("analyst.txt", "Python analyst with SQL experience"),
        ];
        let results = rank(QUERY, &candidates).unwrap();

        assert_eq!(results[0].resume_name, "copy.txt");
        assert_eq!(results[0].similarity, 100.00);
        assert_eq!(results[1].resume_name, "analyst.txt");
        assert!(results[1].similarity > 0.0 && results[1].similarity < 100.0);
        assert_eq!(results[2].resume_name, "chef.txt");
        assert_eq!(results[2].similarity, 0.0);
    }

    #[test]
    fn test_output_length_is_capped_at_five() {
        for n in 1..=8 {
            let candidates: Vec<_> = (0..n)
                .map(|i| Candidate::new(format!("r{i}.txt"), format!("python data {}", "x".repeat(i + 2))))
                .collect();
            let results = rank(QUERY, &candidates).unwrap();
            assert_eq!(results.len(), n.min(TOP_MATCHES), "n = {n}");
            assert_descending(&results);
        }
    }

    #[test]
    fn test_best_five_of_many_are_kept() {
        let mut candidates: Vec<_> = (0..6)
            .map(|i| Candidate::new(format!("noise{i}.txt"), "gardening and carpentry"))
            .collect();
        candidates.push(Candidate::new("match.txt", "python data scientist"));

        let results = rank(QUERY, &candidates).unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].resume_name, "match.txt");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            Candidate::new("first.txt", "python experience"),
            Candidate::new("second.txt", "python experience"),
            Candidate::new("third.txt", "python experience"),
        ];
        let results = rank(QUERY, &candidates).unwrap();
        let names: Vec<_> = results.iter().map(|r| r.resume_name.as_str()).collect();
        assert_eq!(names, ["first.txt", "second.txt", "third.txt"]);
    }

    #[test]
    fn test_scores_have_two_decimals() {
        let candidates = vec![
            Candidate::new("a.txt", "python experience in data engineering and ops"),
            Candidate::new("b.txt", "scientist"),
        ];
        for result in rank(QUERY, &candidates).unwrap() {
            let scaled = result.similarity * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{}", result.similarity);
            assert!((0.0..=100.0).contains(&result.similarity));
        }
    }

    #[test]
    fn test_empty_candidates_is_missing_input() {
        let err = rank(QUERY, &[]).unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));
    }

    #[test]
    fn test_blank_query_is_missing_input() {
        let candidates = vec![Candidate::new("a.txt", "python")];
        assert!(matches!(rank("", &candidates), Err(AppError::MissingInput(_))));
        assert!(matches!(rank("  \n", &candidates), Err(AppError::MissingInput(_))));
    }

    #[test]
    fn test_empty_resume_text_scores_zero() {
        let candidates = vec![Candidate::new("scan.pdf", ""), Candidate::new("cv.txt", "python")];
        let results = rank(QUERY, &candidates).unwrap();
        assert_eq!(results[0].resume_name, "cv.txt");
        assert_eq!(results[1].resume_name, "scan.pdf");
        assert_eq!(results[1].similarity, 0.0);
    }
}
