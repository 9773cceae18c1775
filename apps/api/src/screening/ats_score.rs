//! ATS score — percentage of JD keywords found in the resume text.
//!
//! Algorithm:
//! 1. Lowercase both inputs.
//! 2. Tokenize the JD (duplicates kept).
//! 3. Count keywords that occur as a substring of the resume. Substring, not
//!    token match: "java" counts against "javascript".
//! 4. `round(match_count / keywords * 100, 2)`, or `0.0` for an empty keyword list.

use crate::screening::tokenizer::tokenize;

/// Computes the ATS match score in `[0.0, 100.0]`, rounded to 2 decimals.
pub fn ats_score(resume_text: &str, job_text: &str) -> f64 {
    let keywords = tokenize(job_text);
    if keywords.is_empty() {
        return 0.0;
    }

    let resume_lower = resume_text.to_lowercase();
    let match_count = keywords
        .iter()
        .filter(|kw| resume_lower.contains(kw.as_str()))
        .count();

    round2(match_count as f64 / keywords.len() as f64 * 100.0)
}

/// Rounds to 2 decimal places, ties to even on the exact binary value.
///
/// Scaling by 100 first is lossy, so the rounding goes through fixed-precision
/// formatting, which is correctly rounded.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_cloud_scenario_scores_60() {
        let score = ats_score(
            "I have 5 years of Python and cloud development",
            "Python and Cloud experience required",
        );
        assert_eq!(score, 60.0);
    }

    #[test]
    fn test_empty_job_scores_zero() {
        assert_eq!(ats_score("anything at all", ""), 0.0);
        assert_eq!(ats_score("", ""), 0.0);
        assert_eq!(ats_score("rust", "  ,;  "), 0.0);
    }

    #[test]
    fn test_full_match_scores_100() {
        assert_eq!(ats_score("rust tokio axum", "Rust, Tokio & Axum"), 100.0);
    }

    #[test]
    fn test_no_match_scores_zero() {
        assert_eq!(ats_score("gardening", "rust tokio"), 0.0);
    }

    #[test]
    fn test_substring_counts_as_match() {
        // "java" is inside "javascript"
        assert_eq!(ats_score("JavaScript developer", "java"), 100.0);
    }

    #[test]
    fn test_duplicates_weight_proportionally() {
        // rust x3 matched, go x1 missed -> 75%
        assert_eq!(ats_score("rust", "rust rust rust go"), 75.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 1 of 3 -> 33.333... -> 33.33
        assert_eq!(ats_score("alpha", "alpha beta gamma"), 33.33);
        // 2 of 3 -> 66.666... -> 66.67
        assert_eq!(ats_score("alpha beta", "alpha beta gamma"), 66.67);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        let job: Vec<String> = (0..32).map(|i| format!("k{i}x")).collect();
        let job = job.join(" ");
        // 1/32 -> 3.125, 5/32 -> 15.625, 3/32 -> 9.375
        assert_eq!(ats_score("k0x", &job), 3.12);
        assert_eq!(ats_score("k0x k1x k2x k3x k4x", &job), 15.62);
        assert_eq!(ats_score("k0x k1x k2x", &job), 9.38);
    }

    #[test]
    fn test_round2_uses_exact_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-12.345), -12.35);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_case_invariant() {
        let resume = "Built Machine Learning pipelines on AWS Cloud with a great Team";
        let job = "Machine learning engineer, cloud native, team player, Kubernetes";
        let base = ats_score(resume, job);
        assert_eq!(ats_score(&resume.to_uppercase(), job), base);
        assert_eq!(ats_score(resume, &job.to_uppercase()), base);
        assert_eq!(
            ats_score(&resume.to_lowercase(), &job.to_lowercase()),
            base
        );
    }

    #[test]
    fn test_score_bounded_0_to_100() {
        let cases = [
            ("", "rust"),
            ("rust", "rust"),
            ("a b c", "a b c d e f g h"),
            ("x", "x x x x x x x"),
            ("lorem ipsum", "Ipsum! dolor? sit amet"),
        ];
        for (resume, job) in cases {
            let score = ats_score(resume, job);
            assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }
    }
}
