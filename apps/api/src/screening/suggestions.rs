//! Suggestion engine — ordered heuristic rules over (resume, JD).
//!
//! Each rule is an independent predicate paired with a fixed message. Rules are
//! evaluated in declaration order; the output order is rule order, not priority.
//! The final rule always fires, so the list is never empty.

/// Resumes shorter than this many characters get the "add more content" note.
pub const MIN_RESUME_CHARS: usize = 300;

/// Technical terms checked against the JD. Any one present in the JD but absent
/// from the resume triggers a single keyword suggestion.
pub const TECH_TERMS: &[&str] = &["python", "machine learning", "cloud"];

pub const SHORT_RESUME_MSG: &str = "Add more content to your resume to highlight your experience.";
pub const TEAMWORK_MSG: &str = "Include team-based experiences or collaboration examples.";
pub const TECH_KEYWORDS_MSG: &str = "Add relevant technical keywords from the job description.";
pub const ACTION_VERBS_MSG: &str = "Use action verbs and match job role language.";

/// A single predicate → message rule.
pub struct SuggestionRule {
    pub message: &'static str,
    applies: fn(&str, &str) -> bool,
}

impl SuggestionRule {
    /// Returns true when this rule's message should be emitted.
    pub fn applies(&self, resume_text: &str, job_text: &str) -> bool {
        (self.applies)(resume_text, job_text)
    }
}

/// The rule set, in evaluation order.
pub const RULES: &[SuggestionRule] = &[
    SuggestionRule {
        message: SHORT_RESUME_MSG,
        applies: resume_too_short,
    },
    SuggestionRule {
        message: TEAMWORK_MSG,
        applies: missing_teamwork,
    },
    SuggestionRule {
        message: TECH_KEYWORDS_MSG,
        applies: missing_tech_terms,
    },
    SuggestionRule {
        message: ACTION_VERBS_MSG,
        applies: always,
    },
];

/// Produces improvement suggestions for a resume against a JD.
pub fn suggest(resume_text: &str, job_text: &str) -> Vec<String> {
    RULES
        .iter()
        .filter(|rule| rule.applies(resume_text, job_text))
        .map(|rule| rule.message.to_string())
        .collect()
}

fn resume_too_short(resume_text: &str, _job_text: &str) -> bool {
    resume_text.chars().count() < MIN_RESUME_CHARS
}

fn missing_teamwork(resume_text: &str, _job_text: &str) -> bool {
    !resume_text.to_lowercase().contains("team")
}

fn missing_tech_terms(resume_text: &str, job_text: &str) -> bool {
    let resume_lower = resume_text.to_lowercase();
    let job_lower = job_text.to_lowercase();
    TECH_TERMS
        .iter()
        .any(|term| job_lower.contains(term) && !resume_lower.contains(term))
}

fn always(_resume_text: &str, _job_text: &str) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(message: &str) -> &'static SuggestionRule {
        RULES.iter().find(|r| r.message == message).unwrap()
    }

    fn long_resume_with(extra: &str) -> String {
        format!("{}{extra}", "x".repeat(MIN_RESUME_CHARS))
    }

    #[test]
    fn test_rules_are_in_fixed_order() {
        let messages: Vec<&str> = RULES.iter().map(|r| r.message).collect();
        assert_eq!(
            messages,
            vec![SHORT_RESUME_MSG, TEAMWORK_MSG, TECH_KEYWORDS_MSG, ACTION_VERBS_MSG]
        );
    }

    #[test]
    fn test_short_resume_threshold_is_character_count() {
        let r = rule(SHORT_RESUME_MSG);
        assert!(r.applies(&"a".repeat(299), ""));
        assert!(!r.applies(&"a".repeat(300), ""));
        // 150 two-byte chars = 300 bytes but only 150 chars
        assert!(r.applies(&"é".repeat(150), ""));
    }

    #[test]
    fn test_teamwork_rule_is_case_insensitive() {
        let r = rule(TEAMWORK_MSG);
        assert!(r.applies("solo contributor", ""));
        assert!(!r.applies("Led a TEAM of five", ""));
        assert!(!r.applies("strong teamwork", ""));
    }

    #[test]
    fn test_tech_rule_fires_once_for_any_missing_term() {
        let r = rule(TECH_KEYWORDS_MSG);
        assert!(r.applies("java developer", "Python, Machine Learning, Cloud"));
        assert!(!r.applies("python, machine learning and cloud", "Python ML Cloud machine learning"));
        // term absent from JD never fires
        assert!(!r.applies("java developer", "Java backend role"));

        let resume = long_resume_with(" team ");
        let all = suggest(&resume, "python machine learning cloud");
        let count = all.iter().filter(|s| s.as_str() == TECH_KEYWORDS_MSG).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_tech_rule_satisfied_when_resume_has_term() {
        let r = rule(TECH_KEYWORDS_MSG);
        assert!(!r.applies("Deployed to the CLOUD", "cloud infra"));
    }

    #[test]
    fn test_action_verbs_always_last() {
        let out = suggest(&long_resume_with(" team python"), "python");
        assert_eq!(out, vec![ACTION_VERBS_MSG.to_string()]);
        let out = suggest("", "");
        assert_eq!(out.last().map(String::as_str), Some(ACTION_VERBS_MSG));
    }

    #[test]
    fn test_never_empty() {
        let long = long_resume_with("team");
        for (resume, job) in [("", ""), ("team", "x"), (long.as_str(), "cloud")] {
            assert!(!suggest(resume, job).is_empty());
        }
    }

    #[test]
    fn test_short_no_team_missing_ml_yields_all_four() {
        let resume = "Experienced analyst with SQL and Excel background.";
        assert_eq!(resume.chars().count(), 50);
        let out = suggest(resume, "We need machine learning skills");
        assert_eq!(
            out,
            vec![
                SHORT_RESUME_MSG.to_string(),
                TEAMWORK_MSG.to_string(),
                TECH_KEYWORDS_MSG.to_string(),
                ACTION_VERBS_MSG.to_string(),
            ]
        );
    }
}
