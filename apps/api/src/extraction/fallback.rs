//! Keyword/regex extraction used when the generative service is unavailable.
//! Pure and deterministic: same input, same output, no I/O.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::{DEFAULT_EMPLOYMENT_TYPE, NOT_SPECIFIED};
use crate::models::{EmployerDetails, Mode, ProfileDetails, SeekerDetails};

const BIO_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 300;
const REQUIREMENT_MAX_CHARS: usize = 100;
const REQUIREMENT_MIN_CHARS: usize = 10;
const MAX_REQUIREMENTS: usize = 5;
const ELLIPSIS: &str = "...";
pub const SEE_DESCRIPTION: &str = "See description";

const SKILL_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "node",
    "python",
    "java",
    "css",
    "html",
    "sql",
    "mongodb",
    "postgresql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "figma",
    "design",
    "marketing",
    "sales",
    "management",
    "leadership",
];

static REQUIREMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+\+?\s*years?",
        r"(?i)bachelor",
        r"(?i)master",
        r"(?i)degree",
        r"(?i)experience",
        r"(?i)required",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("requirement pattern is valid"))
    .collect()
});

/// Derives structured profile details from free text without any network call.
pub fn fallback_extract(text: &str, mode: Mode) -> ProfileDetails {
    match mode {
        Mode::Seeker => ProfileDetails::Seeker(SeekerDetails {
            bio: truncate_with_ellipsis(text, BIO_MAX_CHARS),
            skills: extract_skills(text),
            experience: NOT_SPECIFIED.to_string(),
            education: NOT_SPECIFIED.to_string(),
        }),
        Mode::Employer => ProfileDetails::Employer(EmployerDetails {
            description: truncate_with_ellipsis(text, DESCRIPTION_MAX_CHARS),
            requirements: extract_requirements(text),
            salary: NOT_SPECIFIED.to_string(),
            employment_type: DEFAULT_EMPLOYMENT_TYPE.to_string(),
        }),
    }
}

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut out: String = text.chars().take(max_chars).collect();
        out.push_str(ELLIPSIS);
        out
    } else {
        text.to_string()
    }
}

fn extract_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let found: Vec<String> = SKILL_KEYWORDS
        .iter()
        .filter(|skill| lower.contains(*skill))
        .map(|skill| capitalize_first(skill))
        .collect();

    if found.is_empty() {
        vec![SEE_DESCRIPTION.to_string()]
    } else {
        found
    }
}

fn extract_requirements(text: &str) -> Vec<String> {
    let found: Vec<String> = text
        .split(['.', '!', '?'])
        .filter(|sentence| REQUIREMENT_PATTERNS.iter().any(|re| re.is_match(sentence)))
        .map(|sentence| sentence.trim().chars().take(REQUIREMENT_MAX_CHARS).collect::<String>())
        .filter(|sentence| sentence.chars().count() > REQUIREMENT_MIN_CHARS)
        .take(MAX_REQUIREMENTS)
        .collect();

    if found.is_empty() {
        vec![SEE_DESCRIPTION.to_string()]
    } else {
        found
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeker(text: &str) -> SeekerDetails {
        match fallback_extract(text, Mode::Seeker) {
            ProfileDetails::Seeker(d) => d,
            other => panic!("expected seeker details, got {other:?}"),
        }
    }

    fn employer(text: &str) -> EmployerDetails {
        match fallback_extract(text, Mode::Employer) {
            ProfileDetails::Employer(d) => d,
            other => panic!("expected employer details, got {other:?}"),
        }
    }

    #[test]
    fn test_short_bio_is_kept_verbatim() {
        let d = seeker("I build things with Rust.");
        assert_eq!(d.bio, "I build things with Rust.");
        assert_eq!(d.experience, NOT_SPECIFIED);
        assert_eq!(d.education, NOT_SPECIFIED);
    }

    #[test]
    fn test_long_bio_is_truncated_to_200_chars_plus_ellipsis() {
        let text = "a".repeat(250);
        let d = seeker(&text);
        assert_eq!(d.bio.chars().count(), 203);
        assert!(d.bio.ends_with("..."));
    }

    #[test]
    fn test_exactly_200_chars_is_not_truncated() {
        let text = "b".repeat(200);
        assert_eq!(seeker(&text).bio, text);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(201);
        let d = seeker(&text);
        assert_eq!(d.bio, format!("{}...", "é".repeat(200)));
    }

    #[test]
    fn test_skills_match_case_insensitively_and_capitalize() {
        let d = seeker("Senior REACT developer, some Docker and AWS.");
        assert_eq!(d.skills, vec!["React", "Aws", "Docker"]);
    }

    #[test]
    fn test_java_matches_inside_javascript() {
        let d = seeker("JavaScript all day");
        assert_eq!(d.skills, vec!["Javascript", "Java"]);
    }

    #[test]
    fn test_no_skills_yields_see_description() {
        let d = seeker("I enjoy long walks.");
        assert_eq!(d.skills, vec![SEE_DESCRIPTION]);
    }

    #[test]
    fn test_employer_scenario_years_and_degree() {
        let d = employer("5 years React experience, Bachelor's degree");
        assert!(d.requirements.iter().any(|r| r.contains("years")));
        assert!(d
            .requirements
            .iter()
            .any(|r| r.contains("Bachelor") || r.contains("degree")));
        assert!(d.requirements.len() <= 5);
        assert_eq!(d.employment_type, "Full-time");
        assert_eq!(d.salary, "Not specified");
    }

    #[test]
    fn test_requirements_split_on_sentence_terminators() {
        let d = employer(
            "We are hiring! Master's degree preferred. 3+ years of Go required? Free snacks.",
        );
        assert_eq!(
            d.requirements,
            vec!["Master's degree preferred", "3+ years of Go required"]
        );
    }

    #[test]
    fn test_requirements_capped_at_five() {
        let text = (1..=8)
            .map(|n| format!("At least {n} years in role number {n}"))
            .collect::<Vec<_>>()
            .join(". ");
        let d = employer(&text);
        assert_eq!(d.requirements.len(), 5);
        assert_eq!(d.requirements[0], "At least 1 years in role number 1");
    }

    #[test]
    fn test_requirements_truncated_to_100_chars() {
        let text = format!("Experience required {}", "x".repeat(200));
        let d = employer(&text);
        assert_eq!(d.requirements[0].chars().count(), 100);
    }

    #[test]
    fn test_short_matching_fragments_are_dropped() {
        let d = employer("Degree. Nice office");
        assert_eq!(d.requirements, vec![SEE_DESCRIPTION]);
    }

    #[test]
    fn test_description_truncated_to_300_chars() {
        let d = employer(&"z".repeat(301));
        assert_eq!(d.description.chars().count(), 303);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let text = "Python and SQL. 2 years experience required.";
        assert_eq!(
            fallback_extract(text, Mode::Employer),
            fallback_extract(text, Mode::Employer)
        );
        assert_eq!(
            fallback_extract(text, Mode::Seeker),
            fallback_extract(text, Mode::Seeker)
        );
    }

    #[test]
    fn test_empty_input_does_not_panic() {
        assert_eq!(seeker("").bio, "");
        assert_eq!(employer("").requirements, vec![SEE_DESCRIPTION]);
    }
}
