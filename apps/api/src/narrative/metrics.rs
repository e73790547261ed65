//! Recovery of percentage figures quoted inline in narrative prose.

use serde::Serialize;

use crate::extraction::rules::{Category, RuleClass, RuleTable};

/// Default when no figure is found but the text reads as positive.
const POSITIVE_DEFAULT: u32 = 75;
const NEUTRAL_DEFAULT: u32 = 65;
const POSITIVE_CUES: &[&str] = &["qualified", "strong fit", "recommend"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InlineScores {
    pub overall_match: u32,
    pub skills_match: u32,
    pub experience_match: u32,
    pub education_match: u32,
    /// False when every value is a fallback default.
    pub recovered: bool,
}

pub fn recover_inline_scores(rules: &RuleTable, response: &str) -> InlineScores {
    let lower = response.to_lowercase();
    let fallback = if POSITIVE_CUES.iter().any(|cue| lower.contains(cue)) {
        POSITIVE_DEFAULT
    } else {
        NEUTRAL_DEFAULT
    };

    let find = |class: RuleClass| -> Option<u32> {
        rules
            .first(Category::InlineScores, class, &lower)
            .and_then(|hit| hit.value.parse::<u32>().ok())
            .map(|v| v.min(100))
    };

    let overall = find(RuleClass::OverallScore);
    let skills = find(RuleClass::SkillsScore);
    let experience = find(RuleClass::ExperienceScore);
    let education = find(RuleClass::EducationScore);
    let recovered = [overall, skills, experience, education]
        .iter()
        .any(Option::is_some);

    InlineScores {
        overall_match: overall.unwrap_or(fallback),
        skills_match: skills.unwrap_or(fallback),
        experience_match: experience.unwrap_or(fallback),
        education_match: education.unwrap_or(fallback),
        recovered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleTable {
        RuleTable::compile().unwrap()
    }

    #[test]
    fn test_labelled_figures_are_recovered() {
        let scores = recover_inline_scores(
            &rules(),
            "Overall Match: 82%\n- Skills Match: 90%\n- Experience Match: 60 %",
        );
        assert_eq!(scores.overall_match, 82);
        assert_eq!(scores.skills_match, 90);
        assert_eq!(scores.experience_match, 60);
        assert_eq!(scores.education_match, 65);
        assert!(scores.recovered);
    }

    #[test]
    fn test_number_before_keyword() {
        let scores = recover_inline_scores(&rules(), "Candidate shows a 70% fit for the role.");
        assert_eq!(scores.overall_match, 70);
        assert_eq!(scores.skills_match, 65);
    }

    #[test]
    fn test_positive_text_without_numbers_defaults_high() {
        let scores = recover_inline_scores(&rules(), "We recommend moving forward.");
        assert_eq!(scores.overall_match, 75);
        assert_eq!(scores.education_match, 75);
        assert!(!scores.recovered);
    }

    #[test]
    fn test_neutral_text_defaults_low() {
        let scores = recover_inline_scores(&rules(), "Not a fit.");
        assert_eq!(scores.overall_match, 65);
        assert!(!scores.recovered);
    }

    #[test]
    fn test_values_are_capped() {
        let scores = recover_inline_scores(&rules(), "Skills Match: 140%");
        assert_eq!(scores.skills_match, 100);
    }
}
