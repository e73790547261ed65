//! Gap report: shared skills, job requirement lines the résumé never
//! mentions, and plain-language improvement suggestions.

use serde::Serialize;

use crate::extraction::rules::{Category, RuleTable};
use crate::extraction::text::dedup_in_order;
use crate::extraction::{JobRequirements, ResumeAnalysis};

const MAX_MISSING_REQUIREMENTS: usize = 5;
/// Résumés shorter than this many words get a "add more detail" suggestion.
const DETAILED_RESUME_WORDS: usize = 300;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GapReport {
    pub matching_skills: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

impl GapReport {
    pub fn build(
        rules: &RuleTable,
        job_text: &str,
        resume_text: &str,
        job: &JobRequirements,
        resume: &ResumeAnalysis,
    ) -> Self {
        let resume_lower = resume_text.to_lowercase();

        let mut matching_skills: Vec<String> = job
            .skills
            .hard_skills
            .keys()
            .filter(|skill| resume.skills.hard_skills.contains_key(*skill))
            .cloned()
            .collect();
        matching_skills.sort();

        let mut missing_requirements = dedup_in_order(
            rules
                .scan(Category::Requirements, job_text)
                .iter()
                .map(|hit| hit.value.trim().to_string())
                .filter(|req| !req.is_empty() && !resume_lower.contains(&req.to_lowercase()))
                .collect(),
        );
        missing_requirements.truncate(MAX_MISSING_REQUIREMENTS);

        let mut suggested_improvements = Vec::new();
        if !missing_requirements.is_empty() {
            suggested_improvements.push(format!(
                "Add experience or skills in: {}",
                missing_requirements.join(", ")
            ));
        }
        if resume_text.split_whitespace().count() < DETAILED_RESUME_WORDS {
            suggested_improvements
                .push("Add more detailed descriptions of your experience".to_string());
        }
        if !resume_lower.contains("education") {
            suggested_improvements.push("Include your educational background".to_string());
        }

        Self {
            matching_skills,
            missing_requirements,
            suggested_improvements,
        }
    }
}
