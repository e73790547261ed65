//! Résumé and job-posting field extraction.
//!
//! Every extractor is a pure function of `(rules, text)`: no I/O, no clock
//! beyond the current year for open date ranges, and no failure path. An
//! empty record is the "nothing found" signal.

pub mod education;
pub mod experience;
pub mod pdf;
pub mod profile;
pub mod rules;
pub mod skills;
pub mod text;

use serde::{Deserialize, Serialize};
use tracing::debug;

use education::{extract_education, EducationRecord};
use experience::{extract_experience, ExperienceRecord};
use profile::{
    extract_achievements, extract_certifications, extract_languages, extract_personal_info,
    extract_projects, extract_summary, PersonalInfo, Project,
};
use rules::{RuleError, RuleTable};
use skills::{extract_skills, SkillSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    pub skills: SkillSet,
    pub education: EducationRecord,
    pub experience: ExperienceRecord,
    pub certifications: Vec<String>,
    pub projects: Vec<Project>,
    pub languages: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub skills: SkillSet,
    pub education: EducationRecord,
    pub experience: ExperienceRecord,
}

/// Owns the compiled rule tables. Built once at startup, shared via `AppState`.
#[derive(Debug)]
pub struct Extractor {
    rules: RuleTable,
}

impl Extractor {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            rules: RuleTable::compile()?,
        })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn perform_resume_analysis(&self, text: &str) -> ResumeAnalysis {
        let rules = &self.rules;
        let analysis = ResumeAnalysis {
            personal_info: extract_personal_info(rules, text),
            summary: extract_summary(rules, text),
            skills: extract_skills(rules, text),
            education: extract_education(rules, text),
            experience: extract_experience(rules, text),
            certifications: extract_certifications(rules, text),
            projects: extract_projects(rules, text),
            languages: extract_languages(rules, text),
            achievements: extract_achievements(rules, text),
        };

        debug!(
            hard_skills = analysis.skills.hard_skills.len(),
            soft_skills = analysis.skills.soft_skills.len(),
            years = analysis.experience.years,
            "Resume analysed"
        );
        analysis
    }

    /// Skills, education and experience of a job posting. Same extractors as
    /// the résumé side, so both sides share one vocabulary.
    pub fn analyze_job_requirements(&self, text: &str) -> JobRequirements {
        JobRequirements {
            skills: extract_skills(&self.rules, text),
            education: extract_education(&self.rules, text),
            experience: extract_experience(&self.rules, text),
        }
    }
}
