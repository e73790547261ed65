//! Requirement comparison: job requirements vs. résumé analysis, weighted
//! into a single 0–100 score.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extraction::skills::SkillCounts;
use crate::extraction::{JobRequirements, ResumeAnalysis};

const SKILL_WEIGHT: f64 = 0.4;
const EDUCATION_WEIGHT: f64 = 0.3;
const EXPERIENCE_WEIGHT: f64 = 0.3;

/// Education component when the level sets do not intersect.
const EDUCATION_SHORTFALL_SCORE: f64 = 0.4;
/// Cap on the experience component while short of the required years.
const EXPERIENCE_PARTIAL_CAP: f64 = 0.8;

pub const QUALIFIED_THRESHOLD: f64 = 65.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub match_percentage: f64,
    /// Required hard skills absent from the résumé, sorted.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationMatch {
    pub sufficient: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub sufficient: bool,
    pub gap_years: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMatch {
    pub score: f64,
    pub qualified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub skill_match: SkillMatch,
    pub education_match: EducationMatch,
    pub experience_match: ExperienceMatch,
    pub overall_match: OverallMatch,
}

fn lowered_keys(skills: &SkillCounts) -> BTreeSet<String> {
    skills.keys().map(|k| k.to_lowercase()).collect()
}

pub fn compare_requirements(job: &JobRequirements, resume: &ResumeAnalysis) -> ComparisonResult {
    // Skills
    let required = lowered_keys(&job.skills.hard_skills);
    let candidate = lowered_keys(&resume.skills.hard_skills);

    let match_percentage = if required.is_empty() {
        100.0
    } else {
        required.intersection(&candidate).count() as f64 / required.len() as f64 * 100.0
    };
    let missing: Vec<String> = required.difference(&candidate).cloned().collect();

    // Education
    let education_sufficient = job
        .education
        .levels
        .iter()
        .any(|level| resume.education.levels.contains(level));

    // Experience
    let required_years = job.experience.years;
    let actual_years = resume.experience.years;
    let experience_sufficient = actual_years >= required_years;
    let gap_years = required_years.saturating_sub(actual_years);

    let skill_score = match_percentage / 100.0;
    let education_score = if education_sufficient {
        1.0
    } else {
        EDUCATION_SHORTFALL_SCORE
    };
    let experience_score = if experience_sufficient {
        1.0
    } else if required_years > 0 {
        (f64::from(actual_years) / f64::from(required_years)).min(EXPERIENCE_PARTIAL_CAP)
    } else {
        1.0
    };

    let score = (skill_score * SKILL_WEIGHT
        + education_score * EDUCATION_WEIGHT
        + experience_score * EXPERIENCE_WEIGHT)
        * 100.0;

    ComparisonResult {
        skill_match: SkillMatch {
            match_percentage,
            missing,
        },
        education_match: EducationMatch {
            sufficient: education_sufficient,
        },
        experience_match: ExperienceMatch {
            sufficient: experience_sufficient,
            gap_years,
        },
        overall_match: OverallMatch {
            score,
            qualified: score >= QUALIFIED_THRESHOLD,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::education::EducationLevel;
    use crate::extraction::Extractor;

    fn make_job(skills: &[&str], levels: Vec<EducationLevel>, years: u32) -> JobRequirements {
        let mut job = JobRequirements::default();
        for s in skills {
            job.skills.hard_skills.insert(s.to_string(), 1);
        }
        job.education.levels = levels;
        job.experience.years = years;
        job
    }

    fn make_resume(skills: &[&str], levels: Vec<EducationLevel>, years: u32) -> ResumeAnalysis {
        let mut resume = ResumeAnalysis::default();
        for s in skills {
            resume.skills.hard_skills.insert(s.to_string(), 1);
        }
        resume.education.levels = levels;
        resume.experience.years = years;
        resume
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_required_skills_is_full_match() {
        let result = compare_requirements(
            &make_job(&[], vec![], 0),
            &make_resume(&["rust"], vec![], 0),
        );
        assert!(approx(result.skill_match.match_percentage, 100.0));
        assert!(result.skill_match.missing.is_empty());
    }

    #[test]
    fn test_zero_required_years_is_sufficient() {
        let result = compare_requirements(&make_job(&[], vec![], 0), &make_resume(&[], vec![], 0));
        assert!(result.experience_match.sufficient);
        assert_eq!(result.experience_match.gap_years, 0);
    }

    #[test]
    fn test_weighted_score_for_partial_match() {
        let job = make_job(&["python", "docker"], vec![EducationLevel::Masters], 5);
        let resume = make_resume(&["python"], vec![EducationLevel::Bachelors], 0);
        let result = compare_requirements(&job, &resume);

        assert!(approx(result.skill_match.match_percentage, 50.0));
        assert_eq!(result.skill_match.missing, vec!["docker"]);
        assert!(!result.education_match.sufficient);
        assert!(!result.experience_match.sufficient);
        assert_eq!(result.experience_match.gap_years, 5);
        // 0.5*0.4 + 0.4*0.3 + 0.0*0.3
        assert!(approx(result.overall_match.score, 32.0));
        assert!(!result.overall_match.qualified);
    }

    #[test]
    fn test_experience_shortfall_is_capped() {
        let job = make_job(&[], vec![], 10);
        let nearly = compare_requirements(&job, &make_resume(&[], vec![], 9));
        // 1.0*0.4 + 0.4*0.3 + 0.8*0.3
        assert!(approx(nearly.overall_match.score, 76.0));

        let half = compare_requirements(&job, &make_resume(&[], vec![], 5));
        // 1.0*0.4 + 0.4*0.3 + 0.5*0.3
        assert!(approx(half.overall_match.score, 67.0));
        assert!(half.overall_match.qualified);
    }

    #[test]
    fn test_missing_skills_are_sorted_and_case_folded() {
        let job = make_job(&["Kubernetes", "aws", "Docker"], vec![], 0);
        let result = compare_requirements(&job, &make_resume(&["docker"], vec![], 0));
        assert_eq!(result.skill_match.missing, vec!["aws", "kubernetes"]);
    }

    #[test]
    fn test_education_uses_level_set_intersection() {
        let job = make_job(&[], vec![EducationLevel::Bachelors], 0);
        let resume = make_resume(&[], vec![EducationLevel::Masters, EducationLevel::Bachelors], 0);
        assert!(compare_requirements(&job, &resume).education_match.sufficient);

        // A higher level alone does not satisfy a lower requirement.
        let resume = make_resume(&[], vec![EducationLevel::PhD], 0);
        assert!(!compare_requirements(&job, &resume).education_match.sufficient);
    }

    #[test]
    fn test_score_bounds_and_threshold() {
        let levels = [
            vec![],
            vec![EducationLevel::Bachelors],
            vec![EducationLevel::PhD, EducationLevel::Masters],
        ];
        let skill_sets: [&[&str]; 3] = [&[], &["python"], &["python", "sql", "git"]];
        for job_skills in skill_sets {
            for resume_skills in skill_sets {
                for job_levels in &levels {
                    for resume_levels in &levels {
                        for (required, actual) in [(0, 0), (3, 1), (5, 5), (2, 10)] {
                            let result = compare_requirements(
                                &make_job(job_skills, job_levels.clone(), required),
                                &make_resume(resume_skills, resume_levels.clone(), actual),
                            );
                            let score = result.overall_match.score;
                            assert!((0.0..=100.0).contains(&score), "score {score}");
                            assert_eq!(result.overall_match.qualified, score >= 65.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_synthetic_resume_with_exact_requirements_qualifies() {
        let extractor = Extractor::new().unwrap();
        let job = extractor.analyze_job_requirements(
            "Requirements: Python, Docker and SQL. Bachelor's degree required. \
             5 years of experience.",
        );
        let resume = extractor.perform_resume_analysis(
            "Backend developer skilled with Python, Docker and SQL. \
             Bachelor's degree in Computer Science. 5 years of experience.",
        );
        let result = compare_requirements(&job, &resume);

        assert!(approx(result.skill_match.match_percentage, 100.0));
        assert!(result.education_match.sufficient);
        assert!(result.experience_match.sufficient);
        assert!(approx(result.overall_match.score, 100.0));
        assert!(result.overall_match.qualified);
    }

    #[test]
    fn test_job_without_signals_gives_default_comparison() {
        let extractor = Extractor::new().unwrap();
        let job = extractor.analyze_job_requirements("Join our friendly team!");
        let resume = extractor.perform_resume_analysis("Jane Doe\nRust engineer.");
        let result = compare_requirements(&job, &resume);

        assert!(approx(result.skill_match.match_percentage, 100.0));
        assert!(!result.education_match.sufficient);
        assert!(result.experience_match.sufficient);
        // 1.0*0.4 + 0.4*0.3 + 1.0*0.3
        assert!(approx(result.overall_match.score, 82.0));
    }
}
