//! HR narrative generation: prompt, completion, strict section parsing and
//! inline score recovery.
//!
//! `AppState` holds an `Arc<dyn Narrator>`. The default `LlmNarrator` goes
//! through the shared `LlmClient`; tests swap in a canned narrator.

pub mod metrics;
pub mod prompts;
pub mod sections;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::education::EducationLevel;
use crate::extraction::profile::PersonalInfo;
use crate::extraction::rules::RuleTable;
use crate::extraction::ResumeAnalysis;
use crate::llm_client::{CompletionParams, LlmClient, LlmError};
use crate::matching::ComparisonResult;

use metrics::{recover_inline_scores, InlineScores};
use prompts::build_hr_prompt;
use sections::{parse_sections, NarrativeSections};

const NARRATIVE_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.7,
    max_tokens: 1500,
};

pub const FAILURE_MESSAGE: &str = "AI analysis failed. Please try again later.";

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Narrative is missing section '{header}'")]
    MissingSection { header: &'static str },

    #[error("Narrative section '{header}' is out of order")]
    OutOfOrder { header: &'static str },
}

// ────────────────────────────────────────────────────────────────────────────
// Narrator trait
// ────────────────────────────────────────────────────────────────────────────

/// Raw completion as returned by the narrative backend.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub finish_reason: Option<String>,
    /// Unix seconds; 0 when the backend does not report it.
    pub created: i64,
    pub model: String,
}

#[async_trait]
pub trait Narrator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, NarrativeError>;
}

pub struct LlmNarrator {
    llm: LlmClient,
}

impl LlmNarrator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Narrator for LlmNarrator {
    async fn complete(&self, prompt: &str) -> Result<Completion, NarrativeError> {
        let response = self.llm.call(prompt, NARRATIVE_PARAMS).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?.to_string();

        Ok(Completion {
            text,
            finish_reason: response.finish_reason().map(String::from),
            created: response.created,
            model: if response.model.is_empty() {
                self.llm.model().to_string()
            } else {
                response.model.clone()
            },
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PresentSkills {
    pub hard: Vec<String>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillsAssessment {
    pub present_skills: PresentSkills,
    pub missing_skills: Vec<String>,
    pub match_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationAssessment {
    pub levels: Vec<EducationLevel>,
    pub meets_requirements: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceAssessment {
    pub years: u32,
    pub recent_positions: Vec<String>,
    pub meets_requirements: bool,
}

/// Condensed view of the candidate sent to the model and echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub personal_info: PersonalInfo,
    pub skills_assessment: SkillsAssessment,
    pub education: EducationAssessment,
    pub experience: ExperienceAssessment,
}

impl CandidateProfile {
    pub fn from_analysis(resume: &ResumeAnalysis, comparison: &ComparisonResult) -> Self {
        Self {
            personal_info: resume.personal_info.clone(),
            skills_assessment: SkillsAssessment {
                present_skills: PresentSkills {
                    hard: resume.skills.hard_skills.keys().cloned().collect(),
                    soft: resume.skills.soft_skills.keys().cloned().collect(),
                },
                missing_skills: comparison.skill_match.missing.clone(),
                match_rate: comparison.skill_match.match_percentage,
            },
            education: EducationAssessment {
                levels: resume.education.levels.clone(),
                meets_requirements: comparison.education_match.sufficient,
            },
            experience: ExperienceAssessment {
                years: resume.experience.years,
                recent_positions: resume.experience.positions.iter().take(2).cloned().collect(),
                meets_requirements: comparison.experience_match.sufficient,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeReport {
    pub sections: NarrativeSections,
    pub candidate_profile: CandidateProfile,
    /// True when the model finished on its own ("stop").
    pub confidence_score: bool,
    pub analysis_timestamp: i64,
    pub model_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeFailure {
    pub error: String,
    pub hr_analysis: &'static str,
    pub confidence_score: u8,
}

/// Either a full narrative or the failure payload; serialized without a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AiAnalysis {
    Completed(Box<NarrativeReport>),
    Failed(NarrativeFailure),
}

impl AiAnalysis {
    fn failed(err: &NarrativeError) -> Self {
        AiAnalysis::Failed(NarrativeFailure {
            error: err.to_string(),
            hr_analysis: FAILURE_MESSAGE,
            confidence_score: 0,
        })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AiAnalysis::Completed(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeOutcome {
    pub ai_analysis: AiAnalysis,
    /// Absent when the narrative failed.
    pub inline_scores: Option<InlineScores>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Runs the narrative step. Never fails: backend or parse errors become the
/// failure payload so extraction and comparison results still reach the caller.
pub async fn generate_narrative(
    narrator: &dyn Narrator,
    rules: &RuleTable,
    job_text: &str,
    resume: &ResumeAnalysis,
    comparison: &ComparisonResult,
) -> NarrativeOutcome {
    let candidate_profile = CandidateProfile::from_analysis(resume, comparison);
    let prompt = build_hr_prompt(
        rules,
        job_text,
        &candidate_profile,
        comparison.overall_match.score,
    );

    match narrate(narrator, &prompt, candidate_profile).await {
        Ok((report, raw_text)) => {
            info!(
                model = %report.model_version,
                complete = report.confidence_score,
                "HR narrative generated"
            );
            NarrativeOutcome {
                ai_analysis: AiAnalysis::Completed(Box::new(report)),
                inline_scores: Some(recover_inline_scores(rules, &raw_text)),
            }
        }
        Err(err) => {
            warn!("HR narrative failed: {err}");
            NarrativeOutcome {
                ai_analysis: AiAnalysis::failed(&err),
                inline_scores: None,
            }
        }
    }
}

async fn narrate(
    narrator: &dyn Narrator,
    prompt: &str,
    candidate_profile: CandidateProfile,
) -> Result<(NarrativeReport, String), NarrativeError> {
    let completion = narrator.complete(prompt).await?;
    let sections = parse_sections(&completion.text)?;

    let analysis_timestamp = if completion.created > 0 {
        completion.created
    } else {
        chrono::Utc::now().timestamp()
    };

    let report = NarrativeReport {
        sections,
        candidate_profile,
        confidence_score: completion.finish_reason.as_deref() == Some("stop"),
        analysis_timestamp,
        model_version: completion.model,
    };
    Ok((report, completion.text))
}
