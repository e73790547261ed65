// Prompt for the HR narrative. `{placeholder}` fields are substituted by
// `build_hr_prompt`.

use regex::Captures;

use super::CandidateProfile;
use crate::extraction::rules::{Category, RuleTable};

/// Characters of the job posting quoted in the prompt.
const JOB_EXCERPT_CHARS: usize = 500;

pub const HR_ANALYSIS_PROMPT: &str = "\
Analyze this job application from an HR perspective:

JOB DESCRIPTION:
{job_post}...

CANDIDATE PROFILE:
Personal Information:
- Name: {name}
- Email: {email}
- Location: {location}

Skills Assessment:
- Hard Skills Present: {hard_skills}
- Soft Skills Present: {soft_skills}
- Missing Critical Skills: {missing_skills}
- Skills Match Rate: {match_rate}%

Education:
- Level: {education_levels}
- Requirements Met: {education_met}

Experience:
- Years: {years}
- Recent Positions: {recent_positions}
- Requirements Met: {experience_met}

Overall Match Score: {overall_score}%

Please provide a structured HR analysis with the following sections, using these exact headers:

1. CANDIDATE OVERVIEW
- Summarize the candidate's profile
- Highlight key qualifications
- Note any immediate red flags

2. SKILLS ANALYSIS
- Match between required and present skills
- Critical missing skills and impact
- Skill development potential

3. QUALIFICATION ASSESSMENT
- Education alignment with requirements
- Experience relevance and depth
- Overall qualification status

4. HIRING RECOMMENDATIONS
- Interview focus areas
- Potential role fit
- Compensation considerations
- Risk assessment

5. DEVELOPMENT OPPORTUNITIES
- Training needs
- Growth potential
- Career path alignment

Where you give figures, state them inline as \"Overall Match: N%\", \"Skills Match: N%\", \
\"Experience Match: N%\" and \"Education Match: N%\".
Format each section with clear bullet points and concise, actionable insights for HR use.";

fn or_not_specified(items: &[String]) -> String {
    if items.is_empty() {
        "Not specified".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Fills every placeholder in one pass over the template. Substituted
/// values are never rescanned, so braces inside résumé or job text stay
/// literal. Unknown placeholders are left as written.
pub fn build_hr_prompt(
    rules: &RuleTable,
    job_text: &str,
    profile: &CandidateProfile,
    overall_score: f64,
) -> String {
    let Some(placeholder) = rules.rules(Category::PromptTemplate).first() else {
        return HR_ANALYSIS_PROMPT.to_string();
    };

    let info = &profile.personal_info;
    let skills = &profile.skills_assessment;
    let provided = |v: &Option<String>| v.clone().unwrap_or_else(|| "Not provided".to_string());
    let levels: Vec<String> = profile
        .education
        .levels
        .iter()
        .map(|l| l.label().to_string())
        .collect();

    placeholder
        .pattern
        .replace_all(HR_ANALYSIS_PROMPT, |caps: &Captures| match &caps[1] {
            "job_post" => job_text.chars().take(JOB_EXCERPT_CHARS).collect(),
            "name" => provided(&info.name),
            "email" => provided(&info.email),
            "location" => provided(&info.location),
            "hard_skills" => skills.present_skills.hard.join(", "),
            "soft_skills" => skills.present_skills.soft.join(", "),
            "missing_skills" => skills.missing_skills.join(", "),
            "match_rate" => format!("{:.1}", skills.match_rate),
            "education_levels" => or_not_specified(&levels),
            "education_met" => yes_no(profile.education.meets_requirements).to_string(),
            "years" => profile.experience.years.to_string(),
            "recent_positions" => or_not_specified(&profile.experience.recent_positions),
            "experience_met" => yes_no(profile.experience.meets_requirements).to_string(),
            "overall_score" => format!("{overall_score:.1}"),
            _ => caps[0].to_string(),
        })
        .into_owned()
}
