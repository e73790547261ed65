//! Education extraction: sentence-level details, a positional fallback, and
//! degree levels derived from the whole text.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::extraction::rules::{Category, RuleClass, RuleTable};
use crate::extraction::text::split_sentences;

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "degree", "bs", "ba", "ms", "ma", "mba", "bsc",
    "msc", "btech", "mtech", "university", "college", "institute", "school", "academy",
    "certification", "diploma", "graduate", "undergraduate", "major", "minor", "concentration",
    "specialization", "studied", "graduated", "education", "academic",
];

/// Ordinal degree vocabulary. Several levels may be present at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "PhD")]
    PhD,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "Bachelor's")]
    Bachelors,
    #[serde(rename = "Associate/Diploma")]
    AssociateDiploma,
}

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::PhD => "PhD",
            EducationLevel::Masters => "Master's",
            EducationLevel::Bachelors => "Bachelor's",
            EducationLevel::AssociateDiploma => "Associate/Diploma",
        }
    }

    fn from_class(class: RuleClass) -> Option<Self> {
        match class {
            RuleClass::PhD => Some(EducationLevel::PhD),
            RuleClass::Masters => Some(EducationLevel::Masters),
            RuleClass::Bachelors => Some(EducationLevel::Bachelors),
            RuleClass::AssociateDiploma => Some(EducationLevel::AssociateDiploma),
            _ => None,
        }
    }

    /// Level implied by a single degree span found by the positional scan.
    fn from_degree_span(degree: &str) -> Option<Self> {
        let d = format!("{} ", degree.to_lowercase());
        if d.contains("phd") || d.contains("ph.d") || d.contains("doctorate") {
            Some(EducationLevel::PhD)
        } else if ["master", "ms ", "ma ", "m.s", "m.a", "mba"].iter().any(|k| d.contains(k)) {
            Some(EducationLevel::Masters)
        } else if ["bachelor", "bs ", "ba ", "b.s", "b.a"].iter().any(|k| d.contains(k)) {
            Some(EducationLevel::Bachelors)
        } else if d.contains("associate") || d.contains("diploma") {
            Some(EducationLevel::AssociateDiploma)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationDetail {
    pub text: String,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub school: Option<String>,
    pub year: Option<String>,
    pub gpa: Option<String>,
}

impl EducationDetail {
    fn has_content(&self) -> bool {
        self.degree.is_some()
            || self.field.is_some()
            || self.school.is_some()
            || self.year.is_some()
            || self.gpa.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub details: Vec<EducationDetail>,
    pub levels: Vec<EducationLevel>,
}

pub fn extract_education(rules: &RuleTable, text: &str) -> EducationRecord {
    let mut details = sentence_details(rules, text);
    if details.is_empty() {
        details = positional_details(rules, text);
    }

    EducationRecord {
        details,
        levels: degree_levels(rules, text),
    }
}

fn has_education_keyword(sentence_lower: &str) -> bool {
    sentence_lower
        .unicode_words()
        .map(|w| w.trim_end_matches("'s"))
        .any(|w| EDUCATION_KEYWORDS.contains(&w))
}

fn sentence_details(rules: &RuleTable, text: &str) -> Vec<EducationDetail> {
    let mut details = Vec::new();

    for sentence in split_sentences(text) {
        let lower = sentence.to_lowercase();
        if !has_education_keyword(&lower) {
            continue;
        }

        let mut detail = EducationDetail {
            text: sentence.clone(),
            ..Default::default()
        };

        for hit in rules.scan(Category::Education, &lower) {
            let full = hit.full.trim().to_string();
            let value = hit.value.trim().to_string();
            match hit.class {
                RuleClass::Degree => {
                    detail.degree.get_or_insert(full.clone());
                    // "bachelor's degree." leaves only the word "degree" to capture.
                    if value != full && value != "degree" {
                        detail.field.get_or_insert(value);
                    }
                }
                RuleClass::School => {
                    detail.school.get_or_insert(full);
                }
                RuleClass::Year => {
                    detail.year.get_or_insert(full);
                }
                RuleClass::Gpa => {
                    detail.gpa.get_or_insert(value);
                }
                RuleClass::Credential => {
                    detail.field.get_or_insert(value);
                }
                _ => {}
            }
        }

        if detail.has_content() {
            details.push(detail);
        }
    }

    details
}

fn positional_details(rules: &RuleTable, text: &str) -> Vec<EducationDetail> {
    let hits = rules.scan(Category::EducationFallback, text);
    let of_class = |class: RuleClass| -> Vec<&str> {
        hits.iter()
            .filter(|h| h.class == class)
            .map(|h| h.full.trim())
            .collect()
    };
    let universities = of_class(RuleClass::University);
    let degrees = of_class(RuleClass::DegreeSpan);
    let years = of_class(RuleClass::Year);

    universities
        .iter()
        .zip(degrees.iter())
        .enumerate()
        .map(|(i, (school, degree))| EducationDetail {
            text: format!("{degree} from {school}"),
            degree: Some(degree.to_string()),
            field: None,
            school: Some(school.to_string()),
            year: years.get(i).map(|y| y.to_string()),
            gpa: None,
        })
        .collect()
}

fn degree_levels(rules: &RuleTable, text: &str) -> Vec<EducationLevel> {
    let lower = text.to_lowercase();
    let mut levels: Vec<EducationLevel> = rules
        .rules(Category::DegreeLevels)
        .iter()
        .filter(|rule| rule.pattern.is_match(&lower))
        .filter_map(|rule| EducationLevel::from_class(rule.class))
        .collect();

    if levels.is_empty() {
        for hit in rules.scan(Category::EducationFallback, text) {
            if hit.class != RuleClass::DegreeSpan {
                continue;
            }
            if let Some(level) = EducationLevel::from_degree_span(hit.full) {
                if !levels.contains(&level) {
                    levels.push(level);
                }
            }
        }
    }

    levels
}
