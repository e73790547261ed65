//! Work-experience extraction: explicit year mentions, date ranges and positions.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::extraction::rules::{Category, RuleClass, RuleTable};
use crate::extraction::text::{dedup_in_order, entities, split_sentences, EntityLabel};

/// Words that mark a capitalized run as a job title rather than a name.
const JOB_PREFIXES: &[&str] = &[
    "senior", "junior", "lead", "principal", "staff", "chief", "head", "director", "manager",
    "engineer", "developer", "architect", "analyst", "consultant", "specialist", "coordinator",
    "administrator",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub years: u32,
    pub positions: Vec<String>,
    pub date_ranges: Vec<String>,
}

pub fn extract_experience(rules: &RuleTable, text: &str) -> ExperienceRecord {
    extract_experience_at(rules, text, chrono::Utc::now().year())
}

/// Same as [`extract_experience`] with open ranges ("present", "current")
/// closed at `current_year`.
pub fn extract_experience_at(rules: &RuleTable, text: &str, current_year: i32) -> ExperienceRecord {
    let mut years: Vec<u32> = Vec::new();
    let mut positions: Vec<String> = Vec::new();
    let mut date_ranges: Vec<String> = Vec::new();

    for sentence in split_sentences(text) {
        let lower = sentence.to_lowercase();

        years.extend(
            rules
                .scan(Category::ExperienceYears, &lower)
                .iter()
                .filter_map(|hit| hit.value.parse::<u32>().ok()),
        );

        for hit in rules.scan(Category::ExperienceDates, &sentence) {
            if hit.class == RuleClass::DateRange {
                if let Some(span) = range_span(hit.value, hit.full, current_year) {
                    years.push(span);
                }
            }
            date_ranges.push(hit.full.to_string());
        }

        positions.extend(
            rules
                .scan(Category::ExperiencePositions, &sentence)
                .iter()
                .map(|hit| hit.value.trim().to_string())
                .filter(|p| !p.is_empty()),
        );
    }

    positions.extend(
        entities(rules, text)
            .into_iter()
            .filter(|e| e.label == EntityLabel::Person)
            .filter(|e| {
                let lower = e.text.to_lowercase();
                JOB_PREFIXES.iter().any(|p| lower.contains(p))
            })
            .map(|e| e.text),
    );

    positions.extend(
        rules
            .scan(Category::JobTitles, text)
            .iter()
            .map(|hit| hit.full.trim().to_string()),
    );

    ExperienceRecord {
        years: years.into_iter().max().unwrap_or(0),
        positions: dedup_in_order(positions),
        date_ranges,
    }
}

/// Years covered by one `YYYY - YYYY|present|current` match. Reversed ranges count as 0.
fn range_span(start: &str, full: &str, current_year: i32) -> Option<u32> {
    let start: i32 = start.parse().ok()?;
    let lower = full.to_lowercase();
    let end = if lower.ends_with("present") || lower.ends_with("current") {
        current_year
    } else {
        full.get(full.len().checked_sub(4)?..)?.parse().ok()?
    };
    Some((end - start).max(0) as u32)
}
