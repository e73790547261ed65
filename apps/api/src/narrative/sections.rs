//! Strict parser for the five-section HR narrative.
//!
//! The model is asked for five numbered headers. Each must be present and
//! appear after the previous one; otherwise parsing fails with a typed error
//! and no partial sections are returned.

use serde::Serialize;

use super::NarrativeError;

/// `(header literal, display title)` in required order.
pub const SECTION_HEADERS: [(&str, &str); 5] = [
    ("1. CANDIDATE OVERVIEW", "Candidate Overview"),
    ("2. SKILLS ANALYSIS", "Skills Analysis"),
    ("3. QUALIFICATION ASSESSMENT", "Qualification Assessment"),
    ("4. HIRING RECOMMENDATIONS", "Hiring Recommendations"),
    ("5. DEVELOPMENT OPPORTUNITIES", "Development Opportunities"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeSections {
    pub candidate_overview: Section,
    pub skills_analysis: Section,
    pub qualification_assessment: Section,
    pub hiring_recommendations: Section,
    pub development_opportunities: Section,
}

/// Strips whitespace and markdown emphasis left around a header.
fn clean(content: &str) -> String {
    content
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '#' | ':'))
        .to_string()
}

pub fn parse_sections(text: &str) -> Result<NarrativeSections, NarrativeError> {
    // Byte offsets where each header starts.
    let mut starts = [0usize; 5];
    let mut cursor = 0;

    for (i, &(header, _)) in SECTION_HEADERS.iter().enumerate() {
        match text[cursor..].find(header) {
            Some(offset) => {
                starts[i] = cursor + offset;
                cursor = starts[i] + header.len();
            }
            None if text.contains(header) => return Err(NarrativeError::OutOfOrder { header }),
            None => return Err(NarrativeError::MissingSection { header }),
        }
    }

    let section = |i: usize| {
        let (header, title) = SECTION_HEADERS[i];
        let body_start = starts[i] + header.len();
        let body_end = starts.get(i + 1).copied().unwrap_or(text.len());
        Section {
            title: title.to_string(),
            content: clean(&text[body_start..body_end]),
        }
    };

    Ok(NarrativeSections {
        candidate_overview: section(0),
        skills_analysis: section(1),
        qualification_assessment: section(2),
        hiring_recommendations: section(3),
        development_opportunities: section(4),
    })
}
