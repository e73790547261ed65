//! Personal details and the free-form résumé sections: certifications,
//! projects, spoken languages, achievements and the professional summary.

use serde::{Deserialize, Serialize};

use crate::extraction::rules::{Category, RuleClass, RuleTable};
use crate::extraction::text::{dedup_in_order, entities, split_sentences, EntityLabel};

/// Characters from the top of the résumé searched for name and location.
const HEADER_CHARS: usize = 500;
/// Characters from the top of the résumé searched for a summary section.
const SUMMARY_CHARS: usize = 1000;

const MAX_CERTIFICATIONS: usize = 10;
const MAX_PROJECTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
}

/// Leading slice of at most `max_chars` characters.
fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn extract_personal_info(rules: &RuleTable, text: &str) -> PersonalInfo {
    let contact = |class: RuleClass| {
        rules
            .first(Category::Contact, class, text)
            .map(|hit| hit.full.trim().to_string())
    };

    let header_entities = entities(rules, head(text, HEADER_CHARS));
    let first_of = |label: EntityLabel| {
        header_entities
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.text.clone())
    };

    PersonalInfo {
        name: first_of(EntityLabel::Person),
        email: contact(RuleClass::Email),
        phone: contact(RuleClass::Phone),
        location: first_of(EntityLabel::Location),
        website: contact(RuleClass::Website),
    }
}

/// Trimmed captures of every rule in `category` over each sentence, keeping
/// those longer than `min_len` characters.
fn sentence_values<'s>(
    rules: &RuleTable,
    category: Category,
    sentences: impl Iterator<Item = &'s String>,
    min_len: usize,
) -> Vec<String> {
    sentences
        .flat_map(|sentence| rules.scan(category, sentence))
        .map(|hit| hit.value.trim().to_string())
        .filter(|value| char_len(value) > min_len)
        .collect()
}

pub fn extract_certifications(rules: &RuleTable, text: &str) -> Vec<String> {
    let sentences = split_sentences(text);
    let mut certifications = dedup_in_order(sentence_values(
        rules,
        Category::Certifications,
        sentences.iter(),
        3,
    ));
    certifications.truncate(MAX_CERTIFICATIONS);
    certifications
}

/// Projects come only from sentences that mention "project".
pub fn extract_projects(rules: &RuleTable, text: &str) -> Vec<Project> {
    let mut projects: Vec<Project> = Vec::new();

    for sentence in split_sentences(text) {
        if !sentence.to_lowercase().contains("project") {
            continue;
        }
        for hit in rules.scan(Category::Projects, &sentence) {
            let name = hit.value.trim();
            if char_len(name) <= 5 || projects.iter().any(|p| p.name == name) {
                continue;
            }
            projects.push(Project {
                name: name.to_string(),
                description: sentence.clone(),
            });
        }
        if projects.len() >= MAX_PROJECTS {
            break;
        }
    }

    projects.truncate(MAX_PROJECTS);
    projects
}

pub fn extract_languages(rules: &RuleTable, text: &str) -> Vec<String> {
    let sentences = split_sentences(text);
    let relevant = sentences.iter().filter(|s| {
        s.to_lowercase().contains("language")
            || ["English", "Spanish", "French", "German"]
                .iter()
                .any(|lang| s.contains(lang))
    });
    dedup_in_order(sentence_values(rules, Category::Languages, relevant, 2))
}

pub fn extract_achievements(rules: &RuleTable, text: &str) -> Vec<String> {
    let sentences = split_sentences(text);
    dedup_in_order(sentence_values(
        rules,
        Category::Achievements,
        sentences.iter(),
        3,
    ))
}

/// An explicit summary section among the first five sentences of the
/// résumé's opening, else the first two substantive sentences.
pub fn extract_summary(rules: &RuleTable, text: &str) -> Option<String> {
    let sentences = split_sentences(head(text, SUMMARY_CHARS));

    let explicit = sentences
        .iter()
        .take(5)
        .flat_map(|sentence| rules.scan(Category::Summary, sentence))
        .find(|hit| char_len(hit.value) > 30);
    if let Some(hit) = explicit {
        return Some(hit.value.trim().to_string());
    }

    let substantive: Vec<&str> = sentences
        .iter()
        .filter(|s| char_len(s) > 40)
        .take(2)
        .map(String::as_str)
        .collect();
    if substantive.is_empty() {
        None
    } else {
        Some(substantive.join(" "))
    }
}
