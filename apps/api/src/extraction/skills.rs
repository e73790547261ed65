//! Hard/soft skill extraction: rule-table hits plus context-qualified noun chunks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::extraction::rules::{Category, RuleClass, RuleTable};
use crate::extraction::text::{is_stopword, noun_chunks, span_text, tokenize};

/// Tokens on each side of a noun chunk searched for trigger words.
const CONTEXT_WINDOW: usize = 3;

const TRIGGER_WORDS: &[&str] = &["experience", "proficient", "skilled", "expertise", "knowledge"];
const HARD_INDICATORS: &[&str] = &["software", "programming", "technical", "development", "system"];
const SOFT_INDICATORS: &[&str] = &["communication", "management", "leadership", "team"];

/// Lower-cased skill name → occurrence count.
pub type SkillCounts = BTreeMap<String, u32>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    pub hard_skills: SkillCounts,
    pub soft_skills: SkillCounts,
}

impl SkillSet {
    fn bump(&mut self, class: RuleClass, skill: &str) {
        let bucket = match class {
            RuleClass::HardSkill => &mut self.hard_skills,
            RuleClass::SoftSkill => &mut self.soft_skills,
            _ => return,
        };
        *bucket.entry(skill.trim().to_lowercase()).or_insert(0) += 1;
    }

    /// Drops keys of two characters or fewer and stopwords.
    fn prune(&mut self) {
        for bucket in [&mut self.hard_skills, &mut self.soft_skills] {
            bucket.retain(|skill, _| skill.chars().count() > 2 && !is_stopword(skill));
        }
    }
}

pub fn extract_skills(rules: &RuleTable, text: &str) -> SkillSet {
    let mut skills = SkillSet::default();

    for hit in rules.scan(Category::Skills, text) {
        skills.bump(hit.class, hit.value);
    }

    let tokens = tokenize(text);
    for chunk in noun_chunks(text, &tokens) {
        let window_start = chunk.start.saturating_sub(CONTEXT_WINDOW);
        let window_end = (chunk.end + CONTEXT_WINDOW).min(tokens.len());
        let context = span_text(text, &tokens, window_start, window_end).to_lowercase();

        if !TRIGGER_WORDS.iter().any(|w| context.contains(w)) {
            continue;
        }
        if HARD_INDICATORS.iter().any(|w| chunk.text.contains(w)) {
            skills.bump(RuleClass::HardSkill, &chunk.text);
        } else if SOFT_INDICATORS.iter().any(|w| chunk.text.contains(w)) {
            skills.bump(RuleClass::SoftSkill, &chunk.text);
        }
    }

    skills.prune();
    skills
}
