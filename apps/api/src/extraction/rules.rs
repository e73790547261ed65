//! Rule tables: every pattern the extractors use, grouped by category.
//!
//! Each category is an ordered list of `(pattern, class)` rules. Extractors
//! never hold their own regexes: they ask the table for a category and act on
//! the class of each match. The table is compiled once at startup and shared
//! read-only through `AppState`.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid {category:?} rule '{pattern}': {source}")]
    InvalidPattern {
        category: Category,
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Groups of rules evaluated together by one extractor pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Skills,
    Education,
    EducationFallback,
    DegreeLevels,
    ExperienceYears,
    ExperienceDates,
    ExperiencePositions,
    JobTitles,
    Contact,
    Certifications,
    Projects,
    Languages,
    Achievements,
    Summary,
    Requirements,
    Entities,
    InlineScores,
    PromptTemplate,
}

/// What a rule match means to the extractor consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleClass {
    HardSkill,
    SoftSkill,
    Degree,
    School,
    Year,
    Gpa,
    Credential,
    University,
    DegreeSpan,
    PhD,
    Masters,
    Bachelors,
    AssociateDiploma,
    YearsMention,
    DateRange,
    MonthYear,
    Position,
    JobTitle,
    Email,
    Phone,
    Website,
    Certification,
    Project,
    Language,
    Achievement,
    Summary,
    Requirement,
    Person,
    Location,
    OverallScore,
    SkillsScore,
    ExperienceScore,
    EducationScore,
    Placeholder,
}

use Category as C;
use RuleClass as R;

/// Source table. Order within a category is significant.
const RULE_SOURCES: &[(Category, RuleClass, &str)] = &[
    // Hard skills: languages/tools, ML/cloud/process, web/infra.
    (C::Skills, R::HardSkill, r"(?i)\b(?:Python|Java|JavaScript|React|Node\.js|SQL|AWS|Azure|Docker|Kubernetes|Git|REST|API)\b"),
    (C::Skills, R::HardSkill, r"(?i)\b(c\+\+|c#)(?:[^\w+#]|$)"),
    (C::Skills, R::HardSkill, r"(?i)\b(?:Machine Learning|AI|Deep Learning|Data Science|Cloud Computing|DevOps|Full Stack|Backend|Frontend)\b"),
    (C::Skills, R::HardSkill, r"(?i)\b(?:HTML5?|CSS3?|MongoDB|MySQL|PostgreSQL|Redis|GraphQL|Jenkins|Linux|Unix|Agile|Scrum)\b"),
    // Soft skills.
    (C::Skills, R::SoftSkill, r"(?i)\b(?:Communication|Leadership|Management|Problem[\s-]Solving|Team[\s-]Work|Collaboration)\b"),
    (C::Skills, R::SoftSkill, r"(?i)\b(?:Critical[\s-]Thinking|Time[\s-]Management|Project[\s-]Management|Decision[\s-]Making)\b"),
    (C::Skills, R::SoftSkill, r"(?i)\b(?:Adaptability|Flexibility|Creativity|Innovation|Analysis|Planning|Organization)\b"),
    // Sentence-level education details.
    (C::Education, R::Degree, r"(?i)\b(?:bachelor|master|phd|doctorate|associate)(?:'s)?(?:\s+(?:of|in|degree))*\s+([^.]+)"),
    (C::Education, R::Degree, r"(?i)\b(?:b\.?s\.?|b\.?a\.?|m\.?s\.?|m\.?a\.?|ph\.?d\.?|m\.?b\.?a\.?)\s+(?:in|of)?\s*([^.]+)"),
    (C::Education, R::Degree, r"(?i)\b(?:bachelor|master|doctorate|graduate)(?:'s)?\s+degree\s+(?:in|of)?\s*([^.]+)"),
    (C::Education, R::School, r"(?i)\b(?:university|college|institute|school)\s+of\s+([^.]+)"),
    (C::Education, R::School, r"(?i)\bgraduated\s+from\s+([^.]+)"),
    (C::Education, R::School, r"(?i)\bstudied\s+(?:at|in)\s+([^.]+)"),
    (C::Education, R::Year, r"(?i)\b(?:19|20)\d{2}(?:\s*-\s*(?:19|20)\d{2}|\s*-\s*present|\s*-\s*current)?\b"),
    (C::Education, R::Gpa, r"(?i)\bgpa\s*(?:of)?\s*:?\s*([0-4]\.\d{1,2})"),
    (C::Education, R::Credential, r"(?i)\bcertification\s+in\s+([^.]+)"),
    (C::Education, R::Credential, r"(?i)\bcertified\s+([^.]+)"),
    // Positional fallback when no sentence carried details.
    (C::EducationFallback, R::University, r"(?i)\b(?:University|College|Institute|School)[^,\n]*"),
    (C::EducationFallback, R::DegreeSpan, r"(?i)\b(?:B\.S\.|M\.S\.|B\.A\.|M\.A\.|Ph\.?D\.?|Bachelor|Master|Doctorate|(?:MBA|BS|BA|MS|MA)\b)[^,\n]*"),
    (C::EducationFallback, R::Year, r"\b(?:19|20)\d{2}\b"),
    // Degree levels, tested against the whole lower-cased text.
    (C::DegreeLevels, R::PhD, r"\b(?:phd|doctorate|doctoral)\b"),
    (C::DegreeLevels, R::Masters, r"\b(?:master|ms|ma|msc|mtech|mba)\b"),
    (C::DegreeLevels, R::Bachelors, r"\b(?:bachelor|bs|ba|bsc|btech|undergraduate)\b"),
    (C::DegreeLevels, R::AssociateDiploma, r"\b(?:diploma|associate|certification)\b"),
    // Experience.
    (C::ExperienceYears, R::YearsMention, r"(\d+)\+?\s*(?:year|yr)s?(?:\sof)?(?:\sexperience)?"),
    (C::ExperienceYears, R::YearsMention, r"experience\s*(?:of|with|for)?\s*(\d+)\+?\s*(?:year|yr)s?"),
    (C::ExperienceYears, R::YearsMention, r"(?:over|more\sthan)\s*(\d+)\s*(?:year|yr)s?(?:\sof)?(?:\sexperience)?"),
    (C::ExperienceDates, R::DateRange, r"(?i)\b((?:19|20)\d{2})\s*[-–]\s*(present|current|(?:19|20)\d{2})\b"),
    (C::ExperienceDates, R::MonthYear, r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*[\s,]+(?:19|20)\d{2}\b"),
    (C::ExperiencePositions, R::Position, r"(?i)\b(?:position|title|role)(?:\s*:\s*|\s+as\s+)([^.]+)"),
    (C::ExperiencePositions, R::Position, r"(?i)\b(?:worked|serving|acted)\s+as\s+([^.]+)"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:senior|junior|lead|principal|staff|chief|head|director|manager)[ \t]+[a-z \t]+(?:engineer|developer|architect|analyst|consultant)\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b[a-z][a-z \t]*(?:engineer|developer|architect|analyst|consultant)\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:project|product|program)\s+manager\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:team|technical|technology)\s+lead(?:er)?\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:software|systems|solutions|data|cloud|security)\s+(?:engineer|architect|developer|analyst)\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:full[\s-]stack|frontend|backend|devops)\s+(?:engineer|developer)\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:c\+\+|c#|java|python|javascript|ruby|php)\s+(?:engineer|developer)\b"),
    (C::JobTitles, R::JobTitle, r"(?i)\b(?:web|mobile|ui|ux)\s+(?:designer|developer)\b"),
    // Contact details.
    (C::Contact, R::Email, r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
    (C::Contact, R::Phone, r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"),
    (C::Contact, R::Phone, r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b"),
    (C::Contact, R::Website, r"(?i)(?:https?://|www\.)[^\s,;]+|\b(?:linkedin\.com|github\.com)/[^\s,;]+"),
    // Certifications.
    (C::Certifications, R::Certification, r"(?i)\b(?:certification|certificate|certified|cert)(?:\sin|\sas|\s-|\s–|\s—|\s:|:)?\s+([^,.\n]+)"),
    (C::Certifications, R::Certification, r"(?i)\b(?:AWS|Microsoft|Google|CompTIA|Cisco|Oracle|PMI|ITIL|PMP|CISSP|CISA|CEH|CCNA|MCSA|MCSE|MCTS|AZ-|AI-|DP-|SC-)\s*[-:]?\s*\d*\s*[A-Za-z0-9\s]+"),
    (C::Certifications, R::Certification, r"(?i)\b(?:AWS|Azure|GCP)\s+Certified\s+[A-Za-z\s]+"),
    // Projects.
    (C::Projects, R::Project, r"(?i)\b(?:project|developed|implemented|created|built|designed):?\s+([^.]+)"),
    (C::Projects, R::Project, r"(?i)\b(?:project|developed|implemented|created|built|designed)\s+[a-z]*\s+([^.]+)"),
    (C::Projects, R::Project, r"(?i)\bproject\s+title:?\s+([^.]+)"),
    // Spoken languages.
    (C::Languages, R::Language, r"(?i)\b(?:language|languages|fluent in|proficient in):?\s+([^.]+)"),
    (C::Languages, R::Language, r"(?i)\b(?:English|Spanish|French|German|Chinese|Japanese|Italian|Russian|Arabic|Portuguese|Hindi)\b(?:\s+(?:native|fluent|proficient|advanced|intermediate|beginner))?"),
    // Achievements.
    (C::Achievements, R::Achievement, r"(?i)\b(?:achievement|accomplishment|award|honor|recognition|won|received|granted|earned):?\s+([^.]+)"),
    (C::Achievements, R::Achievement, r"(?i)\b(?:recipient of|awarded)\s+([^.]+)"),
    // Professional summary.
    (C::Summary, R::Summary, r"(?i)\b(?:summary|profile|objective|about me|professional summary)(?:\s*:\s*|\s*\n\s*)([^.]*(?:\.[^.]*){0,3})"),
    (C::Summary, R::Summary, r"(?i)\b(?:experienced|skilled|professional|dedicated|results-driven|motivated|detail-oriented)[^.]*(?:\.[^.]*){0,3}"),
    // Requirement lines in a job posting.
    (C::Requirements, R::Requirement, r"(?m)^[ \t]*[-•*][ \t]*([^•\n]+)"),
    (C::Requirements, R::Requirement, r"(?i)\brequired:[ \t]*([^•\n]+)"),
    (C::Requirements, R::Requirement, r"(?i)\brequirements:[ \t]*([^•\n]+)"),
    // Entity heuristics.
    (C::Entities, R::Person, r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,2}\b"),
    (C::Entities, R::Location, r"\b[A-Z][a-z]+(?:[ \t][A-Z][a-z]+)?,[ \t]*(?:[A-Z]{2}|USA|United States|Canada|UK|United Kingdom|India|Germany|France|Philippines|Australia|Singapore|Japan|China|Brazil|Mexico|Spain|Italy|Netherlands|Ireland)\b"),
    // Percentages quoted inline in narrative prose (applied to lower-cased text).
    (C::InlineScores, R::OverallScore, r"(?:overall|total)\s+(?:match|fit|compatibility)(?:\s+score)?\s*:?\s*(\d+)\s*%"),
    (C::InlineScores, R::OverallScore, r"(\d+)%?\s*(?:match|fit|compatibility)"),
    (C::InlineScores, R::SkillsScore, r"skills?\s+match(?:\s+rate)?\s*:?\s*(\d+)\s*%"),
    (C::InlineScores, R::ExperienceScore, r"experience\s+match\s*:?\s*(\d+)\s*%"),
    (C::InlineScores, R::EducationScore, r"education\s+match\s*:?\s*(\d+)\s*%"),
    // `{name}` placeholders in prompt templates.
    (C::PromptTemplate, R::Placeholder, r"\{(\w+)\}"),
];

/// A compiled rule: the pattern and what a hit means.
#[derive(Debug)]
pub struct Rule {
    pub class: RuleClass,
    pub pattern: Regex,
}

/// One hit of one rule against a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    pub class: RuleClass,
    /// The whole matched span.
    pub full: &'t str,
    /// The first capture group when the rule has one, else the whole span.
    pub value: &'t str,
}

/// All rule categories, compiled.
#[derive(Debug)]
pub struct RuleTable {
    rules: HashMap<Category, Vec<Rule>>,
}

impl RuleTable {
    /// Compiles the built-in rule sources.
    pub fn compile() -> Result<Self, RuleError> {
        let mut rules: HashMap<Category, Vec<Rule>> = HashMap::new();
        for &(category, class, pattern) in RULE_SOURCES {
            let compiled = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
                category,
                pattern,
                source,
            })?;
            rules.entry(category).or_default().push(Rule {
                class,
                pattern: compiled,
            });
        }
        Ok(Self { rules })
    }

    pub fn rules(&self, category: Category) -> &[Rule] {
        self.rules.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Runs every rule of `category` over `text`, in table order, yielding all
    /// non-overlapping hits of each rule in turn.
    pub fn scan<'t>(&self, category: Category, text: &'t str) -> Vec<RuleMatch<'t>> {
        let mut hits = Vec::new();
        for rule in self.rules(category) {
            for caps in rule.pattern.captures_iter(text) {
                let Some(full) = caps.get(0) else { continue };
                let value = caps.get(1).unwrap_or(full);
                hits.push(RuleMatch {
                    class: rule.class,
                    full: full.as_str(),
                    value: value.as_str(),
                });
            }
        }
        hits
    }

    /// First hit of the given class in `category`, following table order.
    pub fn first<'t>(
        &self,
        category: Category,
        class: RuleClass,
        text: &'t str,
    ) -> Option<RuleMatch<'t>> {
        self.rules(category)
            .iter()
            .filter(|rule| rule.class == class)
            .find_map(|rule| {
                rule.pattern.captures(text).and_then(|caps| {
                    let full = caps.get(0)?;
                    let value = caps.get(1).unwrap_or(full);
                    Some(RuleMatch {
                        class,
                        full: full.as_str(),
                        value: value.as_str(),
                    })
                })
            })
    }

    /// Whether any rule of the given class in `category` matches `text`.
    pub fn is_match(&self, category: Category, class: RuleClass, text: &str) -> bool {
        self.rules(category)
            .iter()
            .any(|rule| rule.class == class && rule.pattern.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::compile().unwrap()
    }

    #[test]
    fn test_all_rule_sources_compile() {
        let table = table();
        assert!(!table.rules(Category::Skills).is_empty());
        assert!(!table.rules(Category::Requirements).is_empty());
    }

    #[test]
    fn test_scan_returns_capture_group_as_value() {
        let table = table();
        let hits = table.scan(Category::ExperienceYears, "5+ years of experience");
        assert_eq!(hits[0].value, "5");
        assert!(hits[0].full.starts_with("5+ years"));
    }

    #[test]
    fn test_scan_without_group_returns_full_span() {
        let table = table();
        let hits = table.scan(Category::Skills, "Python and Docker");
        let values: Vec<&str> = hits.iter().map(|h| h.value).collect();
        assert_eq!(values, vec!["Python", "Docker"]);
        assert!(hits.iter().all(|h| h.class == RuleClass::HardSkill));
    }

    #[test]
    fn test_cpp_matches_despite_trailing_symbols() {
        let table = table();
        let hits = table.scan(Category::Skills, "Fluent in C++ and C#.");
        let values: Vec<String> = hits.iter().map(|h| h.value.to_lowercase()).collect();
        assert!(values.contains(&"c++".to_string()));
        assert!(values.contains(&"c#".to_string()));
    }

    #[test]
    fn test_java_does_not_match_inside_javascript() {
        let table = table();
        let hits = table.scan(Category::Skills, "JavaScript");
        let values: Vec<&str> = hits.iter().map(|h| h.value).collect();
        assert_eq!(values, vec!["JavaScript"]);
    }

    #[test]
    fn test_first_respects_class_filter() {
        let table = table();
        let hit = table
            .first(Category::Contact, RuleClass::Email, "mail me: jane@doe.io now")
            .unwrap();
        assert_eq!(hit.full, "jane@doe.io");
        assert!(table
            .first(Category::Contact, RuleClass::Email, "no address here")
            .is_none());
    }

    #[test]
    fn test_degree_levels_are_whole_word() {
        let table = table();
        assert!(table.is_match(Category::DegreeLevels, RuleClass::Masters, "mba, 2019"));
        assert!(!table.is_match(Category::DegreeLevels, RuleClass::Masters, "management"));
    }
}
