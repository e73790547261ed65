//! Text primitives shared by every extractor: sentence splitting, word tokens,
//! stopwords, noun-phrase chunks and a small heuristic entity tagger.

use std::collections::HashSet;
use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::extraction::rules::{Category, RuleClass, RuleTable};

/// English stopwords. Skill keys and noun chunks never consist of these.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Capitalized words that head résumé sections or name organisations; a
/// capitalized run containing one is never tagged as a person.
const NON_PERSON_WORDS: &[&str] = &[
    "experience", "education", "skills", "summary", "profile", "objective", "projects",
    "certifications", "languages", "achievements", "awards", "references", "contact",
    "university", "college", "institute", "school", "academy", "inc", "llc", "ltd", "corp",
    "company", "technologies", "solutions", "bachelor", "master", "degree", "science", "arts",
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "present", "current", "resume", "curriculum", "vitae",
];

/// Words that stop a noun chunk even though they are not stopwords.
const CHUNK_BREAKERS: &[&str] = &[
    "years", "year", "yrs", "using", "including", "like", "also", "within", "across", "via",
];

/// A word token with its byte range in the analysed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    pub span: Range<usize>,
}

/// A contiguous run of tokens, referenced by token index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Splits text into sentences with Unicode sentence boundaries, falling back to
/// [`simple_sentence_split`] when segmentation yields nothing for non-empty text.
pub fn split_sentences(text: &str) -> Vec<String> {
    let sentences: Vec<String> = text
        .unicode_sentences()
        .flat_map(|s| s.split('\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if sentences.is_empty() && !text.trim().is_empty() {
        return simple_sentence_split(text);
    }
    sentences
}

/// Manual splitter: breaks after `.`, `!`, `?` followed by whitespace, and on newlines.
pub fn simple_sentence_split(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            push_trimmed(&mut sentences, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            push_trimmed(&mut sentences, &mut current);
        }
    }
    push_trimmed(&mut sentences, &mut current);
    sentences
}

fn push_trimmed(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Word and punctuation tokens (whitespace dropped), in text order.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_word_bound_indices()
        .filter(|(_, w)| !w.trim().is_empty())
        .map(|(start, w)| Token {
            text: w,
            span: start..start + w.len(),
        })
        .collect()
}

fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

/// Lower-cased alphanumeric words of at least two characters, stopwords removed.
pub fn content_words(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= 2 && !is_stopword(w))
        .collect()
}

/// Joins first and last token spans back into the original text slice.
pub fn span_text<'t>(text: &'t str, tokens: &[Token<'_>], start: usize, end: usize) -> &'t str {
    if start >= end || end > tokens.len() {
        return "";
    }
    &text[tokens[start].span.start..tokens[end - 1].span.end]
}

/// Base noun-phrase chunks: maximal runs of non-numeric, non-stopword word
/// tokens, joined across `-`, `.`, `+` and `#` when they sit inside a word.
/// Runs longer than `MAX_CHUNK_TOKENS` are split.
pub fn noun_chunks(text: &str, tokens: &[Token<'_>]) -> Vec<Chunk> {
    const MAX_CHUNK_TOKENS: usize = 4;

    let mut chunks = Vec::new();
    let mut start: Option<usize> = None;
    let mut words = 0;

    let mut close = |start: &mut Option<usize>, end: usize, words: &mut usize| {
        if let Some(s) = start.take() {
            let slice = span_text(text, tokens, s, end);
            if !slice.is_empty() {
                chunks.push(Chunk {
                    start: s,
                    end,
                    text: slice.to_lowercase(),
                });
            }
        }
        *words = 0;
    };

    for (i, token) in tokens.iter().enumerate() {
        let lower = token.text.to_lowercase();
        let glue = matches!(token.text, "-" | "." | "+" | "#" | "++")
            && start.is_some()
            && tokens.get(i + 1).is_some_and(|next| {
                next.span.start == token.span.end && is_word(next.text)
            })
            && tokens[i - 1].span.end == token.span.start;
        if glue {
            continue;
        }

        let chunkable = is_word(token.text)
            && !token.text.chars().all(|c| c.is_ascii_digit())
            && !is_stopword(&lower)
            && !CHUNK_BREAKERS.contains(&lower.as_str());

        if chunkable {
            if start.is_none() {
                start = Some(i);
            }
            words += 1;
            if words == MAX_CHUNK_TOKENS {
                close(&mut start, i + 1, &mut words);
            }
        } else {
            close(&mut start, i, &mut words);
        }
    }
    close(&mut start, tokens.len(), &mut words);
    chunks
}

/// Heuristic named-entity pass standing in for a statistical NER model.
///
/// PERSON: runs of two or three Title-case words on one line that contain no
/// section-heading or organisation word. LOCATION: `City, ST` or
/// `City, Country` spans. Returned in text order.
pub fn entities(rules: &RuleTable, text: &str) -> Vec<Entity> {
    let mut found: Vec<(usize, Entity)> = Vec::new();

    for rule in rules.rules(Category::Entities) {
        if rule.class != RuleClass::Location {
            continue;
        }
        for m in rule.pattern.find_iter(text) {
            found.push((
                m.start(),
                Entity {
                    text: m.as_str().to_string(),
                    label: EntityLabel::Location,
                },
            ));
        }
    }

    for rule in rules.rules(Category::Entities) {
        if rule.class != RuleClass::Person {
            continue;
        }
        for m in rule.pattern.find_iter(text) {
            let rejected = m
                .as_str()
                .split_whitespace()
                .map(str::to_lowercase)
                .any(|w| NON_PERSON_WORDS.contains(&w.as_str()) || is_stopword(&w));
            // The city half of a location is not a person.
            let is_city = found.iter().any(|(start, _)| *start == m.start());
            if rejected || is_city {
                continue;
            }
            found.push((
                m.start(),
                Entity {
                    text: m.as_str().to_string(),
                    label: EntityLabel::Person,
                },
            ));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, e)| e).collect()
}

/// Deduplicates while keeping first-seen order, so repeated runs agree.
pub fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
