//! Rule-based semantic tokenization of a single message

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::summary::split_sentences;
use crate::types::{
    ContextFlags, EntityGroup, EntityKind, Intent, Relation, RelationKind, SemanticToken,
    WeightedTerm,
};

const MAX_CONCEPTS: usize = 10;
const MIN_CONCEPT_CHARS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
    "of", "as", "by", "from",
];

static ENTITY_RES: OnceLock<Vec<(EntityKind, Regex)>> = OnceLock::new();
static RELATION_RES: OnceLock<Vec<(RelationKind, Regex)>> = OnceLock::new();

static QUESTION_RE: OnceLock<Regex> = OnceLock::new();
static INSTRUCTION_RE: OnceLock<Regex> = OnceLock::new();
static AGREEMENT_RE: OnceLock<Regex> = OnceLock::new();
static DISAGREEMENT_RE: OnceLock<Regex> = OnceLock::new();

static INLINE_CODE_RE: OnceLock<Regex> = OnceLock::new();
static URL_SCHEME_RE: OnceLock<Regex> = OnceLock::new();

fn entity_patterns() -> &'static [(EntityKind, Regex)] {
    ENTITY_RES.get_or_init(|| {
        vec![
            (EntityKind::Urls, Regex::new(r"https?://\S+").unwrap()),
            (EntityKind::Emails, Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap()),
            (EntityKind::Mentions, Regex::new(r"@\w+").unwrap()),
            (EntityKind::Hashtags, Regex::new(r"#\w+").unwrap()),
            (
                EntityKind::TechnicalTerms,
                Regex::new(r"\b[A-Z][A-Za-z0-9]+(?:[A-Z][a-z]+)+\b").unwrap(),
            ),
            (EntityKind::Acronyms, Regex::new(r"\b[A-Z]{2,}\b").unwrap()),
        ]
    })
}

fn relation_patterns() -> &'static [(RelationKind, Regex)] {
    RELATION_RES.get_or_init(|| {
        vec![
            (RelationKind::IsA, Regex::new(r"(?i)(\w+)\s+is\s+(\w+)").unwrap()),
            (
                RelationKind::RelatesTo,
                Regex::new(r"(?i)(\w+)\s+(?:relates?\s+to|connected\s+to)\s+(\w+)").unwrap(),
            ),
            (
                RelationKind::Causes,
                Regex::new(r"(?i)(\w+)\s+(?:causes?|leads?\s+to)\s+(\w+)").unwrap(),
            ),
        ]
    })
}

/// Run all five extractors over `text`. Pure; nothing is carried between calls.
pub fn tokenize(text: &str) -> SemanticToken {
    SemanticToken {
        entities: extract_entities(text),
        concepts: extract_concepts(text),
        relationships: extract_relationships(text),
        intent: classify_intent(text),
        context: extract_context(text),
    }
}

/// Entity groups in fixed kind order; kinds without matches are omitted
pub fn extract_entities(text: &str) -> Vec<EntityGroup> {
    entity_patterns()
        .iter()
        .filter_map(|(kind, re)| {
            let mut values: Vec<String> = Vec::new();
            for m in re.find_iter(text) {
                if !values.iter().any(|v| v == m.as_str()) {
                    values.push(m.as_str().to_string());
                }
            }
            (!values.is_empty()).then_some(EntityGroup { kind: *kind, values })
        })
        .collect()
}

/// Most frequent non-stop words, ties kept in first-occurrence order
pub fn extract_concepts(text: &str) -> Vec<WeightedTerm> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for raw in text.to_lowercase().split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if word.chars().count() < MIN_CONCEPT_CHARS || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut terms: Vec<WeightedTerm> = order
        .into_iter()
        .map(|term| {
            let weight = counts.get(&term).copied().unwrap_or(0);
            WeightedTerm { term, weight }
        })
        .collect();
    // stable: equal weights stay in first-seen order
    terms.sort_by(|a, b| b.weight.cmp(&a.weight));
    terms.truncate(MAX_CONCEPTS);
    terms
}

/// Subject-verb-object triples, grouped by pattern in fixed order
pub fn extract_relationships(text: &str) -> Vec<Relation> {
    let mut relations = Vec::new();
    for (kind, re) in relation_patterns() {
        for cap in re.captures_iter(text) {
            relations.push(Relation {
                kind: *kind,
                subject: cap[1].to_string(),
                object: cap[2].to_string(),
            });
        }
    }
    relations
}

/// First matching rule wins: question, instruction, agreement, disagreement.
/// Keywords are bare prefixes of the untrimmed text, so "Nothing" reads as
/// disagreement and leading whitespace defeats every prefix rule.
pub fn classify_intent(text: &str) -> Intent {
    let question = QUESTION_RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:what|how|why|when|where|who|can|could|would|should)").unwrap()
    });
    let instruction = INSTRUCTION_RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:please|could you|can you|would you|let's|make|create|build)").unwrap()
    });
    let agreement = AGREEMENT_RE
        .get_or_init(|| Regex::new(r"(?i)^(?:yes|sure|okay|agreed|right|correct)").unwrap());
    let disagreement = DISAGREEMENT_RE
        .get_or_init(|| Regex::new(r"(?i)^(?:no|not|incorrect|wrong|disagree)").unwrap());

    if text.contains('?') || question.is_match(text) {
        Intent::Question
    } else if instruction.is_match(text) {
        Intent::Instruction
    } else if agreement.is_match(text) {
        Intent::Agreement
    } else if disagreement.is_match(text) {
        Intent::Disagreement
    } else {
        Intent::Statement
    }
}

pub fn extract_context(text: &str) -> ContextFlags {
    let inline_code = INLINE_CODE_RE.get_or_init(|| Regex::new(r"`\w+`").unwrap());
    let url_scheme = URL_SCHEME_RE.get_or_init(|| Regex::new(r"https?://").unwrap());

    ContextFlags {
        has_code: text.contains("```") || inline_code.is_match(text),
        has_urls: url_scheme.is_match(text),
        has_numbers: text.chars().any(|c| c.is_ascii_digit()),
        length: text.chars().count(),
        sentences: split_sentences(text).len(),
    }
}
