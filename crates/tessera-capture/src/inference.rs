//! Relationship and next-action inference over captured blocks

use regex::Regex;
use std::sync::OnceLock;
use tessera_core::{CaptureConfig, Priority};

use crate::block::{Block, Predicate};

/// Owner recorded on every inferred next action
pub const NEXT_ACTION_OWNER: &str = "next_instance";

static IMPORT_RES: OnceLock<Vec<Regex>> = OnceLock::new();
static ACTION_RES: OnceLock<Vec<Regex>> = OnceLock::new();

fn import_patterns() -> &'static [Regex] {
    IMPORT_RES.get_or_init(|| {
        vec![
            // JavaScript / TypeScript
            Regex::new(r#"import\s+[\w{}\s,*]+\s+from\s+["']([^"']+)["']"#).unwrap(),
            Regex::new(r#"require\(\s*["']([^"']+)["']\s*\)"#).unwrap(),
            // Python
            Regex::new(r"(?m)^\s*from\s+([\w.]+)\s+import\s").unwrap(),
            Regex::new(r"(?m)^\s*import\s+([\w.]+)\s*$").unwrap(),
            // Rust
            Regex::new(r"(?m)^\s*(?:pub\s+)?use\s+([\w:]+)").unwrap(),
        ]
    })
}

fn action_patterns() -> &'static [Regex] {
    ACTION_RES.get_or_init(|| {
        vec![
            Regex::new(r"(?i)TODO:?\s*(.{3,80})").unwrap(),
            Regex::new(r"(?i)FIXME:?\s*(.{3,80})").unwrap(),
            Regex::new(r"(?i)will implement\s+(.{3,50})").unwrap(),
            Regex::new(r"(?i)next,?\s+(?:we |I )?(?:should|will|need to)\s+(.{3,80})").unwrap(),
            Regex::new(r"(?i)remaining:?\s*(.{3,80})").unwrap(),
        ]
    })
}

/// `followed_by` for consecutive named code blocks, then one `imports` edge per
/// import-like statement inside each code block.
pub fn infer_relationships(blocks: &[Block]) -> Vec<Block> {
    let code: Vec<(Option<&String>, &String, &String)> = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Code {
                filename,
                content_hash,
                verbatim,
                ..
            } => Some((filename.as_ref(), content_hash, verbatim)),
            _ => None,
        })
        .collect();

    let mut relationships = Vec::new();

    for pair in code.windows(2) {
        if let (Some(prev), Some(next)) = (pair[0].0, pair[1].0) {
            relationships.push(Block::Relationship {
                subject: prev.clone(),
                predicate: Predicate::FollowedBy,
                object: next.clone(),
            });
        }
    }

    for (filename, hash, verbatim) in &code {
        let subject = match filename {
            Some(name) => name.to_string(),
            None => format!("code:{}", hash),
        };
        for re in import_patterns() {
            for cap in re.captures_iter(verbatim) {
                relationships.push(Block::Relationship {
                    subject: subject.clone(),
                    predicate: Predicate::Imports,
                    object: cap[1].to_string(),
                });
            }
        }
    }

    relationships
}

fn clean_action(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(['.', ',', ';'])
        .trim_end()
        .to_string()
}

/// Pattern-detected open tasks from assistant text, capped, plus one high
/// priority action when the last user message is an open question.
pub fn infer_next_actions(blocks: &[Block], config: &CaptureConfig) -> Vec<Block> {
    let assistant_text = blocks
        .iter()
        .filter_map(|b| match b {
            Block::AssistantText { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut seen: Vec<String> = Vec::new();
    let mut actions = Vec::new();

    for re in action_patterns() {
        for cap in re.captures_iter(&assistant_text) {
            let action = clean_action(&cap[1]);
            let key = action.to_lowercase();
            if action.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            actions.push(action);
        }
    }
    actions.truncate(config.max_next_actions);

    let mut out: Vec<Block> = actions
        .into_iter()
        .map(|action| Block::NextAction {
            action,
            priority: Priority::Medium,
            owner: NEXT_ACTION_OWNER.to_string(),
            auto_detected: true,
        })
        .collect();

    let last_user = blocks.iter().rev().find_map(|b| match b {
        Block::UserText { text } => Some(text.trim()),
        _ => None,
    });
    if let Some(question) = last_user.filter(|q| q.ends_with('?')) {
        let excerpt: String = question.chars().take(config.question_excerpt_chars).collect();
        let action = format!("Address user question: {}", excerpt);
        if !seen.contains(&action.to_lowercase()) {
            out.push(Block::NextAction {
                action,
                priority: Priority::High,
                owner: NEXT_ACTION_OWNER.to_string(),
                auto_detected: true,
            });
        }
    }

    out
}
