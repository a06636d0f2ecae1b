//! Semantic anchors and action vectors
//!
//! Surfaces notable fragments of a conversation (file references, severity
//! markers, commands, TODOs) so a later session can pick up the thread
//! without replaying the whole transcript.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tessera_core::{Priority, RawConversation, Speaker};

const ANCHOR_EXCERPT_CHARS: usize = 200;
const ANCHOR_MIN_SUBSTANTIVE_CHARS: usize = 100;
const MAX_ANCHOR_FILES: usize = 5;
const MAX_ACTION_VECTORS: usize = 10;
const MAX_THEMES: usize = 5;
const MAX_FILES_TOUCHED: usize = 10;
const MAX_COMMIT_REFS: usize = 5;

const TAG_KEYWORDS: &[&str] = &[
    "security",
    "vulnerability",
    "injection",
    "xss",
    "csrf",
    "auth",
    "performance",
    "refactor",
    "bug",
    "fix",
    "feature",
    "test",
    "deploy",
    "config",
    "database",
    "api",
    "logging",
    "dependency",
];

const HIGH_PRIORITY_VERBS: &[&str] = &["DEPLOY", "PUSH", "COMMIT", "MERGE", "DELETE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Security,
    Bugfix,
    Testing,
    Refactor,
    Feature,
    Config,
    Documentation,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStatus {
    Identified,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Todo,
    Command,
    Git,
    Npm,
}

/// A message worth re-reading, with the references found in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnchor {
    pub id: String,
    pub topic: Topic,
    pub role: Speaker,
    pub content: String,
    pub severity: Option<Priority>,
    pub files: Vec<String>,
    pub tags: Vec<String>,
    pub status: AnchorStatus,
}

/// A pending task inferred from the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionVector {
    pub id: String,
    pub action: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub priority: Priority,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionProtocol {
    pub message_count: usize,
    pub anchor_count: usize,
    pub action_count: usize,
    pub key_themes: Vec<Topic>,
    pub files_touched: Vec<String>,
    pub branch_refs: Vec<String>,
    pub commit_refs: Vec<String>,
    pub severities_found: Vec<Priority>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAnalysis {
    pub anchors: Vec<SemanticAnchor>,
    pub action_vectors: Vec<ActionVector>,
    pub protocol: ReconstructionProtocol,
}

static FILE_PATH_RE: OnceLock<Regex> = OnceLock::new();
static SEVERITY_RES: OnceLock<Vec<(Priority, Regex)>> = OnceLock::new();
static ACTION_RES: OnceLock<Vec<(ActionKind, Regex)>> = OnceLock::new();
static BRANCH_RE: OnceLock<Regex> = OnceLock::new();
static NAMED_BRANCH_RE: OnceLock<Regex> = OnceLock::new();
static COMMIT_RE: OnceLock<Regex> = OnceLock::new();
static RESOLVED_RE: OnceLock<Regex> = OnceLock::new();
static IN_PROGRESS_RE: OnceLock<Regex> = OnceLock::new();

fn severity_patterns() -> &'static [(Priority, Regex)] {
    SEVERITY_RES.get_or_init(|| {
        vec![
            (Priority::Critical, Regex::new(r"\b(?:C-\d+|CRITICAL)\b").unwrap()),
            (Priority::High, Regex::new(r"\b(?:H-\d+|HIGH)\b").unwrap()),
            (Priority::Medium, Regex::new(r"\b(?:M-\d+|MEDIUM)\b").unwrap()),
            (Priority::Low, Regex::new(r"\b(?:L-\d+|LOW)\b").unwrap()),
        ]
    })
}

fn action_patterns() -> &'static [(ActionKind, Regex)] {
    ACTION_RES.get_or_init(|| {
        vec![
            (
                ActionKind::Todo,
                Regex::new(r"\b(TODO|FIXME|HACK)\b:?[ \t]*([^\n]{3,80})").unwrap(),
            ),
            (
                ActionKind::Command,
                Regex::new(
                    r"\b(SET|DELETE|RUN|DEPLOY|INSTALL|UPDATE|CREATE|REMOVE|CONFIGURE|PUSH|COMMIT|MERGE|REVERT|PATCH)[ \t]+([^\n.!?]{3,80})",
                )
                .unwrap(),
            ),
            (
                ActionKind::Git,
                Regex::new(r"(?i)\bgit\s+(push|pull|commit|checkout|merge|rebase)\b[^.;\n]{0,40}")
                    .unwrap(),
            ),
            (
                ActionKind::Npm,
                Regex::new(r"(?i)\bnpm\s+(install|run|build|test)\b[^.;\n]{0,40}").unwrap(),
            ),
        ]
    })
}

/// File references such as `src/auth.js`, `./lib/x.py:10` or `auth.js:42`.
/// A `:line` suffix is kept; a leading `./` is dropped.
pub fn extract_file_paths(text: &str) -> Vec<String> {
    let re = FILE_PATH_RE.get_or_init(|| {
        Regex::new(
            r#"(?m)(?:^|[\s"'`(,])(?:\./)?(/?(?:[\w\-]+/)*[\w\-]+(?:\.[\w\-]+)*\.[A-Za-z]{1,10})\b(?::(\d+))?"#,
        )
        .unwrap()
    });

    let mut paths: Vec<String> = Vec::new();
    for cap in re.captures_iter(text) {
        let entry = match cap.get(2) {
            Some(line) => format!("{}:{}", &cap[1], line.as_str()),
            None => cap[1].to_string(),
        };
        if !paths.contains(&entry) {
            paths.push(entry);
        }
    }
    paths
}

/// Highest severity marker in the text (C-n/CRITICAL first, L-n/LOW last)
pub fn detect_severity(text: &str) -> Option<Priority> {
    severity_patterns()
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
}

fn severity_tags(text: &str) -> Vec<(Priority, String)> {
    let mut found = Vec::new();
    for (level, re) in severity_patterns() {
        for m in re.find_iter(text) {
            found.push((*level, m.as_str().to_string()));
        }
    }
    found
}

/// Actions in pattern order: TODO-style notes, uppercase commands, git, npm
pub fn extract_actions(text: &str) -> Vec<(ActionKind, String, Priority)> {
    let mut actions = Vec::new();
    for (kind, re) in action_patterns() {
        for cap in re.captures_iter(text) {
            let whole = cap[0].trim().to_string();
            let priority = match kind {
                ActionKind::Command if HIGH_PRIORITY_VERBS.contains(&&cap[1]) => Priority::High,
                _ => Priority::Medium,
            };
            actions.push((*kind, whole, priority));
        }
    }
    actions
}

/// Branch names and commit hashes mentioned in git-flavoured text
pub fn extract_git_refs(text: &str) -> (Vec<String>, Vec<String>) {
    let branch_re = BRANCH_RE.get_or_init(|| {
        Regex::new(
            r#"(?i)(?:branch|checkout|merge|push\s+(?:to\s+)?origin|pull\s+(?:from\s+)?origin)\s+['"]*([a-zA-Z0-9/_\-]+)"#,
        )
        .unwrap()
    });
    let named_re = NAMED_BRANCH_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b((?:feature|fix|hotfix|release|chore|refactor|bugfix)/[a-zA-Z0-9_\-]+)\b",
        )
        .unwrap()
    });
    let commit_re =
        COMMIT_RE.get_or_init(|| Regex::new(r"\b([a-f0-9]{40}|[a-f0-9]{7})\b").unwrap());

    let mut branches: Vec<String> = Vec::new();
    for cap in branch_re.captures_iter(text).chain(named_re.captures_iter(text)) {
        let branch = cap[1].to_string();
        if !branches.contains(&branch) {
            branches.push(branch);
        }
    }

    let mut commits: Vec<String> = Vec::new();
    for cap in commit_re.captures_iter(text) {
        let hash = cap[1].to_string();
        // all-letter runs like "defaced" are words, not hashes
        if hash.chars().any(|c| c.is_ascii_digit()) && !commits.contains(&hash) {
            commits.push(hash);
        }
    }

    (branches, commits)
}

pub fn detect_topic(content: &str) -> Topic {
    let lower = content.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["security", "vulnerab", "exploit"]) {
        Topic::Security
    } else if has(&["bug", "fix", "error"]) {
        Topic::Bugfix
    } else if has(&["test", "spec"]) {
        Topic::Testing
    } else if has(&["refactor", "clean"]) {
        Topic::Refactor
    } else if has(&["feature", "add", "implement"]) {
        Topic::Feature
    } else if has(&["config", "setup", "install"]) {
        Topic::Config
    } else if has(&["doc", "readme", "comment"]) {
        Topic::Documentation
    } else {
        Topic::General
    }
}

fn detect_status(content: &str) -> AnchorStatus {
    let resolved = RESOLVED_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:fixed|resolved|done|completed|closed)\b").unwrap()
    });
    let in_progress = IN_PROGRESS_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:in.?progress|working.?on|investigating|ongoing)\b").unwrap()
    });

    if resolved.is_match(content) {
        AnchorStatus::Resolved
    } else if in_progress.is_match(content) {
        AnchorStatus::InProgress
    } else {
        AnchorStatus::Identified
    }
}

fn keyword_tags(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

fn excerpt(content: &str) -> String {
    if content.chars().count() > ANCHOR_EXCERPT_CHARS {
        let head: String = content.chars().take(ANCHOR_EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

/// Build anchors, action vectors and the reconstruction summary.
///
/// Messages with no notable content simply produce no anchor; an empty
/// conversation yields an empty analysis.
pub fn analyze(conversation: &RawConversation) -> SemanticAnalysis {
    let mut anchors = Vec::new();

    for message in &conversation.messages {
        let content = message.content.as_str();
        let severity = detect_severity(content);
        let files = extract_file_paths(content);
        let has_actions = !extract_actions(content).is_empty();
        let substantive = content.chars().count() > ANCHOR_MIN_SUBSTANTIVE_CHARS;

        if severity.is_none() && files.is_empty() && !has_actions && !substantive {
            continue;
        }

        let mut tags: Vec<String> = severity_tags(content).into_iter().map(|(_, t)| t).collect();
        for tag in keyword_tags(content) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        anchors.push(SemanticAnchor {
            id: format!("SA{:03}", anchors.len() + 1),
            topic: detect_topic(content),
            role: message.role,
            content: excerpt(content),
            severity,
            files: files.into_iter().take(MAX_ANCHOR_FILES).collect(),
            tags,
            status: detect_status(content),
        });
    }

    let all_text = conversation
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let action_vectors: Vec<ActionVector> = extract_actions(&all_text)
        .into_iter()
        .take(MAX_ACTION_VECTORS)
        .enumerate()
        .map(|(i, (kind, action, priority))| ActionVector {
            id: format!("AV{:03}", i + 1),
            action,
            kind,
            priority,
            status: "pending".to_string(),
        })
        .collect();

    let mut key_themes: Vec<Topic> = Vec::new();
    for anchor in &anchors {
        if !key_themes.contains(&anchor.topic) && key_themes.len() < MAX_THEMES {
            key_themes.push(anchor.topic);
        }
    }

    let mut severities_found: Vec<Priority> = Vec::new();
    for (level, _) in severity_tags(&all_text) {
        if !severities_found.contains(&level) {
            severities_found.push(level);
        }
    }

    let (branch_refs, mut commit_refs) = extract_git_refs(&all_text);
    commit_refs.truncate(MAX_COMMIT_REFS);
    let mut files_touched = extract_file_paths(&all_text);
    files_touched.truncate(MAX_FILES_TOUCHED);

    let protocol = ReconstructionProtocol {
        message_count: conversation.messages.len(),
        anchor_count: anchors.len(),
        action_count: action_vectors.len(),
        key_themes,
        files_touched,
        branch_refs,
        commit_refs,
        severities_found,
    };

    tracing::debug!(
        anchors = protocol.anchor_count,
        actions = protocol.action_count,
        "semantic analysis complete"
    );

    SemanticAnalysis {
        anchors,
        action_vectors,
        protocol,
    }
}
