//! Walks a document into an ordered, Merkle-sealed block stream

use chrono::Utc;
use regex::Regex;
use std::sync::OnceLock;
use tessera_core::hash::short_digest;
use tessera_core::{CaptureConfig, RawConversation, Speaker};
use uuid::Uuid;

use crate::block::{Block, BlockStream};
use crate::document::{classify_role, Document, Node};
use crate::inference::{infer_next_actions, infer_relationships};
use crate::merkle::merkle_root;
use crate::CaptureError;

const DEFAULT_LANGUAGE: &str = "text";

const KNOWN_SOURCES: &[(&str, &str)] = &[
    ("claude.ai", "Claude"),
    ("chatgpt.com", "ChatGPT"),
    ("chat.openai.com", "ChatGPT"),
    ("gemini.google.com", "Google Gemini"),
    ("grok.com", "Grok"),
    ("chat.mistral.ai", "Mistral AI"),
    ("chat.deepseek.com", "DeepSeek"),
    ("copilot.microsoft.com", "Microsoft Copilot"),
    ("perplexity.ai", "Perplexity"),
];

static LANGUAGE_HINT_RE: OnceLock<Regex> = OnceLock::new();
static CHILD_LANGUAGE_RE: OnceLock<Regex> = OnceLock::new();
static FILENAME_RE: OnceLock<Regex> = OnceLock::new();

fn language_hint_re() -> &'static Regex {
    LANGUAGE_HINT_RE
        .get_or_init(|| Regex::new(r"language-(\w+)|lang-(\w+)|(\w+)-code\b").unwrap())
}

/// Host part of a URL, without scheme, credentials or port
fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    host.split(':').next().unwrap_or("")
}

/// Human label for the site a document came from, `unknown` otherwise
pub fn detect_source(url: &str) -> String {
    let host = host_of(url).to_lowercase();
    KNOWN_SOURCES
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{}", domain)))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn class_string(node: &Node) -> String {
    node.classes().join(" ")
}

/// Explicit code markup, a code class, a language hint or `data-language`
pub fn is_code_like(node: &Node) -> bool {
    let Some(tag) = node.tag() else {
        return false;
    };
    if tag.eq_ignore_ascii_case("pre") || tag.eq_ignore_ascii_case("code") {
        return true;
    }
    if node
        .classes()
        .iter()
        .any(|c| c == "code-block" || c == "hljs")
    {
        return true;
    }
    language_hint_re().is_match(&class_string(node)) || node.attr("data-language").is_some()
}

/// Language from the element's classes, its `data-language`, or a child `code`
pub fn detect_language(node: &Node) -> String {
    if let Some(cap) = language_hint_re().captures(&class_string(node)) {
        if let Some(m) = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3)) {
            return m.as_str().to_string();
        }
    }
    if let Some(lang) = node.attr("data-language").filter(|l| !l.is_empty()) {
        return lang.to_string();
    }
    let child_re = CHILD_LANGUAGE_RE.get_or_init(|| Regex::new(r"language-(\w+)").unwrap());
    node.children()
        .iter()
        .filter(|c| c.tag().is_some_and(|t| t.eq_ignore_ascii_case("code")))
        .find_map(|c| child_re.captures(&class_string(c)).map(|cap| cap[1].to_string()))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// A `name.ext` token in the text of the preceding sibling element
pub fn detect_filename(previous: Option<&Node>) -> Option<String> {
    let re = FILENAME_RE.get_or_init(|| Regex::new(r"[\w-]+\.\w+").unwrap());
    let text = previous?.text_content();
    if !text.contains('.') {
        return None;
    }
    re.find(&text).map(|m| m.as_str().to_string())
}

/// Stateless capture of documents into block streams
#[derive(Debug, Clone, Default)]
pub struct BlockCapturer {
    config: CaptureConfig,
}

impl BlockCapturer {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Run a full capture pass: meta, message blocks, relationships, next
    /// actions, manifest and the closing note.
    pub fn capture(&self, document: &Document) -> Result<BlockStream, CaptureError> {
        document.validate()?;

        let mut blocks = vec![Block::Meta {
            id: format!("capture-{}", Uuid::new_v4()),
            version: self.config.format_version.clone(),
            source: detect_source(&document.url),
            url: document.url.clone(),
            timestamp: Utc::now(),
        }];

        for container in &document.messages {
            let role = classify_role(container);
            self.walk(container, None, role, &mut blocks);
        }

        let relationships = infer_relationships(&blocks);
        let next_actions = infer_next_actions(&blocks, &self.config);
        blocks.extend(relationships);
        blocks.extend(next_actions);

        let block_count = blocks.len();
        let root = merkle_root(&blocks)?;
        blocks.push(Block::Manifest {
            merkle_root: root,
            block_count,
            timestamp: Utc::now(),
        });

        let total = blocks.len() + 1;
        blocks.push(Block::SystemNote {
            text: format!("Session captured. {} blocks. Ready for handoff.", total),
        });

        tracing::debug!(
            url = %document.url,
            blocks = total,
            messages = document.messages.len(),
            "captured block stream"
        );
        Ok(BlockStream::new(blocks))
    }

    /// Validate, build a document tree from the messages, and capture it
    pub fn capture_conversation(
        &self,
        conversation: &RawConversation,
    ) -> Result<BlockStream, CaptureError> {
        conversation.validate()?;
        self.capture(&Document::from_conversation(conversation))
    }

    fn walk(&self, node: &Node, previous: Option<&Node>, role: Speaker, out: &mut Vec<Block>) {
        match node {
            Node::Text { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return;
                }
                let text = text.to_string();
                out.push(match role {
                    Speaker::User => Block::UserText { text },
                    _ => Block::AssistantText { text },
                });
            }
            Node::Element { .. } if is_code_like(node) => {
                let verbatim = node.text_content().trim().to_string();
                if verbatim.is_empty() {
                    return;
                }
                out.push(Block::Code {
                    language: detect_language(node),
                    filename: detect_filename(previous),
                    content_hash: short_digest(&verbatim, self.config.code_hash_len),
                    verbatim,
                });
            }
            Node::Element { children, .. } => {
                let mut previous_element: Option<&Node> = None;
                for child in children {
                    self.walk(child, previous_element, role, out);
                    if child.is_element() {
                        previous_element = Some(child);
                    }
                }
            }
        }
    }
}
