//! DOM-like document tree handed to the capturer
//!
//! Platform-specific selection of message containers happens upstream; by
//! the time a [`Document`] exists, each entry of `messages` is one container.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{InputError, RawConversation, Speaker};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element {
        tag: String,
        #[serde(default)]
        classes: Vec<String>,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into().to_lowercase(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let Node::Element { classes, .. } = &mut self {
            classes.push(class.into());
        }
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            Node::Text { .. } => None,
        }
    }

    pub fn classes(&self) -> &[String] {
        match self {
            Node::Element { classes, .. } => classes,
            Node::Text { .. } => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            Node::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text { .. } => &[],
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Who authored a message container.
///
/// User when `data-role` or `data-message-author-role` is `user`, when
/// `data-is-human="true"`, or when a class mentions `user`/`human`.
/// Everything else is treated as the assistant.
pub fn classify_role(container: &Node) -> Speaker {
    let role_attr = container
        .attr("data-role")
        .or_else(|| container.attr("data-message-author-role"));
    if role_attr.is_some_and(|r| r.eq_ignore_ascii_case("user")) {
        return Speaker::User;
    }
    if container.attr("data-is-human") == Some("true") {
        return Speaker::User;
    }
    let by_class = container.classes().iter().any(|c| {
        let c = c.to_lowercase();
        c.contains("user") || c.contains("human")
    });
    if by_class {
        Speaker::User
    } else {
        Speaker::Assistant
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub messages: Vec<Node>,
}

impl Document {
    pub fn new(url: impl Into<String>, messages: Vec<Node>) -> Self {
        Self {
            url: url.into(),
            title: None,
            messages,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.url.trim().is_empty() {
            return Err(InputError::MissingField("url"));
        }
        if self.messages.is_empty() {
            return Err(InputError::NoContent);
        }
        if let Some(pos) = self.messages.iter().position(|m| !m.is_element()) {
            return Err(InputError::Malformed(format!(
                "message {} is a text node, expected a container element",
                pos
            )));
        }
        Ok(())
    }

    /// Build a tree from plain message text.
    ///
    /// Fenced code (```` ```lang ````, ```` ```lang:file ```` or
    /// ```` ```lang file ````) becomes `pre > code.language-lang`; a named file
    /// adds a `div.code-header` sibling right before the `pre`. Everything
    /// else stays as text nodes.
    pub fn from_conversation(conversation: &RawConversation) -> Self {
        let messages = conversation
            .messages
            .iter()
            .map(|message| {
                let role = message.role.as_str();
                let mut container = Node::element("div")
                    .with_class("message")
                    .with_class(format!("{}-message", role))
                    .with_attr("data-role", role);
                if let Node::Element { children, .. } = &mut container {
                    *children = split_fences(&message.content);
                }
                container
            })
            .collect();

        let title = (!conversation.title.is_empty()).then(|| conversation.title.clone());
        Self {
            url: conversation.url.clone(),
            title,
            messages,
        }
    }
}

fn parse_fence_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    let (lang, file) = match info.split_once(':') {
        Some((lang, file)) => (lang.trim(), Some(file.trim())),
        None => {
            let mut parts = info.split_whitespace();
            (parts.next().unwrap_or(""), parts.next())
        }
    };
    let lang = (!lang.is_empty()).then(|| lang.to_string());
    let file = file.filter(|f| !f.is_empty()).map(str::to_string);
    (lang, file)
}

fn code_nodes(lang: Option<&str>, file: Option<&str>, code: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    if let Some(file) = file {
        nodes.push(
            Node::element("div")
                .with_class("code-header")
                .with_child(Node::text(file)),
        );
    }
    let mut code_el = Node::element("code");
    if let Some(lang) = lang {
        code_el = code_el.with_class(format!("language-{}", lang));
    }
    nodes.push(Node::element("pre").with_child(code_el.with_child(Node::text(code))));
    nodes
}

fn split_fences(content: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut text_buf: Vec<&str> = Vec::new();
    let mut code_buf: Vec<&str> = Vec::new();
    let mut fence: Option<(Option<String>, Option<String>)> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        match fence.take() {
            None => {
                if let Some(info) = trimmed.strip_prefix("```") {
                    if !text_buf.is_empty() {
                        nodes.push(Node::text(text_buf.join("\n")));
                        text_buf.clear();
                    }
                    fence = Some(parse_fence_info(info));
                } else {
                    text_buf.push(line);
                }
            }
            Some((lang, file)) => {
                if trimmed.trim_end() == "```" {
                    nodes.extend(code_nodes(lang.as_deref(), file.as_deref(), &code_buf.join("\n")));
                    code_buf.clear();
                } else {
                    code_buf.push(line);
                    fence = Some((lang, file));
                }
            }
        }
    }

    // an unterminated fence runs to the end of the message
    if let Some((lang, file)) = fence {
        nodes.extend(code_nodes(lang.as_deref(), file.as_deref(), &code_buf.join("\n")));
    }
    if !text_buf.is_empty() {
        nodes.push(Node::text(text_buf.join("\n")));
    }
    nodes
}
