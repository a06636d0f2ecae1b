use tessera_core::{Message, RawConversation, Speaker};

pub const SAMPLE_URL: &str = "https://claude.ai/chat/pipeline";

pub fn sample_conversation() -> RawConversation {
    RawConversation::new(
        "Claude",
        SAMPLE_URL,
        "Loader refactor",
        vec![
            Message::new(
                Speaker::User,
                "The loader in src/loader.py crashes on empty files. Can you fix it?",
                0,
            ),
            Message::new(
                Speaker::Assistant,
                "The crash comes from json.load on an empty handle.\n\n\
                 ```python:src/loader.py\nimport json\n\ndef load(path):\n    \
                 with open(path) as f:\n        text = f.read()\n    \
                 return json.loads(text) if text else {}\n```\n\n\
                 TODO: add a regression test for empty files",
                1,
            ),
            Message::new(Speaker::User, "Looks good. What about the cache?", 2),
        ],
    )
    .with_conversation_id("pipeline")
}

/// Same conversation with one more assistant turn, as a later extraction would see it
pub fn extended_conversation() -> RawConversation {
    let mut messages = sample_conversation().messages;
    messages.push(Message::new(
        Speaker::Assistant,
        "The cache layer needs the same guard. I will implement it next.",
        3,
    ));
    RawConversation::new("Claude", SAMPLE_URL, "Loader refactor", messages)
        .with_conversation_id("pipeline")
}
