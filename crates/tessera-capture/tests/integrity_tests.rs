use tessera_capture::{Block, BlockCapturer, BlockStream, IntegrityError};
use tessera_core::{Message, RawConversation, Speaker};

fn captured() -> BlockStream {
    let conversation = RawConversation::new(
        "ChatGPT",
        "https://chatgpt.com/c/integrity",
        "Integrity",
        vec![
            Message::new(Speaker::User, "Can you write the loader?", 0),
            Message::new(
                Speaker::Assistant,
                "Sure.\n```python:loader.py\nimport json\n\ndef load(p):\n    return json.load(open(p))\n```\nNext, we should add error handling.",
                1,
            ),
            Message::new(Speaker::User, "And the tests?", 2),
        ],
    );
    BlockCapturer::default()
        .capture_conversation(&conversation)
        .unwrap()
}

#[test]
fn test_jsonl_roundtrip_verifies() {
    let stream = captured();
    let jsonl = stream.to_jsonl().unwrap();
    assert_eq!(jsonl.lines().count(), stream.len());

    let parsed = BlockStream::from_jsonl(&jsonl).unwrap();
    assert_eq!(parsed, stream);
    let root = parsed.verify().unwrap();
    assert_eq!(Some(root.as_str()), stream.merkle_root());
}

#[test]
fn test_lines_keep_emission_order() {
    let stream = captured();
    let jsonl = stream.to_jsonl().unwrap();
    let tags: Vec<String> = jsonl
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["t"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(tags.first().map(String::as_str), Some("meta"));
    assert_eq!(tags[tags.len() - 2], "manifest");
    assert_eq!(tags.last().map(String::as_str), Some("system-note"));
}

#[test]
fn test_edited_block_is_detected() {
    let jsonl = captured().to_jsonl().unwrap();
    let tampered = jsonl.replacen("import json", "import pickle", 1);
    assert_ne!(tampered, jsonl);

    let stream = BlockStream::from_jsonl(&tampered).unwrap();
    assert!(matches!(stream.verify(), Err(IntegrityError::RootMismatch { .. })));
}

#[test]
fn test_reordered_blocks_are_detected() {
    let mut blocks = captured().into_blocks();
    blocks.swap(1, 2);
    let stream = BlockStream::new(blocks);
    assert!(matches!(stream.verify(), Err(IntegrityError::RootMismatch { .. })));
}

#[test]
fn test_dropped_block_is_detected() {
    let mut blocks = captured().into_blocks();
    blocks.remove(1);
    let stream = BlockStream::new(blocks);
    assert!(matches!(stream.verify(), Err(IntegrityError::CountMismatch { .. })));
}

#[test]
fn test_appended_block_is_detected() {
    let mut blocks = captured().into_blocks();
    blocks.push(Block::SystemNote {
        text: "extra".to_string(),
    });
    let stream = BlockStream::new(blocks);
    assert!(matches!(
        stream.verify(),
        Err(IntegrityError::ManifestPosition { .. })
    ));
}

#[test]
fn test_closing_note_replaced_is_detected() {
    let mut blocks = captured().into_blocks();
    let last = blocks.len() - 1;
    blocks[last] = Block::UserText {
        text: "not a note".to_string(),
    };
    let err = BlockStream::new(blocks).verify().unwrap_err();
    assert!(matches!(err, IntegrityError::MissingSystemNote("user-text")));
    assert!(err.to_string().contains("system note"));
}

#[test]
fn test_missing_manifest() {
    let blocks: Vec<Block> = captured()
        .into_blocks()
        .into_iter()
        .filter(|b| !matches!(b, Block::Manifest { .. }))
        .collect();
    assert!(matches!(
        BlockStream::new(blocks).verify(),
        Err(IntegrityError::MissingManifest)
    ));
}

#[test]
fn test_inferred_blocks() {
    let stream = captured();
    let file = stream.blocks().iter().find_map(|b| match b {
        Block::Code { filename, language, .. } => Some((filename.clone(), language.clone())),
        _ => None,
    });
    assert_eq!(file, Some((Some("loader.py".to_string()), "python".to_string())));

    let imports: Vec<&str> = stream
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::Relationship { subject, object, .. } if subject == "loader.py" => Some(object.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(imports, vec!["json"]);

    let actions: Vec<&str> = stream
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::NextAction { action, .. } => Some(action.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        actions,
        vec!["add error handling", "Address user question: And the tests?"]
    );

    let stats = stream.stats();
    assert_eq!(stats.total_blocks, stream.len());
    assert_eq!(stats.languages, vec!["python"]);
}
