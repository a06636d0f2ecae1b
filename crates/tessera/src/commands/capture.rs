use std::path::Path;
use tessera_capture::{BlockCapturer, BlockStream, Document};
use tessera_core::RawConversation;
use tessera_io::Paths;
use tessera_store::Capture;

use super::{load_config, open_store, read_json, write_output, CLI_SOURCE};

fn capture_stream(input: &str, document: bool, capturer: &BlockCapturer) -> anyhow::Result<(BlockStream, String)> {
    if document {
        let doc: Document = read_json(input)?;
        let title = doc.title.clone().unwrap_or_default();
        Ok((capturer.capture(&doc)?, title))
    } else {
        let conversation: RawConversation = read_json(input)?;
        let stream = capturer.capture_conversation(&conversation)?;
        Ok((stream, conversation.title))
    }
}

pub fn run(input: &str, document: bool, out: Option<&Path>, save: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let config = load_config(&paths)?;
    let capturer = BlockCapturer::new(config.capture);

    let (stream, title) = capture_stream(input, document, &capturer)?;
    write_output(out, &stream.to_jsonl()?)?;

    if save {
        let store = open_store(&paths, true)?;
        let snapshot = store.save(Capture::verbatim(&stream, title)?, CLI_SOURCE)?;
        eprintln!(
            "Saved {} (version {}, root {})",
            snapshot.id, snapshot.version, snapshot.root_id
        );
    }

    let stats = stream.stats();
    eprintln!(
        "{} blocks, merkle root {}",
        stats.total_blocks,
        stream.merkle_root().unwrap_or("-")
    );
    Ok(())
}
