use std::path::Path;
use tessera_compress::compress_checked;
use tessera_core::RawConversation;
use tessera_io::Paths;
use tessera_store::Capture;

use super::{open_store, read_json, write_output, CLI_SOURCE};

pub fn run(input: &str, out: Option<&Path>, save: bool, keep_raw: bool) -> anyhow::Result<()> {
    let conversation: RawConversation = read_json(input)?;
    let doc = compress_checked(&conversation)?;
    write_output(out, &serde_json::to_string_pretty(&doc)?)?;

    eprintln!(
        "Compressed {} messages, ratio {:.2}",
        doc.metadata.message_count, doc.metadata.compression_ratio
    );

    if save {
        let store = open_store(&Paths::new()?, false)?;
        if keep_raw {
            let raw = store.save(Capture::raw(&conversation)?, CLI_SOURCE)?;
            eprintln!("Saved raw {} (version {})", raw.id, raw.version);
        }
        let snapshot = store.save(Capture::compressed(&doc, conversation.title.clone())?, CLI_SOURCE)?;
        eprintln!("Saved {} (version {})", snapshot.id, snapshot.version);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;
    use tessera_compress::CompressedDocument;
    use tessera_store::SnapshotFormat;

    #[test]
    #[serial]
    fn test_compress_and_save_both_formats() {
        let temp = TempDir::new().unwrap();
        std::env::set_var(tessera_io::HOME_ENV, temp.path());

        let input = temp.path().join("chat.json");
        std::fs::write(
            &input,
            r#"{"platform":"ChatGPT","url":"https://chatgpt.com/c/9","title":"Nine","messageCount":1,
                "messages":[{"role":"user","content":"What is the HTTP status for teapots?"}]}"#,
        )
        .unwrap();
        let out = temp.path().join("doc.json");

        run(input.to_str().unwrap(), Some(&out), true, true).unwrap();

        let doc: CompressedDocument =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(doc.metadata.message_count, 1);

        let store = open_store(&Paths::new().unwrap(), false).unwrap();
        let saved = store.list();
        assert_eq!(saved.len(), 2);
        // same URL, so the compressed save extends the raw one's chain
        assert_eq!(saved[0].format, SnapshotFormat::Compressed);
        assert_eq!(saved[0].version, 2);
        assert_eq!(saved[1].format, SnapshotFormat::Raw);

        std::env::remove_var(tessera_io::HOME_ENV);
    }
}
