use tessera_io::Paths;
use tessera_store::{Snapshot, SnapshotFormat, SnapshotStore};

use super::open_store;

fn open(verbatim: bool) -> anyhow::Result<SnapshotStore> {
    open_store(&Paths::new()?, verbatim)
}

fn format_row(s: &Snapshot) -> String {
    let title = if s.title.is_empty() { "(untitled)" } else { s.title.as_str() };
    format!(
        "{}  v{:<3} {:<10} {:>4} msgs  {}  {}",
        s.saved_at.format("%Y-%m-%d %H:%M"),
        s.version,
        s.format.as_str(),
        s.message_count,
        s.id,
        title
    )
}

fn export_extension(format: SnapshotFormat) -> &'static str {
    match format {
        SnapshotFormat::Verbatim => "jsonl",
        SnapshotFormat::Compressed | SnapshotFormat::Raw => "json",
    }
}

pub fn run_list(verbatim: bool) -> anyhow::Result<()> {
    let snapshots = open(verbatim)?.list();
    if snapshots.is_empty() {
        println!("No snapshots stored");
        return Ok(());
    }
    println!("Snapshots (newest first): {}", snapshots.len());
    for s in &snapshots {
        println!("  {}", format_row(s));
    }
    Ok(())
}

/// Print a snapshot's content; `export` also writes it under the exports directory
pub fn run_show(verbatim: bool, id: &str, full: bool, export: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let store = open_store(&paths, verbatim)?;
    let Some(snapshot) = store.get(id) else {
        anyhow::bail!("no snapshot with id {}", id);
    };

    if full {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let text = snapshot.content_text()?;
    println!("{}", text);
    if export {
        let path = paths.export_file(&snapshot.id, export_extension(snapshot.format));
        tessera_io::atomic_write(&path, text.as_bytes())?;
        eprintln!("Exported to {}", path.display());
    }
    Ok(())
}

pub fn run_delete(verbatim: bool, id: &str) -> anyhow::Result<()> {
    if open(verbatim)?.delete(id)? {
        println!("Deleted {}", id);
    } else {
        println!("No snapshot with id {}", id);
    }
    Ok(())
}

pub fn run_clear(verbatim: bool) -> anyhow::Result<()> {
    open(verbatim)?.clear()?;
    println!("Cleared all snapshots");
    Ok(())
}

/// Accepts the root id or any member id; the chain is resolved through its root
pub fn run_history(verbatim: bool, id: &str) -> anyhow::Result<()> {
    let store = open(verbatim)?;
    let root_id = store
        .get(id)
        .map(|s| s.root_id)
        .unwrap_or_else(|| id.to_string());
    let chain = store.version_history(&root_id);
    if chain.is_empty() {
        println!("No versions retained for {}", root_id);
        return Ok(());
    }

    println!("Version history for {} ({})", chain[0].source_url, root_id);
    if !chain[0].is_root() {
        println!("  (older versions were evicted)");
    }
    for s in &chain {
        let parent = s.parent_id.as_deref().unwrap_or("-");
        println!("  {}  hash {}  parent {}", format_row(s), s.content_hash, parent);
    }
    Ok(())
}

pub fn run_stats(verbatim: bool) -> anyhow::Result<()> {
    let stats = open(verbatim)?.stats();
    println!("Total: {} / {}", stats.total, stats.capacity);
    println!("Sources: {}", stats.distinct_urls);
    for (format, count) in &stats.by_format {
        println!("  {}: {}", format, count);
    }
    if let (Some(newest), Some(oldest)) = (stats.newest, stats.oldest) {
        println!("Range: {} .. {}", oldest.to_rfc3339(), newest.to_rfc3339());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;
    use tessera_store::Capture;

    fn seed(temp: &TempDir) -> (Snapshot, Snapshot) {
        std::env::set_var(tessera_io::HOME_ENV, temp.path());
        let store = open(false).unwrap();
        let capture = |body: &str| Capture {
            source_url: "https://claude.ai/chat/s".to_string(),
            title: "S".to_string(),
            platform: Some("Claude".to_string()),
            format: SnapshotFormat::Raw,
            content: json!({ "body": body }),
            message_count: 1,
        };
        let v1 = store.save(capture("one"), "test").unwrap();
        let v2 = store.save(capture("two"), "test").unwrap();
        (v1, v2)
    }

    #[test]
    #[serial]
    fn test_snapshot_commands() {
        let temp = TempDir::new().unwrap();
        let (v1, v2) = seed(&temp);

        assert!(run_list(false).is_ok());
        assert!(run_history(false, &v2.id).is_ok());
        assert!(run_stats(false).is_ok());

        let export = Paths::new().unwrap().export_file(&v1.id, "json");
        assert!(run_show(false, &v1.id, false, false).is_ok());
        assert!(!export.exists());

        assert!(run_show(false, &v1.id, false, true).is_ok());
        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
        assert_eq!(exported["body"], "one");

        assert!(run_show(false, "missing", false, false).is_err());

        run_delete(false, &v1.id).unwrap();
        assert!(open(false).unwrap().get(&v1.id).is_none());

        run_clear(false).unwrap();
        assert!(open(false).unwrap().list().is_empty());

        std::env::remove_var(tessera_io::HOME_ENV);
    }

    #[test]
    #[serial]
    fn test_verbatim_list_is_separate() {
        let temp = TempDir::new().unwrap();
        seed(&temp);
        assert!(open(true).unwrap().list().is_empty());
        std::env::remove_var(tessera_io::HOME_ENV);
    }

    #[test]
    fn test_format_row() {
        let snapshot = Snapshot {
            id: "snap-1".to_string(),
            source_url: "https://x.io".to_string(),
            title: String::new(),
            platform: None,
            format: SnapshotFormat::Verbatim,
            content: json!("{}"),
            content_hash: "0123456789abcdef".to_string(),
            version: 2,
            parent_id: Some("snap-0".to_string()),
            root_id: "snap-0".to_string(),
            saved_at: chrono::Utc::now(),
            source: "cli".to_string(),
            message_count: 4,
        };
        let row = format_row(&snapshot);
        assert!(row.contains("v2"));
        assert!(row.contains("verbatim"));
        assert!(row.contains("(untitled)"));
        assert_eq!(export_extension(snapshot.format), "jsonl");
    }
}
