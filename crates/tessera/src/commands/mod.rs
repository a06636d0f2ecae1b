pub mod analyze;
pub mod capture;
pub mod compress;
pub mod hash;
pub mod reconstruct;
pub mod snapshots;
pub mod verify;
pub mod verify_stream;
pub mod version;

use anyhow::Context;
use std::io::Read;
use std::path::Path;
use tessera_core::Config;
use tessera_io::Paths;
use tessera_store::{SnapshotStore, SqliteBackend};

/// Source label recorded on snapshots saved from the command line
pub const CLI_SOURCE: &str = "cli";

/// File contents, or all of stdin for `-`
pub fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading {}", input))
}

pub fn read_json<T: serde::de::DeserializeOwned>(input: &str) -> anyhow::Result<T> {
    let text = read_input(input)?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", input))
}

/// Write to `out` atomically, or print to stdout
pub fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            tessera_io::atomic_write(path, text.as_bytes())
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn load_config(paths: &Paths) -> anyhow::Result<Config> {
    let path = paths.config_file();
    Config::load(&path).with_context(|| format!("loading {}", path.display()))
}

/// The snapshot list, or the verbatim history, on the SQLite database
pub fn open_store(paths: &Paths, verbatim: bool) -> anyhow::Result<SnapshotStore> {
    let config = load_config(paths)?;
    let store_config = if verbatim {
        config.verbatim_history
    } else {
        config.snapshots
    };
    let backend = SqliteBackend::open(&paths.store_db())?;
    Ok(SnapshotStore::new(Box::new(backend), store_config))
}
