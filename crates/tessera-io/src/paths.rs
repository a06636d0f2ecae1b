//! Path resolution for tessera data files

use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "TESSERA_HOME";

/// Resolves standard paths for configuration, storage and exports
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve from `$TESSERA_HOME`, falling back to the platform data dir
    pub fn new() -> std::io::Result<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(PathBuf::from(dir)));
        }

        let base = dirs::data_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found")
        })?;

        Ok(Self::at(base.join("tessera")))
    }

    /// Use an explicit data directory
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// SQLite database backing the snapshot store
    pub fn store_db(&self) -> PathBuf {
        self.data_dir.join("snapshots.db")
    }

    /// Directory for exported block streams and compressed documents
    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    /// Export path for a capture id, e.g. `exports/<id>.jsonl`
    pub fn export_file(&self, id: &str, extension: &str) -> PathBuf {
        let safe: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        self.exports_dir().join(format!("{}.{}", safe, extension))
    }
}
