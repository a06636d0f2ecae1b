use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(version)]
#[command(about = "Verbatim capture, semantic compression and versioned snapshots of conversations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a conversation as a Merkle-sealed block stream (JSON Lines)
    Capture {
        /// Conversation JSON, or `-` for stdin
        input: String,

        /// Input is a document tree instead of a conversation
        #[arg(long)]
        document: bool,

        /// Write the stream here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also store the stream in the verbatim history
        #[arg(long)]
        save: bool,
    },

    /// Semantically compress a conversation
    Compress {
        /// Conversation JSON, or `-` for stdin
        input: String,

        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also store the compressed document as a snapshot
        #[arg(long)]
        save: bool,

        /// Store the raw conversation as well
        #[arg(long, requires = "save")]
        keep_raw: bool,
    },

    /// Rebuild approximate messages from a compressed document
    Reconstruct {
        /// Compressed document JSON, or `-` for stdin
        input: String,
    },

    /// Extract semantic anchors and action vectors
    Analyze {
        /// Conversation JSON, or `-` for stdin
        input: String,
    },

    /// Print the SHA-256 digest of a file
    Hash {
        /// File to hash, or `-` for stdin
        input: String,

        /// Keep only the first N hex chars
        #[arg(long)]
        short: Option<usize>,

        /// Print a JSON report with algorithm, size and time
        #[arg(long, conflicts_with = "short")]
        report: bool,
    },

    /// Check a file against an expected digest (full or >= 8 char prefix)
    Verify {
        input: String,
        expected: String,
    },

    /// Recompute and check the Merkle root of a stored block stream
    #[command(name = "verify-stream")]
    VerifyStream {
        /// JSON Lines stream, or `-` for stdin
        input: String,
    },

    /// Inspect and manage stored snapshots
    Snapshots {
        /// Operate on the verbatim block-stream history
        #[arg(long, global = true)]
        verbatim: bool,

        #[command(subcommand)]
        action: Option<SnapshotAction>,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// List snapshots, newest first
    List,
    /// Print one snapshot's content
    Show {
        id: String,
        /// Print the full record instead of just the content
        #[arg(long)]
        full: bool,

        /// Also write the content under the exports directory
        #[arg(long, conflicts_with = "full")]
        export: bool,
    },
    /// Delete one snapshot
    Delete { id: String },
    /// Delete every snapshot in the list
    Clear,
    /// Show the version chain for a root id (or any member's id)
    History { id: String },
    /// Totals per format
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["tessera", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_capture() {
        let cli = Cli::try_parse_from(["tessera", "capture", "chat.json", "--out", "chat.jsonl", "--save"]);
        assert!(cli.is_ok());
        if let Commands::Capture {
            input,
            document,
            out,
            save,
        } = cli.unwrap().command
        {
            assert_eq!(input, "chat.json");
            assert!(!document);
            assert_eq!(out, Some(PathBuf::from("chat.jsonl")));
            assert!(save);
        } else {
            panic!("Expected Capture command");
        }
    }

    #[test]
    fn test_cli_keep_raw_requires_save() {
        assert!(Cli::try_parse_from(["tessera", "compress", "c.json", "--keep-raw"]).is_err());
        assert!(Cli::try_parse_from(["tessera", "compress", "c.json", "--save", "--keep-raw"]).is_ok());
    }

    #[test]
    fn test_cli_parse_snapshot_actions() {
        let cli = Cli::try_parse_from(["tessera", "snapshots", "history", "snap-1", "--verbatim"]).unwrap();
        match cli.command {
            Commands::Snapshots {
                verbatim,
                action: Some(SnapshotAction::History { id }),
            } => {
                assert!(verbatim);
                assert_eq!(id, "snap-1");
            }
            _ => panic!("Expected Snapshots history"),
        }

        let cli = Cli::try_parse_from(["tessera", "snapshots"]).unwrap();
        assert!(matches!(cli.command, Commands::Snapshots { action: None, .. }));
    }

    #[test]
    fn test_cli_show_export_is_opt_in() {
        let cli = Cli::try_parse_from(["tessera", "snapshots", "show", "snap-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Snapshots {
                action: Some(SnapshotAction::Show { export: false, .. }),
                ..
            }
        ));

        let cli = Cli::try_parse_from(["tessera", "snapshots", "show", "snap-1", "--export"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Snapshots {
                action: Some(SnapshotAction::Show { export: true, .. }),
                ..
            }
        ));

        assert!(Cli::try_parse_from(["tessera", "snapshots", "show", "s", "--full", "--export"]).is_err());
    }

    #[test]
    fn test_cli_parse_verify_stream() {
        let cli = Cli::try_parse_from(["tessera", "verify-stream", "-"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_hash_flags_conflict() {
        assert!(Cli::try_parse_from(["tessera", "hash", "f", "--short", "8", "--report"]).is_err());
    }
}
