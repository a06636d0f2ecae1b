mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, SnapshotAction};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            input,
            document,
            out,
            save,
        } => commands::capture::run(&input, document, out.as_deref(), save),
        Commands::Compress {
            input,
            out,
            save,
            keep_raw,
        } => commands::compress::run(&input, out.as_deref(), save, keep_raw),
        Commands::Reconstruct { input } => commands::reconstruct::run(&input),
        Commands::Analyze { input } => commands::analyze::run(&input),
        Commands::Hash {
            input,
            short,
            report,
        } => commands::hash::run(&input, short, report),
        Commands::Verify { input, expected } => commands::verify::run(&input, &expected),
        Commands::VerifyStream { input } => commands::verify_stream::run(&input),
        Commands::Snapshots { verbatim, action } => match action {
            Some(SnapshotAction::List) | None => commands::snapshots::run_list(verbatim),
            Some(SnapshotAction::Show { id, full, export }) => {
                commands::snapshots::run_show(verbatim, &id, full, export)
            }
            Some(SnapshotAction::Delete { id }) => commands::snapshots::run_delete(verbatim, &id),
            Some(SnapshotAction::Clear) => commands::snapshots::run_clear(verbatim),
            Some(SnapshotAction::History { id }) => {
                commands::snapshots::run_history(verbatim, &id)
            }
            Some(SnapshotAction::Stats) => commands::snapshots::run_stats(verbatim),
        },
        Commands::Version => commands::version::run(),
    }
}
