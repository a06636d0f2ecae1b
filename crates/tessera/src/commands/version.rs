pub fn run() -> anyhow::Result<()> {
    println!("tessera {}", env!("CARGO_PKG_VERSION"));
    println!(
        "block format {}, compression format {}, digest {}",
        tessera_core::CaptureConfig::default().format_version,
        tessera_compress::FORMAT_VERSION,
        tessera_core::hash::ALGORITHM
    );
    Ok(())
}
