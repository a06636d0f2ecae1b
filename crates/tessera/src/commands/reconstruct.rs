use tessera_compress::{reconstruct, CompressedDocument};

use super::read_json;

pub fn run(input: &str) -> anyhow::Result<()> {
    let doc: CompressedDocument = read_json(input)?;
    let rebuilt = reconstruct(&doc);
    println!("{}", serde_json::to_string_pretty(&rebuilt)?);
    Ok(())
}
