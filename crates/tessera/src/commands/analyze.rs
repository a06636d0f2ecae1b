use tessera_compress::analyze;
use tessera_core::RawConversation;

use super::read_json;

pub fn run(input: &str) -> anyhow::Result<()> {
    let conversation: RawConversation = read_json(input)?;
    conversation.validate()?;
    let analysis = analyze(&conversation);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
