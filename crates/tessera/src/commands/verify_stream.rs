use tessera_capture::BlockStream;

use super::read_input;

pub fn run(input: &str) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let stream = BlockStream::from_jsonl(&text)?;
    let root = stream.verify()?;

    let stats = stream.stats();
    println!("OK {}", root);
    println!("Blocks: {}", stats.total_blocks);
    for (kind, count) in &stats.by_kind {
        println!("  {}: {}", kind, count);
    }
    if !stats.languages.is_empty() {
        println!("Languages: {}", stats.languages.join(", "));
    }
    Ok(())
}
