use tessera_core::hash::{digest, report, short_digest};

use super::read_input;

fn render(data: &[u8], short: Option<usize>, as_report: bool) -> anyhow::Result<String> {
    if as_report {
        return Ok(serde_json::to_string_pretty(&report(data))?);
    }
    Ok(match short {
        Some(len) => short_digest(data, len),
        None => digest(data),
    })
}

pub fn run(input: &str, short: Option<usize>, as_report: bool) -> anyhow::Result<()> {
    let data = read_input(input)?;
    println!("{}", render(data.as_bytes(), short, as_report)?);
    Ok(())
}
