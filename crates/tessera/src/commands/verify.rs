use tessera_core::hash::{verify, MIN_VERIFY_LEN};

use super::read_input;

pub fn run(input: &str, expected: &str) -> anyhow::Result<()> {
    if expected.trim().len() < MIN_VERIFY_LEN {
        anyhow::bail!(
            "expected digest must have at least {} hex chars",
            MIN_VERIFY_LEN
        );
    }
    let data = read_input(input)?;
    if !verify(&data, expected) {
        anyhow::bail!("digest mismatch for {}", input);
    }
    println!("OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tessera_core::hash::digest;

    #[test]
    fn test_verify_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.txt");
        std::fs::write(&path, "payload").unwrap();
        let path = path.to_str().unwrap();

        let full = digest("payload");
        assert!(run(path, &full).is_ok());
        assert!(run(path, &full[..8]).is_ok());
        assert!(run(path, &digest("payloadx")).is_err());
        assert!(run(path, "abc").is_err());
    }
}
