use anyhow::Context;
use iterdns_domain::Message;

/// Parses a raw captured DNS message and prints it.
pub fn run_decode(path: &str) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path))?;
    let message =
        Message::from_bytes(&bytes).with_context(|| format!("Failed to decode {}", path))?;

    print!("{}", message);
    Ok(())
}
