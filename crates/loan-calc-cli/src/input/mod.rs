pub mod file;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Structured input from `--input` or piped stdin, in that order.
/// `None` means the caller should fall back to individual flags.
pub fn read_input<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    // an interactive terminal never carries a request
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    parse_piped(&piped)
}

fn parse_piped<T: DeserializeOwned>(piped: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = piped.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| format!("Failed to parse request on stdin: {e}").into())
}
