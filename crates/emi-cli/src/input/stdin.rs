use serde_json::Value;
use std::error::Error;
use std::io::{self, Read};

/// Loan terms piped as JSON, e.g. `echo '{"principal": ...}' | emi summary`.
///
/// `None` when stdin is a terminal or carries only whitespace, in which case
/// the command falls back to `--principal`/`--rate`/`--years`.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    parse_piped(&piped)
}

fn parse_piped(piped: &str) -> Result<Option<Value>, Box<dyn Error>> {
    let body = piped.trim();
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| format!("Failed to parse piped loan terms: {e}").into())
}
