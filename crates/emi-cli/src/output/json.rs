use serde_json::Value;

/// Print the computation envelope as pretty JSON on stdout.
///
/// Decimals are already strings in the envelope, so amounts print at full
/// precision; logs and errors stay on stderr.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("could not render result as JSON: {e}"),
    }
}
