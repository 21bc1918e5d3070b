use serde_json::Value;

use super::scalar_text;

/// Where the key answer lives, most specific first.
const PRIORITY_PATHS: &[&[&str]] = &[
    &["formatted", "monthly_payment"],
    &["summary", "monthly_payment"],
    &["monthly_payment"],
];

/// Print just the key answer value from the output.
///
/// For loan results this is the EMI; for row listings, the number of rows.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", key_answer(result));
}

fn key_answer(result: &Value) -> String {
    if let Value::Array(rows) = result {
        return rows.len().to_string();
    }

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result, path).filter(|v| !v.is_null()) {
            return scalar_text(val);
        }
    }

    match result.as_object().and_then(|m| m.iter().next()) {
        Some((key, val)) => format!("{}: {}", key, scalar_text(val)),
        None => scalar_text(result),
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}
