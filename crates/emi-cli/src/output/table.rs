use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as tables using the tabled crate.
///
/// Nested objects in the result are flattened into `section.field` rows;
/// arrays of objects (the schedule) get a grid of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_fields(&flatten(map)),
        },
        Value::Array(arr) => print_grid(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            let fields = flatten(res_map);
            print_fields(&fields);
            for (key, rows) in res_map.iter().filter_map(|(k, v)| v.as_array().map(|a| (k, a))) {
                println!("\n{}:", key);
                print_grid(rows);
            }
        }
        Value::Array(rows) => print_grid(rows),
        other => println!("{}", scalar_text(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalar fields, with nested objects flattened to dotted keys. Arrays are skipped.
fn flatten(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    collect_fields("", map, &mut fields);
    fields
}

fn collect_fields(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect_fields(&name, inner, out),
            Value::Array(_) => {}
            _ => out.push((name, scalar_text(val))),
        }
    }
}

fn print_fields(fields: &[(String, String)]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), val.as_str()]);
    }
    println!("{}", Table::from(builder));
}

fn print_grid(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "currency": "INR",
            "summary": { "monthly_payment": "11053.99", "total_payment": "1989718.06" },
            "schedule": [ { "month": 1 } ]
        });
        let fields = flatten(value.as_object().unwrap());
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"currency"));
        assert!(keys.contains(&"summary.monthly_payment"));
        assert!(!keys.iter().any(|k| k.starts_with("schedule")));
    }
}
