use serde_json::Value;

/// Headline fields, highest priority first.
const PRIORITY_KEYS: [&str; 6] = [
    "final_reserve",
    "monthly_payment",
    "valid",
    "updated_reserve",
    "net_result",
    "net_yield",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

/// Unwrap the envelope, then the projection overview, then the last row of a
/// row list, and pick the first priority key present. Falls back to the first
/// field of whatever object is left.
fn headline(value: &Value) -> String {
    let mut target = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(overview) = target.get("overview") {
        target = overview;
    }
    if let Value::Array(arr) = target {
        if let Some(last) = arr.last() {
            target = last;
        }
    }

    match target {
        Value::Object(map) => {
            if let Some(val) = PRIORITY_KEYS
                .iter()
                .filter_map(|k| map.get(*k))
                .find(|v| !v.is_null())
            {
                return format_minimal(val);
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
                None => String::new(),
            }
        }
        other => format_minimal(other),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
