use serde_json::{Map, Value};
use tabled::{builder::Builder, settings::Style, Table};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a Field/Value table. Arrays of objects
/// (yearly rows, property rows, schedule months) get one table each.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_object(map),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Array(arr) => print_array_table(arr),
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalar_count = 0;
    let mut sections: Vec<(&String, &Value)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(arr) if arr.iter().any(Value::is_object) => sections.push((key, val)),
            Value::Object(inner) if inner.values().all(|v| !v.is_object()) => {
                sections.push((key, val))
            }
            _ => {
                builder.push_record([key.as_str(), &format_value(val)]);
                scalar_count += 1;
            }
        }
    }

    if scalar_count > 0 {
        println!("{}", styled(builder));
    }

    for (key, val) in sections {
        println!("\n{}", title(key));
        match val {
            Value::Array(arr) => print_array_table(arr),
            Value::Object(inner) => print_object(inner),
            _ => {}
        }
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| title(h)));

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", styled(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn styled(builder: Builder) -> Table {
    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

/// `pre_tax_result` -> `Pre tax result`
fn title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_from_snake_case() {
        assert_eq!(title("pre_tax_result"), "Pre tax result");
        assert_eq!(title("year"), "Year");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_value(&json!("30754.32")), "30754.32");
        assert_eq!(format_value(&json!(null)), "-");
        assert_eq!(format_value(&json!(["a", "b"])), "a, b");
    }
}
