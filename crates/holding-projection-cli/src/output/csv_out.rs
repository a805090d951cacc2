use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// The first array of objects found in the result (yearly rows, property
/// rows or schedule months) becomes the CSV body. Results without one are
/// written as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(map) => match map.values().find_map(object_rows) {
            Some(rows) => write_array_csv(&mut wtr, rows),
            None => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        },
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn object_rows(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(arr) if arr.first().is_some_and(Value::is_object) => Some(arr),
        _ => None,
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_are_written_with_headers() {
        let rows = json!([
            {"year": 2025, "net_result": "1269.02"},
            {"year": 2026, "net_result": "1413.5"}
        ]);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, rows.as_array().unwrap());
        let bytes = wtr.into_inner().ok().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "year,net_result\n2025,1269.02\n2026,1413.5\n");
    }

    #[test]
    fn test_first_object_array_is_picked() {
        let result = json!({"entity": "SCI", "rows": [{"year": 2025}]});
        let rows = result.as_object().unwrap().values().find_map(object_rows);
        assert_eq!(rows.map(Vec::len), Some(1));
    }
}
