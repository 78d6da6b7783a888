use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as a table using the tabled crate.
pub fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => render_result_table(result, map),
            None => render_flat_object(map),
        },
        Value::Array(arr) => render_array_table(arr),
        _ => value.to_string(),
    }
}

fn render_result_table(result: &Value, envelope: &Map<String, Value>) -> String {
    let mut out = match result {
        Value::Object(res_map) => render_flat_object(res_map),
        _ => render_flat_object(envelope),
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("\n  - {}", w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\n\nMethodology: {}", meth));
    }
    out
}

fn render_flat_object(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    Table::from(builder).to_string()
}

fn render_array_table(arr: &[Value]) -> String {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            return "(empty)".to_string();
        }
        return arr.iter().map(format_value).collect::<Vec<_>>().join("\n");
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    Table::from(builder).to_string()
}

/// Arrays (calculation steps) are listed one item per line.
fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join("\n"),
        _ => scalar_text(value, "null"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_table_with_warnings() {
        let v = json!({
            "result": { "rating": "Aaa/AAA", "spread": "0.0045" },
            "warnings": ["Interest expense is zero; coverage set to 20x."],
            "methodology": "Synthetic rating cost of debt (interest coverage)",
        });
        let out = render_table(&v);
        assert!(out.contains("Aaa/AAA"));
        assert!(out.contains("Warnings:"));
        assert!(out.contains("coverage set to 20x"));
        assert!(out.ends_with("Methodology: Synthetic rating cost of debt (interest coverage)"));
    }

    #[test]
    fn test_array_table() {
        let v = json!([
            { "country": "GERMANY", "risk_free_rate": "0.0236" },
            { "country": "JAPAN", "risk_free_rate": "0.0092" },
        ]);
        let out = render_table(&v);
        assert!(out.contains("country"));
        assert!(out.contains("JAPAN"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(render_table(&json!([])), "(empty)");
    }
}
