use serde_json::Value;

use super::scalar_text;

/// Priority list of headline fields, first non-null wins.
const PRIORITY_KEYS: [&str; 4] = [
    "after_tax_cost_of_debt",
    "rating",
    "matched_entry",
    "risk_free_rate",
];

/// Just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first field in the result object.
pub fn render_minimal(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            match map.get(key) {
                Some(Value::Object(entry)) => {
                    // A matched rating row: report its label
                    if let Some(rating) = entry.get("rating") {
                        return scalar_text(rating, "null");
                    }
                }
                Some(val) if !val.is_null() => return scalar_text(val, "null"),
                _ => {}
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar_text(val, "null"));
        }
    }

    scalar_text(result_obj, "null")
}
