use serde_json::Value;

/// Pretty-printed JSON.
pub fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
