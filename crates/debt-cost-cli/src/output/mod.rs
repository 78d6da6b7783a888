pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Render `value` in the requested format.
pub fn render(format: &OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Json => json::render_json(value),
        OutputFormat::Table => table::render_table(value),
        OutputFormat::Csv => csv_out::render_csv(value),
        OutputFormat::Minimal => minimal::render_minimal(value),
    }
}

/// Dispatch output to the appropriate formatter and print it.
pub fn format_output(format: &OutputFormat, value: &Value) {
    let rendered = render(format, value);
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
}

/// Plain-text form of a scalar JSON value; nested values stay JSON.
pub(crate) fn scalar_text(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
