use serde_json::Value;

use super::scalar_text;

/// Render output as CSV.
///
/// An envelope becomes two-column `field,value` rows of its result; an
/// array of objects becomes one row per object.
pub fn render_csv(value: &Value) -> String {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let rows: Vec<Vec<String>> = match value {
        Value::Object(map) => {
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            std::iter::once(vec!["field".to_string(), "value".to_string()])
                .chain(fields.iter().map(|(k, v)| vec![k.clone(), csv_value(v)]))
                .collect()
        }
        Value::Array(arr) => array_rows(arr),
        _ => vec![vec![csv_value(value)]],
    };

    for row in rows {
        let _ = wtr.write_record(&row);
    }

    wtr.into_inner()
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

fn array_rows(arr: &[Value]) -> Vec<Vec<String>> {
    let Some(Value::Object(first)) = arr.first() else {
        return arr.iter().map(|v| vec![csv_value(v)]).collect();
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let body = arr.iter().filter_map(Value::as_object).map(|map| {
        headers
            .iter()
            .map(|h| map.get(h.as_str()).map(csv_value).unwrap_or_default())
            .collect()
    });
    std::iter::once(headers.clone()).chain(body).collect()
}

/// Arrays are joined with "; " so each record stays on one line.
fn csv_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(csv_value).collect::<Vec<_>>().join("; "),
        _ => scalar_text(value, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_rows() {
        let v = json!({
            "result": { "rating": "Baa2/BBB", "calculation_steps": ["Rf = 4.50%", "Spread = 1.62%"] },
            "warnings": [],
        });
        let out = render_csv(&v);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines[1], "calculation_steps,Rf = 4.50%; Spread = 1.62%");
        assert_eq!(lines[2], "rating,Baa2/BBB");
    }

    #[test]
    fn test_array_rows() {
        let v = json!([
            { "country": "GERMANY", "risk_free_rate": "0.0236" },
            { "country": "UNITED KINGDOM", "risk_free_rate": "0.041" },
        ]);
        let out = render_csv(&v);
        assert_eq!(
            out,
            "country,risk_free_rate\nGERMANY,0.0236\nUNITED KINGDOM,0.041\n"
        );
    }
}
