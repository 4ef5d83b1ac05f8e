use serde_json::Value;
use std::io;

use super::scalar_text;

/// Two-column `field,value` CSV of the result object on stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &scalar_text(val, "")]);
            }
        }
        other => {
            let _ = wtr.write_record([&scalar_text(other, "")]);
        }
    }

    let _ = wtr.flush();
}
