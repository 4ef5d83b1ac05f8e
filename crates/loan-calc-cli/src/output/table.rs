use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Render the result envelope as a field/value table, then warnings and
/// methodology underneath.
pub fn print_table(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", value);
        return;
    };

    match map.get("result") {
        Some(Value::Object(result)) => println!("{}", field_table(result)),
        _ => println!("{}", field_table(map)),
    }

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = map.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Nested objects (LTV tables, check lists) are flattened to `parent.child` rows.
fn field_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_rows(&mut builder, "", map);
    Table::from(builder)
}

fn push_rows(builder: &mut Builder, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => push_rows(builder, &name, inner),
            other => builder.push_record([name, scalar_text(other, "-")]),
        }
    }
}
