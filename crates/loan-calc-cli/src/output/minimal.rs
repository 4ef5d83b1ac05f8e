use serde_json::Value;

use super::scalar_text;

/// Headline figure of each command, in priority order.
const PRIORITY_KEYS: [&str; 9] = [
    "approved",
    "is_valid",
    "monthly_payment",
    "term_years",
    "remaining_amount",
    "max_loan_amount",
    "dti_ratio",
    "current_interest_rate",
    "ltv_ratio",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", scalar_text(val, "null"));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val, "null"));
            return;
        }
    }

    println!("{}", scalar_text(result_obj, "null"));
}
