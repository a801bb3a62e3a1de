use rust_decimal::Decimal;
use serde_json::Value;

use super::client::CustomField;

/// Look up a custom field by display name and return its first value as text.
pub fn field_value(fields: Option<&[CustomField]>, name: &str) -> Option<String> {
    lookup(fields, |f| f.field_name.as_deref() == Some(name))
}

/// Look up a custom field by system code (e.g. "EMAIL").
pub fn field_value_by_code(fields: Option<&[CustomField]>, code: &str) -> Option<String> {
    lookup(fields, |f| f.field_code.as_deref() == Some(code))
}

fn lookup(fields: Option<&[CustomField]>, pred: impl Fn(&CustomField) -> bool) -> Option<String> {
    fields?
        .iter()
        .find(|f| pred(f))
        .and_then(|f| f.values.first())
        .and_then(first_value)
}

/// Field values arrive either as `{"value": …}` objects or bare scalars.
fn first_value(value: &Value) -> Option<String> {
    let scalar = match value {
        Value::Object(map) => map.get("value")?,
        other => other,
    };
    match scalar {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extract a discount percentage from a free-text CRM field.
///
/// Values look like "NO DISCOUNT", "10%", "15", "VIP 20% off". The first
/// contiguous digit run wins, so "15%" never half-matches as "5%".
pub fn extract_discount_percent(raw: &str) -> Decimal {
    let upper = raw.to_uppercase();
    if upper.contains("NO DISCOUNT") {
        return Decimal::ZERO;
    }

    let digits: String = upper
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().unwrap_or(Decimal::ZERO)
}

/// Parse a CRM price string ("1,050.00") into a Decimal, defaulting to zero
/// on anything unparseable.
pub fn parse_price(raw: &str) -> Decimal {
    raw.replace(',', "").trim().parse().unwrap_or(Decimal::ZERO)
}

/// Parse a quantity value (number or string), defaulting to 1.
pub fn parse_quantity(value: Option<&Value>) -> Decimal {
    let fallback = Decimal::ONE;
    let Some(value) = value else {
        return fallback;
    };
    match value {
        Value::Number(n) => n.to_string().parse().unwrap_or(fallback),
        Value::String(s) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}
