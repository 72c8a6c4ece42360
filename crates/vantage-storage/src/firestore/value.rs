//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Timestamps,
//! references and bytes come back as plain strings.

use serde_json::{Map, Number, Value};

/// Encode a JSON object as a Firestore `fields` map.
pub fn encode_fields(data: &Map<String, Value>) -> Value {
    Value::Object(
        data.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Encode one JSON value.
pub fn encode_value(value: &Value) -> Value {
    let mut typed = Map::with_capacity(1);
    match value {
        Value::Null => {
            typed.insert("nullValue".into(), Value::Null);
        }
        Value::Bool(b) => {
            typed.insert("booleanValue".into(), Value::Bool(*b));
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => {
                typed.insert("integerValue".into(), Value::String(i.to_string()));
            }
            None => {
                typed.insert(
                    "doubleValue".into(),
                    n.as_f64().map(Value::from).unwrap_or(Value::Null),
                );
            }
        },
        Value::String(s) => {
            typed.insert("stringValue".into(), Value::String(s.clone()));
        }
        Value::Array(items) => {
            let values = items.iter().map(encode_value).collect();
            let mut array = Map::new();
            array.insert("values".into(), Value::Array(values));
            typed.insert("arrayValue".into(), Value::Object(array));
        }
        Value::Object(fields) => {
            let mut map = Map::new();
            map.insert("fields".into(), encode_fields(fields));
            typed.insert("mapValue".into(), Value::Object(map));
        }
    }
    Value::Object(typed)
}

/// Decode a Firestore `fields` map into a plain JSON object.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    fields
        .iter()
        .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
        .collect()
}

/// Decode one typed Firestore value.
pub fn decode_value(value: &Value) -> Result<Value, String> {
    let typed = value
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| format!("not a typed value: {value}"))?;
    let Some((kind, inner)) = typed.iter().next() else {
        return Err("empty typed value".to_string());
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| format!("bad booleanValue: {inner}")),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| format!("bad integerValue: {inner}"))
        }
        // NaN and the infinities arrive as strings and have no JSON form.
        "doubleValue" => Ok(inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| format!("bad {kind}: {inner}")),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
            .unwrap_or_else(|| Ok(Vec::new()))
            .map(Value::Array),
        "mapValue" => inner
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_else(|| Ok(Map::new()))
            .map(Value::Object),
        other => Err(format!("unsupported value type '{other}'")),
    }
}
