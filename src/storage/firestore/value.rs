//! Codec between Firestore REST typed values and plain JSON.
//!
//! The REST API wraps every field in a type envelope
//! (`{"stringValue": "..."}`, `{"arrayValue": {"values": [...]}}`, ...).
//! Decoding strips the envelopes so the shared normalization sees the same
//! plain JSON the Sheets backend produces; encoding is the reverse, used by
//! the write path.

use serde_json::{json, Map, Value as JsonValue};

/// Splits a document resource into `(document_id, plain_json_fields)`.
/// The id is the last segment of the document `name` path.
pub fn decode_document(document: &JsonValue) -> (String, JsonValue) {
    let id = document
        .get("name")
        .and_then(|n| n.as_str())
        .and_then(|n| n.rsplit('/').next())
        .unwrap_or_default()
        .to_string();
    let fields = decode_fields(document.get("fields"));
    (id, fields)
}

/// Decodes a `fields` map into a plain JSON object.
pub fn decode_fields(fields: Option<&JsonValue>) -> JsonValue {
    let mut out = Map::new();
    if let Some(map) = fields.and_then(|f| f.as_object()) {
        for (key, value) in map {
            out.insert(key.clone(), decode_value(value));
        }
    }
    JsonValue::Object(out)
}

fn decode_value(value: &JsonValue) -> JsonValue {
    let Some(obj) = value.as_object() else {
        return JsonValue::Null;
    };

    if let Some(s) = obj.get("stringValue").and_then(|v| v.as_str()) {
        return JsonValue::String(s.to_string());
    }
    // Firestore serializes 64-bit integers as strings.
    if let Some(s) = obj.get("integerValue") {
        if let Some(n) = s.as_str().and_then(|s| s.parse::<i64>().ok()).or(s.as_i64()) {
            return json!(n);
        }
    }
    if let Some(n) = obj.get("doubleValue").and_then(|v| v.as_f64()) {
        return json!(n);
    }
    if let Some(b) = obj.get("booleanValue").and_then(|v| v.as_bool()) {
        return JsonValue::Bool(b);
    }
    if obj.contains_key("nullValue") {
        return JsonValue::Null;
    }
    if let Some(ts) = obj.get("timestampValue").and_then(|v| v.as_str()) {
        return JsonValue::String(ts.to_string());
    }
    if let Some(array) = obj.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().map(decode_value).collect())
            .unwrap_or_default();
        return JsonValue::Array(values);
    }
    if let Some(map) = obj.get("mapValue") {
        return decode_fields(map.get("fields"));
    }

    JsonValue::Null
}

/// Encodes a plain JSON object into a Firestore `fields` map.
pub fn encode_fields(fields: &Map<String, JsonValue>) -> JsonValue {
    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), encode_value(value));
    }
    JsonValue::Object(out)
}

fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}
