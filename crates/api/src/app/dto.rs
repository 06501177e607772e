//! Response mapping: entity fields plus the record envelope.

use chrono::SecondsFormat;
use serde_json::{Map, Value, json};

use inventario_core::{Record, Resource};

/// Render a stored record as its wire JSON.
///
/// The entity's own fields come first-class; the envelope adds `id`, `activo`,
/// `ciclo`, `fechaCreacion` and `version`.
pub fn record_json<R: Resource>(record: &Record<R>) -> Result<Value, serde_json::Error> {
    let mut body = match serde_json::to_value(&record.data)? {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };

    body.insert("id".to_string(), json!(record.id.get()));
    body.insert("activo".to_string(), json!(record.lifecycle.is_active()));
    body.insert("ciclo".to_string(), json!(record.lifecycle.as_str()));
    body.insert(
        "fechaCreacion".to_string(),
        json!(record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    body.insert("version".to_string(), json!(record.version));

    Ok(Value::Object(body))
}

pub fn records_json<R: Resource>(records: &[Record<R>]) -> Result<Value, serde_json::Error> {
    records
        .iter()
        .map(record_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
