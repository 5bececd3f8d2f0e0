//! Public JSON rendering
//!
//! Records serialize their identifier under the storage key `_id`. Every
//! response body goes through here so clients only ever see `id`.

use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

const STORAGE_ID_KEY: &str = "_id";
const PUBLIC_ID_KEY: &str = "id";

/// Serialize a record and rename its storage id key.
pub fn public_value<T: Serialize>(record: &T) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        if let Some(id) = map.remove(STORAGE_ID_KEY) {
            map.insert(PUBLIC_ID_KEY.to_owned(), id);
        }
    }
    Ok(value)
}

/// Render each record on its own and collect the fragments for a JSON array.
///
/// A record that fails to serialize is logged and left out rather than
/// failing the whole list.
pub fn public_list<T: Serialize>(records: &[T]) -> Vec<Box<RawValue>> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let rendered = public_value(record)
                .and_then(|value| RawValue::from_string(value.to_string()));
            match rendered {
                Ok(fragment) => Some(fragment),
                Err(e) => {
                    tracing::error!(index, "Skipping record that failed to serialize: {}", e);
                    None
                }
            }
        })
        .collect()
}
