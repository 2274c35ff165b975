//! JSON encoding of the persisted buckets

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TodoError;

/// Encode a bucket (or any other persisted value) into the string stored by a [`KeyValueStore`](crate::traits::KeyValueStore)
pub fn encode<T: Serialize>(value: &T) -> Result<String, TodoError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode the value stored under `key`
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, TodoError> {
    serde_json::from_str(raw)
        .map_err(|source| TodoError::Decode { key: key.to_string(), source })
}

/// Decode the value stored under `key`, falling back to an empty value when there is nothing to decode or when it cannot be decoded
pub fn decode_or_default<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    match raw {
        None => {
            log::debug!("Nothing stored under {:?}", key);
            T::default()
        },
        Some(raw) => match decode(key, raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{}. Using an empty value instead", err);
                T::default()
            },
        },
    }
}
