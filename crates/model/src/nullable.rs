//! Serde helper for fields a Go server may send as `null`.
//!
//! Go encodes a nil slice or map as `null`. Apply with
//! `#[serde(default, deserialize_with = "crate::nullable::null_as_default")]`.

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Names {
        #[serde(default, deserialize_with = "super::null_as_default")]
        names: Vec<String>,
    }

    #[test]
    fn null_missing_and_present_values() {
        let null: Names = serde_json::from_str(r#"{"names":null}"#).unwrap();
        assert!(null.names.is_empty());

        let missing: Names = serde_json::from_str("{}").unwrap();
        assert!(missing.names.is_empty());

        let present: Names = serde_json::from_str(r#"{"names":["a","b"]}"#).unwrap();
        assert_eq!(present.names, vec!["a", "b"]);
    }
}
