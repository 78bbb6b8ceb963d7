//! Serde helpers for partial-update (PATCH-style) request bodies.
//!
//! A plain `Option<T>` cannot tell `{"field": null}` apart from a missing
//! field. Nullable columns that a patch must be able to clear are declared as
//! `Option<Option<T>>` with `#[serde(default, deserialize_with = "patch::nullable")]`:
//!
//! - field absent -> `None` (leave unchanged)
//! - field `null` -> `Some(None)` (clear)
//! - field value  -> `Some(Some(v))` (set)

use serde::{Deserialize, Deserializer};

/// Deserialize a present-but-possibly-null field into `Some(Option<T>)`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::nullable")]
        thumbnail: Option<Option<String>>,
    }

    #[test]
    fn absent_field_is_none() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.thumbnail, None);
    }

    #[test]
    fn null_field_is_some_none() {
        let p: Patch = serde_json::from_str(r#"{"thumbnail": null}"#).unwrap();
        assert_eq!(p.thumbnail, Some(None));
    }

    #[test]
    fn value_field_is_some_some() {
        let p: Patch = serde_json::from_str(r#"{"thumbnail": "http://x/t.jpg"}"#).unwrap();
        assert_eq!(p.thumbnail, Some(Some("http://x/t.jpg".to_string())));
    }
}
