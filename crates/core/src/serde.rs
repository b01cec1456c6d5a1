//! Serde helper functions for request deserialization.
//!
//! Clients routinely send empty strings for fields they leave blank. These
//! helpers fold them into `None` so the validators report them as missing
//! instead of the extractor rejecting the whole body.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional UUID, treating empty strings as None.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => Uuid::parse_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize an optional positive integer from either a number or a
/// numeric string (query strings only carry strings).
pub fn deserialize_optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        uuid_field: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_u32")]
        number_field: Option<u32>,
    }

    #[test]
    fn test_deserialize_optional_string_empty() {
        let json = r#"{"string_field": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_whitespace() {
        let json = r#"{"string_field": "   "}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, None);
    }

    #[test]
    fn test_deserialize_optional_string_value() {
        let json = r#"{"string_field": "hello"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.string_field, Some("hello".to_string()));
    }

    #[test]
    fn test_deserialize_optional_string_missing() {
        let result: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(result.string_field, None);
        assert_eq!(result.uuid_field, None);
        assert_eq!(result.number_field, None);
    }

    #[test]
    fn test_deserialize_optional_uuid_valid() {
        let json = r#"{"uuid_field": "550e8400-e29b-41d4-a716-446655440000"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.uuid_field,
            Some(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap())
        );
    }

    #[test]
    fn test_deserialize_optional_uuid_empty() {
        let json = r#"{"uuid_field": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.uuid_field, None);
    }

    #[test]
    fn test_deserialize_optional_uuid_invalid() {
        let json = r#"{"uuid_field": "not-a-uuid"}"#;
        let result: Result<TestStruct, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_optional_u32_from_number_and_string() {
        let result: TestStruct = serde_json::from_str(r#"{"number_field": 3}"#).unwrap();
        assert_eq!(result.number_field, Some(3));

        let result: TestStruct = serde_json::from_str(r#"{"number_field": "12"}"#).unwrap();
        assert_eq!(result.number_field, Some(12));
    }

    #[test]
    fn test_deserialize_optional_u32_invalid() {
        let result: Result<TestStruct, _> = serde_json::from_str(r#"{"number_field": "abc"}"#);
        assert!(result.is_err());
    }
}
