use serde::Deserialize;
use uuid::Uuid;

use crate::serde::deserialize_optional_uuid;

/// Query parameters for listing pending requests (GET /group-requests).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListGroupRequestsQuery {
    /// Only requests for groups mastered by this user.
    #[serde(
        default,
        alias = "masterId",
        deserialize_with = "deserialize_optional_uuid"
    )]
    pub master: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_accepts_both_spellings() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        let expected = Uuid::parse_str(id).ok();

        let query: ListGroupRequestsQuery =
            serde_json::from_str(&format!(r#"{{"master": "{id}"}}"#)).unwrap();
        assert_eq!(query.master, expected);

        let query: ListGroupRequestsQuery =
            serde_json::from_str(&format!(r#"{{"masterId": "{id}"}}"#)).unwrap();
        assert_eq!(query.master, expected);
    }

    #[test]
    fn test_master_missing() {
        let query: ListGroupRequestsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.master.is_none());
    }
}
