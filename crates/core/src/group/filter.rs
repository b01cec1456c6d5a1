use uuid::Uuid;

use super::types::Group;

/// Predicate applied when listing groups.
///
/// - `user` set: the user must be one of the group's players.
/// - `text` set: the group's name or description must contain the text.
/// - Both set: both predicates apply. Neither: every group matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    pub user: Option<Uuid>,
    pub text: Option<String>,
}

impl GroupFilter {
    /// A filter matching every group.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to groups the user plays in.
    pub fn with_player(mut self, user_id: Uuid) -> Self {
        self.user = Some(user_id);
        self
    }

    /// Restrict to groups whose name or description contains `text`.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns true if the group, with the given player IDs, passes the filter.
    pub fn matches(&self, group: &Group, player_ids: &[Uuid]) -> bool {
        self.user.is_none_or(|user| player_ids.contains(&user))
            && self
                .text
                .as_deref()
                .is_none_or(|text| matches_text(group, text))
    }
}

/// Case-insensitive containment check on a group's name and description.
pub fn matches_text(group: &Group, text: &str) -> bool {
    let needle = text.to_lowercase();
    group.name.to_lowercase().contains(&needle)
        || group.description.to_lowercase().contains(&needle)
}
