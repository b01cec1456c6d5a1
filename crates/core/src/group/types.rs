use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

/// A group moderated by its master, who is always one of its players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub location: String,
    pub chronic: String,
    #[serde(rename = "masterId")]
    pub master_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group with the given name, mastered by `master_id`.
    ///
    /// Descriptive fields start empty; use the builder methods to fill them.
    pub fn new(name: impl Into<String>, master_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            schedule: String::new(),
            location: String::new(),
            chronic: String::new(),
            master_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description for this group.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the schedule for this group.
    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = schedule.into();
        self
    }

    /// Sets the location for this group.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the chronic for this group.
    pub fn with_chronic(mut self, chronic: impl Into<String>) -> Self {
        self.chronic = chronic.into();
        self
    }

    /// Sets a specific ID for this group (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Returns true if the given user masters this group.
    pub fn is_master(&self, user_id: Uuid) -> bool {
        self.master_id == user_id
    }
}

/// A group with its master and players preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetails {
    #[serde(flatten)]
    pub group: Group,
    pub master: Option<User>,
    pub players: Vec<User>,
}

impl GroupDetails {
    /// Assembles a group with its master (looked up among the players) and players.
    pub fn new(group: Group, players: Vec<User>) -> Self {
        let master = players.iter().find(|p| p.id == group.master_id).cloned();
        Self {
            group,
            master,
            players,
        }
    }
}

/// The slice of a group embedded in group request listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    #[serde(rename = "masterId")]
    pub master_id: Uuid,
}

impl From<&Group> for GroupSummary {
    fn from(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            master_id: group.master_id,
        }
    }
}
