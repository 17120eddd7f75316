use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

// Shapes mirror what document-store drivers report, so clients written
// against the previous backend keep working.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertOneResult {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Uuid>,
}

impl UpdateResult {
    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: u64::from(modified),
            ..Self::unmatched()
        }
    }

    pub fn upserted(id: Uuid) -> Self {
        Self {
            upserted_count: 1,
            upserted_id: Some(id),
            ..Self::unmatched()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Outcome of saving a user at sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserUpsert {
    /// First save; the user document was created.
    Inserted(UpdateResult),
    /// Existing user asked to become an agent.
    StatusRequested(UpdateResult),
    /// Existing user signed in again; nothing was written.
    Unchanged(User),
}
