use chrono::Utc;
use propertypros_types::api::{Page, SaveUserRequest};
use propertypros_types::models::{Role, User, UserStatus};
use propertypros_types::results::{DeleteResult, UserUpsert};
use serde_json::json;
use uuid::Uuid;

use crate::document::{self, Collection, Filter};
use crate::{Database, StoreError};

impl Database {
    pub fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::all(), page))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.with_conn(|conn| document::find_one(conn, &Filter::field("email", email)))
    }

    /// Saves a user at sign-in.
    ///
    /// | stored | request status | effect                         |
    /// |--------|----------------|--------------------------------|
    /// | yes    | `Requested`    | set `status`, return the result |
    /// | yes    | anything else  | no write, return stored user   |
    /// | no     | any            | insert with `timestamp = now`  |
    ///
    /// A first save may only claim `buyer` or `agent`; other roles are
    /// granted through [`Database::update_user_role`].
    pub fn upsert_user_status(&self, req: &SaveUserRequest) -> Result<UserUpsert, StoreError> {
        let filter = Filter::field("email", req.email.as_str());

        self.with_conn(|conn| {
            if let Some(existing) = document::find_one::<User>(conn, &filter)? {
                if req.status == Some(UserStatus::Requested) {
                    let set = document::to_set(&json!({ "status": UserStatus::Requested }))?;
                    let result = document::update_one(conn, Collection::Users, &filter, &set, false)?;
                    return Ok(UserUpsert::StatusRequested(result));
                }
                return Ok(UserUpsert::Unchanged(existing));
            }

            let role = req.role.unwrap_or_default();
            if !matches!(role, Role::Buyer | Role::Agent) {
                return Err(StoreError::Forbidden("self-assigned role"));
            }

            let set = document::to_set(&json!({
                "name": req.name,
                "image": req.image,
                "role": role,
                "status": req.status.unwrap_or_default(),
                "timestamp": Utc::now().timestamp_millis(),
            }))?;
            let result = document::update_one(conn, Collection::Users, &filter, &set, true)?;
            Ok(UserUpsert::Inserted(result))
        })
    }

    pub fn delete_user(&self, id: Uuid) -> Result<DeleteResult, StoreError> {
        self.with_conn(|conn| {
            let result = document::delete_one(conn, Collection::Users, &Filter::by_id(id))?;
            if result.deleted_count == 0 {
                return Err(StoreError::NotFound("user"));
            }
            Ok(result)
        })
    }
}
