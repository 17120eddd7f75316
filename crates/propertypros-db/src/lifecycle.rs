//! Role changes and the one cross-collection invariant: an agent marked
//! `fraud` owns no listings.

use propertypros_types::api::UpdateRoleRequest;
use propertypros_types::models::{Role, User};
use propertypros_types::results::UpdateResult;
use tracing::{info, warn};

use crate::document::{self, Collection, Filter};
use crate::{Database, StoreError};

impl Database {
    /// Applies `{status, role}` to the user with `email`. A change to
    /// [`Role::Fraud`] also deletes every property listed under that email,
    /// in the same transaction as the role write.
    pub fn update_user_role(&self, email: &str, change: &UpdateRoleRequest) -> Result<UpdateResult, StoreError> {
        let filter = Filter::field("email", email);
        let set = document::to_set(change)?;

        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            if document::find_one::<User>(&tx, &filter)?.is_none() {
                return Err(StoreError::NotFound("user"));
            }

            let result = document::update_one(&tx, Collection::Users, &filter, &set, false)?;
            if result.modified_count == 0 {
                return Err(StoreError::UpdateFailed("user"));
            }

            if change.role == Some(Role::Fraud) {
                let removed = document::delete_many(
                    &tx,
                    Collection::Properties,
                    &Filter::field("agentEmail", email),
                )?;
                warn!(
                    "User {} marked fraud, removed {} listings",
                    email, removed.deleted_count
                );
            }

            tx.commit()?;
            Ok(result)
        })
    }

    /// Deletes listings still owned by fraud users. Run once at startup to
    /// repair data written before role changes were transactional.
    pub fn purge_fraud_listings(&self) -> Result<u64, StoreError> {
        let removed = self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM properties
                 WHERE json_extract(body, '$.agentEmail') IN (
                     SELECT json_extract(body, '$.email') FROM users
                     WHERE json_extract(body, '$.role') = ?1
                 )",
                [Role::Fraud.as_str()],
            )?;
            Ok(n as u64)
        })?;

        if removed > 0 {
            info!("Purged {} listings owned by fraud users", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use propertypros_types::api::{NewProperty, Page, SaveUserRequest};
    use propertypros_types::models::{Property, PropertyStatus, UserStatus};
    use uuid::Uuid;

    fn save(db: &Database, email: &str) {
        db.upsert_user_status(&SaveUserRequest {
            email: email.into(),
            name: None,
            image: None,
            role: Some(Role::Agent),
            status: Some(UserStatus::Verified),
        })
        .unwrap();
    }

    fn list(db: &Database, agent_email: &str) {
        db.insert_property(NewProperty {
            title: "Listing".into(),
            location: String::new(),
            image_url: String::new(),
            agent_name: String::new(),
            agent_email: agent_email.into(),
            agent_image: None,
            price_range: vec![],
            description: None,
        })
        .unwrap();
    }

    fn fraud() -> UpdateRoleRequest {
        UpdateRoleRequest {
            status: None,
            role: Some(Role::Fraud),
        }
    }

    #[test]
    fn fraud_removes_every_listing_of_that_agent() {
        let db = Database::open_in_memory().unwrap();
        save(&db, "bad@x.com");
        save(&db, "good@x.com");
        for _ in 0..3 {
            list(&db, "bad@x.com");
        }
        list(&db, "good@x.com");

        let result = db.update_user_role("bad@x.com", &fraud()).unwrap();
        assert_eq!(result.modified_count, 1);

        assert!(db.list_properties(Some("bad@x.com"), Page::default()).unwrap().is_empty());
        assert_eq!(db.list_properties(Some("good@x.com"), Page::default()).unwrap().len(), 1);
        assert_eq!(db.get_user_by_email("bad@x.com").unwrap().unwrap().role, Role::Fraud);
    }

    #[test]
    fn other_role_changes_keep_listings() {
        let db = Database::open_in_memory().unwrap();
        save(&db, "a@x.com");
        list(&db, "a@x.com");

        let change = UpdateRoleRequest {
            status: Some(UserStatus::Verified),
            role: Some(Role::Admin),
        };
        db.update_user_role("a@x.com", &change).unwrap();
        assert_eq!(db.list_properties(Some("a@x.com"), Page::default()).unwrap().len(), 1);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.update_user_role("ghost@x.com", &fraud()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("user")));
    }

    #[test]
    fn unchanged_role_is_update_failed_and_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        save(&db, "a@x.com");
        db.update_user_role("a@x.com", &fraud()).unwrap();

        // A listing that slipped in after the first cascade survives the failed retry.
        list(&db, "a@x.com");
        let err = db.update_user_role("a@x.com", &fraud()).unwrap_err();
        assert!(matches!(err, StoreError::UpdateFailed("user")));
        assert_eq!(db.list_properties(Some("a@x.com"), Page::default()).unwrap().len(), 1);
    }

    #[test]
    fn purge_repairs_stale_listings() {
        let db = Database::open_in_memory().unwrap();
        save(&db, "bad@x.com");
        db.update_user_role("bad@x.com", &fraud()).unwrap();

        // Simulate a listing left behind by a non-transactional writer.
        db.with_conn(|conn| {
            document::insert(
                conn,
                &Property {
                    id: Uuid::new_v4(),
                    title: "Stale".into(),
                    location: String::new(),
                    image_url: String::new(),
                    agent_name: String::new(),
                    agent_email: "bad@x.com".into(),
                    agent_image: None,
                    price_range: vec![],
                    description: None,
                    status: PropertyStatus::Verified,
                    created_at: Utc::now(),
                },
            )
        })
        .unwrap();
        list(&db, "other@x.com");

        assert_eq!(db.purge_fraud_listings().unwrap(), 1);
        assert!(db.list_properties(Some("bad@x.com"), Page::default()).unwrap().is_empty());
        assert_eq!(db.purge_fraud_listings().unwrap(), 0);
    }
}
