use chrono::Utc;
use propertypros_types::api::{NewProperty, Page, PropertyUpdate};
use propertypros_types::models::{Property, PropertyStatus, Role, User};
use propertypros_types::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde_json::json;
use uuid::Uuid;

use crate::document::{self, Collection, Filter};
use crate::{Database, StoreError};

impl Database {
    pub fn list_properties(&self, agent_email: Option<&str>, page: Page) -> Result<Vec<Property>, StoreError> {
        let filter = match agent_email {
            Some(email) => Filter::field("agentEmail", email),
            None => Filter::all(),
        };
        self.with_conn(|conn| document::find(conn, &filter, page))
    }

    pub fn get_property(&self, id: Uuid) -> Result<Option<Property>, StoreError> {
        self.with_conn(|conn| document::find_one(conn, &Filter::by_id(id)))
    }

    /// New listings always start out `pending` until an admin reviews them.
    /// Agents marked [`Role::Fraud`] cannot list; the check and the insert
    /// share the connection lock with the fraud cascade.
    pub fn insert_property(&self, new: NewProperty) -> Result<InsertOneResult, StoreError> {
        let property = Property {
            id: Uuid::new_v4(),
            title: new.title,
            location: new.location,
            image_url: new.image_url,
            agent_name: new.agent_name,
            agent_email: new.agent_email,
            agent_image: new.agent_image,
            price_range: new.price_range,
            description: new.description,
            status: PropertyStatus::Pending,
            created_at: Utc::now(),
        };
        self.with_conn(|conn| {
            let owner = document::find_one::<User>(conn, &Filter::field("email", property.agent_email.as_str()))?;
            if owner.is_some_and(|user| user.role == Role::Fraud) {
                return Err(StoreError::Forbidden("listing by a fraud agent"));
            }
            document::insert(conn, &property)
        })
    }

    pub fn update_property(&self, id: Uuid, update: &PropertyUpdate) -> Result<UpdateResult, StoreError> {
        let set = document::to_set(update)?;
        self.update_property_by_id(id, set)
    }

    pub fn set_property_status(&self, id: Uuid, status: PropertyStatus) -> Result<UpdateResult, StoreError> {
        let set = document::to_set(&json!({ "status": status }))?;
        self.update_property_by_id(id, set)
    }

    pub fn delete_property(&self, id: Uuid) -> Result<DeleteResult, StoreError> {
        self.with_conn(|conn| {
            let result = document::delete_one(conn, Collection::Properties, &Filter::by_id(id))?;
            if result.deleted_count == 0 {
                return Err(StoreError::NotFound("property"));
            }
            Ok(result)
        })
    }

    fn update_property_by_id(
        &self,
        id: Uuid,
        set: serde_json::Map<String, serde_json::Value>,
    ) -> Result<UpdateResult, StoreError> {
        self.with_conn(|conn| {
            let result = document::update_one(conn, Collection::Properties, &Filter::by_id(id), &set, false)?;
            if result.matched_count == 0 {
                return Err(StoreError::NotFound("property"));
            }
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propertypros_types::api::{SaveUserRequest, UpdateRoleRequest};

    fn new_property(agent_email: &str) -> NewProperty {
        NewProperty {
            title: "A".into(),
            location: String::new(),
            image_url: String::new(),
            agent_name: String::new(),
            agent_email: agent_email.into(),
            agent_image: None,
            price_range: vec![1.0, 2.0],
            description: None,
        }
    }

    #[test]
    fn inserted_property_is_pending() {
        let db = Database::open_in_memory().unwrap();
        let result = db.insert_property(new_property("a@x.com")).unwrap();

        let listed = db.list_properties(Some("a@x.com"), Page::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, result.inserted_id);
        assert_eq!(listed[0].status, PropertyStatus::Pending);
        assert_eq!(listed[0].price_range, vec![1.0, 2.0]);

        assert!(db.list_properties(Some("b@x.com"), Page::default()).unwrap().is_empty());
    }

    #[test]
    fn fraud_agent_cannot_relist() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_user_status(&SaveUserRequest {
            email: "bad@x.com".into(),
            name: None,
            image: None,
            role: Some(Role::Agent),
            status: None,
        })
        .unwrap();
        db.insert_property(new_property("bad@x.com")).unwrap();

        let fraud = UpdateRoleRequest {
            status: None,
            role: Some(Role::Fraud),
        };
        db.update_user_role("bad@x.com", &fraud).unwrap();

        let err = db.insert_property(new_property("bad@x.com")).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
        assert!(db.list_properties(Some("bad@x.com"), Page::default()).unwrap().is_empty());

        // Listings for emails with no user document are still accepted.
        db.insert_property(new_property("nobody@x.com")).unwrap();
    }

    #[test]
    fn agent_update_keeps_status() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_property(new_property("a@x.com")).unwrap().inserted_id;
        db.set_property_status(id, PropertyStatus::Verified).unwrap();

        let update = PropertyUpdate {
            title: Some("B".into()),
            ..Default::default()
        };
        let result = db.update_property(id, &update).unwrap();
        assert_eq!(result.modified_count, 1);

        let stored = db.get_property(id).unwrap().unwrap();
        assert_eq!(stored.title, "B");
        assert_eq!(stored.status, PropertyStatus::Verified);
    }

    #[test]
    fn missing_property_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();

        assert!(matches!(db.delete_property(id), Err(StoreError::NotFound("property"))));
        assert!(matches!(
            db.set_property_status(id, PropertyStatus::Rejected),
            Err(StoreError::NotFound("property"))
        ));
    }
}
