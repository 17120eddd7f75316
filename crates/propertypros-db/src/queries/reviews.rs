use chrono::Utc;
use propertypros_types::api::{NewReview, Page};
use propertypros_types::models::Review;
use propertypros_types::results::{DeleteResult, InsertOneResult};
use uuid::Uuid;

use crate::document::{self, Collection, Filter};
use crate::{Database, StoreError};

impl Database {
    /// The `propertyId` reference is stored as given; it is not checked.
    pub fn add_review(&self, new: NewReview) -> Result<InsertOneResult, StoreError> {
        let review = Review {
            id: Uuid::new_v4(),
            property_id: new.property_id,
            property_title: new.property_title,
            agent_name: new.agent_name,
            reviewer_name: new.reviewer_name,
            reviewer_image: new.reviewer_image,
            review_description: new.review_description,
            review_time: new.review_time,
            user_email: new.user_email,
            created_at: Utc::now(),
        };
        self.with_conn(|conn| document::insert(conn, &review))
    }

    pub fn list_reviews(&self, page: Page) -> Result<Vec<Review>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::all(), page))
    }

    pub fn get_review(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        self.with_conn(|conn| document::find_one(conn, &Filter::by_id(id)))
    }

    pub fn reviews_for_property(&self, property_id: &str, page: Page) -> Result<Vec<Review>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::field("propertyId", property_id), page))
    }

    pub fn reviews_by_user(&self, email: &str, page: Page) -> Result<Vec<Review>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::field("userEmail", email), page))
    }

    pub fn delete_review(&self, id: Uuid) -> Result<DeleteResult, StoreError> {
        self.with_conn(|conn| {
            let result = document::delete_one(conn, Collection::Reviews, &Filter::by_id(id))?;
            if result.deleted_count == 0 {
                return Err(StoreError::NotFound("review"));
            }
            Ok(result)
        })
    }
}
