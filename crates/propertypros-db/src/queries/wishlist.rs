use propertypros_types::api::{NewWishlistItem, Page};
use propertypros_types::models::WishlistItem;
use propertypros_types::results::{DeleteResult, InsertOneResult};
use uuid::Uuid;

use crate::document::{self, Collection, Filter};
use crate::{Database, StoreError};

impl Database {
    // Saving the same listing twice creates two entries.
    pub fn add_to_wishlist(&self, new: NewWishlistItem) -> Result<InsertOneResult, StoreError> {
        let item = WishlistItem {
            id: Uuid::new_v4(),
            property_id: new.property_id,
            title: new.title,
            location: new.location,
            image_url: new.image_url,
            agent_name: new.agent_name,
            agent_image: new.agent_image,
            price_range: new.price_range,
            user: new.user,
            user_email: new.user_email,
        };
        self.with_conn(|conn| document::insert(conn, &item))
    }

    pub fn get_wishlist_item(&self, id: Uuid) -> Result<Option<WishlistItem>, StoreError> {
        self.with_conn(|conn| document::find_one(conn, &Filter::by_id(id)))
    }

    pub fn wishlist_for_user(&self, user: &str, page: Page) -> Result<Vec<WishlistItem>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::field("user", user), page))
    }

    pub fn wishlist_for_email(&self, email: &str, page: Page) -> Result<Vec<WishlistItem>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::field("userEmail", email), page))
    }

    pub fn remove_from_wishlist(&self, id: Uuid) -> Result<DeleteResult, StoreError> {
        self.with_conn(|conn| {
            let result = document::delete_one(conn, Collection::Wishlist, &Filter::by_id(id))?;
            if result.deleted_count == 0 {
                return Err(StoreError::NotFound("wishlist item"));
            }
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(property_id: &str, email: &str) -> NewWishlistItem {
        NewWishlistItem {
            property_id: property_id.into(),
            title: "Lake view".into(),
            location: String::new(),
            image_url: String::new(),
            agent_name: String::new(),
            agent_image: None,
            price_range: vec![],
            user: Some("uid-1".into()),
            user_email: Some(email.into()),
        }
    }

    #[test]
    fn duplicates_are_kept() {
        let db = Database::open_in_memory().unwrap();
        db.add_to_wishlist(item("p1", "u@x.com")).unwrap();
        db.add_to_wishlist(item("p1", "u@x.com")).unwrap();

        assert_eq!(db.wishlist_for_email("u@x.com", Page::default()).unwrap().len(), 2);
        assert_eq!(db.wishlist_for_user("uid-1", Page::default()).unwrap().len(), 2);
        assert!(db.wishlist_for_email("other@x.com", Page::default()).unwrap().is_empty());
    }

    #[test]
    fn remove_then_remove_again() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_to_wishlist(item("p1", "u@x.com")).unwrap().inserted_id;

        assert_eq!(db.remove_from_wishlist(id).unwrap().deleted_count, 1);
        assert!(matches!(db.remove_from_wishlist(id), Err(StoreError::NotFound(_))));
    }
}
