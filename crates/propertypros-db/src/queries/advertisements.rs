use propertypros_types::api::Page;
use propertypros_types::models::Advertisement;
use propertypros_types::results::InsertOneResult;
use uuid::Uuid;

use crate::document::{self, Filter};
use crate::{Database, StoreError};

impl Database {
    pub fn list_advertisements(&self, page: Page) -> Result<Vec<Advertisement>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::all(), page))
    }

    pub fn get_advertisement(&self, id: Uuid) -> Result<Option<Advertisement>, StoreError> {
        self.with_conn(|conn| document::find_one(conn, &Filter::by_id(id)))
    }

    /// Featured listings are curated out of band; there is no HTTP route for this.
    pub fn insert_advertisement(&self, ad: &Advertisement) -> Result<InsertOneResult, StoreError> {
        self.with_conn(|conn| document::insert(conn, ad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(title: &str) -> Advertisement {
        Advertisement {
            id: Uuid::new_v4(),
            title: title.into(),
            location: "Dhaka".into(),
            image_url: String::new(),
            price_range: vec![100.0, 200.0],
            agent_name: None,
            description: None,
        }
    }

    #[test]
    fn curated_ads_are_listed_and_fetched() {
        let db = Database::open_in_memory().unwrap();
        let first = ad("Lake view");
        let result = db.insert_advertisement(&first).unwrap();
        assert_eq!(result.inserted_id, first.id);
        db.insert_advertisement(&ad("Penthouse")).unwrap();

        let listed = db.list_advertisements(Page::default()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], first);

        let paged = db.list_advertisements(Page { limit: 1, skip: 1 }).unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].title, "Penthouse");

        assert_eq!(db.get_advertisement(first.id).unwrap(), Some(first));
        assert_eq!(db.get_advertisement(Uuid::new_v4()).unwrap(), None);
    }
}
