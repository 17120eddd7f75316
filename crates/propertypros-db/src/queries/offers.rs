use propertypros_types::api::{NewOffer, Page};
use propertypros_types::models::Offer;
use propertypros_types::results::{InsertOneResult, UpdateResult};
use serde_json::json;
use uuid::Uuid;

use crate::document::{self, Collection, Filter};
use crate::{Database, StoreError};

const INITIAL_OFFER_STATUS: &str = "pending";

impl Database {
    pub fn create_offer(&self, new: NewOffer) -> Result<InsertOneResult, StoreError> {
        let offer = Offer {
            id: Uuid::new_v4(),
            property_id: new.property_id,
            title: new.title,
            location: new.location,
            image_url: new.image_url,
            agent_name: new.agent_name,
            agent_email: new.agent_email,
            buyer_email: new.buyer_email,
            buyer_name: new.buyer_name,
            offered_amount: new.offered_amount,
            buying_date: new.buying_date,
            status: INITIAL_OFFER_STATUS.to_string(),
        };
        self.with_conn(|conn| document::insert(conn, &offer))
    }

    pub fn get_offer(&self, id: Uuid) -> Result<Option<Offer>, StoreError> {
        self.with_conn(|conn| document::find_one(conn, &Filter::by_id(id)))
    }

    pub fn offers_for_agent(&self, agent_email: &str, page: Page) -> Result<Vec<Offer>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::field("agentEmail", agent_email), page))
    }

    pub fn offers_for_buyer(&self, buyer_email: &str, page: Page) -> Result<Vec<Offer>, StoreError> {
        self.with_conn(|conn| document::find(conn, &Filter::field("buyerEmail", buyer_email), page))
    }

    /// Any status string is accepted; there is no enforced transition graph.
    pub fn update_offer_status(&self, id: Uuid, status: &str) -> Result<UpdateResult, StoreError> {
        let set = document::to_set(&json!({ "status": status }))?;
        self.with_conn(|conn| {
            let result = document::update_one(conn, Collection::Offers, &Filter::by_id(id), &set, false)?;
            if result.matched_count == 0 {
                return Err(StoreError::NotFound("offer"));
            }
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> NewOffer {
        NewOffer {
            property_id: "p1".into(),
            title: "Lake view".into(),
            location: String::new(),
            image_url: String::new(),
            agent_name: "Agent".into(),
            agent_email: "agent@x.com".into(),
            buyer_email: "buyer@x.com".into(),
            buyer_name: "Buyer".into(),
            offered_amount: 150.0,
            buying_date: "2026-10-01".into(),
        }
    }

    #[test]
    fn status_change_is_visible_to_agent_and_buyer() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_offer(offer()).unwrap().inserted_id;
        assert_eq!(db.get_offer(id).unwrap().unwrap().status, "pending");

        db.update_offer_status(id, "accepted").unwrap();

        let for_agent = db.offers_for_agent("agent@x.com", Page::default()).unwrap();
        let for_buyer = db.offers_for_buyer("buyer@x.com", Page::default()).unwrap();
        assert_eq!(for_agent[0].status, "accepted");
        assert_eq!(for_buyer[0].status, "accepted");
    }

    #[test]
    fn unknown_offer_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.update_offer_status(Uuid::new_v4(), "accepted").unwrap_err();
        assert!(matches!(err, StoreError::NotFound("offer")));
    }
}
