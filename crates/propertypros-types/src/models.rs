use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marketplace role. `Fraud` is terminal for an agent: their listings are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Buyer,
    Agent,
    Admin,
    Fraud,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Agent => "agent",
            Self::Admin => "admin",
            Self::Fraud => "fraud",
        }
    }
}

/// Agent-upgrade request state, spelled the way the web client stores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    #[serde(alias = "none")]
    None,
    #[serde(alias = "requested")]
    Requested,
    #[serde(alias = "verified")]
    Verified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    /// Milliseconds since the Unix epoch at first save. Zero for documents
    /// written by hand.
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub agent_name: String,
    pub agent_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_image: Option<String>,
    #[serde(default)]
    pub price_range: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
}

/// Featured listing shown on the landing page. Curated directly in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub price_range: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Denormalized copy of a listing saved by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub property_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_image: Option<String>,
    #[serde(default)]
    pub price_range: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub property_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub agent_name: String,
    pub agent_email: String,
    pub buyer_email: String,
    #[serde(default)]
    pub buyer_name: String,
    pub offered_amount: f64,
    #[serde(default)]
    pub buying_date: String,
    /// Free-form; the client drives transitions (pending, accepted, rejected, bought).
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub property_id: String,
    #[serde(default)]
    pub property_title: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_image: Option<String>,
    pub review_description: String,
    #[serde(default)]
    pub review_time: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}
