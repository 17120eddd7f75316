use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{PropertyStatus, Role, UserStatus};

// -- Session claims --

/// Signed session payload. The identity is whatever the client posted at
/// sign-in (typically `{ "email": ... }`); only `exp` is owned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    pub exp: usize,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// -- Pagination --

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

impl Page {
    pub fn limit(&self) -> u32 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

// -- Users --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UpdateRoleRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.role.is_none()
    }
}

// -- Properties --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub agent_name: String,
    pub agent_email: String,
    #[serde(default)]
    pub agent_image: Option<String>,
    #[serde(default)]
    pub price_range: Vec<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields an agent may edit. `status` is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetPropertyStatusRequest {
    pub status: PropertyStatus,
}

// -- Wishlist --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishlistItem {
    pub property_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub agent_image: Option<String>,
    #[serde(default)]
    pub price_range: Vec<f64>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse<T> {
    pub message: &'static str,
    pub result: T,
}

// -- Offers --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
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
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOfferRequest {
    pub status: String,
}

// -- Reviews --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub property_id: String,
    #[serde(default)]
    pub property_title: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_image: Option<String>,
    pub review_description: String,
    #[serde(default)]
    pub review_time: String,
    pub user_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_capped() {
        let page: Page = serde_json::from_value(serde_json::json!({ "limit": 10_000 })).unwrap();
        assert_eq!(page.limit(), MAX_PAGE_SIZE);
        assert_eq!(page.skip, 0);

        let page: Page = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(page.limit(), DEFAULT_PAGE_SIZE);
    }
}
