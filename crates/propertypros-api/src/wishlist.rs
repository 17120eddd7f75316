use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use propertypros_types::api::{Claims, NewWishlistItem, Page, WishlistResponse};
use propertypros_types::models::WishlistItem;
use propertypros_types::results::{DeleteResult, InsertOneResult};

use crate::auth::AppState;
use crate::error::{ApiError, required};
use crate::with_db;

#[derive(Debug, Deserialize)]
pub struct WishlistQuery {
    pub user: Option<String>,
}

pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    WithRejection(Json(item), _): WithRejection<Json<NewWishlistItem>, ApiError>,
) -> Result<Json<WishlistResponse<InsertOneResult>>, ApiError> {
    let result = with_db(&state, move |db| db.add_to_wishlist(item)).await?;
    Ok(Json(WishlistResponse {
        message: "Property added to wishlist",
        result,
    }))
}

/// GET /wishlist?user=
pub async fn list_wishlist(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<WishlistQuery>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    let user = required(query.user, "user")?;
    let items = with_db(&state, move |db| db.wishlist_for_user(&user, page)).await?;
    Ok(Json(items))
}

pub async fn get_wishlist_item(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<WishlistItem>, ApiError> {
    with_db(&state, move |db| db.get_wishlist_item(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("wishlist item"))
}

pub async fn wishlist_by_email(
    State(state): State<AppState>,
    WithRejection(Path(email), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    let items = with_db(&state, move |db| db.wishlist_for_email(&email, page)).await?;
    Ok(Json(items))
}

pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<WishlistResponse<DeleteResult>>, ApiError> {
    let result = with_db(&state, move |db| db.remove_from_wishlist(id)).await?;
    Ok(Json(WishlistResponse {
        message: "Property removed from wishlist",
        result,
    }))
}
