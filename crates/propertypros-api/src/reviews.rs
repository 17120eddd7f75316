use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use propertypros_types::api::{Claims, NewReview, Page};
use propertypros_types::models::Review;
use propertypros_types::results::{DeleteResult, InsertOneResult};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::with_db;

pub async fn create_review(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    WithRejection(Json(new), _): WithRejection<Json<NewReview>, ApiError>,
) -> Result<(StatusCode, Json<InsertOneResult>), ApiError> {
    if new.review_description.trim().is_empty() {
        return Err(ApiError::BadRequest("reviewDescription is required".into()));
    }
    let result = with_db(&state, move |db| db.add_review(new)).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = with_db(&state, move |db| db.list_reviews(page)).await?;
    Ok(Json(reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Review>, ApiError> {
    with_db(&state, move |db| db.get_review(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("review"))
}

pub async fn reviews_for_property(
    State(state): State<AppState>,
    WithRejection(Path(property_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = with_db(&state, move |db| db.reviews_for_property(&property_id, page)).await?;
    Ok(Json(reviews))
}

pub async fn reviews_by_user(
    State(state): State<AppState>,
    WithRejection(Path(email), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = with_db(&state, move |db| db.reviews_by_user(&email, page)).await?;
    Ok(Json(reviews))
}

pub async fn delete_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = with_db(&state, move |db| db.delete_review(id)).await?;
    Ok(Json(result))
}
