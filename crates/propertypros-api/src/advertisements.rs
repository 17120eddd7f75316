use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use propertypros_types::api::Page;
use propertypros_types::models::Advertisement;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::with_db;

pub async fn list_advertisements(
    State(state): State<AppState>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> Result<Json<Vec<Advertisement>>, ApiError> {
    let ads = with_db(&state, move |db| db.list_advertisements(page)).await?;
    Ok(Json(ads))
}

pub async fn get_advertisement(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Advertisement>, ApiError> {
    with_db(&state, move |db| db.get_advertisement(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("advertisement"))
}
