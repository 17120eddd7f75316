use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use propertypros_types::api::{Claims, NewProperty, Page, PropertyUpdate, SetPropertyStatusRequest};
use propertypros_types::models::Property;
use propertypros_types::results::{DeleteResult, InsertOneResult, UpdateResult};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_admin;
use crate::with_db;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    pub agent_email: Option<String>,
}

pub async fn list_properties(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PropertyQuery>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let agent_email = query.agent_email.filter(|e| !e.is_empty());
    let properties = with_db(&state, move |db| db.list_properties(agent_email.as_deref(), page)).await?;
    Ok(Json(properties))
}

pub async fn get_property(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Property>, ApiError> {
    with_db(&state, move |db| db.get_property(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("property"))
}

pub async fn create_property(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(new), _): WithRejection<Json<NewProperty>, ApiError>,
) -> Result<(StatusCode, Json<InsertOneResult>), ApiError> {
    if new.title.trim().is_empty() || new.agent_email.trim().is_empty() {
        return Err(ApiError::BadRequest("title and agentEmail are required".into()));
    }

    let agent = new.agent_email.clone();
    let result = with_db(&state, move |db| db.insert_property(new)).await?;
    info!(
        "Property {} listed for {} by {}",
        result.inserted_id,
        agent,
        claims.email().unwrap_or("unknown")
    );
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn update_property(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
    WithRejection(Json(update), _): WithRejection<Json<PropertyUpdate>, ApiError>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = with_db(&state, move |db| db.update_property(id, &update)).await?;
    Ok(Json(result))
}

/// PATCH /properties/{id}/status — admin verification.
pub async fn set_property_status(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<SetPropertyStatusRequest>, ApiError>,
) -> Result<Json<UpdateResult>, ApiError> {
    require_admin(&state, &claims).await?;
    let result = with_db(&state, move |db| db.set_property_status(id, req.status)).await?;
    Ok(Json(result))
}

pub async fn delete_property(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = with_db(&state, move |db| db.delete_property(id)).await?;
    Ok(Json(result))
}
