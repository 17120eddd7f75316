use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use propertypros_types::api::{Claims, Page, SaveUserRequest, UpdateRoleRequest};
use propertypros_types::models::User;
use propertypros_types::results::{DeleteResult, UpdateResult, UserUpsert};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_admin;
use crate::with_db;

pub async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = with_db(&state, move |db| db.list_users(page)).await?;
    Ok(Json(users))
}

/// GET /users/{email} — `null` when no such user.
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(email), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<Option<User>>, ApiError> {
    let user = with_db(&state, move |db| db.get_user_by_email(&email)).await?;
    Ok(Json(user))
}

/// PUT /users — called by the client after every sign-in.
pub async fn save_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SaveUserRequest>, ApiError>,
) -> Result<Json<UserUpsert>, ApiError> {
    if req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    let outcome = with_db(&state, move |db| db.upsert_user_status(&req)).await?;
    Ok(Json(outcome))
}

/// PATCH /users/{email} — admin role/status change; `fraud` removes listings.
pub async fn update_user_role(
    State(state): State<AppState>,
    WithRejection(Path(email), _): WithRejection<Path<String>, ApiError>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(change), _): WithRejection<Json<UpdateRoleRequest>, ApiError>,
) -> Result<Json<UpdateResult>, ApiError> {
    let admin = require_admin(&state, &claims).await?;
    if change.is_empty() {
        return Err(ApiError::BadRequest("status or role is required".into()));
    }

    info!("{} changing {} to {:?}", admin.email, email, change);
    let result = with_db(&state, move |db| db.update_user_role(&email, &change)).await?;
    Ok(Json(result))
}

pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeleteResult>, ApiError> {
    require_admin(&state, &claims).await?;
    let result = with_db(&state, move |db| db.delete_user(id)).await?;
    Ok(Json(result))
}
