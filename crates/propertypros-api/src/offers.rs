use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use propertypros_types::api::{Claims, NewOffer, Page, UpdateOfferRequest};
use propertypros_types::models::Offer;
use propertypros_types::results::{InsertOneResult, UpdateResult};

use crate::auth::AppState;
use crate::error::{ApiError, required};
use crate::with_db;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentQuery {
    pub agent_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerQuery {
    pub buyer_email: Option<String>,
}

pub async fn create_offer(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    WithRejection(Json(new), _): WithRejection<Json<NewOffer>, ApiError>,
) -> Result<(StatusCode, Json<InsertOneResult>), ApiError> {
    if !new.offered_amount.is_finite() || new.offered_amount < 0.0 {
        return Err(ApiError::BadRequest("offeredAmount must be a non-negative number".into()));
    }
    let result = with_db(&state, move |db| db.create_offer(new)).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /offers?agentEmail= — offers received on an agent's listings.
pub async fn list_offers(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<AgentQuery>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<Offer>>, ApiError> {
    let email = required(query.agent_email, "agentEmail")?;
    let offers = with_db(&state, move |db| db.offers_for_agent(&email, page)).await?;
    Ok(Json(offers))
}

/// GET /offers/buyer?buyerEmail=
pub async fn buyer_offers(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BuyerQuery>, ApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<Offer>>, ApiError> {
    let email = required(query.buyer_email, "buyerEmail")?;
    let offers = with_db(&state, move |db| db.offers_for_buyer(&email, page)).await?;
    Ok(Json(offers))
}

pub async fn get_offer(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Offer>, ApiError> {
    with_db(&state, move |db| db.get_offer(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("offer"))
}

pub async fn update_offer_status(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(_claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateOfferRequest>, ApiError>,
) -> Result<Json<UpdateResult>, ApiError> {
    if req.status.trim().is_empty() {
        return Err(ApiError::BadRequest("status is required".into()));
    }
    let result = with_db(&state, move |db| db.update_offer_status(id, &req.status)).await?;
    Ok(Json(result))
}
