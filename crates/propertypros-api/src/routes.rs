use axum::{
    Json, Router, middleware,
    routing::{get, patch, post, put},
};
use serde_json::{Value, json};

use crate::auth::{self, AppState};
use crate::middleware::require_session;
use crate::{advertisements, offers, properties, reviews, users, wishlist};

/// Full HTTP surface. Public reads and sign-in routes are open; everything
/// that writes on behalf of a user goes through [`require_session`].
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(|| async { "PropertyPros" }))
        .route("/health", get(health))
        .route("/session", post(auth::issue_session).get(auth::end_session))
        .route("/jwt", post(auth::issue_session))
        .route("/logout", get(auth::end_session))
        .route("/users", put(users::save_user))
        .route("/users/{email}", get(users::get_user))
        .route("/properties", get(properties::list_properties))
        .route("/properties/{id}", get(properties::get_property))
        .route("/advertisements", get(advertisements::list_advertisements))
        .route("/advertisements/{id}", get(advertisements::get_advertisement))
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews/{id}", get(reviews::get_review))
        .route("/reviews/property/{property_id}", get(reviews::reviews_for_property))
        .route("/reviews/user/{email}", get(reviews::reviews_by_user));

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{email}", patch(users::update_user_role).delete(users::delete_user))
        .route("/properties", post(properties::create_property))
        .route(
            "/properties/{id}",
            put(properties::update_property).delete(properties::delete_property),
        )
        .route("/properties/{id}/status", patch(properties::set_property_status))
        .route("/wishlist", post(wishlist::add_to_wishlist).get(wishlist::list_wishlist))
        .route(
            "/wishlist/{id}",
            get(wishlist::get_wishlist_item).delete(wishlist::remove_from_wishlist),
        )
        .route("/wishlist/byEmail/{email}", get(wishlist::wishlist_by_email))
        .route("/offers", post(offers::create_offer).get(offers::list_offers))
        .route("/offers/buyer", get(offers::buyer_offers))
        .route("/offers/{id}", get(offers::get_offer).patch(offers::update_offer_status))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/{id}", axum::routing::delete(reviews::delete_review))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
