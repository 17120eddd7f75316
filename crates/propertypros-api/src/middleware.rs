use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use propertypros_types::api::Claims;
use propertypros_types::models::{Role, User};

use crate::auth::{AppState, SESSION_COOKIE, verify_token};
use crate::error::ApiError;
use crate::with_db;

/// Verifies the session cookie (or a bearer header) and attaches [`Claims`].
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let from_cookie = CookieJar::from_headers(req.headers())
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string());

    let token = from_cookie
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        })
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let claims = verify_token(&state.jwt_secret, &token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Resolves the caller's user document and requires the admin role.
pub async fn require_admin(state: &AppState, claims: &Claims) -> Result<User, ApiError> {
    let email = claims.email().ok_or(ApiError::Forbidden)?.to_string();
    let user = with_db(state, move |db| db.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::Forbidden)?;

    if user.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}
