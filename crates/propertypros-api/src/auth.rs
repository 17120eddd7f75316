use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};
use tracing::{info, warn};

use propertypros_db::Database;
use propertypros_types::api::{Claims, SuccessResponse};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Production mode: `Secure` + `SameSite=None` session cookies.
    pub secure_cookies: bool,
}

pub const SESSION_COOKIE: &str = "token";
const TOKEN_LIFETIME_DAYS: i64 = 365;

/// Signs `identity` as-is, adding only the expiry.
pub fn create_token(secret: &str, mut identity: Map<String, Value>) -> jsonwebtoken::errors::Result<String> {
    identity.remove("exp");
    let claims = Claims {
        identity,
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    // The identity is client-shaped; an `aud` inside it is not ours to check.
    let mut validation = Validation::default();
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!("Session token rejected: {}", e);
        ApiError::Unauthorized
    })
}

fn same_site(secure: bool) -> SameSite {
    if secure { SameSite::None } else { SameSite::Strict }
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(same_site(secure))
        .max_age(time::Duration::days(TOKEN_LIFETIME_DAYS))
        .path("/")
        .build()
}

pub fn logout_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(same_site(secure))
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

/// POST /session — body is the identity to sign, usually `{ "email": ... }`.
pub async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(identity), _): WithRejection<Json<Map<String, Value>>, ApiError>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let token = create_token(&state.jwt_secret, identity).map_err(|e| ApiError::Internal(e.to_string()))?;
    let jar = jar.add(session_cookie(token, state.secure_cookies));
    Ok((jar, Json(SuccessResponse { success: true })))
}

/// GET /session — the logout route.
pub async fn end_session(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.add(logout_cookie(state.secure_cookies));
    info!("Logout successful");
    (jar, Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn token_roundtrip_preserves_identity() {
        let claims = identity(json!({ "email": "r@x.com", "name": "Rahim", "uid": 7 }));
        let token = create_token("secret", claims.clone()).unwrap();

        let decoded = verify_token("secret", &token).unwrap();
        assert_eq!(decoded.identity, claims);
        assert_eq!(decoded.email(), Some("r@x.com"));
        assert!((decoded.exp as i64) > chrono::Utc::now().timestamp() + 364 * 24 * 3600);
    }

    #[test]
    fn client_supplied_expiry_is_replaced() {
        let token = create_token("secret", identity(json!({ "email": "r@x.com", "exp": 1 }))).unwrap();
        let decoded = verify_token("secret", &token).unwrap();
        assert!(!decoded.identity.contains_key("exp"));
        assert!(decoded.exp > 1);
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = create_token("secret", identity(json!({ "email": "r@x.com" }))).unwrap();
        assert!(matches!(verify_token("other", &token), Err(ApiError::Unauthorized)));
        assert!(matches!(verify_token("secret", "not-a-token"), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn cookie_attributes_follow_mode() {
        let dev = session_cookie("t".into(), false);
        assert_eq!(dev.http_only(), Some(true));
        assert_eq!(dev.secure(), Some(false));
        assert_eq!(dev.same_site(), Some(SameSite::Strict));
        assert_eq!(dev.max_age(), Some(time::Duration::days(365)));
        assert_eq!(dev.path(), Some("/"));

        let prod = session_cookie("t".into(), true);
        assert_eq!(prod.secure(), Some(true));
        assert_eq!(prod.same_site(), Some(SameSite::None));

        assert_eq!(logout_cookie(false).max_age(), Some(time::Duration::seconds(0)));
    }
}
