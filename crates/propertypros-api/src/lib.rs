pub mod advertisements;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod offers;
pub mod properties;
pub mod reviews;
pub mod routes;
pub mod users;
pub mod wishlist;

use propertypros_db::{Database, StoreError};
use tracing::error;

use crate::auth::AppState;
use crate::error::ApiError;

/// Runs a blocking store call off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}
