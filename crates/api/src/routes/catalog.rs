use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Media catalog, at the root like the backend exposes it.
pub fn router() -> Router<AppState> {
    Router::new().route("/catalog", get(catalog::get_catalog))
}
