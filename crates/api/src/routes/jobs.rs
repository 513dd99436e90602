use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/admin/jobs`.
///
/// ```text
/// GET    /                -> list_jobs
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(jobs::list_jobs))
}
