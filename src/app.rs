use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/admin", get(handlers::admin))
        .route("/api/board", get(handlers::get_board))
        .route("/api/events", post(handlers::post_event))
        .route("/api/events/undo", post(handlers::post_undo))
        .route("/api/config", get(handlers::get_config))
        .route("/api/admin/drafts", post(handlers::open_draft))
        .route("/api/admin/drafts/:draft_id", get(handlers::get_draft))
        .route("/api/admin/drafts/:draft_id/save", post(handlers::save_draft))
        .route(
            "/api/admin/drafts/:draft_id/activities/:kind",
            post(handlers::post_draft_activity),
        )
        .route(
            "/api/admin/drafts/:draft_id/activities/:kind/:index",
            delete(handlers::delete_draft_activity),
        )
        .with_state(state)
}
