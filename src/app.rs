use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/success", get(handlers::success))
        .route("/api/grid", get(handlers::get_grid))
        .route("/api/pointer", post(handlers::pointer))
        .route("/api/brush", post(handlers::set_brush))
        .route("/api/members", post(handlers::add_member))
        .route(
            "/api/members/:index",
            put(handlers::update_member).delete(handlers::remove_member),
        )
        .route("/api/submit", post(handlers::submit))
        .with_state(state)
}
