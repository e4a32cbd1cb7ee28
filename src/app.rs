use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/nav", post(handlers::navigate))
        .route("/goals/add", post(handlers::goals_add))
        .route("/goals/toggle", post(handlers::goals_toggle))
        .route("/goals/delete", post(handlers::goals_delete))
        .route("/todos/add", post(handlers::todos_add))
        .route("/todos/toggle", post(handlers::todos_toggle))
        .route("/todos/delete", post(handlers::todos_delete))
        .route("/timer/configure", post(handlers::timer_configure))
        .route("/timer/start", post(handlers::timer_start))
        .route("/timer/stop", post(handlers::timer_stop))
        .route("/timer/resume", post(handlers::timer_resume))
        .route("/timer/reset", post(handlers::timer_reset))
        .route("/money/add", post(handlers::money_add))
        .route("/notes/save", post(handlers::notes_save))
        .route("/api/timer", get(handlers::timer_status))
        .route("/api/session", get(handlers::session_snapshot))
        .with_state(state)
}
