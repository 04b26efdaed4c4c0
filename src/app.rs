use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/calendar/prev", post(handlers::prev_month))
        .route("/api/calendar/next", post(handlers::next_month))
        .route("/api/months/:month_key", get(handlers::get_month))
        .route(
            "/api/days/:date_key",
            get(handlers::get_day)
                .put(handlers::put_day)
                .delete(handlers::delete_day),
        )
        .route("/api/save", post(handlers::manual_save))
        .with_state(state)
}
