use crate::activity::{DayEntries, Entry};
use crate::calendar::{CalendarView, describe_day};
use crate::errors::AppError;
use crate::keys::{DateKey, MonthKey};
use crate::models::{CalendarResponse, DayResponse, EntryRequest, SaveResponse, ViewQuery};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot().await;
    let grid = snapshot.view.grid();
    Html(render_index(&CalendarResponse::build(
        snapshot.view,
        &grid,
        &snapshot.log,
    )))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    match (query.year, query.month) {
        (None, None) => {}
        (Some(year), Some(month)) => {
            let view = CalendarView::new(year, month)
                .ok_or_else(|| AppError::bad_request("month must be between 0 and 11"))?;
            state.show(view).await;
        }
        _ => return Err(AppError::bad_request("year and month must be given together")),
    }

    Ok(Json(calendar_response(&state).await))
}

pub async fn prev_month(State(state): State<AppState>) -> Json<CalendarResponse> {
    state.show_prev().await;
    Json(calendar_response(&state).await)
}

pub async fn next_month(State(state): State<AppState>) -> Json<CalendarResponse> {
    state.show_next().await;
    Json(calendar_response(&state).await)
}

pub async fn get_month(
    State(state): State<AppState>,
    Path(month_key): Path<String>,
) -> Result<Json<DayEntries>, AppError> {
    if MonthKey::parse(&month_key).is_none() {
        return Err(AppError::not_found(format!("unknown month {month_key}")));
    }
    let snapshot = state.snapshot().await;
    Ok(Json(snapshot.log.month_data(&month_key).clone()))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date_key): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let Some(key) = DateKey::parse(&date_key) else {
        return Err(AppError::not_found(format!("unknown day {date_key}")));
    };
    let snapshot = state.snapshot().await;
    let entry = snapshot
        .log
        .lookup(&date_key)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("nothing logged on {date_key}")))?;

    Ok(Json(DayResponse {
        title: describe_day(&key),
        date_key,
        entry: Some(entry),
    }))
}

pub async fn put_day(
    State(state): State<AppState>,
    Path(date_key): Path<String>,
    Json(payload): Json<EntryRequest>,
) -> Json<DayResponse> {
    let entry = Entry::from(payload);
    let log = state.save_day(&date_key, entry).await;
    let entry = log.lookup(&date_key).cloned();
    info!(%date_key, stored = entry.is_some(), "day saved");
    Json(day_response(date_key, entry))
}

pub async fn delete_day(
    State(state): State<AppState>,
    Path(date_key): Path<String>,
) -> Json<DayResponse> {
    state.clear_day(&date_key).await;
    info!(%date_key, "day cleared");
    Json(day_response(date_key, None))
}

pub async fn manual_save(State(state): State<AppState>) -> Json<SaveResponse> {
    let saved = state.manual_save().await;
    let entries = state.snapshot().await.log.entry_count();
    info!(saved, entries, "manual save");
    Json(SaveResponse { saved, entries })
}

async fn calendar_response(state: &AppState) -> CalendarResponse {
    let snapshot = state.snapshot().await;
    CalendarResponse::build(snapshot.view, &snapshot.view.grid(), &snapshot.log)
}

fn day_response(date_key: String, entry: Option<Entry>) -> DayResponse {
    let title = DateKey::parse(&date_key)
        .map(|key| describe_day(&key))
        .unwrap_or_else(|| date_key.clone());
    DayResponse {
        date_key,
        title,
        entry,
    }
}
