use crate::calendar::{date_key, parse_date};
use crate::commands::{add_event, undo_event};
use crate::errors::{AppError, LedgerError};
use crate::models::{
    ActivityKind, AddEventRequest, AddEventResponse, Board, BoardQuery, Configuration, DraftView,
    NewActivityRequest, UndoRequest, UndoResponse,
};
use crate::state::AppState;
use crate::stats::build_board;
use crate::ui::{render_admin, render_failure, render_index};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::{error, info};

pub async fn index(State(state): State<AppState>, Query(query): Query<BoardQuery>) -> Html<String> {
    if let Err(err) = state.ledger().await {
        return Html(render_failure(&err.to_string()));
    }
    let date = query
        .date
        .as_deref()
        .and_then(parse_date)
        .unwrap_or_else(today);
    Html(render_index(&date_key(date)))
}

pub async fn admin() -> Html<String> {
    Html(render_admin())
}

pub async fn get_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<Board>, AppError> {
    let date = match query.date.as_deref() {
        Some(value) if !value.trim().is_empty() => {
            parse_date(value).ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))?
        }
        _ => today(),
    };
    let (config, log) = state.ledger().await?;
    let board = build_board(&config, &log, date, |id| state.controls.view(id));
    Ok(Json(board))
}

pub async fn post_event(
    State(state): State<AppState>,
    Json(payload): Json<AddEventRequest>,
) -> Result<(StatusCode, Json<AddEventResponse>), AppError> {
    let event = add_event(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddEventResponse {
            event_id: event.id,
            activity_id: event.activity_id,
            date: event.date,
            week: event.week,
        }),
    ))
}

pub async fn post_undo(
    State(state): State<AppState>,
    Json(payload): Json<UndoRequest>,
) -> Result<Json<UndoResponse>, AppError> {
    Ok(Json(undo_event(&state, payload).await?))
}

pub async fn get_config(State(state): State<AppState>) -> Result<Json<Configuration>, AppError> {
    Ok(Json(state.store.read_config().await?))
}

/// Starts a fresh draft from the saved document. Unsaved edits from any
/// earlier draft are not carried over.
pub async fn open_draft(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DraftView>), AppError> {
    state.ledger().await?;
    let config = state.store.read_config().await?;
    let draft_id = state.drafts.lock().await.open(config.clone());
    info!("admin draft {draft_id} opened");
    Ok((StatusCode::CREATED, Json(DraftView { draft_id, config })))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<String>,
) -> Result<Json<DraftView>, AppError> {
    let config = state.drafts.lock().await.get(&draft_id)?.config().clone();
    Ok(Json(DraftView { draft_id, config }))
}

pub async fn post_draft_activity(
    State(state): State<AppState>,
    Path((draft_id, kind)): Path<(String, String)>,
    Json(payload): Json<NewActivityRequest>,
) -> Result<Json<DraftView>, AppError> {
    let kind = parse_kind(&kind)?;
    let mut drafts = state.drafts.lock().await;
    let draft = drafts.get_mut(&draft_id)?;
    match kind {
        ActivityKind::Gain => {
            draft.add_gain(&payload.name, &payload.points, payload.max_per_week.as_deref())?;
        }
        ActivityKind::Loss => {
            draft.add_loss(&payload.name, &payload.points)?;
        }
    }
    let config = draft.config().clone();
    Ok(Json(DraftView { draft_id, config }))
}

pub async fn delete_draft_activity(
    State(state): State<AppState>,
    Path((draft_id, kind, index)): Path<(String, String, usize)>,
) -> Result<Json<DraftView>, AppError> {
    let kind = parse_kind(&kind)?;
    let mut drafts = state.drafts.lock().await;
    let draft = drafts.get_mut(&draft_id)?;
    draft.remove(kind, index)?;
    let config = draft.config().clone();
    Ok(Json(DraftView { draft_id, config }))
}

/// Writes the draft as the whole configuration document.
pub async fn save_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<String>,
) -> Result<Json<Configuration>, AppError> {
    let config = state.drafts.lock().await.get(&draft_id)?.config().clone();
    if let Err(err) = state.store.write_config(&config).await {
        error!("failed to save configuration: {err}");
        return Err(err.into());
    }
    state.replace_config(config.clone()).await;
    info!("ledger configuration replaced from draft {draft_id}");
    Ok(Json(config))
}

fn parse_kind(value: &str) -> Result<ActivityKind, LedgerError> {
    ActivityKind::parse(value)
        .ok_or_else(|| LedgerError::NotFound(format!("unknown activity kind '{value}'")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
