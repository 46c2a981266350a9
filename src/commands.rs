use crate::calendar::{date_key, parse_date, week_key};
use crate::errors::LedgerError;
use crate::models::{
    ActivityKind, AddEventRequest, Configuration, Event, NewEvent, UndoRequest, UndoResponse,
};
use crate::rules::check_gain;
use crate::state::AppState;
use chrono::NaiveDate;
use tracing::{error, info};

/// Builds the record to write for one occurrence, copying the activity's
/// current name and points. Nothing is written here.
pub fn plan_add(
    config: &Configuration,
    log: &[Event],
    activity_id: &str,
    kind: ActivityKind,
    date: NaiveDate,
) -> Result<NewEvent, LedgerError> {
    let (name, points) = match kind {
        ActivityKind::Gain => {
            let activity = config
                .gain(activity_id)
                .ok_or_else(|| unknown_activity(kind, activity_id))?;
            check_gain(activity, log, date)?;
            (activity.name.clone(), activity.points)
        }
        ActivityKind::Loss => {
            let activity = config
                .loss(activity_id)
                .ok_or_else(|| unknown_activity(kind, activity_id))?;
            (activity.name.clone(), activity.points)
        }
    };

    Ok(NewEvent {
        activity_id: activity_id.to_string(),
        name,
        points,
        date: date_key(date),
        week: week_key(date),
        kind,
    })
}

fn unknown_activity(kind: ActivityKind, activity_id: &str) -> LedgerError {
    LedgerError::validation(format!("unknown {kind} activity '{activity_id}'"))
}

/// The most recent event logged for `activity_id`, if any.
pub fn plan_undo<'a>(log: &'a [Event], activity_id: &str) -> Option<&'a Event> {
    log.iter()
        .filter(|event| event.activity_id == activity_id)
        .max_by_key(|event| event.timestamp)
}

pub fn undo_prompt(event: &Event) -> String {
    format!("Undo \"{}\"?", event.name)
}

pub async fn add_event(state: &AppState, request: AddEventRequest) -> Result<Event, LedgerError> {
    let kind = ActivityKind::parse(&request.kind)
        .ok_or_else(|| LedgerError::validation("kind must be 'gain' or 'loss'"))?;
    let date = parse_date(&request.date)
        .ok_or_else(|| LedgerError::validation("date must be YYYY-MM-DD"))?;

    let pending = state.controls.begin(&request.activity_id)?;
    let (config, log) = state.ledger().await?;
    let new = plan_add(&config, &log, &request.activity_id, kind, date)?;

    match state.store.insert_event(new).await {
        Ok(event) => {
            pending.resolve();
            info!("logged {} '{}' on {}", event.kind, event.activity_id, event.date);
            Ok(event)
        }
        Err(err) => {
            error!("failed to log '{}': {err}", request.activity_id);
            pending.fail(err.to_string());
            Err(err.into())
        }
    }
}

/// Without `confirm` this only reports what would be removed.
pub async fn undo_event(
    state: &AppState,
    request: UndoRequest,
) -> Result<UndoResponse, LedgerError> {
    let pending = if request.confirm {
        Some(state.controls.begin(&request.activity_id)?)
    } else {
        None
    };

    let (_, log) = state.ledger().await?;
    let Some(latest) = plan_undo(&log, &request.activity_id) else {
        return Ok(UndoResponse::Noop);
    };

    if let Some(expected) = &request.event_id {
        if *expected != latest.id {
            return Err(LedgerError::Conflict(format!(
                "the latest event for '{}' has changed; confirm again",
                request.activity_id
            )));
        }
    }

    let Some(pending) = pending else {
        return Ok(UndoResponse::Confirm {
            event_id: latest.id.clone(),
            prompt: undo_prompt(latest),
        });
    };

    match state.store.delete_event(&latest.id).await {
        Ok(true) => {
            pending.resolve();
            info!("undid '{}' ({})", latest.activity_id, latest.id);
            Ok(UndoResponse::Deleted {
                event_id: latest.id.clone(),
            })
        }
        Ok(false) => {
            pending.resolve();
            info!("'{}' was already removed", latest.id);
            Ok(UndoResponse::Noop)
        }
        Err(err) => {
            error!("failed to undo '{}': {err}", request.activity_id);
            pending.fail(err.to_string());
            Err(err.into())
        }
    }
}
