use crate::errors::LedgerError;
use crate::models::ControlView;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Request state of every activity's add/undo control.
///
/// `idle -> pending -> idle` on success, `pending -> failed` on error.
/// A failed control accepts a new request; a pending one does not.
#[derive(Clone, Default)]
pub struct ControlBoard {
    states: Arc<Mutex<HashMap<String, ControlView>>>,
}

impl ControlBoard {
    pub fn view(&self, activity_id: &str) -> ControlView {
        self.lock()
            .get(activity_id)
            .cloned()
            .unwrap_or(ControlView::Idle)
    }

    pub fn begin(&self, activity_id: &str) -> Result<PendingRequest, LedgerError> {
        let mut states = self.lock();
        if matches!(states.get(activity_id), Some(ControlView::Pending)) {
            return Err(LedgerError::Busy(activity_id.to_string()));
        }
        states.insert(activity_id.to_string(), ControlView::Pending);
        Ok(PendingRequest {
            board: self.clone(),
            activity_id: activity_id.to_string(),
            settled: false,
        })
    }

    fn settle(&self, activity_id: &str, next: ControlView) {
        let mut states = self.lock();
        match next {
            ControlView::Idle => {
                states.remove(activity_id);
            }
            other => {
                states.insert(activity_id.to_string(), other);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ControlView>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held while a write for one activity is in flight.
///
/// Dropping it unsettled (the request future was abandoned) returns the
/// control to idle.
pub struct PendingRequest {
    board: ControlBoard,
    activity_id: String,
    settled: bool,
}

impl PendingRequest {
    pub fn resolve(mut self) {
        self.settled = true;
        self.board.settle(&self.activity_id, ControlView::Idle);
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.settled = true;
        self.board.settle(
            &self.activity_id,
            ControlView::Failed {
                message: message.into(),
            },
        );
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        if !self.settled {
            self.board.settle(&self.activity_id, ControlView::Idle);
        }
    }
}
