use crate::catalog::DraftSessions;
use crate::controls::ControlBoard;
use crate::errors::StorageError;
use crate::models::{Configuration, Event};
use crate::storage::{DocumentStore, Feed};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{error, info, warn};

/// Everything one running ledger owns.
///
/// The event log is never held here directly: it is whatever the store's
/// feed last delivered.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub config: Arc<RwLock<Configuration>>,
    pub startup_error: Option<String>,
    pub feed: watch::Receiver<Feed>,
    pub drafts: Arc<Mutex<DraftSessions>>,
    pub controls: ControlBoard,
}

impl AppState {
    pub async fn load(store: DocumentStore) -> Self {
        let (config, startup_error) = match store.read_config().await {
            Ok(config) => (config, None),
            Err(err) => {
                error!("failed to load configuration: {err}");
                (Configuration::default(), Some(err.0))
            }
        };
        let feed = store.subscribe();
        Self {
            drafts: Arc::new(Mutex::new(DraftSessions::default())),
            config: Arc::new(RwLock::new(config)),
            startup_error,
            feed,
            store,
            controls: ControlBoard::default(),
        }
    }

    /// Current configuration and event log, or the failure that replaces
    /// the normal view.
    pub async fn ledger(&self) -> Result<(Configuration, Arc<[Event]>), StorageError> {
        if let Some(message) = &self.startup_error {
            return Err(StorageError(message.clone()));
        }
        let log = match &*self.feed.borrow() {
            Feed::Ready(events) => Arc::clone(events),
            Feed::Failed(message) => return Err(StorageError(message.clone())),
        };
        let config = self.config.read().await.clone();
        Ok((config, log))
    }

    pub async fn replace_config(&self, config: Configuration) {
        *self.config.write().await = config;
    }
}

/// Logs every snapshot the store pushes until the store goes away.
pub async fn log_feed(mut feed: watch::Receiver<Feed>) {
    while feed.changed().await.is_ok() {
        match &*feed.borrow_and_update() {
            Feed::Ready(events) => info!("event log replaced: {} events", events.len()),
            Feed::Failed(message) => warn!("event feed failed: {message}"),
        }
    }
}
