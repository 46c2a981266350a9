use crate::errors::StorageError;
use crate::models::{Configuration, Event, NewEvent, Points};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs,
    sync::{watch, Mutex},
};
use tracing::{error, info};
use uuid::Uuid;

/// Key of the one configuration document.
pub const CONFIG_KEY: &str = "global";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreData {
    #[serde(default)]
    settings: BTreeMap<String, Configuration>,
    #[serde(default)]
    events: Vec<Event>,
}

/// What subscribers see: the whole event collection ordered by timestamp,
/// or the reason it cannot be read.
#[derive(Debug, Clone)]
pub enum Feed {
    Ready(Arc<[Event]>),
    Failed(String),
}

/// Configuration document plus event collection kept in one JSON file.
///
/// Every successful insert or delete publishes a fresh full snapshot on the
/// feed. A failed write leaves both the collection and the feed untouched.
#[derive(Clone)]
pub struct DocumentStore {
    path: PathBuf,
    data: Arc<Mutex<Result<StoreData, String>>>,
    feed: Arc<watch::Sender<Feed>>,
}

impl DocumentStore {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = load_data(&path).await;
        let feed = match &data {
            Ok(data) => Feed::Ready(snapshot(&data.events)),
            Err(message) => Feed::Failed(message.clone()),
        };
        let (sender, _) = watch::channel(feed);
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
            feed: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Feed> {
        self.feed.subscribe()
    }

    pub async fn read_config(&self) -> Result<Configuration, StorageError> {
        let guard = self.data.lock().await;
        let data = loaded(&guard)?;
        Ok(data.settings.get(CONFIG_KEY).cloned().unwrap_or_default())
    }

    /// Replaces the configuration document wholesale.
    pub async fn write_config(&self, config: &Configuration) -> Result<(), StorageError> {
        let mut guard = self.data.lock().await;
        let data = loaded_mut(&mut guard)?;
        let previous = data.settings.insert(CONFIG_KEY.to_string(), config.clone());
        if let Err(err) = persist_data(&self.path, data).await {
            match previous {
                Some(previous) => data.settings.insert(CONFIG_KEY.to_string(), previous),
                None => data.settings.remove(CONFIG_KEY),
            };
            return Err(err);
        }
        info!(
            "configuration saved: {} gains, {} losses",
            config.gains.len(),
            config.losses.len()
        );
        Ok(())
    }

    pub async fn insert_event(&self, new: NewEvent) -> Result<Event, StorageError> {
        let mut guard = self.data.lock().await;
        let data = loaded_mut(&mut guard)?;

        let mut timestamp = Utc::now();
        if let Some(latest) = data.events.iter().map(|event| event.timestamp).max() {
            if timestamp <= latest {
                timestamp = latest + Duration::microseconds(1);
            }
        }
        let event = Event {
            id: Uuid::new_v4().to_string(),
            activity_id: new.activity_id,
            name: new.name,
            points: Points::from(new.points),
            date: new.date,
            week: new.week,
            kind: new.kind.as_str().to_string(),
            timestamp,
        };

        data.events.push(event.clone());
        if let Err(err) = persist_data(&self.path, data).await {
            data.events.pop();
            return Err(err);
        }
        self.publish(data);
        Ok(event)
    }

    /// Returns whether a record was removed. A missing id is not an error.
    pub async fn delete_event(&self, id: &str) -> Result<bool, StorageError> {
        let mut guard = self.data.lock().await;
        let data = loaded_mut(&mut guard)?;

        let Some(position) = data.events.iter().position(|event| event.id == id) else {
            return Ok(false);
        };
        let removed = data.events.remove(position);
        if let Err(err) = persist_data(&self.path, data).await {
            data.events.insert(position, removed);
            return Err(err);
        }
        self.publish(data);
        Ok(true)
    }

    fn publish(&self, data: &StoreData) {
        self.feed.send_replace(Feed::Ready(snapshot(&data.events)));
    }
}

fn loaded(data: &Result<StoreData, String>) -> Result<&StoreData, StorageError> {
    data.as_ref().map_err(|message| StorageError(message.clone()))
}

fn loaded_mut(data: &mut Result<StoreData, String>) -> Result<&mut StoreData, StorageError> {
    data.as_mut().map_err(|message| StorageError(message.clone()))
}

fn snapshot(events: &[Event]) -> Arc<[Event]> {
    let mut events = events.to_vec();
    events.sort_by_key(|event| event.timestamp);
    events.into()
}

async fn load_data(path: &Path) -> Result<StoreData, String> {
    match fs::read(path).await {
        Ok(bytes) => {
            let mut data: StoreData = serde_json::from_slice(&bytes).map_err(|err| {
                error!("failed to parse data file {}: {err}", path.display());
                err.to_string()
            })?;
            data.events.sort_by_key(|event| event.timestamp);
            Ok(data)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            Err(err.to_string())
        }
    }
}

async fn persist_data(path: &Path, data: &StoreData) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(data).map_err(StorageError::new)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write data file {}: {err}", path.display());
        StorageError::new(err)
    })
}
