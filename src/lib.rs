pub mod app;
pub mod calendar;
pub mod catalog;
pub mod commands;
pub mod controls;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rules;
pub mod settings;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use settings::Settings;
pub use state::AppState;
pub use storage::DocumentStore;
