pub mod activity;
pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{JsonFileStore, KeyValueStore, load_log};
