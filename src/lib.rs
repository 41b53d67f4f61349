pub mod app;
pub mod auth;
pub mod collection;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod weather;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::Store;
