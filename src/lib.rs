pub mod app;
pub mod cli;
pub mod drive_api;
pub mod error;
pub mod local_store;
pub mod logging;
pub mod sweep;
pub mod types;
