pub mod api;
pub mod core;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod recent;
pub mod stores;
pub mod utils;
pub mod validation;
pub mod wal;
