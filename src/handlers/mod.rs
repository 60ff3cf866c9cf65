pub mod admin;
pub mod events;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod recent;
