pub mod api;
pub mod config;
pub mod contact;
pub mod listing;
pub mod models;
pub mod telemetry;
pub mod theme;
