pub mod api_client;
pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod roster;
pub mod scoring;
