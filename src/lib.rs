pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod export;
pub mod fetch_error;
pub mod fetcher;
pub mod models;
pub mod orchestrator;
pub mod pagination;
pub mod services;
pub mod storage;
pub mod transform;
pub mod transport_error;
pub mod utils;
pub mod validation;
