pub mod alerts;
pub mod api;
pub mod app;
pub mod bulletin_links;
pub mod classifier;
pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod pdf_text;
pub mod regions;
pub mod risk;
pub mod services;
pub mod utils;
