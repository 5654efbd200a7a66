pub mod clients;
pub mod config;
pub mod handlers;
pub mod models;
pub mod utils;
