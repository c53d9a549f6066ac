pub mod api;
pub mod bot;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod utils;
