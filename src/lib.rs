pub mod ai;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod health;
pub mod interaction;
pub mod models;
pub mod platform;
pub mod reply;
pub mod state;
pub mod store;
pub mod tasks;
pub mod voting;
