pub mod activity;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod friends;
pub mod pagination;
pub mod patch;
pub mod profiles;
pub mod seed;
pub mod session;
pub mod telemetry;
pub mod utils;
