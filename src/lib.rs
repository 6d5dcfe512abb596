#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_log;
pub mod fetch;
pub mod logging;
pub mod render;
pub mod stats;
pub mod store;
