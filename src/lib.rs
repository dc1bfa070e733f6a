// Library exports for the logtail service

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logs;
pub mod server;
