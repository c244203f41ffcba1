//! CLI command handlers

pub mod analytics;
pub mod config;
pub mod init;
pub mod link;
pub mod profile;
pub mod status;
pub mod theme;
pub mod username;
pub mod view;
