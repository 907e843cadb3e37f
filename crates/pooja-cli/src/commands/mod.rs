pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod export;
pub mod items;
pub mod lists;
pub mod share;
