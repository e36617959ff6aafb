pub mod add;
pub mod auth_cmd;
pub mod catalog;
pub mod common;
pub mod completions;
pub mod config;
pub mod register;
pub mod search;
pub mod suggest;
