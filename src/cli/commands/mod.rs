//! CLI command implementations

pub mod utils;

pub mod admin;
pub mod analytics;
pub mod completions;
pub mod config;
pub mod gov;
pub mod lss;
pub mod meetings;
pub mod parse;
pub mod process;
pub mod rating;
pub mod team;
