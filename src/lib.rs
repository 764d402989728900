//! Pulse: command-line console for the Pulse AI executive dashboard
//!
//! Typed async clients for the analytics, governance, team, admin, meetings,
//! and lean six sigma backends, plus the client-side rules the dashboard
//! applies to their results.

pub mod api;
pub mod cli;
pub mod core;
pub mod entities;
