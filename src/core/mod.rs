//! Core module - client, configuration, and client-side rules

pub mod blob;
pub mod client;
pub mod config;
pub mod fallback;
pub mod presentation;
pub mod tabular;
pub mod team;

pub use blob::{download_blob, Blob, BlobError};
pub use client::{ApiClient, ApiError, ApiResult, HttpTransport, Transport};
pub use config::Config;
pub use fallback::{load_or_demo, FallbackPolicy, LoadError, Loaded};
pub use presentation::{BadgeColor, RiskLevel};
pub use tabular::{parse_rows, TabularRow};
pub use team::{AssignableRole, InvitationStatus, Permissions, TeamRole};
