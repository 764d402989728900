//! Demo-data fallback for list and dashboard fetches
//!
//! When enabled, a failed fetch is replaced by a fixed fixture bundled into
//! the binary so the console stays populated without a backend. Mutations
//! never fall back.

use rust_embed::Embed;
use serde::de::DeserializeOwned;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

use crate::core::client::ApiError;

#[derive(Embed)]
#[folder = "fixtures/"]
struct DemoFixtures;

/// Whether failed fetches are replaced by demo data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Surface the error
    #[default]
    Disabled,
    /// Substitute the bundled fixture
    DemoData,
}

/// Data that came either from the backend or from a demo fixture
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Live(T),
    Demo(T),
}

impl<T> Loaded<T> {
    pub fn is_demo(&self) -> bool {
        matches!(self, Loaded::Demo(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Loaded::Live(value) | Loaded::Demo(value) => value,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Loaded::Live(value) | Loaded::Demo(value) => value,
        }
    }
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("no demo fixture named '{0}'")]
    Missing(String),

    #[error("demo fixture '{name}' is malformed: {message}")]
    Malformed { name: String, message: String },
}

/// Error from [`load_or_demo`]: the fetch failed and no usable fixture exists
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

impl LoadError {
    pub fn user_message(&self, context: &str) -> String {
        match self {
            LoadError::Api(e) => e.user_message(context),
            LoadError::Fixture(e) => format!("{}: {}", context, e),
        }
    }
}

/// Names of all bundled fixtures
pub fn fixture_names() -> Vec<String> {
    DemoFixtures::iter()
        .filter_map(|f| f.strip_suffix(".json").map(str::to_string))
        .collect()
}

/// Decode the bundled fixture `<name>.json`
pub fn fixture<T: DeserializeOwned>(name: &str) -> Result<T, FixtureError> {
    let file = DemoFixtures::get(&format!("{}.json", name))
        .ok_or_else(|| FixtureError::Missing(name.to_string()))?;
    serde_json::from_slice(&file.data).map_err(|e| FixtureError::Malformed {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Await `fetch`; on failure, substitute fixture `name` if the policy allows
pub async fn load_or_demo<T, F>(policy: FallbackPolicy, name: &str, fetch: F) -> Result<Loaded<T>, LoadError>
where
    T: DeserializeOwned,
    F: Future<Output = Result<T, ApiError>>,
{
    match fetch.await {
        Ok(value) => Ok(Loaded::Live(value)),
        Err(err) => match policy {
            FallbackPolicy::Disabled => Err(LoadError::Api(err)),
            FallbackPolicy::DemoData => {
                warn!(fixture = name, error = %err, "fetch failed, showing demo data");
                Ok(Loaded::Demo(fixture(name)?))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::admin::PlatformStats;
    use crate::entities::admin::Organization;
    use crate::entities::governance::{
        Board, BoardMeeting, ComplianceItem, GovernanceDashboard, Resolution,
    };
    use crate::entities::lean_six_sigma::{LssDashboard, LssProject};
    use crate::entities::meeting::Meeting;
    use crate::entities::team::{Invitation, TeamDashboard, TeamMember};

    fn network_error() -> ApiError {
        ApiError::Transport {
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_every_fixture_decodes() {
        fixture::<TeamDashboard>("team_dashboard").unwrap();
        fixture::<Vec<TeamMember>>("team_members").unwrap();
        fixture::<Vec<Invitation>>("team_invitations").unwrap();
        fixture::<Vec<Board>>("boards").unwrap();
        fixture::<Vec<Resolution>>("resolutions").unwrap();
        fixture::<Vec<Meeting>>("meetings").unwrap();
        fixture::<PlatformStats>("platform_stats").unwrap();
        fixture::<Vec<Organization>>("organizations").unwrap();
        fixture::<LssDashboard>("lss_dashboard").unwrap();
        fixture::<Vec<LssProject>>("lss_projects").unwrap();
        fixture::<GovernanceDashboard>("governance_dashboard").unwrap();
        fixture::<Vec<BoardMeeting>>("board_meetings").unwrap();
        fixture::<Vec<ComplianceItem>>("compliance").unwrap();
    }

    #[test]
    fn test_fixture_names_listed() {
        let names = fixture_names();
        assert!(names.contains(&"team_dashboard".to_string()));
        assert!(names.contains(&"boards".to_string()));
    }

    #[test]
    fn test_missing_fixture() {
        let err = fixture::<serde_json::Value>("does_not_exist").unwrap_err();
        assert!(matches!(err, FixtureError::Missing(_)));
    }

    #[tokio::test]
    async fn test_live_result_passes_through() {
        let loaded = load_or_demo(FallbackPolicy::DemoData, "boards", async {
            Ok::<Vec<Board>, ApiError>(Vec::new())
        })
        .await
        .unwrap();
        assert_eq!(loaded, Loaded::Live(Vec::new()));
    }

    #[tokio::test]
    async fn test_failure_uses_fixture_when_enabled() {
        let loaded = load_or_demo(FallbackPolicy::DemoData, "boards", async {
            Err::<Vec<Board>, ApiError>(network_error())
        })
        .await
        .unwrap();
        assert!(loaded.is_demo());
        assert!(!loaded.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_failure_surfaces_when_disabled() {
        let result = load_or_demo(FallbackPolicy::Disabled, "boards", async {
            Err::<Vec<Board>, ApiError>(network_error())
        })
        .await;
        assert!(matches!(result, Err(LoadError::Api(ApiError::Transport { .. }))));
    }
}
