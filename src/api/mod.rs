//! Typed contract calls, one module per backend domain
//!
//! Each call issues exactly one request through [`ApiClient`] and returns the
//! decoded body. Nothing is cached; callers decide what to do on failure.

pub mod admin;
pub mod governance;
pub mod lean_analytics;
pub mod lean_six_sigma;
pub mod meetings;
pub mod team;

#[cfg(test)]
pub(crate) mod mock;

pub use admin::AdminApi;
pub use governance::GovernanceApi;
pub use lean_analytics::LeanAnalyticsApi;
pub use lean_six_sigma::LeanSixSigmaApi;
pub use meetings::MeetingsApi;
pub use team::TeamApi;

use crate::core::client::ApiClient;

impl ApiClient {
    /// `/lean-analytics`
    pub fn lean_analytics(&self) -> LeanAnalyticsApi<'_> {
        LeanAnalyticsApi::new(self)
    }

    /// `/governai`
    pub fn governance(&self) -> GovernanceApi<'_> {
        GovernanceApi::new(self)
    }

    /// `/team`
    pub fn team(&self) -> TeamApi<'_> {
        TeamApi::new(self)
    }

    /// `/admin`
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    /// `/meetings`
    pub fn meetings(&self) -> MeetingsApi<'_> {
        MeetingsApi::new(self)
    }

    /// `/leansixsigma`
    pub fn lean_six_sigma(&self) -> LeanSixSigmaApi<'_> {
        LeanSixSigmaApi::new(self)
    }
}
