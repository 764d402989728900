//! Request and response shapes for each backend domain
//!
//! **Lean analytics:**
//! - [`analytics`] - control charts, Pareto, capability, OEE, bottlenecks, takt time, exports
//! - [`process_map`] - SIPOC, value stream maps, process flows
//! - [`ai_analysis`] - AI analysis dispatch
//!
//! **Organization:**
//! - [`team`] - members and invitations
//! - [`governance`] - boards, resolutions, votes, compliance
//! - [`admin`] - super-admin console
//! - [`meeting`] - meeting transcription
//! - [`lean_six_sigma`] - DMAIC projects and kaizen events
//!
//! Shapes received from the backend are value objects; computed fields such as
//! capability indices or VSM summaries are never sent back.

pub mod admin;
pub mod ai_analysis;
pub mod analytics;
pub mod governance;
pub mod lean_six_sigma;
pub mod meeting;
pub mod process_map;
pub mod team;

pub use ai_analysis::{AiAnalysisRequest, AiAnalysisResult};
pub use analytics::{CapabilityResult, ControlChartData, ExportFormat, ExportKind, ParetoResult};
pub use process_map::{ProcessFlowDiagram, SipocDiagram, ValueStreamMap};
pub use team::{Invitation, TeamMember};
