//! AI analysis dispatch
//!
//! The backend accepts `{"analysis_type": ..., "data": {...}}`; each analysis
//! type has its own payload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmaicPayload {
    pub project_name: String,
    pub problem_statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WastePayload {
    pub process_name: String,
    pub process_description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KaizenPayload {
    pub area: String,
    pub current_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcaPayload {
    pub problem: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityPayload {
    pub process_name: String,
    pub characteristic: String,
    pub data: Vec<f64>,
    pub usl: f64,
    pub lsl: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

/// Request body for `POST /lean-analytics/ai/analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis_type", content = "data", rename_all = "lowercase")]
pub enum AiAnalysisRequest {
    Dmaic(DmaicPayload),
    Waste(WastePayload),
    Kaizen(KaizenPayload),
    Rca(RcaPayload),
    Capability(CapabilityPayload),
}

impl AiAnalysisRequest {
    pub fn analysis_type(&self) -> &'static str {
        match self {
            AiAnalysisRequest::Dmaic(_) => "dmaic",
            AiAnalysisRequest::Waste(_) => "waste",
            AiAnalysisRequest::Kaizen(_) => "kaizen",
            AiAnalysisRequest::Rca(_) => "rca",
            AiAnalysisRequest::Capability(_) => "capability",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFinding {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysisResult {
    pub analysis_type: String,
    pub summary: String,
    #[serde(default)]
    pub findings: Vec<AiFinding>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}
