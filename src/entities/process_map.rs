//! Process-mapping documents: SIPOC, value stream maps, process flows
//!
//! Documents are created and replaced whole; the `analysis`/`summary` blocks
//! are always recomputed by the backend and never sent back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::presentation::{self, BadgeColor};
use crate::core::tabular::{FlowConnectionRow, FlowNodeRow, SipocItemRow, VsmStepRow};

// ============================================================================
// SIPOC
// ============================================================================

/// Numbered process step in a SIPOC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipocStep {
    pub step_number: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SipocStep {
    /// Number rows 1..=n in input order
    pub fn numbered(rows: Vec<SipocItemRow>) -> Vec<SipocStep> {
        rows.into_iter()
            .zip(1..)
            .map(|(row, step_number)| SipocStep {
                step_number,
                name: row.name,
                description: row.description,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipocRequest {
    pub name: String,
    pub process_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub suppliers: Vec<SipocItemRow>,
    pub inputs: Vec<SipocItemRow>,
    pub process_steps: Vec<SipocStep>,
    pub outputs: Vec<SipocItemRow>,
    pub customers: Vec<SipocItemRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipocAnalysis {
    pub completeness_score: f64,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipocDiagram {
    pub id: String,
    pub name: String,
    pub process_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub suppliers: Vec<SipocItemRow>,
    #[serde(default)]
    pub inputs: Vec<SipocItemRow>,
    #[serde(default)]
    pub process_steps: Vec<SipocStep>,
    #[serde(default)]
    pub outputs: Vec<SipocItemRow>,
    #[serde(default)]
    pub customers: Vec<SipocItemRow>,
    #[serde(default)]
    pub analysis: Option<SipocAnalysis>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Value stream map
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VsmRequest {
    pub name: String,
    pub product_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_demand: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_time: Option<f64>,
    pub process_steps: Vec<VsmStepRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VsmSummary {
    pub total_lead_time: f64,
    pub total_cycle_time: f64,
    pub value_added_time: f64,
    pub non_value_added_time: f64,
    /// Process cycle efficiency, percent
    pub pce: f64,
    /// Value-added share of steps, percent
    pub value_added_ratio: f64,
    #[serde(default)]
    pub takt_time: Option<f64>,
    #[serde(default)]
    pub bottleneck_step: Option<String>,
}

impl VsmSummary {
    pub fn pce_health(&self) -> BadgeColor {
        presentation::pce_health(self.pce)
    }

    pub fn value_added_health(&self) -> BadgeColor {
        presentation::value_added_health(self.value_added_ratio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStreamMap {
    pub id: String,
    pub name: String,
    pub product_family: String,
    #[serde(default)]
    pub customer_demand: Option<f64>,
    #[serde(default)]
    pub available_time: Option<f64>,
    #[serde(default)]
    pub process_steps: Vec<VsmStepRow>,
    #[serde(default)]
    pub summary: Option<VsmSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Process flow
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessFlowRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<FlowNodeRow>,
    pub connections: Vec<FlowConnectionRow>,
    /// Swimlane names in display order
    #[serde(default)]
    pub swimlanes: Vec<String>,
}

impl ProcessFlowRequest {
    /// Swimlanes in first-seen order of the nodes that reference them
    pub fn swimlanes_from_nodes(nodes: &[FlowNodeRow]) -> Vec<String> {
        let mut lanes: Vec<String> = Vec::new();
        for lane in nodes.iter().filter_map(|n| n.swimlane.as_ref()) {
            if !lanes.contains(lane) {
                lanes.push(lane.clone());
            }
        }
        lanes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessFlowAnalysis {
    pub total_steps: u32,
    #[serde(default)]
    pub decision_points: Option<u32>,
    #[serde(default)]
    pub handoffs: Option<u32>,
    #[serde(default)]
    pub total_duration: Option<f64>,
    #[serde(default)]
    pub value_added_ratio: Option<f64>,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl ProcessFlowAnalysis {
    pub fn value_added_health(&self) -> Option<BadgeColor> {
        self.value_added_ratio.map(presentation::value_added_health)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessFlowDiagram {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nodes: Vec<FlowNodeRow>,
    #[serde(default)]
    pub connections: Vec<FlowConnectionRow>,
    #[serde(default)]
    pub swimlanes: Vec<String>,
    #[serde(default)]
    pub analysis: Option<ProcessFlowAnalysis>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tabular::parse_rows;
    use serde_json::json;

    #[test]
    fn test_sipoc_steps_numbered_in_order() {
        let rows: Vec<SipocItemRow> = parse_rows("Receive order, via portal\nPick\nShip, courier");
        let steps = SipocStep::numbered(rows);
        let numbers: Vec<u32> = steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(steps[1].description, None);
    }

    #[test]
    fn test_vsm_summary_health() {
        let summary: VsmSummary = serde_json::from_value(json!({
            "total_lead_time": 4800.0,
            "total_cycle_time": 600.0,
            "value_added_time": 420.0,
            "non_value_added_time": 4380.0,
            "pce": 8.75,
            "value_added_ratio": 60.0
        }))
        .unwrap();
        assert_eq!(summary.pce_health(), BadgeColor::Yellow);
        assert_eq!(summary.value_added_health(), BadgeColor::Green);
    }

    #[test]
    fn test_swimlanes_first_seen_order() {
        let nodes: Vec<FlowNodeRow> = parse_rows(
            "n1, Start, start, Sales\nn2, Check credit, decision, Finance\nn3, Book, task, Sales\nn4, End, end",
        );
        assert_eq!(
            ProcessFlowRequest::swimlanes_from_nodes(&nodes),
            vec!["Sales", "Finance"]
        );
    }

    #[test]
    fn test_diagram_without_analysis_decodes() {
        let doc: ProcessFlowDiagram =
            serde_json::from_value(json!({"id": "pf-1", "name": "Order to cash"})).unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.analysis.is_none());
    }

    #[test]
    fn test_flow_analysis_value_added_health() {
        let analysis: ProcessFlowAnalysis =
            serde_json::from_value(json!({"total_steps": 6, "value_added_ratio": 35.0})).unwrap();
        assert_eq!(analysis.value_added_health(), Some(BadgeColor::Yellow));

        let analysis: ProcessFlowAnalysis =
            serde_json::from_value(json!({"total_steps": 6, "value_added_ratio": 50.0})).unwrap();
        assert_eq!(analysis.value_added_health(), Some(BadgeColor::Green));

        let analysis: ProcessFlowAnalysis =
            serde_json::from_value(json!({"total_steps": 6})).unwrap();
        assert_eq!(analysis.value_added_health(), None);
    }
}
