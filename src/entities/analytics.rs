//! Statistical process-control analytics shapes
//!
//! Requests carry exactly what the user entered; results are value objects
//! computed by the backend. Helper methods only read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::presentation::{self, BadgeColor};
use crate::core::tabular::{BottleneckStep, OeeRow};

// ============================================================================
// Control charts
// ============================================================================

/// One control chart: center line, limits, and the plotted points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChartData {
    pub center_line: f64,
    pub ucl: f64,
    pub lcl: f64,
    #[serde(default)]
    pub data_points: Vec<f64>,
    /// Indexes into `data_points`
    #[serde(default)]
    pub out_of_control_points: Vec<usize>,
}

impl ControlChartData {
    /// `lcl <= center_line <= ucl`
    pub fn limits_ordered(&self) -> bool {
        self.lcl <= self.center_line && self.center_line <= self.ucl
    }

    /// Values of the flagged points; indexes past the end are skipped
    pub fn out_of_control_values(&self) -> Vec<(usize, f64)> {
        self.out_of_control_points
            .iter()
            .filter_map(|&i| self.data_points.get(i).map(|&v| (i, v)))
            .collect()
    }

    pub fn in_control(&self) -> bool {
        self.out_of_control_points.is_empty()
    }
}

/// Request for an X-bar/R chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XBarRChartRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup_size: Option<u32>,
    /// One inner vector per subgroup
    pub data: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XBarRChartResult {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub subgroup_size: Option<u32>,
    pub xbar_chart: ControlChartData,
    pub r_chart: ControlChartData,
    #[serde(default)]
    pub process_in_control: Option<bool>,
    #[serde(default)]
    pub violations: Vec<String>,
}

/// Request for an individuals / moving-range chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImrChartRequest {
    pub name: String,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImrChartResult {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub individuals_chart: ControlChartData,
    pub moving_range_chart: ControlChartData,
    #[serde(default)]
    pub process_in_control: Option<bool>,
    #[serde(default)]
    pub violations: Vec<String>,
}

/// Stored chart as returned by the list/detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChartSummary {
    pub id: String,
    pub name: String,
    pub chart_type: String,
    #[serde(default)]
    pub process_in_control: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Pagination-only filter shared by analytics list endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// ============================================================================
// Pareto
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRequest {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Pareto result: parallel arrays in descending-value order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoResult {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub percentages: Vec<f64>,
    pub cumulative_percentages: Vec<f64>,
    #[serde(default)]
    pub vital_few: Vec<String>,
    #[serde(default)]
    pub trivial_many: Vec<String>,
    #[serde(default)]
    pub total: Option<f64>,
}

impl ParetoResult {
    /// Number of leading categories that make up the vital few
    pub fn partition_point(&self) -> usize {
        presentation::pareto_partition_point(&self.cumulative_percentages)
    }

    /// Whether the backend placed `category` in the vital few
    pub fn is_vital(&self, category: &str) -> bool {
        self.vital_few.iter().any(|c| c == category)
    }

    /// The backend's split disagrees with the 80% cumulative cut
    pub fn partition_disagrees(&self) -> bool {
        self.partition_point() != self.vital_few.len()
            || self
                .categories
                .iter()
                .take(self.partition_point())
                .any(|c| !self.is_vital(c))
    }

    /// Structural checks on what the backend returned
    ///
    /// Parallel arrays agree in length, the partition covers every category,
    /// cumulative percentages never decrease and end at 100 (within `tolerance`).
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let n = self.categories.len();
        let parallel = self.values.len() == n
            && self.percentages.len() == n
            && self.cumulative_percentages.len() == n;
        let partitioned = self.vital_few.len() + self.trivial_many.len() == n;
        let monotonic = self
            .cumulative_percentages
            .windows(2)
            .all(|w| w[0] <= w[1]);
        let ends_at_100 = self
            .cumulative_percentages
            .last()
            .map_or(n == 0, |last| (last - 100.0).abs() <= tolerance);
        parallel && partitioned && monotonic && ends_at_100
    }
}

// ============================================================================
// Capability
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRequest {
    pub name: String,
    pub process_name: String,
    pub characteristic: String,
    pub data: Vec<f64>,
    pub usl: f64,
    pub lsl: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    #[serde(default)]
    pub sample_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationLimits {
    pub usl: f64,
    pub lsl: f64,
    #[serde(default)]
    pub target: Option<f64>,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityIndices {
    pub cp: f64,
    pub cpk: f64,
    pub cpu: f64,
    pub cpl: f64,
    #[serde(default)]
    pub cpm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityPerformance {
    pub sigma_level: f64,
    pub ppm_total: f64,
    pub ppm_upper: f64,
    pub ppm_lower: f64,
    pub yield_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityInterpretation {
    pub cpk_rating: String,
    pub cpk_color: String,
    pub centering: String,
    pub cp_vs_cpk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub characteristic: Option<String>,
    pub statistics: CapabilityStatistics,
    pub specification_limits: SpecificationLimits,
    pub capability_indices: CapabilityIndices,
    pub performance: CapabilityPerformance,
    pub interpretation: CapabilityInterpretation,
}

impl CapabilityResult {
    /// Rating color derived locally from Cpk
    pub fn color(&self) -> BadgeColor {
        presentation::capability_color(self.capability_indices.cpk)
    }

    /// Yield implied by the reported total PPM
    pub fn expected_yield(&self) -> f64 {
        presentation::yield_from_ppm(self.performance.ppm_total)
    }

    /// The PPM-derived yield, when it differs from the reported one by more than `tolerance`
    pub fn yield_mismatch(&self, tolerance: f64) -> Option<f64> {
        let derived = self.expected_yield();
        ((derived - self.performance.yield_percent).abs() > tolerance).then_some(derived)
    }

    /// Cpk never exceeds Cp (small tolerance for rounding)
    pub fn indices_consistent(&self) -> bool {
        self.capability_indices.cpk <= self.capability_indices.cp + 1e-9
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityStudySummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub characteristic: Option<String>,
    #[serde(default)]
    pub cpk: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Predictive analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeTrendRequest {
    pub oee_history: Vec<OeeRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeForecastPoint {
    pub day: u32,
    pub predicted_oee: f64,
    #[serde(default)]
    pub lower_bound: Option<f64>,
    #[serde(default)]
    pub upper_bound: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeTrendResult {
    pub current_oee: f64,
    /// `improving`, `declining` or `stable`
    pub trend: String,
    #[serde(default)]
    pub slope: Option<f64>,
    #[serde(default)]
    pub forecast: Vec<OeeForecastPoint>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckRequest {
    pub process_steps: Vec<BottleneckStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub name: String,
    pub severity: String,
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckResult {
    #[serde(default)]
    pub bottlenecks: Vec<Bottleneck>,
    #[serde(default)]
    pub primary_bottleneck: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaktTimeRequest {
    pub available_time_minutes: f64,
    pub customer_demand: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaktTimeResult {
    pub takt_time_minutes: f64,
    pub takt_time_seconds: f64,
    #[serde(default)]
    pub net_available_minutes: Option<f64>,
    #[serde(default)]
    pub customer_demand: Option<f64>,
    #[serde(default)]
    pub interpretation: Option<String>,
}

/// Export formats offered by the export endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}

/// Documents that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Capability,
    ControlChart,
    Vsm,
    Sipoc,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Capability => write!(f, "capability"),
            ExportKind::ControlChart => write!(f, "control-chart"),
            ExportKind::Vsm => write!(f, "vsm"),
            ExportKind::Sipoc => write!(f, "sipoc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(center: f64, ucl: f64, lcl: f64) -> ControlChartData {
        ControlChartData {
            center_line: center,
            ucl,
            lcl,
            data_points: vec![10.0, 10.2, 12.9, 9.9],
            out_of_control_points: vec![2, 9],
        }
    }

    fn capability_json() -> serde_json::Value {
        json!({
            "id": "cap-1",
            "name": "Bore study",
            "statistics": {"mean": 10.01, "std_dev": 0.02, "min": 9.96, "max": 10.05, "range": 0.09},
            "specification_limits": {"usl": 10.1, "lsl": 9.9, "target": 10.0, "tolerance": 0.2},
            "capability_indices": {"cp": 1.67, "cpk": 1.5, "cpu": 1.5, "cpl": 1.83},
            "performance": {"sigma_level": 4.5, "ppm_total": 3.4, "ppm_upper": 3.4, "ppm_lower": 0.0, "yield_percent": 99.99966},
            "interpretation": {"cpk_rating": "Capable", "cpk_color": "blue", "centering": "Slightly high", "cp_vs_cpk": "Off center"}
        })
    }

    #[test]
    fn test_limits_ordered() {
        assert!(chart(10.0, 11.0, 9.0).limits_ordered());
        assert!(!chart(12.0, 11.0, 9.0).limits_ordered());
    }

    #[test]
    fn test_out_of_control_values_skips_bad_indexes() {
        let c = chart(10.0, 11.0, 9.0);
        assert_eq!(c.out_of_control_values(), vec![(2, 12.9)]);
        assert!(!c.in_control());
    }

    #[test]
    fn test_xbar_request_omits_unset_fields() {
        let req = XBarRChartRequest {
            name: "Line 1".to_string(),
            subgroup_size: None,
            data: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            usl: Some(5.0),
            lsl: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"name": "Line 1", "data": [[1.0, 2.0], [3.0, 4.0]], "usl": 5.0})
        );
    }

    #[test]
    fn test_capability_result_decodes() {
        let result: CapabilityResult = serde_json::from_value(capability_json()).unwrap();
        assert_eq!(result.capability_indices.cpm, None);
        assert_eq!(result.color(), BadgeColor::Blue);
        assert!(result.indices_consistent());
        assert!((result.expected_yield() - 99.99966).abs() < 1e-9);
        assert_eq!(result.yield_mismatch(0.001), None);
    }

    #[test]
    fn test_reported_yield_kept_when_ppm_disagrees() {
        let mut value = capability_json();
        value["performance"]["yield_percent"] = json!(99.5);
        let result: CapabilityResult = serde_json::from_value(value).unwrap();

        assert_eq!(result.performance.yield_percent, 99.5);
        let derived = result.yield_mismatch(0.001).unwrap();
        assert!((derived - 99.99966).abs() < 1e-9);
    }

    #[test]
    fn test_pareto_consistency() {
        let result = ParetoResult {
            categories: vec!["Scratch", "Dent", "Misalign", "Other"]
                .into_iter()
                .map(String::from)
                .collect(),
            values: vec![50.0, 25.0, 15.0, 10.0],
            percentages: vec![50.0, 25.0, 15.0, 10.0],
            cumulative_percentages: vec![50.0, 75.0, 90.0, 100.0],
            vital_few: vec!["Scratch".into(), "Dent".into(), "Misalign".into()],
            trivial_many: vec!["Other".into()],
            total: Some(100.0),
        };
        assert!(result.is_consistent(0.01));
        assert_eq!(result.partition_point(), result.vital_few.len());
        assert!(result.cumulative_percentages[result.partition_point() - 1] >= 80.0);

        let mut broken = result.clone();
        broken.cumulative_percentages = vec![50.0, 45.0, 90.0, 100.0];
        assert!(!broken.is_consistent(0.01));
    }

    #[test]
    fn test_pareto_groups_follow_backend_split() {
        let result = ParetoResult {
            categories: vec!["Scratch".into(), "Dent".into(), "Misalign".into()],
            values: vec![60.0, 30.0, 10.0],
            percentages: vec![60.0, 30.0, 10.0],
            cumulative_percentages: vec![60.0, 90.0, 100.0],
            vital_few: vec!["Scratch".into()],
            trivial_many: vec!["Dent".into(), "Misalign".into()],
            total: Some(100.0),
        };
        assert!(result.is_vital("Scratch"));
        assert!(!result.is_vital("Dent"));
        // The 80% cut would also take Dent
        assert_eq!(result.partition_point(), 2);
        assert!(result.partition_disagrees());
    }

    #[test]
    fn test_oee_request_shape() {
        let req = OeeTrendRequest {
            oee_history: vec![OeeRow {
                oee: 78.5,
                date: Some("2024-03-01".to_string()),
            }],
            forecast_days: Some(14),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"oee_history": [{"oee": 78.5, "date": "2024-03-01"}], "forecast_days": 14})
        );
    }
}
