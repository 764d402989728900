//! Derived presentation rules
//!
//! Pure mappings from raw numbers returned by the backend to the discrete
//! categories the console renders. The thresholds here are the product's
//! business constants; change them only together with the dashboard.

use serde::{Deserialize, Serialize};

/// Cpk at or above which a process is rated excellent
pub const CPK_EXCELLENT: f64 = 1.67;

/// Cpk at or above which a process is rated capable
pub const CPK_CAPABLE: f64 = 1.33;

/// Cpk at or above which a process is rated marginal
pub const CPK_MARGINAL: f64 = 1.0;

/// Process cycle efficiency (percent) considered healthy
pub const PCE_HEALTHY_PERCENT: f64 = 25.0;

/// Value-added ratio (percent) considered healthy
pub const VALUE_ADDED_HEALTHY_PERCENT: f64 = 50.0;

/// Cumulative percentage at which the Pareto "vital few" end
pub const PARETO_THRESHOLD_PERCENT: f64 = 80.0;

/// Display colors used by rating badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    Purple,
    Gray,
}

impl std::fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadgeColor::Green => write!(f, "green"),
            BadgeColor::Blue => write!(f, "blue"),
            BadgeColor::Yellow => write!(f, "yellow"),
            BadgeColor::Orange => write!(f, "orange"),
            BadgeColor::Red => write!(f, "red"),
            BadgeColor::Purple => write!(f, "purple"),
            BadgeColor::Gray => write!(f, "gray"),
        }
    }
}

/// Capability rating color. Boundaries belong to the higher bucket.
///
/// NaN compares false against every threshold and lands in red.
pub fn capability_color(cpk: f64) -> BadgeColor {
    if cpk >= CPK_EXCELLENT {
        BadgeColor::Green
    } else if cpk >= CPK_CAPABLE {
        BadgeColor::Blue
    } else if cpk >= CPK_MARGINAL {
        BadgeColor::Yellow
    } else {
        BadgeColor::Red
    }
}

/// Short rating label matching [`capability_color`]
pub fn cpk_label(cpk: f64) -> &'static str {
    match capability_color(cpk) {
        BadgeColor::Green => "Excellent",
        BadgeColor::Blue => "Capable",
        BadgeColor::Yellow => "Marginal",
        _ => "Not capable",
    }
}

/// Health of a process-cycle-efficiency percentage
pub fn pce_health(pce_percent: f64) -> BadgeColor {
    if pce_percent >= PCE_HEALTHY_PERCENT {
        BadgeColor::Green
    } else {
        BadgeColor::Yellow
    }
}

/// Health of a value-added-ratio percentage
pub fn value_added_health(ratio_percent: f64) -> BadgeColor {
    if ratio_percent >= VALUE_ADDED_HEALTHY_PERCENT {
        BadgeColor::Green
    } else {
        BadgeColor::Yellow
    }
}

/// Expected yield from total defects per million
pub fn yield_from_ppm(ppm_total: f64) -> f64 {
    100.0 - ppm_total / 10_000.0
}

/// Number of leading items forming the Pareto "vital few"
///
/// Items up to and including the first whose cumulative percentage reaches
/// the 80% threshold. If none reaches it, every item is vital.
pub fn pareto_partition_point(cumulative_percentages: &[f64]) -> usize {
    cumulative_percentages
        .iter()
        .position(|&c| c >= PARETO_THRESHOLD_PERCENT)
        .map_or(cumulative_percentages.len(), |i| i + 1)
}

/// Color for a period-over-period change
pub fn change_color(change: f64) -> BadgeColor {
    if change > 0.0 {
        BadgeColor::Green
    } else if change < 0.0 {
        BadgeColor::Red
    } else {
        BadgeColor::Gray
    }
}

/// Risk level badge used by governance and compliance views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn color(self) -> BadgeColor {
        match self {
            RiskLevel::Low => BadgeColor::Green,
            RiskLevel::Medium => BadgeColor::Yellow,
            RiskLevel::High => BadgeColor::Orange,
            RiskLevel::Critical => BadgeColor::Red,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Whole-unit currency with thousands separators, e.g. `$1,234,568`
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let rounded = amount.abs().round() as u64;
    format!("{}{}{}", sign, symbol, group_thousands(rounded))
}

/// Compact currency, e.g. `$1.2M`, `$850.0K`, `$3.4B`
pub fn format_compact_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let body = if abs >= 1e9 {
        format!("{:.1}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", abs / 1e3)
    } else {
        format!("{:.0}", abs)
    };
    format!("{}{}{}", sign, symbol, body)
}

/// Percentage with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_color_boundaries() {
        assert_eq!(capability_color(1.67), BadgeColor::Green);
        assert_eq!(capability_color(2.5), BadgeColor::Green);
        assert_eq!(capability_color(1.669), BadgeColor::Blue);
        assert_eq!(capability_color(1.33), BadgeColor::Blue);
        assert_eq!(capability_color(1.329), BadgeColor::Yellow);
        assert_eq!(capability_color(1.0), BadgeColor::Yellow);
        assert_eq!(capability_color(0.999), BadgeColor::Red);
        assert_eq!(capability_color(-3.0), BadgeColor::Red);
    }

    #[test]
    fn test_capability_color_is_total() {
        for value in [f64::NEG_INFINITY, -1.0, 0.0, 0.5, 1.2, 1.5, 1.8, f64::INFINITY, f64::NAN] {
            let color = capability_color(value);
            assert!(matches!(
                color,
                BadgeColor::Green | BadgeColor::Blue | BadgeColor::Yellow | BadgeColor::Red
            ));
        }
        assert_eq!(capability_color(f64::NAN), BadgeColor::Red);
    }

    #[test]
    fn test_cpk_label() {
        assert_eq!(cpk_label(1.7), "Excellent");
        assert_eq!(cpk_label(1.4), "Capable");
        assert_eq!(cpk_label(1.1), "Marginal");
        assert_eq!(cpk_label(0.7), "Not capable");
    }

    #[test]
    fn test_pce_and_value_added_health() {
        assert_eq!(pce_health(25.0), BadgeColor::Green);
        assert_eq!(pce_health(24.99), BadgeColor::Yellow);
        assert_eq!(value_added_health(50.0), BadgeColor::Green);
        assert_eq!(value_added_health(49.9), BadgeColor::Yellow);
    }

    #[test]
    fn test_yield_from_ppm() {
        assert_eq!(yield_from_ppm(0.0), 100.0);
        assert!((yield_from_ppm(2700.0) - 99.73).abs() < 1e-9);
    }

    #[test]
    fn test_pareto_partition_point() {
        assert_eq!(pareto_partition_point(&[45.0, 70.0, 85.0, 95.0, 100.0]), 3);
        assert_eq!(pareto_partition_point(&[80.0, 100.0]), 1);
        assert_eq!(pareto_partition_point(&[50.0, 79.9]), 2);
        assert_eq!(pareto_partition_point(&[]), 0);
    }

    #[test]
    fn test_change_color() {
        assert_eq!(change_color(3.2), BadgeColor::Green);
        assert_eq!(change_color(-0.1), BadgeColor::Red);
        assert_eq!(change_color(0.0), BadgeColor::Gray);
    }

    #[test]
    fn test_risk_level_colors() {
        assert_eq!(RiskLevel::Low.color(), BadgeColor::Green);
        assert_eq!(RiskLevel::Critical.color(), BadgeColor::Red);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234567.4, "$"), "$1,234,567");
        assert_eq!(format_currency(999.0, "$"), "$999");
        assert_eq!(format_currency(-2500.0, "€"), "-€2,500");
        assert_eq!(format_currency(0.0, "$"), "$0");
    }

    #[test]
    fn test_format_compact_currency() {
        assert_eq!(format_compact_currency(1_240_000.0, "$"), "$1.2M");
        assert_eq!(format_compact_currency(850_000.0, "$"), "$850.0K");
        assert_eq!(format_compact_currency(3_400_000_000.0, "$"), "$3.4B");
        assert_eq!(format_compact_currency(42.0, "$"), "$42");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(85.27), "85.3%");
    }
}
