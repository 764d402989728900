//! Free-text tabular input
//!
//! Converts newline/comma-delimited text (as typed into a text area or saved
//! in a file) into typed rows. A static column spec drives the conversion:
//! every line is split on commas, each field trimmed, and fields are mapped
//! positionally onto the columns. Parsing never fails: a number that does not
//! parse becomes 0, NaN or absent depending on its column kind, and the
//! backend decides whether the resulting payload is acceptable.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

/// How a column's raw text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Required text, empty string when missing
    Text,
    /// Optional text, absent when empty
    OptionalText,
    /// Required number, 0 when unparseable
    Number,
    /// Required number, NaN when unparseable
    NumberOrNan,
    /// Optional number, absent when unparseable
    OptionalNumber,
    /// Required integer, 0 when unparseable
    Integer,
    /// `true`/`yes` (any case) is true, anything else false
    Flag,
}

/// A named column in a row spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// A parsed field value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    Flag(bool),
    Absent,
}

/// One parsed line, addressable by column name
#[derive(Debug, Clone)]
pub struct Cells {
    columns: &'static [Column],
    values: Vec<Cell>,
}

impl Cells {
    fn get(&self, name: &str) -> &Cell {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .and_then(|i| self.values.get(i))
            .unwrap_or(&Cell::Absent)
    }

    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Cell::Text(s) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn optional_text(&self, name: &str) -> Option<String> {
        match self.get(name) {
            Cell::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> f64 {
        match self.get(name) {
            Cell::Number(n) => *n,
            Cell::Integer(i) => *i as f64,
            _ => 0.0,
        }
    }

    pub fn optional_number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Cell::Number(n) => Some(*n),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> i64 {
        match self.get(name) {
            Cell::Integer(i) => *i,
            _ => 0,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Cell::Flag(true))
    }
}

/// A row type that can be built from a column spec
pub trait TabularRow: Sized {
    /// Positional column order
    const COLUMNS: &'static [Column];

    fn from_cells(cells: &Cells) -> Self;
}

/// Parse a leading decimal number the way lenient text parsers do
///
/// Leading whitespace is skipped, then the longest prefix of the form
/// `[+-]digits[.digits][e[+-]digits]` (or `Infinity`) is taken. Trailing
/// text is ignored: `"45s"` is 45. Returns `None` if no digits lead.
pub fn parse_number_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Parse a leading integer, stopping at the first non-digit (`"3.7"` is 3)
pub fn parse_integer_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// `true`/`yes` in any case
pub fn parse_flag(raw: &str) -> bool {
    let v = raw.trim();
    v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
}

fn parse_cell(kind: ColumnKind, raw: Option<&str>) -> Cell {
    let raw = raw.unwrap_or("");
    match kind {
        ColumnKind::Text => Cell::Text(raw.to_string()),
        ColumnKind::OptionalText => {
            if raw.is_empty() {
                Cell::Absent
            } else {
                Cell::Text(raw.to_string())
            }
        }
        ColumnKind::Number => Cell::Number(parse_number_prefix(raw).unwrap_or(0.0)),
        ColumnKind::NumberOrNan => Cell::Number(parse_number_prefix(raw).unwrap_or(f64::NAN)),
        ColumnKind::OptionalNumber => parse_number_prefix(raw).map_or(Cell::Absent, Cell::Number),
        ColumnKind::Integer => Cell::Integer(parse_integer_prefix(raw).unwrap_or(0)),
        ColumnKind::Flag => Cell::Flag(parse_flag(raw)),
    }
}

/// Split text into trimmed comma-separated records, skipping blank lines
///
/// Quoting is disabled so every comma separates fields.
fn records(text: &str) -> Vec<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(Result::ok)
        .filter(|r| !(r.len() == 1 && r.get(0).map_or(true, str::is_empty)))
        .collect()
}

/// Map a single record onto a column spec
pub fn parse_record(columns: &'static [Column], record: &StringRecord) -> Cells {
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, col)| parse_cell(col.kind, record.get(i)))
        .collect();
    Cells { columns, values }
}

/// Parse every non-blank line of `text` into cells for `columns`
pub fn parse_lines(columns: &'static [Column], text: &str) -> Vec<Cells> {
    records(text)
        .iter()
        .map(|r| parse_record(columns, r))
        .collect()
}

/// Parse every non-blank line of `text` into a typed row
pub fn parse_rows<T: TabularRow>(text: &str) -> Vec<T> {
    parse_lines(T::COLUMNS, text)
        .iter()
        .map(T::from_cells)
        .collect()
}

/// A flat series of numbers separated by commas and/or newlines
///
/// Unparseable entries are dropped.
pub fn parse_series(text: &str) -> Vec<f64> {
    records(text)
        .iter()
        .flat_map(|r| r.iter().filter_map(parse_number_prefix).collect::<Vec<_>>())
        .collect()
}

/// One subgroup per line, values separated by commas
///
/// Unparseable entries are dropped, as are lines with no numbers at all.
pub fn parse_subgroups(text: &str) -> Vec<Vec<f64>> {
    records(text)
        .iter()
        .map(|r| r.iter().filter_map(parse_number_prefix).collect::<Vec<_>>())
        .filter(|group| !group.is_empty())
        .collect()
}

/// Non-blank lines, trimmed (list-style inputs such as symptoms or observations)
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Row types used by the console's input files
// ============================================================================

/// Process step for bottleneck identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckStep {
    pub name: String,
    pub cycle_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takt_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
}

impl TabularRow for BottleneckStep {
    const COLUMNS: &'static [Column] = &[
        Column::new("name", ColumnKind::Text),
        Column::new("cycle_time", ColumnKind::Number),
        Column::new("takt_time", ColumnKind::OptionalNumber),
        Column::new("wait_time", ColumnKind::OptionalNumber),
        Column::new("utilization", ColumnKind::OptionalNumber),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            name: cells.text("name"),
            cycle_time: cells.number("cycle_time"),
            takt_time: cells.optional_number("takt_time"),
            wait_time: cells.optional_number("wait_time"),
            utilization: cells.optional_number("utilization"),
        }
    }
}

/// Value stream process step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VsmStepRow {
    pub name: String,
    pub cycle_time: f64,
    pub wait_time: f64,
    pub operators: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    pub value_added: bool,
}

impl TabularRow for VsmStepRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("name", ColumnKind::Text),
        Column::new("cycle_time", ColumnKind::Number),
        Column::new("wait_time", ColumnKind::Number),
        Column::new("operators", ColumnKind::Integer),
        Column::new("uptime", ColumnKind::OptionalNumber),
        Column::new("value_added", ColumnKind::Flag),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            name: cells.text("name"),
            cycle_time: cells.number("cycle_time"),
            wait_time: cells.number("wait_time"),
            operators: cells.integer("operators"),
            uptime: cells.optional_number("uptime"),
            value_added: cells.flag("value_added"),
        }
    }
}

/// SIPOC list entry (supplier, input, step, output or customer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipocItemRow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TabularRow for SipocItemRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("name", ColumnKind::Text),
        Column::new("description", ColumnKind::OptionalText),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            name: cells.text("name"),
            description: cells.optional_text("description"),
        }
    }
}

/// Process flow node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNodeRow {
    pub id: String,
    pub label: String,
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimlane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TabularRow for FlowNodeRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("id", ColumnKind::Text),
        Column::new("label", ColumnKind::Text),
        Column::new("node_type", ColumnKind::Text),
        Column::new("swimlane", ColumnKind::OptionalText),
        Column::new("duration", ColumnKind::OptionalNumber),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            id: cells.text("id"),
            label: cells.text("label"),
            node_type: cells.text("node_type"),
            swimlane: cells.optional_text("swimlane"),
            duration: cells.optional_number("duration"),
        }
    }
}

/// Process flow connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConnectionRow {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TabularRow for FlowConnectionRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("from", ColumnKind::Text),
        Column::new("to", ColumnKind::Text),
        Column::new("label", ColumnKind::OptionalText),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            from: cells.text("from"),
            to: cells.text("to"),
            label: cells.optional_text("label"),
        }
    }
}

/// OEE history point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeRow {
    pub oee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl TabularRow for OeeRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("oee", ColumnKind::NumberOrNan),
        Column::new("date", ColumnKind::OptionalText),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            oee: cells.number("oee"),
            date: cells.optional_text("date"),
        }
    }
}

/// Pareto category with its count or cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    pub category: String,
    pub value: f64,
}

impl TabularRow for ParetoRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("category", ColumnKind::Text),
        Column::new("value", ColumnKind::Number),
    ];

    fn from_cells(cells: &Cells) -> Self {
        Self {
            category: cells.text("category"),
            value: cells.number("value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottleneck_rows() {
        let input = "Assembly, 45, 40, 10, 85\nWelding, 60, 40, 5, 95";
        let rows: Vec<BottleneckStep> = parse_rows(input);
        assert_eq!(
            rows,
            vec![
                BottleneckStep {
                    name: "Assembly".to_string(),
                    cycle_time: 45.0,
                    takt_time: Some(40.0),
                    wait_time: Some(10.0),
                    utilization: Some(85.0),
                },
                BottleneckStep {
                    name: "Welding".to_string(),
                    cycle_time: 60.0,
                    takt_time: Some(40.0),
                    wait_time: Some(5.0),
                    utilization: Some(95.0),
                },
            ]
        );
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let input = "Assembly, 45, 40, 10, 85\nWelding, 60, 40, 5, 95";
        let first: Vec<BottleneckStep> = parse_rows(input);
        let second: Vec<BottleneckStep> = parse_rows(input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bottleneck_serializes_without_absent_fields() {
        let rows: Vec<BottleneckStep> = parse_rows("Paint, 30");
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "Paint", "cycle_time": 30.0}]));
    }

    #[test]
    fn test_blank_and_whitespace_lines_skipped() {
        let input = "\n  \nAssembly, 45\n\t\n\nWelding, 60\n";
        let rows: Vec<BottleneckStep> = parse_rows(input);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Welding");
    }

    #[test]
    fn test_crlf_input() {
        let rows: Vec<BottleneckStep> = parse_rows("Assembly, 45\r\nWelding, 60\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cycle_time, 45.0);
    }

    #[test]
    fn test_required_number_degrades_to_zero() {
        let rows: Vec<BottleneckStep> = parse_rows("Assembly, fast, slow");
        assert_eq!(rows[0].cycle_time, 0.0);
        assert_eq!(rows[0].takt_time, None);
    }

    #[test]
    fn test_required_number_may_degrade_to_nan() {
        let rows: Vec<OeeRow> = parse_rows("n/a, 2024-01-01\n82.5");
        assert!(rows[0].oee.is_nan());
        assert_eq!(rows[0].date.as_deref(), Some("2024-01-01"));
        assert_eq!(rows[1].oee, 82.5);
        assert_eq!(rows[1].date, None);
    }

    #[test]
    fn test_missing_trailing_fields() {
        let rows: Vec<VsmStepRow> = parse_rows("Cutting");
        assert_eq!(
            rows[0],
            VsmStepRow {
                name: "Cutting".to_string(),
                cycle_time: 0.0,
                wait_time: 0.0,
                operators: 0,
                uptime: None,
                value_added: false,
            }
        );
    }

    #[test]
    fn test_flags() {
        let rows: Vec<VsmStepRow> = parse_rows(
            "A, 1, 2, 1, 90, TRUE\nB, 1, 2, 1, 90, yes\nC, 1, 2, 1, 90, Yes\nD, 1, 2, 1, 90, 1\nE, 1, 2, 1, 90, no",
        );
        let flags: Vec<bool> = rows.iter().map(|r| r.value_added).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_integer_truncates() {
        let rows: Vec<VsmStepRow> = parse_rows("A, 1, 2, 3.7");
        assert_eq!(rows[0].operators, 3);
    }

    #[test]
    fn test_quotes_are_not_special() {
        let rows: Vec<SipocItemRow> = parse_rows("\"Acme, Inc\", steel");
        assert_eq!(rows[0].name, "\"Acme");
        assert_eq!(rows[0].description.as_deref(), Some("Inc\""));
    }

    #[test]
    fn test_optional_text_empty_is_absent() {
        let rows: Vec<FlowConnectionRow> = parse_rows("start, review, \nreview, done, approved");
        assert_eq!(rows[0].label, None);
        assert_eq!(rows[1].label.as_deref(), Some("approved"));
    }

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number_prefix("45"), Some(45.0));
        assert_eq!(parse_number_prefix("  -3.5"), Some(-3.5));
        assert_eq!(parse_number_prefix("45s"), Some(45.0));
        assert_eq!(parse_number_prefix(".5"), Some(0.5));
        assert_eq!(parse_number_prefix("5."), Some(5.0));
        assert_eq!(parse_number_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_number_prefix("2e"), Some(2.0));
        assert_eq!(parse_number_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number_prefix("abc"), None);
        assert_eq!(parse_number_prefix("."), None);
        assert_eq!(parse_number_prefix(""), None);
        assert_eq!(parse_number_prefix("-"), None);
    }

    #[test]
    fn test_parse_integer_prefix() {
        assert_eq!(parse_integer_prefix("12"), Some(12));
        assert_eq!(parse_integer_prefix("-4x"), Some(-4));
        assert_eq!(parse_integer_prefix("x4"), None);
    }

    #[test]
    fn test_parse_series() {
        assert_eq!(
            parse_series("10.1, 10.3\n9.8,bad\n\n10.0"),
            vec![10.1, 10.3, 9.8, 10.0]
        );
    }

    #[test]
    fn test_parse_subgroups() {
        let groups = parse_subgroups("10.1, 10.2, 9.9\n\nx, y\n10.0, 10.4, 10.1");
        assert_eq!(groups, vec![vec![10.1, 10.2, 9.9], vec![10.0, 10.4, 10.1]]);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("  late deliveries\n\nrework at station 3 \n"),
            vec!["late deliveries", "rework at station 3"]
        );
    }

    #[test]
    fn test_generic_cells_by_name() {
        const COLS: &[Column] = &[
            Column::new("a", ColumnKind::Text),
            Column::new("b", ColumnKind::OptionalNumber),
        ];
        let cells = parse_lines(COLS, "x, 7");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].text("a"), "x");
        assert_eq!(cells[0].optional_number("b"), Some(7.0));
        assert_eq!(cells[0].optional_number("missing"), None);
    }
}
