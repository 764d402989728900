//! Table formatting utilities for CLI list commands
//!
//! Every list command builds [`TableRow`]s of typed [`CellValue`]s and hands
//! them to a [`TableFormatter`], which renders them as aligned colored columns,
//! CSV, a markdown table, or bare IDs.

use chrono::{DateTime, Local, NaiveDate, Utc};
use console::{style, StyledObject};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::presentation::{self, BadgeColor};

/// Apply a badge color to terminal text
pub fn paint<D>(value: D, color: BadgeColor) -> StyledObject<D> {
    let styled = style(value);
    match color {
        BadgeColor::Green => styled.green(),
        BadgeColor::Blue => styled.blue(),
        BadgeColor::Yellow => styled.yellow(),
        BadgeColor::Orange => styled.color256(208),
        BadgeColor::Red => styled.red(),
        BadgeColor::Purple => styled.magenta(),
        BadgeColor::Gray => styled.dim(),
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Backend identifier (cyan, truncated to 16 chars)
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Optional text (displays "-" if None)
    OptionalText(Option<String>),
    /// Status or category label with its badge color
    Badge(String, BadgeColor),
    /// Cpk with the capability rating color
    Cpk(Option<f64>),
    /// Percentage with one decimal place
    Percent(Option<f64>),
    /// Whole-unit currency amount
    Currency(f64),
    /// Integer count
    Number(i64),
    /// Float value with precision
    Float(f64, usize),
    /// DateTime displayed as date only
    Date(DateTime<Utc>),
    /// DateTime displayed with time
    DateTime(DateTime<Utc>),
    /// Calendar date
    Day(NaiveDate),
    /// Boolean flag (yes green, no dim)
    Flag(bool),
    /// Labels as comma-separated
    Tags(Vec<String>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Wrap an optional datetime, falling back to an empty cell
    pub fn date_opt(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Date)
    }

    pub fn day_opt(value: Option<NaiveDate>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Day)
    }

    pub fn float_opt(value: Option<f64>, precision: usize) -> Self {
        value.map_or(CellValue::Empty, |v| CellValue::Float(v, precision))
    }

    /// Format for aligned terminal output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                let display = truncate_str(id, 16);
                format!("{:<width$}", style(display).cyan(), width = width)
            }
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width), width = width)
            }
            CellValue::OptionalText(opt) => match opt {
                Some(s) => CellValue::Text(s.clone()).format_tsv(width),
                None => CellValue::Empty.format_tsv(width),
            },
            CellValue::Badge(label, color) => {
                format!("{:<width$}", paint(label, *color), width = width)
            }
            CellValue::Cpk(opt) => {
                let styled = match opt {
                    Some(c) => paint(format!("{:.2}", c), presentation::capability_color(*c)),
                    None => style("-".to_string()).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Date(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                format!("{:<width$}", local.format("%Y-%m-%d"), width = width)
            }
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                format!("{:<width$}", local.format("%Y-%m-%d %H:%M"), width = width)
            }
            CellValue::Flag(true) => format!("{:<width$}", style("yes").green(), width = width),
            CellValue::Flag(false) => format!("{:<width$}", style("no").dim(), width = width),
            CellValue::Number(_) | CellValue::Float(..) | CellValue::Currency(_) => {
                format!("{:>width$}", self.raw(), width = width)
            }
            CellValue::Percent(Some(_)) => format!("{:>width$}", self.raw(), width = width),
            CellValue::Tags(_) => {
                format!("{:<width$}", truncate_str(&self.raw(), width), width = width)
            }
            CellValue::Percent(None) | CellValue::Day(_) | CellValue::Empty => {
                format!("{:<width$}", self.raw(), width = width)
            }
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Empty | CellValue::OptionalText(None) | CellValue::Cpk(None) => {
                String::new()
            }
            CellValue::Percent(None) => String::new(),
            CellValue::Date(dt) => dt.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.to_rfc3339(),
            CellValue::Currency(v) => format!("{:.2}", v),
            CellValue::Percent(Some(v)) => format!("{}", v),
            _ => escape_csv(&self.raw()),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        self.raw().replace('|', "\\|")
    }

    /// Get raw string value (no styling)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Badge(s, _) => s.clone(),
            CellValue::OptionalText(opt) => opt.clone().unwrap_or_else(|| "-".to_string()),
            CellValue::Cpk(opt) => opt.map_or_else(|| "-".to_string(), |c| format!("{:.2}", c)),
            CellValue::Percent(opt) => opt.map_or_else(|| "-".to_string(), presentation::format_percent),
            CellValue::Currency(v) => presentation::format_currency(*v, "$"),
            CellValue::Number(n) => n.to_string(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
            CellValue::Date(dt) => dt.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            CellValue::Day(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Flag(b) => (if *b { "yes" } else { "no" }).to_string(),
            CellValue::Tags(tags) => tags.join(", "),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Id(id) => id.chars().count().min(16),
            CellValue::Date(_) | CellValue::Day(_) => 10,
            CellValue::DateTime(_) => 16,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    /// Add a cell value (builder pattern)
    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in the tabular formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            show_summary: true,
        }
    }

    /// Drop the trailing "N item(s) found" line
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Render rows; structured formats (json/yaml) are handled by the caller
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) {
        match format {
            OutputFormat::Csv => self.output_csv(rows),
            OutputFormat::Md => self.output_md(rows),
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.id);
                }
            }
            _ => self.output_tsv(rows),
        }
    }

    /// Column widths sized to content, capped at each column's maximum
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);
                content.max(col.header.len()).min(col.width.max(col.header.len()))
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| format!("{:<w$}", style(col.header).bold(), w = w))
            .collect();
        println!("{}", header.join(" "));
        println!(
            "{}",
            "-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1))
        );

        for row in rows {
            let line: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, &w)| {
                    row.get(col.key)
                        .unwrap_or(&CellValue::Empty)
                        .format_tsv(w)
                })
                .collect();
            println!("{}", line.join(" ").trim_end());
        }

        if self.show_summary {
            println!();
            println!("{} {}(s) found.", style(rows.len()).cyan(), self.noun);
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let header: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        println!("{}", header.join(","));
        for row in rows {
            let line: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(CellValue::format_csv)
                        .unwrap_or_default()
                })
                .collect();
            println!("{}", line.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow]) {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(self.columns.iter().map(|col| {
                row.get(col.key)
                    .map(CellValue::format_md)
                    .unwrap_or_else(|| "-".to_string())
            }));
        }
        println!("{}", builder.build().with(Style::markdown()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpk_raw_and_csv() {
        assert_eq!(CellValue::Cpk(Some(1.333)).raw(), "1.33");
        assert_eq!(CellValue::Cpk(None).raw(), "-");
        assert_eq!(CellValue::Cpk(None).format_csv(), "");
    }

    #[test]
    fn test_currency_and_percent() {
        assert_eq!(CellValue::Currency(184250.0).raw(), "$184,250");
        assert_eq!(CellValue::Currency(1234.5).format_csv(), "1234.50");
        assert_eq!(CellValue::Percent(Some(87.54)).raw(), "87.5%");
    }

    #[test]
    fn test_csv_escapes_text() {
        let cell = CellValue::Text("Weld, rework".to_string());
        assert_eq!(cell.format_csv(), "\"Weld, rework\"");
    }

    #[test]
    fn test_md_escapes_pipes() {
        assert_eq!(CellValue::Text("a|b".to_string()).format_md(), "a\\|b");
    }

    #[test]
    fn test_row_lookup() {
        let row = TableRow::new("usr-001")
            .cell("email", CellValue::Text("a@example.com".to_string()))
            .cell("active", CellValue::Flag(true));
        assert_eq!(row.get("active").map(CellValue::raw).as_deref(), Some("yes"));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_widths_fit_content_within_cap() {
        const COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("id", "ID", 16),
            ColumnDef::new("name", "NAME", 8),
        ];
        let rows = vec![TableRow::new("x")
            .cell("id", CellValue::Id("org-1".to_string()))
            .cell("name", CellValue::Text("Northwind Manufacturing".to_string()))];
        let widths = TableFormatter::new(COLUMNS, "organization").calculate_widths(&rows);
        assert_eq!(widths, vec![5, 8]);
    }

    #[test]
    fn test_id_width_capped() {
        let cell = CellValue::Id("a-very-long-identifier-value".to_string());
        assert_eq!(cell.display_width(), 16);
    }
}
