//! `pulse parse` command - offline check of tabular text input

use clap::{Args, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::utils::read_input;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::tabular::{
    parse_list, parse_rows, parse_series, parse_subgroups, BottleneckStep, FlowConnectionRow,
    FlowNodeRow, OeeRow, ParetoRow, SipocItemRow, VsmStepRow,
};

/// Shape of the text being parsed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// name, cycle_time, takt_time, wait_time, utilization
    Bottleneck,
    /// name, cycle_time, wait_time, inventory, operators, uptime, value_added
    Vsm,
    /// name, description
    Sipoc,
    /// id, label, type, x, y
    FlowNodes,
    /// from, to, label
    FlowConnections,
    /// date, oee
    Oee,
    /// category, count
    Pareto,
    /// Numbers separated by commas or newlines
    Series,
    /// One subgroup per line
    Subgroups,
    /// Items separated by commas or newlines
    List,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Input shape
    #[arg(value_enum)]
    pub kind: InputKind,

    /// Input file (default: stdin)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

pub fn run(args: ParseArgs, global: &GlobalOpts) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    tracing::debug!(kind = ?args.kind, bytes = text.len(), "parsing input");

    match args.kind {
        InputKind::Bottleneck => emit(&parse_rows::<BottleneckStep>(&text), global.format),
        InputKind::Vsm => emit(&parse_rows::<VsmStepRow>(&text), global.format),
        InputKind::Sipoc => emit(&parse_rows::<SipocItemRow>(&text), global.format),
        InputKind::FlowNodes => emit(&parse_rows::<FlowNodeRow>(&text), global.format),
        InputKind::FlowConnections => {
            emit(&parse_rows::<FlowConnectionRow>(&text), global.format)
        }
        InputKind::Oee => emit(&parse_rows::<OeeRow>(&text), global.format),
        InputKind::Pareto => emit(&parse_rows::<ParetoRow>(&text), global.format),
        InputKind::Series => emit(&parse_series(&text), global.format),
        InputKind::Subgroups => emit(&parse_subgroups(&text), global.format),
        InputKind::List => emit(&parse_list(&text), global.format),
    }
}

/// JSON unless YAML was asked for; the parsed shape is the request body
fn emit<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    let out = match format {
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic()?,
        _ => serde_json::to_string_pretty(value).into_diagnostic()?,
    };
    println!("{}", out.trim_end());
    Ok(())
}
