//! `pulse analytics` command - SPC, capability and predictive analytics

use clap::{Args, Subcommand};
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, read_input, rule, section, Session,
};
use crate::cli::helpers::split_list;
use crate::cli::table::{paint, CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::blob::download_blob;
use crate::core::presentation::{self, cpk_label, format_percent};
use crate::core::tabular::{
    parse_list, parse_rows, parse_series, parse_subgroups, BottleneckStep, OeeRow, ParetoRow,
};
use crate::entities::ai_analysis::{
    AiAnalysisRequest, AiAnalysisResult, CapabilityPayload, DmaicPayload, KaizenPayload,
    RcaPayload, WastePayload,
};
use crate::entities::analytics::{
    BottleneckRequest, CapabilityRequest, CapabilityResult, ControlChartData, ExportFormat,
    ExportKind, ImrChartRequest, ListQuery, OeeTrendRequest, ParetoRequest, ParetoResult,
    TaktTimeRequest, XBarRChartRequest,
};

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommands {
    /// Create an X-bar/R chart (one subgroup per input line)
    XbarR(XbarRArgs),

    /// Create an individuals/moving-range chart
    Imr(ImrArgs),

    /// Pareto analysis of `category, value` lines
    Pareto(ParetoArgs),

    /// Process capability study (Cp, Cpk, PPM)
    Capability(CapabilityArgs),

    /// Forecast OEE from `oee, date` history lines
    OeeTrend(OeeTrendArgs),

    /// Identify bottlenecks from `name, cycle, takt, wait, utilization` lines
    Bottlenecks(InputArgs),

    /// Calculate takt time
    TaktTime(TaktTimeArgs),

    /// List saved control charts
    Charts(LimitArgs),

    /// Show a saved control chart
    Chart(IdArgs),

    /// List saved capability studies
    Studies(LimitArgs),

    /// Run an AI analysis
    #[command(subcommand)]
    Ai(AiCommands),

    /// Download a PDF or Excel export
    Export(ExportArgs),
}

/// Input source shared by the data-driven analyses
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input file ("-" or omitted reads stdin)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct XbarRArgs {
    /// Chart name
    #[arg(long)]
    pub name: String,

    /// Subgroup size (backend infers it when omitted)
    #[arg(long)]
    pub subgroup_size: Option<u32>,

    /// Upper specification limit
    #[arg(long, allow_negative_numbers = true)]
    pub usl: Option<f64>,

    /// Lower specification limit
    #[arg(long, allow_negative_numbers = true)]
    pub lsl: Option<f64>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct ImrArgs {
    /// Chart name
    #[arg(long)]
    pub name: String,

    /// Upper specification limit
    #[arg(long, allow_negative_numbers = true)]
    pub usl: Option<f64>,

    /// Lower specification limit
    #[arg(long, allow_negative_numbers = true)]
    pub lsl: Option<f64>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct ParetoArgs {
    /// Optional display labels, comma-separated
    #[arg(long)]
    pub labels: Option<String>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct CapabilityArgs {
    /// Study name
    #[arg(long)]
    pub name: String,

    /// Process name
    #[arg(long)]
    pub process: String,

    /// Measured characteristic
    #[arg(long)]
    pub characteristic: String,

    /// Upper specification limit
    #[arg(long, allow_negative_numbers = true)]
    pub usl: f64,

    /// Lower specification limit
    #[arg(long, allow_negative_numbers = true)]
    pub lsl: f64,

    /// Nominal target
    #[arg(long, allow_negative_numbers = true)]
    pub target: Option<f64>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct OeeTrendArgs {
    /// Days to forecast
    #[arg(long)]
    pub forecast_days: Option<u32>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct TaktTimeArgs {
    /// Available production time per period, in minutes
    #[arg(long)]
    pub available_minutes: f64,

    /// Units demanded per period
    #[arg(long)]
    pub demand: f64,

    /// Shifts per period
    #[arg(long)]
    pub shifts: Option<u32>,

    /// Break time per shift, in minutes
    #[arg(long)]
    pub break_minutes: Option<f64>,
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Backend identifier
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum AiCommands {
    /// DMAIC project guidance
    Dmaic {
        #[arg(long)]
        project: String,
        #[arg(long)]
        problem: String,
        /// Current DMAIC phase
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        goal: Option<String>,
        /// Key metrics, comma-separated
        #[arg(long)]
        metrics: Option<String>,
    },

    /// Identify the eight wastes in a process
    Waste {
        #[arg(long)]
        process: String,
        #[arg(long)]
        description: String,
        // observations, one per line
        #[command(flatten)]
        input: InputArgs,
    },

    /// Plan a kaizen event
    Kaizen {
        #[arg(long)]
        area: String,
        #[arg(long)]
        current_state: String,
        #[arg(long)]
        target_state: Option<String>,
        /// Constraints, comma-separated
        #[arg(long)]
        constraints: Option<String>,
    },

    /// Root cause analysis
    Rca {
        #[arg(long)]
        problem: String,
        #[arg(long)]
        context: Option<String>,
        // symptoms, one per line
        #[command(flatten)]
        input: InputArgs,
    },

    /// Interpret capability data
    Capability {
        #[arg(long)]
        process: String,
        #[arg(long)]
        characteristic: String,
        #[arg(long, allow_negative_numbers = true)]
        usl: f64,
        #[arg(long, allow_negative_numbers = true)]
        lsl: f64,
        #[arg(long, allow_negative_numbers = true)]
        target: Option<f64>,
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Document kind
    pub kind: ExportKind,

    /// Document identifier
    pub id: String,

    /// File format
    #[arg(default_value = "pdf")]
    pub file_format: ExportFormat,

    /// Directory to save into (default: configured download directory)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

/// Run an analytics subcommand
pub async fn run(cmd: AnalyticsCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        AnalyticsCommands::XbarR(args) => run_xbar_r(args, &session).await,
        AnalyticsCommands::Imr(args) => run_imr(args, &session).await,
        AnalyticsCommands::Pareto(args) => run_pareto(args, &session).await,
        AnalyticsCommands::Capability(args) => run_capability(args, &session).await,
        AnalyticsCommands::OeeTrend(args) => run_oee_trend(args, &session).await,
        AnalyticsCommands::Bottlenecks(args) => run_bottlenecks(args, &session).await,
        AnalyticsCommands::TaktTime(args) => run_takt_time(args, &session).await,
        AnalyticsCommands::Charts(args) => run_charts(args, &session).await,
        AnalyticsCommands::Chart(args) => run_chart(args, &session).await,
        AnalyticsCommands::Studies(args) => run_studies(args, &session).await,
        AnalyticsCommands::Ai(cmd) => run_ai(cmd, &session).await,
        AnalyticsCommands::Export(args) => run_export(args, &session).await,
    }
}

async fn run_xbar_r(args: XbarRArgs, session: &Session) -> Result<()> {
    let text = read_input(args.input.input.as_deref())?;
    let req = XBarRChartRequest {
        name: args.name,
        subgroup_size: args.subgroup_size,
        data: parse_subgroups(&text),
        usl: args.usl,
        lsl: args.lsl,
    };
    tracing::debug!(subgroups = req.data.len(), "creating X-bar/R chart");

    let result = session
        .client
        .lean_analytics()
        .create_xbar_r_chart(&req)
        .await
        .map_err(api_error("Failed to create control chart"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }

    rule();
    field("Chart", style(&result.name).yellow());
    if let Some(id) = &result.id {
        field("ID", style(id).cyan());
    }
    if let Some(n) = result.subgroup_size {
        field("Subgroup size", n);
    }
    print_in_control(result.process_in_control);
    rule();
    print_chart("X-bar chart", &result.xbar_chart);
    print_chart("R chart", &result.r_chart);
    print_violations(&result.violations);
    Ok(())
}

async fn run_imr(args: ImrArgs, session: &Session) -> Result<()> {
    let text = read_input(args.input.input.as_deref())?;
    let req = ImrChartRequest {
        name: args.name,
        data: parse_series(&text),
        usl: args.usl,
        lsl: args.lsl,
    };
    tracing::debug!(points = req.data.len(), "creating I-MR chart");

    let result = session
        .client
        .lean_analytics()
        .create_imr_chart(&req)
        .await
        .map_err(api_error("Failed to create control chart"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }

    rule();
    field("Chart", style(&result.name).yellow());
    if let Some(id) = &result.id {
        field("ID", style(id).cyan());
    }
    print_in_control(result.process_in_control);
    rule();
    print_chart("Individuals chart", &result.individuals_chart);
    print_chart("Moving range chart", &result.moving_range_chart);
    print_violations(&result.violations);
    Ok(())
}

fn print_in_control(in_control: Option<bool>) {
    match in_control {
        Some(true) => field("Process", style("in control").green()),
        Some(false) => field("Process", style("out of control").red()),
        None => {}
    }
}

fn print_chart(title: &str, chart: &ControlChartData) {
    section(title);
    println!(
        "  CL {:.4}   UCL {:.4}   LCL {:.4}   ({} points)",
        chart.center_line,
        chart.ucl,
        chart.lcl,
        chart.data_points.len()
    );
    if !chart.limits_ordered() {
        println!("  {}", style("control limits are not ordered LCL <= CL <= UCL").yellow());
    }
    let out = chart.out_of_control_values();
    if out.is_empty() {
        println!("  {}", style("no points outside the limits").dim());
    } else {
        for (index, value) in out {
            println!("  {} point {} = {:.4}", style("✗").red(), index + 1, value);
        }
    }
}

fn print_violations(violations: &[String]) {
    if violations.is_empty() {
        return;
    }
    section("Violations");
    for v in violations {
        println!("  • {}", v);
    }
}

async fn run_pareto(args: ParetoArgs, session: &Session) -> Result<()> {
    let text = read_input(args.input.input.as_deref())?;
    let rows: Vec<ParetoRow> = parse_rows(&text);
    let labels = split_list(args.labels.as_deref());
    let req = ParetoRequest {
        categories: rows.iter().map(|r| r.category.clone()).collect(),
        values: rows.iter().map(|r| r.value).collect(),
        labels: (!labels.is_empty()).then_some(labels),
    };

    let result = session
        .client
        .lean_analytics()
        .pareto_analysis(&req)
        .await
        .map_err(api_error("Analysis failed"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }
    print_pareto(&result, session.format);
    Ok(())
}

const PARETO_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("category", "CATEGORY", 28),
    ColumnDef::new("value", "VALUE", 10),
    ColumnDef::new("percent", "%", 7),
    ColumnDef::new("cumulative", "CUM %", 7),
    ColumnDef::new("group", "GROUP", 12),
];

fn pareto_group(result: &ParetoResult, category: &str) -> CellValue {
    if result.is_vital(category) {
        CellValue::Badge("vital few".to_string(), presentation::BadgeColor::Red)
    } else {
        CellValue::Badge("trivial many".to_string(), presentation::BadgeColor::Gray)
    }
}

fn print_pareto(result: &ParetoResult, format: OutputFormat) {
    if result.partition_disagrees() {
        tracing::warn!(
            reported = result.vital_few.len(),
            cut = result.partition_point(),
            "vital few differs from the 80% cumulative cut"
        );
    }
    let rows: Vec<TableRow> = result
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let group = pareto_group(result, category);
            TableRow::new(category.clone())
                .cell("category", CellValue::Text(category.clone()))
                .cell("value", CellValue::float_opt(result.values.get(i).copied(), 1))
                .cell("percent", CellValue::Percent(result.percentages.get(i).copied()))
                .cell(
                    "cumulative",
                    CellValue::Percent(result.cumulative_percentages.get(i).copied()),
                )
                .cell("group", group)
        })
        .collect();

    TableFormatter::new(PARETO_COLUMNS, "category")
        .without_summary()
        .output(&rows, format);

    if format == OutputFormat::Auto || format == OutputFormat::Tsv {
        println!();
        println!(
            "{} of {} categories account for {}",
            style(vital).cyan(),
            result.categories.len(),
            style(format!("{}%", presentation::PARETO_THRESHOLD_PERCENT)).bold()
        );
        if !result.is_consistent(0.5) {
            println!(
                "{}",
                style("Warning: backend percentages are inconsistent").yellow()
            );
        }
    }
}

async fn run_capability(args: CapabilityArgs, session: &Session) -> Result<()> {
    let text = read_input(args.input.input.as_deref())?;
    let req = CapabilityRequest {
        name: args.name,
        process_name: args.process,
        characteristic: args.characteristic,
        data: parse_series(&text),
        usl: args.usl,
        lsl: args.lsl,
        target: args.target,
    };
    tracing::debug!(samples = req.data.len(), "running capability study");

    let result = session
        .client
        .lean_analytics()
        .capability_analysis(&req)
        .await
        .map_err(api_error("Analysis failed"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }
    print_capability(&result);
    Ok(())
}

fn print_capability(result: &CapabilityResult) {
    let indices = &result.capability_indices;
    let color = result.color();

    rule();
    if let Some(name) = &result.name {
        field("Study", style(name).yellow());
    }
    if let Some(id) = &result.id {
        field("ID", style(id).cyan());
    }
    if let Some(process) = &result.process_name {
        field("Process", process);
    }
    if let Some(characteristic) = &result.characteristic {
        field("Characteristic", characteristic);
    }
    rule();

    section("Capability");
    println!("  Cp   {:.3}", indices.cp);
    println!(
        "  Cpk  {}  {}",
        paint(format!("{:.3}", indices.cpk), color),
        paint(cpk_label(indices.cpk), color).bold()
    );
    println!("  Cpu  {:.3}   Cpl {:.3}", indices.cpu, indices.cpl);
    if let Some(cpm) = indices.cpm {
        println!("  Cpm  {:.3}", cpm);
    }

    let stats = &result.statistics;
    section("Statistics");
    println!(
        "  mean {:.4}   std dev {:.4}   range {:.4} ({:.4} to {:.4})",
        stats.mean, stats.std_dev, stats.range, stats.min, stats.max
    );
    if let Some(n) = stats.sample_size {
        println!("  n = {}", n);
    }

    let perf = &result.performance;
    section("Performance");
    println!("  Sigma level  {:.2}", perf.sigma_level);
    println!(
        "  PPM          {:.0} total ({:.0} above USL, {:.0} below LSL)",
        perf.ppm_total, perf.ppm_upper, perf.ppm_lower
    );
    println!("  Yield        {}", format_percent(perf.yield_percent));
    if let Some(derived) = result.yield_mismatch(0.001) {
        println!("  {} PPM implies {:.4}%", style("!").yellow(), derived);
    }

    section("Interpretation");
    println!("  {}", result.interpretation.centering);
    println!("  {}", result.interpretation.cp_vs_cpk);
}

async fn run_oee_trend(args: OeeTrendArgs, session: &Session) -> Result<()> {
    let text = read_input(args.input.input.as_deref())?;
    let history: Vec<OeeRow> = parse_rows(&text);
    let req = OeeTrendRequest {
        oee_history: history,
        forecast_days: args.forecast_days,
    };

    let result = session
        .client
        .lean_analytics()
        .predict_oee_trend(&req)
        .await
        .map_err(api_error("Prediction failed"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }

    rule();
    field("Current OEE", format_percent(result.current_oee));
    let trend_color = match result.trend.as_str() {
        "improving" => presentation::BadgeColor::Green,
        "declining" => presentation::BadgeColor::Red,
        _ => presentation::BadgeColor::Gray,
    };
    field("Trend", paint(&result.trend, trend_color));
    if let Some(slope) = result.slope {
        field("Slope", format!("{:+.3}/day", slope));
    }
    if let Some(confidence) = result.confidence {
        field("Confidence", format_percent(confidence * 100.0));
    }
    rule();

    if !result.forecast.is_empty() {
        section("Forecast");
        for point in &result.forecast {
            let band = match (point.lower_bound, point.upper_bound) {
                (Some(lo), Some(hi)) => format!("  [{:.1} - {:.1}]", lo, hi),
                _ => String::new(),
            };
            println!("  day {:>3}  {:>6.1}%{}", point.day, point.predicted_oee, band);
        }
    }
    print_recommendations(&result.recommendations);
    Ok(())
}

async fn run_bottlenecks(args: InputArgs, session: &Session) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    let steps: Vec<BottleneckStep> = parse_rows(&text);
    let req = BottleneckRequest {
        process_steps: steps,
    };

    let result = session
        .client
        .lean_analytics()
        .identify_bottlenecks(&req)
        .await
        .map_err(api_error("Analysis failed"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }

    if let Some(primary) = &result.primary_bottleneck {
        println!("{}: {}", style("Primary bottleneck").bold(), style(primary).red());
        println!();
    }

    let rows: Vec<TableRow> = result
        .bottlenecks
        .iter()
        .map(|b| {
            let color = match b.severity.as_str() {
                "critical" | "high" => presentation::BadgeColor::Red,
                "medium" => presentation::BadgeColor::Yellow,
                _ => presentation::BadgeColor::Green,
            };
            TableRow::new(b.name.clone())
                .cell("step", CellValue::Text(b.name.clone()))
                .cell("severity", CellValue::Badge(b.severity.clone(), color))
                .cell("score", CellValue::Float(b.score, 2))
                .cell("reasons", CellValue::Tags(b.reasons.clone()))
        })
        .collect();

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("step", "STEP", 24),
        ColumnDef::new("severity", "SEVERITY", 10),
        ColumnDef::new("score", "SCORE", 7),
        ColumnDef::new("reasons", "REASONS", 50),
    ];
    TableFormatter::new(COLUMNS, "bottleneck").output(&rows, session.format);
    print_recommendations(&result.recommendations);
    Ok(())
}

async fn run_takt_time(args: TaktTimeArgs, session: &Session) -> Result<()> {
    let req = TaktTimeRequest {
        available_time_minutes: args.available_minutes,
        customer_demand: args.demand,
        shifts: args.shifts,
        break_minutes: args.break_minutes,
    };

    let result = session
        .client
        .lean_analytics()
        .calculate_takt_time(&req)
        .await
        .map_err(api_error("Calculation failed"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }

    rule();
    field(
        "Takt time",
        style(format!(
            "{:.2} min ({:.1} s)",
            result.takt_time_minutes, result.takt_time_seconds
        ))
        .cyan(),
    );
    if let Some(net) = result.net_available_minutes {
        field("Net available", format!("{:.0} min", net));
    }
    if let Some(demand) = result.customer_demand {
        field("Demand", format!("{:.0} units", demand));
    }
    rule();
    if let Some(text) = &result.interpretation {
        println!("{}", text);
    }
    Ok(())
}

async fn run_charts(args: LimitArgs, session: &Session) -> Result<()> {
    let query = ListQuery { limit: args.limit };
    let charts = session
        .client
        .lean_analytics()
        .list_control_charts(&query)
        .await
        .map_err(api_error("Failed to load control charts"))?;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 16),
        ColumnDef::new("name", "NAME", 30),
        ColumnDef::new("type", "TYPE", 8),
        ColumnDef::new("state", "STATE", 14),
        ColumnDef::new("created", "CREATED", 10),
    ];
    print_list(&charts, session.format, COLUMNS, "control chart", |c| {
        let state = match c.process_in_control {
            Some(true) => CellValue::Badge("in control".into(), presentation::BadgeColor::Green),
            Some(false) => CellValue::Badge("out of control".into(), presentation::BadgeColor::Red),
            None => CellValue::Empty,
        };
        TableRow::new(c.id.clone())
            .cell("id", CellValue::Id(c.id.clone()))
            .cell("name", CellValue::Text(c.name.clone()))
            .cell("type", CellValue::Text(c.chart_type.clone()))
            .cell("state", state)
            .cell("created", CellValue::date_opt(c.created_at))
    })
}

async fn run_chart(args: IdArgs, session: &Session) -> Result<()> {
    let chart = session
        .client
        .lean_analytics()
        .get_control_chart(&args.id)
        .await
        .map_err(api_error("Failed to load control chart"))?;

    // Shape varies by chart type, so always print it raw
    print_structured(&chart, session.format)
}

async fn run_studies(args: LimitArgs, session: &Session) -> Result<()> {
    let query = ListQuery { limit: args.limit };
    let studies = session
        .client
        .lean_analytics()
        .list_capability_studies(&query)
        .await
        .map_err(api_error("Failed to load capability studies"))?;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 16),
        ColumnDef::new("name", "NAME", 26),
        ColumnDef::new("process", "PROCESS", 18),
        ColumnDef::new("characteristic", "CHARACTERISTIC", 18),
        ColumnDef::new("cpk", "CPK", 6),
        ColumnDef::new("created", "CREATED", 10),
    ];
    print_list(&studies, session.format, COLUMNS, "capability study", |s| {
        TableRow::new(s.id.clone())
            .cell("id", CellValue::Id(s.id.clone()))
            .cell("name", CellValue::Text(s.name.clone()))
            .cell("process", CellValue::OptionalText(s.process_name.clone()))
            .cell("characteristic", CellValue::OptionalText(s.characteristic.clone()))
            .cell("cpk", CellValue::Cpk(s.cpk))
            .cell("created", CellValue::date_opt(s.created_at))
    })
}

async fn run_ai(cmd: AiCommands, session: &Session) -> Result<()> {
    let req = match cmd {
        AiCommands::Dmaic {
            project,
            problem,
            phase,
            goal,
            metrics,
        } => AiAnalysisRequest::Dmaic(DmaicPayload {
            project_name: project,
            problem_statement: problem,
            current_phase: phase,
            goal,
            metrics: split_list(metrics.as_deref()),
        }),
        AiCommands::Waste {
            process,
            description,
            input,
        } => AiAnalysisRequest::Waste(WastePayload {
            process_name: process,
            process_description: description,
            observations: optional_list(input)?,
        }),
        AiCommands::Kaizen {
            area,
            current_state,
            target_state,
            constraints,
        } => AiAnalysisRequest::Kaizen(KaizenPayload {
            area,
            current_state,
            target_state,
            constraints: split_list(constraints.as_deref()),
        }),
        AiCommands::Rca {
            problem,
            context,
            input,
        } => AiAnalysisRequest::Rca(RcaPayload {
            problem,
            symptoms: optional_list(input)?,
            context,
        }),
        AiCommands::Capability {
            process,
            characteristic,
            usl,
            lsl,
            target,
            input,
        } => {
            let text = read_input(input.input.as_deref())?;
            AiAnalysisRequest::Capability(CapabilityPayload {
                process_name: process,
                characteristic,
                data: parse_series(&text),
                usl,
                lsl,
                target,
            })
        }
    };
    tracing::debug!(analysis_type = req.analysis_type(), "dispatching AI analysis");

    let result = session
        .client
        .lean_analytics()
        .run_ai_analysis(&req)
        .await
        .map_err(api_error("Analysis failed"))?;

    if session.format.is_structured() {
        return print_structured(&result, session.format);
    }
    print_ai_result(&result);
    Ok(())
}

/// List-style input is optional for AI analyses; only read it when a file was given
fn optional_list(input: InputArgs) -> Result<Vec<String>> {
    match input.input {
        Some(path) => Ok(parse_list(&read_input(Some(&path))?)),
        None => Ok(Vec::new()),
    }
}

fn print_ai_result(result: &AiAnalysisResult) {
    rule();
    field("Analysis", style(result.analysis_type.to_uppercase()).cyan());
    if let Some(confidence) = result.confidence {
        field("Confidence", format_percent(confidence * 100.0));
    }
    rule();
    println!("{}", result.summary);

    if !result.findings.is_empty() {
        section("Findings");
        for finding in &result.findings {
            match &finding.severity {
                Some(sev) => println!("  • {} {}", style(&finding.title).bold(), style(format!("[{}]", sev)).dim()),
                None => println!("  • {}", style(&finding.title).bold()),
            }
            if let Some(detail) = &finding.detail {
                println!("    {}", detail);
            }
        }
    }
    print_recommendations(&result.recommendations);
}

fn print_recommendations(recommendations: &[String]) {
    if recommendations.is_empty() {
        return;
    }
    section("Recommendations");
    for (i, r) in recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, r);
    }
}

async fn run_export(args: ExportArgs, session: &Session) -> Result<()> {
    let blob = session
        .client
        .lean_analytics()
        .export(args.kind, &args.id, args.file_format)
        .await
        .map_err(api_error("Export failed"))?;

    let dir = args
        .output_dir
        .unwrap_or_else(|| session.config.download_dir());
    let fallback_name = format!(
        "{}_{}.{}",
        args.kind.to_string().replace('-', "_"),
        args.id,
        args.file_format.extension()
    );
    let path = download_blob(&blob, &dir, &fallback_name).map_err(|e| miette::miette!("{}", e))?;

    if session.format == OutputFormat::Id {
        println!("{}", path.display());
    } else {
        session.success(format!(
            "Saved {} ({} bytes)",
            style(path.display()).cyan(),
            blob.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cpk_rating_used_for_display() {
        assert_eq!(presentation::capability_color(1.4), presentation::BadgeColor::Blue);
        assert_eq!(cpk_label(1.4), "Capable");
    }

    #[test]
    fn test_control_chart_limits_accept_negative_values() {
        let cli = Cli::try_parse_from([
            "pulse", "analytics", "xbar-r", "--name", "Bore offset", "--lsl", "-0.5", "--usl",
            "0.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Analytics(AnalyticsCommands::XbarR(args)) => {
                assert_eq!(args.lsl, Some(-0.5));
                assert_eq!(args.usl, Some(0.5));
            }
            _ => panic!("expected analytics xbar-r"),
        }

        let cli = Cli::try_parse_from([
            "pulse", "analytics", "imr", "--name", "Drift", "--usl", "-0.1", "--lsl", "-2",
        ])
        .unwrap();
        match cli.command {
            Commands::Analytics(AnalyticsCommands::Imr(args)) => {
                assert_eq!(args.usl, Some(-0.1));
                assert_eq!(args.lsl, Some(-2.0));
            }
            _ => panic!("expected analytics imr"),
        }
    }

    #[test]
    fn test_pareto_group_uses_reported_vital_few() {
        let result = ParetoResult {
            categories: vec!["Leak".into(), "Burr".into()],
            values: vec![70.0, 30.0],
            percentages: vec![70.0, 30.0],
            cumulative_percentages: vec![70.0, 100.0],
            vital_few: vec!["Leak".into(), "Burr".into()],
            trivial_many: vec![],
            total: Some(100.0),
        };
        assert!(matches!(
            pareto_group(&result, "Burr"),
            CellValue::Badge(ref label, presentation::BadgeColor::Red) if label == "vital few"
        ));
        assert!(result.partition_disagrees());
    }

    #[test]
    fn test_optional_list_without_file_is_empty() {
        let items = optional_list(InputArgs { input: None }).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_optional_list_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symptoms.txt");
        std::fs::write(&path, "drips at 40 psi\n\n  seal swells \n").unwrap();
        let items = optional_list(InputArgs { input: Some(path) }).unwrap();
        assert_eq!(items, vec!["drips at 40 psi", "seal swells"]);
    }
}
