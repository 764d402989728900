//! `pulse process` command - SIPOC diagrams, value stream maps, process flows

use clap::{Args, Subcommand};
use console::style;
use miette::Result;
use std::path::{Path, PathBuf};

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, read_input, rule, section, Session,
};
use crate::cli::table::{paint, CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::presentation::format_percent;
use crate::core::tabular::{parse_rows, FlowConnectionRow, FlowNodeRow, SipocItemRow, TabularRow};
use crate::entities::analytics::ListQuery;
use crate::entities::process_map::{
    ProcessFlowDiagram, ProcessFlowRequest, SipocDiagram, SipocRequest, SipocStep,
    ValueStreamMap, VsmRequest,
};

#[derive(Subcommand, Debug)]
pub enum ProcessCommands {
    /// SIPOC diagrams
    #[command(subcommand)]
    Sipoc(SipocCommands),

    /// Value stream maps
    #[command(subcommand)]
    Vsm(VsmCommands),

    /// Process flow diagrams
    #[command(subcommand)]
    Flow(FlowCommands),
}

#[derive(Subcommand, Debug)]
pub enum SipocCommands {
    /// Create a SIPOC from `name, description` files
    Create(SipocArgs),
    /// Replace an existing SIPOC
    Update {
        id: String,
        #[command(flatten)]
        doc: SipocArgs,
    },
    /// List SIPOC diagrams
    List(LimitArgs),
    /// Show a SIPOC with its completeness analysis
    Show { id: String },
    /// Delete a SIPOC
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum VsmCommands {
    /// Create a value stream map from step lines
    Create(VsmArgs),
    /// Replace an existing value stream map
    Update {
        id: String,
        #[command(flatten)]
        doc: VsmArgs,
    },
    /// List value stream maps
    List(LimitArgs),
    /// Show a value stream map with its summary
    Show { id: String },
    /// Delete a value stream map
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FlowCommands {
    /// Create a process flow from node and connection files
    Create(FlowArgs),
    /// Replace an existing process flow
    Update {
        id: String,
        #[command(flatten)]
        doc: FlowArgs,
    },
    /// List process flows
    List(LimitArgs),
    /// Show a process flow with its analysis
    Show { id: String },
    /// Delete a process flow
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SipocArgs {
    /// Diagram name
    #[arg(long)]
    pub name: String,

    /// Process being mapped
    #[arg(long)]
    pub process: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Suppliers file
    #[arg(long)]
    pub suppliers: Option<PathBuf>,

    /// Inputs file
    #[arg(long)]
    pub inputs: Option<PathBuf>,

    /// Process steps file, numbered in order
    #[arg(long)]
    pub steps: Option<PathBuf>,

    /// Outputs file
    #[arg(long)]
    pub outputs: Option<PathBuf>,

    /// Customers file
    #[arg(long)]
    pub customers: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VsmArgs {
    /// Map name
    #[arg(long)]
    pub name: String,

    /// Product family
    #[arg(long)]
    pub product_family: String,

    /// Customer demand (units per day)
    #[arg(long)]
    pub demand: Option<f64>,

    /// Available time (seconds per day)
    #[arg(long)]
    pub available_time: Option<f64>,

    /// Steps file: `name, cycle, wait, operators, uptime, value_added`
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FlowArgs {
    /// Diagram name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Nodes file: `id, label, type, swimlane, duration`
    #[arg(long)]
    pub nodes: PathBuf,

    /// Connections file: `from, to, label`
    #[arg(long)]
    pub connections: Option<PathBuf>,
}

/// Run a process-mapping subcommand
pub async fn run(cmd: ProcessCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        ProcessCommands::Sipoc(cmd) => run_sipoc(cmd, &session).await,
        ProcessCommands::Vsm(cmd) => run_vsm(cmd, &session).await,
        ProcessCommands::Flow(cmd) => run_flow(cmd, &session).await,
    }
}

/// Rows from an optional file; a missing flag means an empty section
fn rows_from<T: TabularRow>(path: Option<&Path>) -> Result<Vec<T>> {
    match path {
        Some(p) => Ok(parse_rows(&read_input(Some(p))?)),
        None => Ok(Vec::new()),
    }
}

// ============================================================================
// SIPOC
// ============================================================================

impl SipocArgs {
    fn into_request(self) -> Result<SipocRequest> {
        let steps: Vec<SipocItemRow> = rows_from(self.steps.as_deref())?;
        Ok(SipocRequest {
            name: self.name,
            process_name: self.process,
            description: self.description,
            suppliers: rows_from(self.suppliers.as_deref())?,
            inputs: rows_from(self.inputs.as_deref())?,
            process_steps: SipocStep::numbered(steps),
            outputs: rows_from(self.outputs.as_deref())?,
            customers: rows_from(self.customers.as_deref())?,
        })
    }
}

async fn run_sipoc(cmd: SipocCommands, session: &Session) -> Result<()> {
    let api = session.client.lean_analytics();
    match cmd {
        SipocCommands::Create(args) => {
            let req = args.into_request()?;
            let doc = api
                .create_sipoc(&req)
                .await
                .map_err(api_error("Failed to create SIPOC"))?;
            session.success(format!("Created SIPOC {}", style(&doc.id).cyan()));
            show_sipoc(&doc, session)
        }
        SipocCommands::Update { id, doc } => {
            let req = doc.into_request()?;
            let doc = api
                .update_sipoc(&id, &req)
                .await
                .map_err(api_error("Failed to update SIPOC"))?;
            session.success(format!("Updated SIPOC {}", style(&doc.id).cyan()));
            show_sipoc(&doc, session)
        }
        SipocCommands::List(args) => {
            let docs = api
                .list_sipocs(&ListQuery { limit: args.limit })
                .await
                .map_err(api_error("Failed to load SIPOC diagrams"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("name", "NAME", 28),
                ColumnDef::new("process", "PROCESS", 24),
                ColumnDef::new("steps", "STEPS", 5),
                ColumnDef::new("complete", "COMPLETE", 8),
                ColumnDef::new("created", "CREATED", 10),
            ];
            print_list(&docs, session.format, COLUMNS, "SIPOC", |d| {
                TableRow::new(d.id.clone())
                    .cell("id", CellValue::Id(d.id.clone()))
                    .cell("name", CellValue::Text(d.name.clone()))
                    .cell("process", CellValue::Text(d.process_name.clone()))
                    .cell("steps", CellValue::Number(d.process_steps.len() as i64))
                    .cell(
                        "complete",
                        CellValue::Percent(d.analysis.as_ref().map(|a| a.completeness_score)),
                    )
                    .cell("created", CellValue::date_opt(d.created_at))
            })
        }
        SipocCommands::Show { id } => {
            let doc = api
                .get_sipoc(&id)
                .await
                .map_err(api_error("Failed to load SIPOC"))?;
            show_sipoc(&doc, session)
        }
        SipocCommands::Delete { id } => {
            api.delete_sipoc(&id)
                .await
                .map_err(api_error("Failed to delete SIPOC"))?;
            session.success(format!("Deleted SIPOC {}", style(&id).cyan()));
            Ok(())
        }
    }
}

fn show_sipoc(doc: &SipocDiagram, session: &Session) -> Result<()> {
    if session.format.is_structured() {
        return print_structured(doc, session.format);
    }
    if session.quiet {
        return Ok(());
    }

    rule();
    field("ID", style(&doc.id).cyan());
    field("Name", style(&doc.name).yellow());
    field("Process", &doc.process_name);
    if let Some(desc) = &doc.description {
        field("Description", desc);
    }
    rule();

    let columns: [(&str, Vec<&str>); 5] = [
        ("Suppliers", doc.suppliers.iter().map(|r| r.name.as_str()).collect()),
        ("Inputs", doc.inputs.iter().map(|r| r.name.as_str()).collect()),
        ("Process", doc.process_steps.iter().map(|s| s.name.as_str()).collect()),
        ("Outputs", doc.outputs.iter().map(|r| r.name.as_str()).collect()),
        ("Customers", doc.customers.iter().map(|r| r.name.as_str()).collect()),
    ];
    for (title, items) in &columns {
        section(&format!("{} ({})", title, items.len()));
        for item in items {
            println!("  • {}", item);
        }
    }

    if let Some(analysis) = &doc.analysis {
        section("Analysis");
        println!("  Completeness {}", format_percent(analysis.completeness_score));
        for gap in &analysis.gaps {
            println!("  {} {}", style("gap").yellow(), gap);
        }
        for rec in &analysis.recommendations {
            println!("  → {}", rec);
        }
    }
    Ok(())
}

// ============================================================================
// Value stream maps
// ============================================================================

impl VsmArgs {
    fn into_request(self) -> Result<VsmRequest> {
        let text = read_input(self.input.as_deref())?;
        Ok(VsmRequest {
            name: self.name,
            product_family: self.product_family,
            customer_demand: self.demand,
            available_time: self.available_time,
            process_steps: parse_rows(&text),
        })
    }
}

async fn run_vsm(cmd: VsmCommands, session: &Session) -> Result<()> {
    let api = session.client.lean_analytics();
    match cmd {
        VsmCommands::Create(args) => {
            let req = args.into_request()?;
            let map = api
                .create_vsm(&req)
                .await
                .map_err(api_error("Failed to create value stream map"))?;
            session.success(format!("Created value stream map {}", style(&map.id).cyan()));
            show_vsm(&map, session)
        }
        VsmCommands::Update { id, doc } => {
            let req = doc.into_request()?;
            let map = api
                .update_vsm(&id, &req)
                .await
                .map_err(api_error("Failed to update value stream map"))?;
            session.success(format!("Updated value stream map {}", style(&map.id).cyan()));
            show_vsm(&map, session)
        }
        VsmCommands::List(args) => {
            let maps = api
                .list_vsms(&ListQuery { limit: args.limit })
                .await
                .map_err(api_error("Failed to load value stream maps"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("name", "NAME", 28),
                ColumnDef::new("family", "FAMILY", 20),
                ColumnDef::new("steps", "STEPS", 5),
                ColumnDef::new("pce", "PCE", 7),
                ColumnDef::new("created", "CREATED", 10),
            ];
            print_list(&maps, session.format, COLUMNS, "value stream map", |m| {
                let pce = match &m.summary {
                    Some(s) => CellValue::Badge(format_percent(s.pce), s.pce_health()),
                    None => CellValue::Empty,
                };
                TableRow::new(m.id.clone())
                    .cell("id", CellValue::Id(m.id.clone()))
                    .cell("name", CellValue::Text(m.name.clone()))
                    .cell("family", CellValue::Text(m.product_family.clone()))
                    .cell("steps", CellValue::Number(m.process_steps.len() as i64))
                    .cell("pce", pce)
                    .cell("created", CellValue::date_opt(m.created_at))
            })
        }
        VsmCommands::Show { id } => {
            let map = api
                .get_vsm(&id)
                .await
                .map_err(api_error("Failed to load value stream map"))?;
            show_vsm(&map, session)
        }
        VsmCommands::Delete { id } => {
            api.delete_vsm(&id)
                .await
                .map_err(api_error("Failed to delete value stream map"))?;
            session.success(format!("Deleted value stream map {}", style(&id).cyan()));
            Ok(())
        }
    }
}

fn show_vsm(map: &ValueStreamMap, session: &Session) -> Result<()> {
    if session.format.is_structured() {
        return print_structured(map, session.format);
    }
    if session.quiet {
        return Ok(());
    }

    rule();
    field("ID", style(&map.id).cyan());
    field("Name", style(&map.name).yellow());
    field("Product family", &map.product_family);
    if let Some(demand) = map.customer_demand {
        field("Customer demand", demand);
    }
    rule();

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("step", "STEP", 24),
        ColumnDef::new("cycle", "CYCLE", 8),
        ColumnDef::new("wait", "WAIT", 8),
        ColumnDef::new("operators", "OPS", 4),
        ColumnDef::new("uptime", "UPTIME", 7),
        ColumnDef::new("va", "VA", 4),
    ];
    let rows: Vec<TableRow> = map
        .process_steps
        .iter()
        .map(|s| {
            TableRow::new(s.name.clone())
                .cell("step", CellValue::Text(s.name.clone()))
                .cell("cycle", CellValue::Float(s.cycle_time, 1))
                .cell("wait", CellValue::Float(s.wait_time, 1))
                .cell("operators", CellValue::Number(s.operators))
                .cell("uptime", CellValue::Percent(s.uptime))
                .cell("va", CellValue::Flag(s.value_added))
        })
        .collect();
    TableFormatter::new(COLUMNS, "step")
        .without_summary()
        .output(&rows, session.format);

    if let Some(summary) = &map.summary {
        section("Summary");
        println!("  Lead time        {:.1}", summary.total_lead_time);
        println!("  Cycle time       {:.1}", summary.total_cycle_time);
        println!(
            "  Value-added      {:.1} / non-value-added {:.1}",
            summary.value_added_time, summary.non_value_added_time
        );
        println!(
            "  PCE              {}",
            paint(format_percent(summary.pce), summary.pce_health())
        );
        println!(
            "  Value-added ratio {}",
            paint(format_percent(summary.value_added_ratio), summary.value_added_health())
        );
        if let Some(takt) = summary.takt_time {
            println!("  Takt time        {:.1}", takt);
        }
        if let Some(bottleneck) = &summary.bottleneck_step {
            println!("  Bottleneck       {}", style(bottleneck).red());
        }
    }
    Ok(())
}

// ============================================================================
// Process flows
// ============================================================================

impl FlowArgs {
    fn into_request(self) -> Result<ProcessFlowRequest> {
        let nodes: Vec<FlowNodeRow> = parse_rows(&read_input(Some(&self.nodes))?);
        let connections: Vec<FlowConnectionRow> = rows_from(self.connections.as_deref())?;
        let swimlanes = ProcessFlowRequest::swimlanes_from_nodes(&nodes);
        Ok(ProcessFlowRequest {
            name: self.name,
            description: self.description,
            nodes,
            connections,
            swimlanes,
        })
    }
}

async fn run_flow(cmd: FlowCommands, session: &Session) -> Result<()> {
    let api = session.client.lean_analytics();
    match cmd {
        FlowCommands::Create(args) => {
            let req = args.into_request()?;
            let flow = api
                .create_process_flow(&req)
                .await
                .map_err(api_error("Failed to create process flow"))?;
            session.success(format!("Created process flow {}", style(&flow.id).cyan()));
            show_flow(&flow, session)
        }
        FlowCommands::Update { id, doc } => {
            let req = doc.into_request()?;
            let flow = api
                .update_process_flow(&id, &req)
                .await
                .map_err(api_error("Failed to update process flow"))?;
            session.success(format!("Updated process flow {}", style(&flow.id).cyan()));
            show_flow(&flow, session)
        }
        FlowCommands::List(args) => {
            let flows = api
                .list_process_flows(&ListQuery { limit: args.limit })
                .await
                .map_err(api_error("Failed to load process flows"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("name", "NAME", 30),
                ColumnDef::new("nodes", "NODES", 5),
                ColumnDef::new("lanes", "SWIMLANES", 30),
                ColumnDef::new("created", "CREATED", 10),
            ];
            print_list(&flows, session.format, COLUMNS, "process flow", |f| {
                TableRow::new(f.id.clone())
                    .cell("id", CellValue::Id(f.id.clone()))
                    .cell("name", CellValue::Text(f.name.clone()))
                    .cell("nodes", CellValue::Number(f.nodes.len() as i64))
                    .cell("lanes", CellValue::Tags(f.swimlanes.clone()))
                    .cell("created", CellValue::date_opt(f.created_at))
            })
        }
        FlowCommands::Show { id } => {
            let flow = api
                .get_process_flow(&id)
                .await
                .map_err(api_error("Failed to load process flow"))?;
            show_flow(&flow, session)
        }
        FlowCommands::Delete { id } => {
            api.delete_process_flow(&id)
                .await
                .map_err(api_error("Failed to delete process flow"))?;
            session.success(format!("Deleted process flow {}", style(&id).cyan()));
            Ok(())
        }
    }
}

fn show_flow(flow: &ProcessFlowDiagram, session: &Session) -> Result<()> {
    if session.format.is_structured() {
        return print_structured(flow, session.format);
    }
    if session.quiet {
        return Ok(());
    }

    rule();
    field("ID", style(&flow.id).cyan());
    field("Name", style(&flow.name).yellow());
    if let Some(desc) = &flow.description {
        field("Description", desc);
    }
    if !flow.swimlanes.is_empty() {
        field("Swimlanes", flow.swimlanes.join(", "));
    }
    rule();

    section(&format!("Nodes ({})", flow.nodes.len()));
    for node in &flow.nodes {
        let lane = node
            .swimlane
            .as_deref()
            .map(|l| format!(" [{}]", l))
            .unwrap_or_default();
        println!(
            "  {:<8} {:<10} {}{}",
            style(&node.id).cyan(),
            node.node_type,
            node.label,
            style(lane).dim()
        );
    }

    if !flow.connections.is_empty() {
        section(&format!("Connections ({})", flow.connections.len()));
        for conn in &flow.connections {
            match &conn.label {
                Some(label) => println!("  {} → {} ({})", conn.from, conn.to, label),
                None => println!("  {} → {}", conn.from, conn.to),
            }
        }
    }

    if let Some(analysis) = &flow.analysis {
        section("Analysis");
        println!("  Steps {}", analysis.total_steps);
        if let Some(d) = analysis.decision_points {
            println!("  Decision points {}", d);
        }
        if let Some(h) = analysis.handoffs {
            println!("  Handoffs {}", h);
        }
        if let Some(total) = analysis.total_duration {
            println!("  Total duration {:.1}", total);
        }
        if let (Some(ratio), Some(health)) =
            (analysis.value_added_ratio, analysis.value_added_health())
        {
            println!("  Value-added ratio {}", paint(format_percent(ratio), health));
        }
        for issue in &analysis.issues {
            println!("  {} {}", style("!").yellow(), issue);
        }
    }
    Ok(())
}
