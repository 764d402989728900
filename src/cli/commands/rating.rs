//! `pulse rating` command - classify a metric the way the dashboard does

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::table::paint;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::presentation::{
    capability_color, cpk_label, format_percent, pce_health, value_added_health, yield_from_ppm,
    BadgeColor,
};

#[derive(Subcommand, Debug)]
pub enum RatingCommands {
    /// Rate a Cpk value (excellent >= 1.67, capable >= 1.33, marginal >= 1.0)
    Cpk {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Rate a process cycle efficiency percentage (healthy >= 25%)
    Pce { percent: f64 },

    /// Rate a value-added ratio percentage (healthy >= 50%)
    Va { percent: f64 },

    /// Expected yield from total defects per million
    Yield { ppm: f64 },
}

#[derive(Debug, Serialize)]
struct Rating {
    metric: &'static str,
    value: f64,
    label: String,
    color: BadgeColor,
}

pub fn run(cmd: RatingCommands, global: &GlobalOpts) -> Result<()> {
    let rating = rate(&cmd);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rating).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&rating).into_diagnostic()?),
        _ => println!(
            "{} {}",
            style(format!("{}:", rating.metric)).bold(),
            paint(&rating.label, rating.color)
        ),
    }
    Ok(())
}

fn rate(cmd: &RatingCommands) -> Rating {
    match *cmd {
        RatingCommands::Cpk { value } => Rating {
            metric: "cpk",
            value,
            label: format!("{:.2} {}", value, cpk_label(value)),
            color: capability_color(value),
        },
        RatingCommands::Pce { percent } => {
            let color = pce_health(percent);
            Rating {
                metric: "pce",
                value: percent,
                label: health_label(percent, color),
                color,
            }
        }
        RatingCommands::Va { percent } => {
            let color = value_added_health(percent);
            Rating {
                metric: "value_added",
                value: percent,
                label: health_label(percent, color),
                color,
            }
        }
        RatingCommands::Yield { ppm } => {
            let expected = yield_from_ppm(ppm);
            Rating {
                metric: "yield",
                value: expected,
                label: format!("{:.4}%", expected),
                color: if expected >= 99.0 {
                    BadgeColor::Green
                } else {
                    BadgeColor::Yellow
                },
            }
        }
    }
}

fn health_label(percent: f64, color: BadgeColor) -> String {
    let verdict = if color == BadgeColor::Green {
        "healthy"
    } else {
        "needs improvement"
    };
    format!("{} {}", format_percent(percent), verdict)
}
