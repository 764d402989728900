//! Shared utilities for CLI commands

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::io::Read;
use std::path::Path;

use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::client::{ApiClient, ApiError, ApiResult};
use crate::core::fallback::{load_or_demo, FallbackPolicy};
use crate::core::Config;

/// Everything a networked command needs: merged config, client, output format
pub struct Session {
    pub config: Config,
    pub client: ApiClient,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let config = effective_config(global);
        let client = ApiClient::from_config(&config).map_err(|e| miette::miette!("{}", e))?;
        let format = resolve_format(global.format, &config);
        Ok(Self {
            config,
            client,
            format,
            quiet: global.quiet,
        })
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.config.fallback_policy()
    }

    /// Await a list/dashboard fetch, substituting demo fixture `fixture` on
    /// failure when the fallback is enabled
    pub async fn load<T, F>(&self, fixture: &str, context: &str, fetch: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Future<Output = ApiResult<T>>,
    {
        let loaded = load_or_demo(self.policy(), fixture, fetch)
            .await
            .map_err(|e| miette::miette!("{}", e.user_message(context)))?;
        if loaded.is_demo() && !self.quiet {
            eprintln!(
                "{} Backend unavailable, showing demo data",
                style("!").yellow().bold()
            );
        }
        Ok(loaded.into_inner())
    }

    /// Print a success line unless --quiet or a machine format was requested
    pub fn success(&self, message: impl Display) {
        if !self.quiet && !self.format.is_structured() && self.format != OutputFormat::Id {
            println!("{} {}", style("✓").green(), message);
        }
    }
}

/// Config from files and environment, with command-line flags on top
pub fn effective_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    config.merge(Config {
        api_url: global.api_url.clone(),
        token: global.token.clone(),
        demo_fallback: global.demo_fallback.then_some(true),
        ..Config::default()
    });
    config
}

/// An explicit --format wins; otherwise the configured default, if valid
pub fn resolve_format(requested: OutputFormat, config: &Config) -> OutputFormat {
    if requested != OutputFormat::Auto {
        return requested;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| OutputFormat::from_str(f, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Map a contract failure to the flat message shown to the user
pub fn api_error(context: &'static str) -> impl FnOnce(ApiError) -> miette::Report {
    move |e| miette::miette!("{}", e.user_message(context))
}

/// Print a value as JSON (default) or YAML
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print a list as JSON/YAML or as a table
pub fn print_list<T, F>(
    items: &[T],
    format: OutputFormat,
    columns: &[ColumnDef],
    noun: &'static str,
    to_row: F,
) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> TableRow,
{
    if format.is_structured() {
        return print_structured(items, format);
    }
    if items.is_empty() {
        if format != OutputFormat::Id {
            println!("No {}(s) found.", noun);
        }
        return Ok(());
    }
    let rows: Vec<TableRow> = items.iter().map(to_row).collect();
    TableFormatter::new(columns, noun).output(&rows, format);
    Ok(())
}

/// Horizontal rule used by detail views
pub fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}

/// `Label: value` line used by detail views
pub fn field(label: &str, value: impl Display) {
    println!("{}: {}", style(label).bold(), value);
}

/// Section heading used by detail views
pub fn section(title: &str) {
    println!();
    println!("{}", style(title).bold());
}

/// Read input text from a file, or stdin when the path is absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .map_err(|e| miette::miette!("Failed to read {}: {}", p.display(), e)),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .into_diagnostic()?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_format_wins() {
        let config = Config {
            default_format: Some("yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(OutputFormat::Json, &config), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Auto, &config), OutputFormat::Yaml);
    }

    #[test]
    fn test_table_alias_and_bad_default() {
        let config = Config {
            default_format: Some("table".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(OutputFormat::Auto, &config), OutputFormat::Tsv);

        let bad = Config {
            default_format: Some("xml".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(OutputFormat::Auto, &bad), OutputFormat::Auto);
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.txt");
        std::fs::write(&path, "Assembly, 45\n").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "Assembly, 45\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/steps.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
