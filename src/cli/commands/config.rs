//! `pulse config` command - Configuration management
//!
//! Provides commands to view and modify the user configuration file.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::utils::effective_config;
use crate::cli::GlobalOpts;
use crate::core::tabular::parse_flag;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a value in the user config file
    Set(SetArgs),

    /// Remove a value from the user config file
    Unset(UnsetArgs),

    /// Show the path to the user config file
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only the user config file, without env and flag overrides
    #[arg(long = "file-only")]
    pub file_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., api_url, token)
    pub key: String,

    /// Value to set
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("api_url", "Backend API base URL"),
    ("token", "Bearer token sent with every request"),
    ("timeout_secs", "Request timeout in seconds"),
    (
        "demo_fallback",
        "Show bundled demo data when a fetch fails (true/false)",
    ),
    (
        "default_format",
        "Default output format (tsv, json, yaml, csv, md, id)",
    ),
    ("download_dir", "Where exported reports are saved"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    if args.file_only {
        return show_file_config();
    }

    let config = effective_config(global);

    if let Some(key) = &args.key {
        check_key(key)?;
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, get_config_value(&config, key).as_deref());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--api-url, --token, --demo-fallback)");
    println!("  2. Environment variables (PULSE_API_URL, PULSE_TOKEN, ...)");
    println!("  3. User config (~/.config/pulse/config.yaml)");

    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    check_key(&args.key)?;
    let config_path = get_global_config_path()?;

    let mut config_map = read_config_map(&config_path)?;
    let value = typed_value(&args.key, &args.value)?;
    if let serde_yml::Value::Mapping(map) = &mut config_map {
        map.insert(serde_yml::Value::String(args.key.clone()), value);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let shown = if args.key == "token" {
        Config {
            token: Some(args.value.clone()),
            ..Config::default()
        }
        .masked_token()
        .unwrap_or_default()
    } else {
        args.value.clone()
    };
    println!(
        "{} Set {} {} {}",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(shown).yellow()
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    check_key(&args.key)?;
    let config_path = get_global_config_path()?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_config_map(&config_path)?;
    let removed = match &mut config_map {
        serde_yml::Value::Mapping(map) => map.remove(args.key.as_str()).is_some(),
        _ => false,
    };
    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Removed {} from user config",
        style("✓").green(),
        style(&args.key).cyan()
    );

    Ok(())
}

fn run_path() -> Result<()> {
    let path = get_global_config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<16} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'pulse config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn get_global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            "Unknown key '{}'. Run 'pulse config keys' to list valid keys",
            key
        ))
    }
}

fn read_config_map(path: &Path) -> Result<serde_yml::Value> {
    if !path.exists() {
        return Ok(serde_yml::Value::Mapping(Default::default()));
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let parsed: serde_yml::Value =
        serde_yml::from_str(&content).unwrap_or(serde_yml::Value::Mapping(Default::default()));
    // An empty file parses as null
    if parsed.is_null() {
        Ok(serde_yml::Value::Mapping(Default::default()))
    } else {
        Ok(parsed)
    }
}

/// Store numbers and flags with their YAML types so the file still loads
fn typed_value(key: &str, value: &str) -> Result<serde_yml::Value> {
    match key {
        "timeout_secs" => value
            .trim()
            .parse::<u64>()
            .map(|n| serde_yml::Value::Number(n.into()))
            .map_err(|_| miette::miette!("timeout_secs must be a whole number of seconds")),
        "demo_fallback" => Ok(serde_yml::Value::Bool(parse_flag(value))),
        _ => Ok(serde_yml::Value::String(value.to_string())),
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "api_url" => Some(config.api_url()),
        "token" => config.masked_token(),
        "timeout_secs" => Some(config.timeout().as_secs().to_string()),
        "demo_fallback" => Some(config.demo_fallback.unwrap_or(false).to_string()),
        "default_format" => config.default_format.clone(),
        "download_dir" => Some(config.download_dir().display().to_string()),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn show_file_config() -> Result<()> {
    let path = get_global_config_path()?;

    println!(
        "{} {}",
        style("User config:").bold(),
        style(path.display()).dim()
    );
    println!();

    if path.exists() {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_values_round_trip_through_config() {
        let mut map = serde_yml::Mapping::new();
        map.insert("timeout_secs".into(), typed_value("timeout_secs", "45").unwrap());
        map.insert("demo_fallback".into(), typed_value("demo_fallback", "yes").unwrap());
        let yaml = serde_yml::to_string(&map).unwrap();

        let config: Config = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(config.timeout_secs, Some(45));
        assert_eq!(config.demo_fallback, Some(true));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        assert!(typed_value("timeout_secs", "soon").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(check_key("editor").is_err());
        assert!(check_key("api_url").is_ok());
    }

    #[test]
    fn test_token_shown_masked() {
        let config = Config {
            token: Some("secret-token-9876".to_string()),
            ..Config::default()
        };
        assert_eq!(get_config_value(&config, "token").as_deref(), Some("****9876"));
    }
}
