#![deny(unsafe_code)]

//! FrostLink CLI — query a cryogenic control appliance from the shell.

mod telemetry;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use frostlink_config::AppConfig;
use frostlink_core::{Client, ConnectParams};

/// FrostLink — permission-gated client for cryogenic control appliances.
#[derive(Parser)]
#[command(name = "frostlink", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "frostlink.toml")]
    config: PathBuf,

    /// Override the appliance host from the config file.
    #[arg(long)]
    host: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the appliance's system identity.
    Info,

    /// Read the latest value of a value endpoint, e.g.
    /// `frostlink value mapper temperature`.
    Value {
        /// Path segments of the value endpoint.
        #[arg(required = true)]
        segments: Vec<String>,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let _telemetry = telemetry::init(cli.verbose, &config.logging)?;

    match cli.command {
        Commands::Info => cmd_info(&config, cli.host.as_deref())?,
        Commands::Value { segments } => cmd_value(&config, cli.host.as_deref(), &segments)?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

fn connect(config: &AppConfig, host_override: Option<&str>) -> Result<Client> {
    let mut params = ConnectParams::from_config(config)?;
    if let Some(host) = host_override {
        params.host = host.to_string();
    }
    if config.connection.timeout_secs > 0 {
        params = params.with_timeout(Duration::from_secs(config.connection.timeout_secs));
    }
    Ok(Client::connect(params)?)
}

fn cmd_info(config: &AppConfig, host_override: Option<&str>) -> Result<()> {
    let client = connect(config, host_override)?;
    println!("system name:    {}", client.system_name());
    println!("system version: {}", client.system_version());
    println!("api version:    {}", client.api_version());
    Ok(())
}

fn cmd_value(config: &AppConfig, host_override: Option<&str>, segments: &[String]) -> Result<()> {
    let client = connect(config, host_override)?;
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    let value = client.latest_value(&segments)?;
    println!("{value}");
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path).map_err(|e| anyhow::anyhow!(e))
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use frostlink_test_utils::config::TestConfigBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_value_requires_segments() {
        let result = Cli::try_parse_from(["frostlink", "value"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_accumulates() {
        let cli = Cli::try_parse_from(["frostlink", "-vv", "info"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_load_missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.connection.port, 49098);
    }

    #[test]
    fn test_load_invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frostlink.toml");
        std::fs::write(&path, "[connection]\nport = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_connect_params_from_builder_config() {
        let config = TestConfigBuilder::new()
            .host("cryo.lab")
            .mode("admin")
            .inline_key("abc")
            .build();
        let params = ConnectParams::from_config(&config).unwrap();
        assert_eq!(params.host, "cryo.lab");
        assert_eq!(params.port, 49098);
    }
}
