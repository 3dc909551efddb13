mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use device_info::{DeviceInfoModule, NativeModule};
use std::path::PathBuf;

/// Device Info - host device identification and hardware metadata
#[derive(Parser)]
#[command(name = "device-info")]
#[command(about = "Device Info - host device identification and hardware metadata")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print device constants (default)
    Constants,
    /// List attached USB devices
    Devices,
    /// Invoke a bridge method by name
    Invoke {
        /// Method name, e.g. getConstants
        method: String,
    },
    /// Validate configuration and exit
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config: defaults -> YAML (if provided) -> env (DEVICE_INFO__*) -> CLI
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_verbosity(cli.verbose);

    logging::init_logging(&config.logging)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Constants) {
        Commands::Check => check_config(&config),
        Commands::Constants => invoke(&config, device_info::bridge::GET_CONSTANTS, cli.pretty),
        Commands::Devices => invoke(&config, device_info::bridge::GET_DEVICES, cli.pretty),
        Commands::Invoke { method } => invoke(&config, &method, cli.pretty),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn build_module(config: &AppConfig) -> DeviceInfoModule {
    let provider = device_info::default_provider()
        .with_app_identity(config.app.clone())
        .with_recovery_policy(config.recovery);
    DeviceInfoModule::new(provider)
}

fn invoke(config: &AppConfig, method: &str, pretty: bool) -> Result<()> {
    let module = build_module(config);
    tracing::info!(module = module.name(), method, "Invoking bridge method");

    let value = module
        .invoke(method, &[])
        .with_context(|| format!("{}.{method} failed", module.name()))?;

    let out = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{out}");
    Ok(())
}
