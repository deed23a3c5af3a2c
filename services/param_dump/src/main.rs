//! Parameter dump binary - resolves the kinfu_output node parameters
//!
//! Usage:
//!   kinfu-param-dump
//!   kinfu-param-dump --config config/kinfu_output.toml --format toml
//!   kinfu-param-dump --set kinfu_request_topic=/robot1/kinfu_request
//!   kinfu-param-dump --list
//!   kinfu-param-dump --check-magic KINFU_OUTPUT_ACTION_MAGIC_SOURCE_NAME

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kinfu_params::{table, ConfigurationEntry, Param, ParamLoader, ResolvedParams};
use serde::Serialize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "kinfu-param-dump")]
#[command(about = "Resolve and print kinfu_output node parameters")]
#[command(version)]
struct Args {
    /// Path to parameter file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix for environment overrides
    #[arg(long, default_value = kinfu_params::source::DEFAULT_ENV_PREFIX)]
    env_prefix: String,

    /// Ignore environment overrides
    #[arg(long)]
    no_env: bool,

    /// Override a parameter (key=value), may be repeated
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Do not expand $VAR references in values
    #[arg(long)]
    no_expand: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the parameter table instead of resolving
    #[arg(long)]
    list: bool,

    /// Verify a magic value against the resolved one
    #[arg(long, value_name = "VALUE")]
    check_magic: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Toml,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if args.list {
        print!("{}", render_table(args.format)?);
        return Ok(());
    }

    let params = build_loader(&args)?
        .resolve()
        .context("Failed to resolve kinfu_output parameters")?;

    if let Some(received) = &args.check_magic {
        params.verify_magic(received).map_err(|e| {
            error!("Magic check failed: {}", e);
            e
        })?;
        info!("Magic check passed");
    }

    print!("{}", render(&params, args.format)?);
    Ok(())
}

fn build_loader(args: &Args) -> Result<ParamLoader> {
    let mut loader = ParamLoader::new()
        .env_prefix(args.env_prefix.clone())
        .expand_env(!args.no_expand);

    if args.no_env {
        loader = loader.without_env();
    }
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }

    loader
        .with_assignments(&args.overrides)
        .context("Invalid --set override")
}

fn render(params: &ResolvedParams, format: Format) -> Result<String> {
    let output = match format {
        Format::Text => {
            let mut out = String::new();
            for param in Param::iter() {
                out.push_str(&format!(
                    "{} = {} ({})\n",
                    param.key(),
                    params.get(param),
                    params.origin(param)
                ));
            }
            out
        }
        Format::Toml => toml::to_string_pretty(params).context("Failed to encode TOML")?,
        Format::Json => {
            let mut json =
                serde_json::to_string_pretty(params).context("Failed to encode JSON")?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

/// Parameter table as written by `--list`
#[derive(Serialize)]
struct TableListing {
    params: &'static [ConfigurationEntry],
}

fn render_table(format: Format) -> Result<String> {
    let listing = TableListing {
        params: &table::ALL,
    };

    let output = match format {
        Format::Text => {
            let mut out = String::new();
            for entry in listing.params {
                out.push_str(&format!(
                    "{:<22} {:<36} {:<40} {}\n",
                    entry.param.logical_name(),
                    entry.key,
                    entry.default_value,
                    entry.description
                ));
            }
            out
        }
        Format::Toml => toml::to_string_pretty(&listing).context("Failed to encode TOML")?,
        Format::Json => {
            let mut json =
                serde_json::to_string_pretty(&listing).context("Failed to encode JSON")?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
}
