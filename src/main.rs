use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hwws::error::format_error;
use hwws::{Config, DataSource};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Query Workspace data sources
#[derive(Parser, Debug)]
#[command(name = "hwws", version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Provider-level region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available data sources
    List,
    /// Print the schema of a data source
    Schema { name: String },
    /// Read a data source and print its state
    Read {
        name: String,
        /// Query argument, e.g. `--set subnet_id=abc`
        #[arg(long = "set", value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("empty key in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("hwws started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("hwws").join("hwws.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".hwws").join("hwws.log");
    }
    PathBuf::from("hwws.log")
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };

    if let Some(region) = &args.region {
        config.region = region.clone();
    }
    Ok(config)
}

fn lookup(name: &str) -> Result<DataSource> {
    DataSource::from_name(name).with_context(|| {
        let known: Vec<_> = DataSource::ALL.iter().map(|ds| ds.name()).collect();
        format!("Unknown data source: {} (available: {})", name, known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    match &args.command {
        Command::List => {
            for ds in DataSource::ALL {
                println!("{}", ds.name());
            }
        }
        Command::Schema { name } => {
            let ds = lookup(name)?;
            println!("{}", serde_json::to_string_pretty(&ds.schema())?);
        }
        Command::Read { name, set } => {
            let ds = lookup(name)?;
            let config = load_config(&args).context("Failed to load configuration")?;
            let inputs: BTreeMap<String, Value> = set
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();

            match ds.read_with_inputs(&config, inputs).await {
                Ok(data) => println!("{}", serde_json::to_string_pretty(&data.to_state())?),
                Err(e) => {
                    tracing::error!("{}: {}", ds.name(), e);
                    eprintln!("Error: {}", format_error(&e));
                    return Err(anyhow::Error::new(e).context(format!("Failed to read {}", name)));
                }
            }
        }
    }

    Ok(())
}
