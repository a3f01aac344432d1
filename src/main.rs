use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use livecfg::{Config, ConfigBuilder, ConfigError, MapSource, TomlFileSource};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Ordinal of properties defined with -D; above the environment.
const CLI_ORDINAL: i32 = 400;

/// Resolve configuration values from layered sources
///
/// Sources, highest precedence first: -D definitions, the environment,
/// -f files, then discovered config files (.livecfg.toml, $LIVECFG_CONFIG,
/// ~/.config/livecfg/config.toml).
#[derive(Parser, Debug)]
#[command(name = "livecfg")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file to read properties from (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Define a property (repeatable)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
    defines: Vec<(String, String)>,

    /// Do not read environment variables
    #[arg(long)]
    no_env: bool,

    /// Do not look for config files in the default locations
    #[arg(long)]
    no_discover: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Log to file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value of a key
    Get {
        key: String,

        /// Type to convert the value to
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,

        /// Treat the value as a comma-separated (or indexed) list
        #[arg(long)]
        list: bool,

        /// Print nothing instead of failing when the key is missing
        #[arg(long)]
        optional: bool,

        /// Print the value as JSON
        #[arg(long)]
        json: bool,
    },

    /// List sources in precedence order
    Sources {
        #[arg(long)]
        json: bool,
    },

    /// List every known property name
    Keys,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValueType {
    String,
    Bool,
    Int,
    Uint,
    Float,
    Char,
    Path,
}

#[derive(Serialize)]
struct SourceInfo<'a> {
    name: &'a str,
    ordinal: i32,
}

fn parse_define(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn setup_logging(log_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(log_path)?;
        subscriber.with_ansi(false).with_writer(file).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut builder = ConfigBuilder::new();

    if !args.defines.is_empty() {
        builder = builder
            .with_source(MapSource::new("cli", args.defines.iter().cloned()).with_ordinal(CLI_ORDINAL));
    }
    for path in &args.files {
        builder = builder.with_source(TomlFileSource::open(path)?);
    }
    if !args.no_env {
        builder = builder.with_default_sources();
    }
    if !args.no_discover {
        builder = builder.with_discovered_files();
    }

    Ok(builder.build()?)
}

fn lookup<T, F>(config: &Config, key: &str, list: bool, to_json: F) -> Result<Option<Value>>
where
    T: 'static,
    F: Fn(T) -> Result<Value>,
{
    if list {
        config
            .get_optional_values::<T>(key)?
            .map(|values| {
                values
                    .into_iter()
                    .map(&to_json)
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            })
            .transpose()
    } else {
        config.get_optional_value::<T>(key)?.map(to_json).transpose()
    }
}

fn json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// JSON has no NaN or infinity; those are kept as strings instead of null.
fn float_json(value: f64) -> Result<Value> {
    Ok(serde_json::Number::from_f64(value)
        .map_or_else(|| Value::String(value.to_string()), Value::Number))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn run_get(
    config: &Config,
    key: &str,
    value_type: ValueType,
    list: bool,
    optional: bool,
    json: bool,
) -> Result<()> {
    let value = match value_type {
        ValueType::String => lookup(config, key, list, self::json::<String>)?,
        ValueType::Bool => lookup(config, key, list, self::json::<bool>)?,
        ValueType::Int => lookup(config, key, list, self::json::<i64>)?,
        ValueType::Uint => lookup(config, key, list, self::json::<u64>)?,
        ValueType::Float => lookup(config, key, list, float_json)?,
        ValueType::Char => lookup(config, key, list, self::json::<char>)?,
        ValueType::Path => lookup(config, key, list, self::json::<PathBuf>)?,
    };

    match value {
        Some(value) if json => println!("{}", value),
        Some(Value::Array(items)) => {
            for item in &items {
                println!("{}", render(item));
            }
        }
        Some(value) => println!("{}", render(&value)),
        None if optional => {
            if json {
                println!("null");
            }
        }
        None => bail!(ConfigError::NotFound {
            key: key.to_string()
        }),
    }

    Ok(())
}

fn run_sources(config: &Config, json: bool) -> Result<()> {
    let sources = config.config_sources();
    let infos: Vec<SourceInfo> = sources
        .iter()
        .map(|s| SourceInfo {
            name: s.name(),
            ordinal: s.ordinal(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for info in &infos {
            println!("{:>6}  {}", info.ordinal, info.name);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level, args.log_file.clone())?;
    debug!("Starting livecfg v{}", env!("CARGO_PKG_VERSION"));

    let config = build_config(&args)?;

    match &args.command {
        Command::Get {
            key,
            value_type,
            list,
            optional,
            json,
        } => run_get(&config, key, *value_type, *list, *optional, *json),
        Command::Sources { json } => run_sources(&config, *json),
        Command::Keys => {
            for name in config.property_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}
