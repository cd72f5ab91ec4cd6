//! rendezvous - Reservation backend client
//!
//! Entry point for the rendezvous application.

use clap::Parser;
use rendezvous::cli::{Cli, Commands, ConfigCommands, CreateArgs};
use rendezvous::config::{Config, LogFormat, LogOutput, LoggingConfig};
use rendezvous::error::exit_code;
use rendezvous::{ApiClient, Error, ReservationApi};
use serde_json::Value;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = load_config(&cli);
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    // Initialize logging based on configuration and CLI flags
    if let Err(e) = init_logging(&cli, &logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(exit_code::GENERAL_ERROR as u8);
    }

    // Execute the command
    match run(&cli, loaded) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Initialize the tracing subscriber from the logging configuration.
///
/// `-v`/`-q` take precedence over the configured level; `RUST_LOG` takes
/// precedence over both.
fn init_logging(
    cli: &Cli,
    logging: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = cli
        .log_level_override()
        .map(str::to_string)
        .unwrap_or_else(|| tracing::Level::from(logging.level).to_string().to_lowercase());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = match logging.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File => {
            let path = logging
                .file_path
                .as_deref()
                .ok_or("logging.file_path is required when output is file")?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer);

    match logging.format {
        LogFormat::Json => builder.json().try_init()?,
        LogFormat::Text => builder.try_init()?,
    }

    Ok(())
}

/// Main application logic.
fn run(cli: &Cli, loaded: rendezvous::Result<Config>) -> rendezvous::Result<i32> {
    if let Commands::Config(ConfigCommands::Validate) = &cli.command {
        return cmd_config_validate(loaded);
    }

    let config = loaded?;

    match &cli.command {
        Commands::Health => block_on(async {
            let client = ApiClient::from_config(&config)?;
            Ok(cmd_health(&client, &mut std::io::stdout()).await)
        }),
        Commands::DbStatus => block_on(async {
            let client = ApiClient::from_config(&config)?;
            Ok(cmd_db_status(&client, &mut std::io::stdout()).await)
        }),
        Commands::Create(args) => {
            let payload = read_payload(args)?;
            block_on(async {
                let client = ApiClient::from_config(&config)?;
                cmd_create(&client, &payload, &mut std::io::stdout()).await
            })
        }
        Commands::List => block_on(async {
            let client = ApiClient::from_config(&config)?;
            cmd_list(&client, &mut std::io::stdout()).await
        }),
        Commands::Delete(args) => block_on(async {
            let client = ApiClient::from_config(&config)?;
            cmd_delete(&client, &args.id, &mut std::io::stdout()).await
        }),
        Commands::Config(ConfigCommands::Show) => cmd_config_show(&config),
        Commands::Config(ConfigCommands::Validate) => cmd_config_validate(Ok(config)),
        Commands::MockBackend(args) => {
            let mut mock = config.mock.clone();
            if let Some(bind) = &args.bind {
                mock.bind = bind.clone();
            }
            if let Some(port) = args.port {
                mock.port = port;
            }

            tracing::info!(bind = %mock.bind, port = %mock.port, "Starting mock backend");
            block_on(async {
                rendezvous::mock::serve(&mock).await?;
                Ok(exit_code::SUCCESS)
            })
        }
    }
}

/// Runs a future on a fresh tokio runtime.
fn block_on<F>(future: F) -> rendezvous::Result<i32>
where
    F: std::future::Future<Output = rendezvous::Result<i32>>,
{
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::config_with_source("Failed to create async runtime", e))?;

    runtime.block_on(future)
}

/// Handle the `health` command.
async fn cmd_health(api: &dyn ReservationApi, out: &mut impl Write) -> i32 {
    report_check(
        api.check_health().await,
        "Backend is healthy",
        "Backend is unreachable or unhealthy",
        out,
    )
}

/// Handle the `db-status` command.
async fn cmd_db_status(api: &dyn ReservationApi, out: &mut impl Write) -> i32 {
    report_check(
        api.check_database_status().await,
        "Database is reachable",
        "Database is unreachable",
        out,
    )
}

fn report_check(ok: bool, healthy: &str, unhealthy: &str, out: &mut impl Write) -> i32 {
    if ok {
        let _ = writeln!(out, "✓ {}", healthy);
        exit_code::SUCCESS
    } else {
        let _ = writeln!(out, "✗ {}", unhealthy);
        exit_code::CONNECTION_ERROR
    }
}

/// Handle the `create` command.
async fn cmd_create(
    api: &dyn ReservationApi,
    payload: &Value,
    out: &mut impl Write,
) -> rendezvous::Result<i32> {
    let created = api.create_reservation(payload).await?;
    print_json(&created, out)
}

/// Handle the `list` command.
async fn cmd_list(api: &dyn ReservationApi, out: &mut impl Write) -> rendezvous::Result<i32> {
    let reservations = api.list_reservations().await?;
    print_json(&reservations, out)
}

/// Handle the `delete` command.
async fn cmd_delete(
    api: &dyn ReservationApi,
    id: &str,
    out: &mut impl Write,
) -> rendezvous::Result<i32> {
    let confirmation = api.delete_reservation(id).await?;
    print_json(&confirmation, out)
}

/// Handle `config validate`.
fn cmd_config_validate(loaded: rendezvous::Result<Config>) -> rendezvous::Result<i32> {
    match loaded {
        Ok(config) => {
            println!("✓ Configuration is valid");
            if config.api.is_demo() {
                println!("  No backend URL configured: running in demo mode");
            }
            tracing::debug!(config = ?config.redacted(), "Validated configuration");
            Ok(exit_code::SUCCESS)
        }
        Err(e) => {
            println!("✗ Configuration is invalid: {}", e);
            Err(e)
        }
    }
}

/// Handle `config show`.
fn cmd_config_show(config: &Config) -> rendezvous::Result<i32> {
    let yaml = serde_yaml::to_string(&config.redacted())
        .map_err(|e| Error::config_with_source("Failed to serialize configuration", e))?;
    println!("{}", yaml);
    Ok(exit_code::SUCCESS)
}

fn print_json(value: &Value, out: &mut impl Write) -> rendezvous::Result<i32> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", text)?;
    Ok(exit_code::SUCCESS)
}

/// Reads the reservation payload from `--data`, `--file`, or stdin.
fn read_payload(args: &CreateArgs) -> rendezvous::Result<Value> {
    let text = match (&args.data, &args.file) {
        (Some(data), _) => data.clone(),
        (None, Some(path)) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    parse_payload(&text)
}

fn parse_payload(text: &str) -> rendezvous::Result<Value> {
    if text.trim().is_empty() {
        return Err(Error::invalid_request("reservation payload is empty"));
    }
    Ok(serde_json::from_str(text)?)
}

/// Load configuration, applying the `--api-url` override.
fn load_config(cli: &Cli) -> rendezvous::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = Some(url.clone());
        config.validate()?;
    }
    Ok(config)
}
