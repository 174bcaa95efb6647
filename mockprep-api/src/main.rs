//! mockprep-api - mock interview service
//!
//! Generates interview questions, evaluates answers with an LLM, and serves
//! per-user analytics and a leaderboard over HTTP.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use mockprep_api::api::buildinfo::BuildInfo;
use mockprep_api::llm::OpenAiClient;
use mockprep_api::AppState;
use mockprep_common::config::{
    CliOverrides, LoggingConfig, ServerSettings, TomlConfig, BIND_ADDRESS_ENV, DATA_FOLDER_ENV,
    LLM_API_KEY_ENV, LOG_LEVEL_ENV, OPENAI_API_KEY_ENV, PORT_ENV,
};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for mockprep-api
#[derive(Parser, Debug)]
#[command(name = "mockprep-api")]
#[command(about = "AI mock interview service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = PORT_ENV)]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = BIND_ADDRESS_ENV)]
    bind: Option<String>,

    /// Folder holding the database
    #[arg(short, long, env = DATA_FOLDER_ENV)]
    data_folder: Option<PathBuf>,

    /// Log level or EnvFilter directive (overrides config file)
    #[arg(long, env = LOG_LEVEL_ENV)]
    log_level: Option<String>,

    /// Config file (defaults to the platform location)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => TomlConfig::load().context("Failed to load config file")?,
    };

    let settings = ServerSettings::resolve(
        CliOverrides {
            data_folder: args.data_folder,
            bind_address: args.bind,
            port: args.port,
            log_level: args.log_level,
        },
        toml,
    )
    .context("Invalid configuration")?;

    init_tracing(&settings.logging)?;

    let build = BuildInfo::current();
    info!(
        "Starting mockprep-api v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );

    if settings.llm.api_key.is_none() {
        warn!(
            "No LLM API key configured (set {} or {}); AI requests will fail",
            LLM_API_KEY_ENV, OPENAI_API_KEY_ENV
        );
    }

    let db_path = settings.database_path();
    info!("Database: {}", db_path.display());
    let db = mockprep_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let llm = OpenAiClient::new(&settings.llm).context("Failed to create LLM client")?;
    info!(
        model = %settings.llm.model,
        base_url = %settings.llm.base_url,
        requests_per_minute = settings.llm.requests_per_minute,
        "LLM client ready"
    );

    let state = AppState::new(db, Arc::new(llm));
    let app = mockprep_api::build_router(state);

    let addr = SocketAddr::new(settings.bind_address, settings.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; a log file replaces stderr
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &logging.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };
    let stderr_layer = if logging.file.is_none() {
        Some(fmt::layer())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::{OsStr, OsString};

    fn env_of(id: &str) -> Option<OsString> {
        Args::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_env())
            .map(OsStr::to_os_string)
    }

    #[test]
    fn test_args_read_shared_env_names() {
        Args::command().debug_assert();
        assert_eq!(env_of("port"), Some(OsString::from(PORT_ENV)));
        assert_eq!(env_of("bind"), Some(OsString::from(BIND_ADDRESS_ENV)));
        assert_eq!(env_of("data_folder"), Some(OsString::from(DATA_FOLDER_ENV)));
        assert_eq!(env_of("log_level"), Some(OsString::from(LOG_LEVEL_ENV)));
        assert_eq!(env_of("config"), None);
    }

    #[test]
    fn test_args_parse_flags() {
        let args = Args::try_parse_from(["mockprep-api", "--port", "6000", "--bind", "0.0.0.0"]).unwrap();
        assert_eq!(args.port, Some(6000));
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0"));
    }
}
