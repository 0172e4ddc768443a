//! codesentry CLI entry point

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use codesentry::cli::{AnalyzeArgs, GatewayArgs, RelayArgs, ServeArgs};
use codesentry::config::validate_relay_url;
use codesentry::{
    gateway, relay_server, AnalysisRequest, Backend, Cli, CodeSentryError, Commands,
    GatewayState, Relay, RelayClient, SentryConfig,
};

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> codesentry::Result<String> {
    let cli = Cli::parse();
    let config = SentryConfig::load(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| CodeSentryError::ConfigError {
        message: format!("Failed to create tokio runtime: {}", e),
    })?;

    runtime.block_on(async move {
        match cli.command {
            Commands::Gateway(args) => run_gateway(config, args).await,
            Commands::Relay(args) => run_relay(config, args).await,
            Commands::Serve(args) => run_serve(config, args).await,
            Commands::Analyze(args) => run_analyze(config, args).await,
        }
    })
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(config: &SentryConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("codesentry={}", level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn bind(host: &str, port: u16) -> codesentry::Result<TcpListener> {
    Ok(TcpListener::bind((host, port)).await?)
}

/// Gateway against a relay daemon. An unreachable relay aborts startup.
async fn run_gateway(mut config: SentryConfig, args: GatewayArgs) -> codesentry::Result<String> {
    args.http.apply(&mut config);
    let relay_url = args
        .relay_url
        .unwrap_or_else(|| config.gateway.relay_url.clone());
    validate_relay_url(&relay_url)?;

    tracing::info!("Looking up relay at {}", relay_url);
    let client = RelayClient::connect(relay_url).await.map_err(|e| {
        eprintln!("Cannot reach the relay. Start `codesentry relay` first.");
        e
    })?;
    tracing::info!("Connected to relay at {}", client.url());

    let state = GatewayState::new(Backend::Remote(client))
        .with_static_dir(config.gateway.static_dir.as_deref());
    let listener = bind(&config.gateway.host, config.gateway.port).await?;
    gateway::serve(listener, state).await?;
    Ok(String::new())
}

async fn run_relay(mut config: SentryConfig, args: RelayArgs) -> codesentry::Result<String> {
    args.credentials.apply(&mut config);
    if let Some(host) = args.host {
        config.relay.host = host;
    }
    if let Some(port) = args.port {
        config.relay.port = port;
    }

    tracing::info!("Starting codesentry relay v{}", env!("CARGO_PKG_VERSION"));
    let relay = Relay::from_config(&config, args.credentials.api_key.as_deref())?;
    let listener = bind(&config.relay.host, config.relay.port).await?;
    relay_server::serve(listener, Arc::new(relay)).await?;
    Ok(String::new())
}

async fn run_serve(mut config: SentryConfig, args: ServeArgs) -> codesentry::Result<String> {
    args.http.apply(&mut config);
    args.credentials.apply(&mut config);

    let relay = Relay::from_config(&config, args.credentials.api_key.as_deref())?;
    let state = GatewayState::new(Backend::Local(Arc::new(relay)))
        .with_static_dir(config.gateway.static_dir.as_deref());
    let listener = bind(&config.gateway.host, config.gateway.port).await?;
    gateway::serve(listener, state).await?;
    Ok(String::new())
}

async fn run_analyze(mut config: SentryConfig, args: AnalyzeArgs) -> codesentry::Result<String> {
    args.credentials.apply(&mut config);

    let code = read_source(&args.file)?;
    if code.trim().is_empty() {
        return Err(CodeSentryError::InvalidRequest {
            message: "no code to analyze".to_string(),
        });
    }
    let request = AnalysisRequest::new(code, args.language);

    let backend = match args.relay_url {
        Some(url) => {
            validate_relay_url(&url)?;
            Backend::Remote(RelayClient::lazy(url))
        }
        None => Backend::Local(Arc::new(Relay::from_config(
            &config,
            args.credentials.api_key.as_deref(),
        )?)),
    };

    let result = backend.analyze(&request).await??;
    Ok(format!("{}\n", result.text))
}

fn read_source(path: &Path) -> codesentry::Result<String> {
    if path == Path::new("-") {
        let mut code = String::new();
        std::io::stdin().read_to_string(&mut code)?;
        return Ok(code);
    }
    std::fs::read_to_string(path).map_err(|e| CodeSentryError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
