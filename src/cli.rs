//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SentryConfig;
use crate::credentials::API_KEY_ENV;

/// AI-assisted security review gateway and relay
#[derive(Parser, Debug)]
#[command(name = "codesentry")]
#[command(about = "Relay code snippets to a generative API for security review")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to <config dir>/codesentry/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP gateway against a relay daemon
    Gateway(GatewayArgs),

    /// Run the relay daemon
    Relay(RelayArgs),

    /// Run the gateway with the relay in the same process
    Serve(ServeArgs),

    /// Analyze one file (or stdin) and print the result
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),
}

/// Gateway listener options
#[derive(Args, Debug, Clone, Default)]
pub struct HttpArgs {
    /// Address to bind the HTTP listener to
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Serve front-end files from this directory instead of the embedded copy
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

/// Credential and API options for an in-process relay
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Property file holding google.ai.api.key
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// API key (overrides the property file)
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    #[command(flatten)]
    pub http: HttpArgs,

    /// Relay WebSocket URL
    #[arg(long)]
    pub relay_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RelayArgs {
    /// Address to bind the relay listener to
    #[arg(long)]
    pub host: Option<String>,

    /// Relay port
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub http: HttpArgs,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Source file to analyze ("-" reads stdin)
    #[arg(default_value = "-")]
    pub file: PathBuf,

    /// Language of the snippet (e.g. python, javascript)
    #[arg(short, long)]
    pub language: String,

    /// Send the request to this relay instead of calling the API directly
    #[arg(long)]
    pub relay_url: Option<String>,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

impl HttpArgs {
    pub fn apply(&self, config: &mut SentryConfig) {
        if let Some(host) = &self.host {
            config.gateway.host = host.clone();
        }
        if let Some(port) = self.port {
            config.gateway.port = port;
        }
        if let Some(dir) = &self.static_dir {
            config.gateway.static_dir = Some(dir.clone());
        }
    }
}

impl CredentialArgs {
    pub fn apply(&self, config: &mut SentryConfig) {
        if let Some(path) = &self.credentials {
            config.relay.credentials_file = path.clone();
        }
        if let Some(model) = &self.model {
            config.gemini.model = model.clone();
        }
    }
}
