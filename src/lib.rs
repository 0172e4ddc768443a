//! CodeSentry: AI-assisted security review of code snippets
//!
//! A browser posts a snippet and its language to the HTTP [`gateway`]. The
//! gateway hands it to a [`relay::Relay`], either linked in-process or
//! running as a separate daemon reached through [`relay_server`]. The relay
//! builds a review prompt, sends it to the Generative Language API and
//! returns the generated text.
//!
//! # Example
//!
//! ```ignore
//! use codesentry::{AnalysisRequest, Relay, SentryConfig};
//!
//! let config = SentryConfig::load(None)?;
//! let relay = Relay::from_config(&config, None)?;
//! match relay.analyze(&AnalysisRequest::new("eval(input())", "python")).await {
//!     Ok(result) => println!("{}", result.text),
//!     Err(failure) => eprintln!("{}", failure),
//! }
//! ```

pub mod analysis;
pub mod backend;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod prompt;
pub mod relay;
pub mod relay_server;

pub use analysis::{AnalysisFailure, AnalysisOutcome, AnalysisRequest, AnalysisResult};
pub use backend::Backend;
pub use cli::{Cli, Commands};
pub use config::{SentryConfig, SERVICE_NAME};
pub use credentials::ApiKey;
pub use error::{CodeSentryError, Result};
pub use gateway::GatewayState;
pub use gemini::GeminiClient;
pub use relay::Relay;
pub use relay_server::RelayClient;
