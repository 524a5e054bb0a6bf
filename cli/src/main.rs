//! GCP Telemetry CLI
//!
//! Command-line interface for the telemetry gateway's tool API.
//!
//! # Usage
//!
//! ```bash
//! gcp-telemetry --help
//! gcp-telemetry health
//! gcp-telemetry tools
//! gcp-telemetry call list_log_entries --args '{"filter": "severity>=ERROR", "limit": 10}'
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;

/// GCP Telemetry CLI - call Logging, Monitoring, Trace and Profiler tools
#[derive(Parser)]
#[command(name = "gcp-telemetry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "TELEMETRY_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// List the available tools and their parameters
    Tools,
    /// Run a tool
    Call {
        /// Tool name, e.g. `list_traces`
        name: String,
        /// Tool arguments as a JSON object
        #[arg(short = 'A', long, default_value = "{}")]
        args: String,
    },
}

/// Error envelope returned by the API.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
    message: String,
}

/// Thin client over the gateway's HTTP API.
struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn health(&self) -> Result<Value> {
        self.send(self.http.get(self.url("/health"))).await
    }

    async fn tools(&self) -> Result<Value> {
        self.send(self.http.get(self.url("/api/v1/tools"))).await
    }

    async fn call(&self, name: &str, args: &Value) -> Result<Value> {
        let request = self
            .http
            .post(self.url(&format!("/api/v1/tools/{name}")))
            .json(args);
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach API at {}", self.base_url))?;
        let status = response.status();
        tracing::debug!(%status, "Received response");

        let body: Value = response
            .json()
            .await
            .context("API returned a non-JSON response")?;

        if status.is_success() {
            return Ok(body);
        }
        match serde_json::from_value::<ApiError>(body) {
            Ok(err) => bail!("{} ({status}): {}", err.error, err.message),
            Err(_) => bail!("API request failed with status {status}"),
        }
    }
}

/// Parses the `--args` value, which must be a JSON object.
fn parse_args(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).context("--args is not valid JSON")?;
    if !value.is_object() {
        bail!("--args must be a JSON object");
    }
    Ok(value)
}

/// Renders the tool catalogue as plain text.
fn render_catalogue(catalogue: &Value) -> String {
    let mut out = String::new();
    let tools = catalogue["tools"].as_array().map_or(&[][..], Vec::as_slice);

    for tool in tools {
        let _ = writeln!(
            out,
            "{}\n    {}",
            tool["name"].as_str().unwrap_or_default(),
            tool["description"].as_str().unwrap_or_default()
        );
        for param in tool["parameters"].as_array().map_or(&[][..], Vec::as_slice) {
            let marker = if param["required"].as_bool().unwrap_or(false) {
                " (required)"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "    --{} <{}>{marker}: {}",
                param["name"].as_str().unwrap_or_default(),
                param["type"].as_str().unwrap_or_default(),
                param["description"].as_str().unwrap_or_default()
            );
        }
    }
    out
}

/// Renders a tool result: plain messages as-is, documents pretty-printed.
fn render_result(response: &Value) -> Result<String> {
    match &response["result"] {
        Value::String(message) => Ok(message.clone()),
        other => Ok(serde_json::to_string_pretty(other)?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    match cli.command {
        Some(Commands::Health) => {
            let health = client.health().await?;
            println!(
                "{} at {} (version {})",
                health["status"].as_str().unwrap_or("unknown"),
                cli.api_url,
                health["version"].as_str().unwrap_or("unknown")
            );
        }
        Some(Commands::Tools) => {
            let catalogue = client.tools().await?;
            print!("{}", render_catalogue(&catalogue));
        }
        Some(Commands::Call { name, args }) => {
            let args = parse_args(&args)?;
            let response = client.call(&name, &args).await?;
            println!("{}", render_result(&response)?);
        }
        None => {
            println!("gcp-telemetry v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
