use crate::config::toml_config::ServiceConfig;
use crate::domain::model::SearchType;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "agri-web-search")]
#[command(about = "Forwards general agricultural questions to a web-search model without farm data")]
pub struct CliConfig {
    #[arg(long, short = 'c', help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the internal HTTP service
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ask a single question and print the answer
    Ask {
        query: String,
        #[arg(long, short = 't', default_value = "general")]
        search_type: SearchType,
    },
    /// Check that the knowledge API is reachable
    Health,
}

impl CliConfig {
    /// Loggable description of the invocation. Never contains the query text.
    pub fn log_summary(&self) -> String {
        match &self.command {
            Command::Serve { host, port } => format!(
                "serve host={} port={}",
                host.as_deref().unwrap_or("-"),
                port.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
            ),
            Command::Ask { query, search_type } => format!(
                "ask search_type={} query_chars={}",
                search_type,
                query.chars().count()
            ),
            Command::Health => "health".to_string(),
        }
    }

    /// File (if given) or defaults, then environment, then `serve` flags.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };
        config.apply_env_overrides()?;

        if let Command::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        Ok(config)
    }
}
