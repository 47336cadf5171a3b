use agri_web_search::config::{CliConfig, Command, ServiceConfig};
use agri_web_search::domain::ports::KnowledgeProvider;
use agri_web_search::server;
use agri_web_search::utils::error::{ErrorSeverity, SearchError};
use agri_web_search::utils::{logger, validation::Validate};
use agri_web_search::{ExternalSearch, PerplexityClient};
use clap::Parser;
use std::sync::Arc;

fn exit_code(e: &SearchError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: SearchError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e).max(1));
}

fn build_search(
    config: &ServiceConfig,
) -> agri_web_search::Result<ExternalSearch<Arc<dyn KnowledgeProvider>, ServiceConfig>> {
    let provider: Arc<dyn KnowledgeProvider> = Arc::new(PerplexityClient::new(&config.perplexity)?);
    ExternalSearch::new(provider, config.clone())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    if cli.verbose {
        tracing::debug!("CLI invocation: {}", cli.log_summary());
    }

    let config = cli
        .service_config()
        .unwrap_or_else(|e| fail("Configuration loading failed", e));
    if let Err(e) = config.validate() {
        fail("Configuration validation failed", e);
    }

    let search = build_search(&config).unwrap_or_else(|e| fail("Service setup failed", e));

    match cli.command {
        Command::Serve { .. } => {
            server::serve(Arc::new(search), &config).await?;
        }
        Command::Ask { query, search_type } => {
            let response = search.search(&query, search_type).await;
            if !response.success {
                eprintln!("⚠️  {}", response.text());
                std::process::exit(2);
            }
            println!("{}", response.text());
            if !response.sources.is_empty() {
                println!();
                println!("Sources:");
                for source in &response.sources {
                    println!("  - {}", source);
                }
            }
            if !response.redactions.is_empty() {
                let kinds: Vec<&str> = response.redactions.iter().map(|k| k.as_str()).collect();
                eprintln!("🔒 Removed before forwarding: {}", kinds.join(", "));
            }
        }
        Command::Health => {
            if search.health_check().await {
                println!("✅ {} reachable", search.provider_name());
            } else {
                eprintln!("❌ {} unreachable", search.provider_name());
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
