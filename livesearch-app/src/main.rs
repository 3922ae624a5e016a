use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use livesearch_common::observability::init_logging;
use livesearch_config::{LiveSearchConfig, LiveSearchConfigLoader};
use livesearch_core::{KNOWN_MODELS, ParsedResult};
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if args.list_models {
        for model in KNOWN_MODELS {
            println!("{model}");
        }
        return Ok(());
    }

    // 1) Load config (env wins over file, flags win over both)
    let cfg: LiveSearchConfig = LiveSearchConfigLoader::new()
        .with_optional_file(&args.config)
        .load()
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    let log_path = init_logging(cfg.logging.clone())?;
    tracing::debug!(log = %log_path.display(), "livesearch starting");

    let client = cfg.client().context("failed to create search client")?;
    if let Some(key) = &args.api_key {
        client.set_key(key.as_str());
    }

    let model = args.model.clone().unwrap_or_else(|| cfg.api.model.clone());
    let params = args.apply(cfg.parameters()).build();
    let query = args.query_text();

    if args.json {
        let raw = client.execute(&query, &model, &params).await?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let parsed = client.search(&query, &model, &params).await?;
    print_result(&parsed);
    Ok(())
}

fn print_result(parsed: &ParsedResult) {
    println!("{}", parsed.content);
    if !parsed.citations.is_empty() {
        println!("\nCitations:");
        for (i, url) in parsed.citations.iter().enumerate() {
            println!("[{}] {url}", i + 1);
        }
    }
}
