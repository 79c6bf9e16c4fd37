//! Full page scan demonstration for vncontentguard
//! Steps:
//! 1. Build a guard from credentials given on the command line or in the environment
//! 2. Scan one article with its comments (fact-check, sentiment, moderation)
//! 3. Print the report as JSON plus the credential pool status
//!
//! Run:
//! GEMINI_API_KEYS=key1,key2 cargo run --example scan_demo -- --article "..." --comment "..."

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::to_string_pretty;
use tracing_subscriber::EnvFilter;
use vncontentguard::{ConfigManager, ContentGuard, ScanRequest};

#[derive(Debug, Parser)]
#[command(version, about = "Scan one Vietnamese article and its comments")]
struct Args {
    /// Comma-separated API keys, tried in order
    #[arg(long, env = "GEMINI_API_KEYS", value_delimiter = ',')]
    keys: Vec<String>,

    /// Page URL (only used for the history log)
    #[arg(long, default_value = "https://example.vn/bai-viet")]
    url: String,

    /// Article body
    #[arg(long)]
    article: String,

    /// A comment; repeat for several
    #[arg(long = "comment")]
    comments: Vec<String>,

    /// Model for both moderation and fact-checking
    #[arg(long)]
    model: Option<String>,

    /// Custom JSON rule table
    #[arg(long)]
    rules: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ========== 1. Logging ==========
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // ========== 2. Guard ==========
    let mut builder = ConfigManager::custom();
    if let Some(model) = args.model {
        builder = builder.moderation_model(model.clone()).fake_news_model(model);
    }
    if let Some(rules) = args.rules {
        builder = builder.rules_path(rules);
    }
    let guard = ContentGuard::new(builder.build(), args.keys)
        .await
        .context("failed to build content guard")?;

    // ========== 3. Scan ==========
    let request = ScanRequest {
        url: args.url,
        article_text: args.article,
        comments: args.comments,
    };
    let start = Instant::now();
    let report = guard.full_scan(&request).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    // ========== 4. Output ==========
    println!("scan finished in {:.1} ms", elapsed_ms);
    println!("{}", to_string_pretty(&report)?);
    println!("pool: {}", to_string_pretty(&guard.pool().status())?);

    Ok(())
}
