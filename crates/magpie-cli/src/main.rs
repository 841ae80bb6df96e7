use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::env;
use tracing_subscriber::EnvFilter;

use magpie::providers::configs::OpenAiProviderConfig;
use magpie::providers::openai::OpenAiProvider;
use magpie::session::Session;
use magpie::store::redis::RedisStore;

use crate::prompt::rustyline::RustylinePrompt;
use crate::repl::Repl;

mod prompt;
mod repl;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Store URL (can also be set via REDIS_URL environment variable)
    #[arg(long)]
    redis_url: Option<String>,

    /// OpenAI API Key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Model service host (can also be set via OPENAI_HOST environment variable)
    #[arg(long)]
    host: Option<String>,

    /// Model to use
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let redis_url = cli
        .redis_url
        .clone()
        .or_else(|| env::var("REDIS_URL").ok())
        .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .context("API key must be provided via --api-key or OPENAI_API_KEY environment variable")?;
    let host = cli
        .host
        .clone()
        .or_else(|| env::var("OPENAI_HOST").ok())
        .unwrap_or_else(|| "https://api.openai.com".to_string());

    // The store must be reachable before any conversation begins; there is
    // no fallback schema
    let store = RedisStore::connect(&redis_url).await?;
    let provider = OpenAiProvider::new(OpenAiProviderConfig::new(host, api_key, cli.model))?;
    let session = Session::new(Box::new(provider), Box::new(store)).await?;

    println!("{}", style("Connected to the record store.").green());
    println!("Schema:");
    println!("{}", session.schema_text());

    let prompt = RustylinePrompt::new()?;
    let mut repl = Repl::new(session, Box::new(prompt));
    repl.run().await
}
