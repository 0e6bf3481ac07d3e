//! shiftpay service entry point
//!
//! Startup order: tracing, configuration, database, Telegram client,
//! extraction pipeline, reminder sweep task, update loop.

use anyhow::Result;
use clap::Parser;
use shiftpay::config::Config;
use shiftpay::extract::{ExtractionPipeline, GeminiExtractor, RuleExtractor};
use shiftpay::listener::App;
use shiftpay::sweep::spawn_reminder_sweep;
use shiftpay::telegram::{BotClient, PromptSink, TelegramNotifier};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "shiftpay", about = "Shift extraction and payment-tracking bot")]
struct Args {
    /// Path to config.toml (falls back to SHIFTPAY_CONFIG, then the
    /// platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting shiftpay v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    info!(tracked_name = %config.tracked_name, "configuration loaded");

    let pool = shiftpay::db::init_database_pool(&config.database_path).await?;
    info!("database ready at {}", config.database_path.display());

    let bot = Arc::new(BotClient::new(&config.bot_token)?);
    let notifier: Arc<dyn PromptSink> =
        Arc::new(TelegramNotifier::new(bot.clone(), config.admin_chat_id));

    let rules = RuleExtractor::new(&config.tracked_name, &config.venues)?;
    let model = match &config.gemini_api_key {
        Some(key) if !key.trim().is_empty() => {
            info!("model extractor enabled");
            Some(Arc::new(GeminiExtractor::new(
                key.clone(),
                config.tracked_name.clone(),
                config.venues.clone(),
                Duration::from_secs(config.model_timeout_secs),
            )?) as Arc<dyn shiftpay::extract::ModelExtract>)
        }
        _ => {
            info!("no model API key configured, rule extractor only");
            None
        }
    };
    let pipeline = ExtractionPipeline::new(model, rules);

    let sweep_handle = spawn_reminder_sweep(
        pool.clone(),
        notifier.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    );
    info!(
        interval_secs = config.sweep_interval_secs,
        "reminder sweep scheduled"
    );

    let app = App::new(pool, bot, notifier, pipeline, &config);
    let result = app.run().await;

    sweep_handle.abort();
    Ok(result?)
}
