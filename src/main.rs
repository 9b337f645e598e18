use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weibo_feed_fetcher::config::Settings;
use weibo_feed_fetcher::feed::{self, FeedAccount};
use weibo_feed_fetcher::media_cache::MediaCache;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let Some(account_id) = args.next() else {
        anyhow::bail!("usage: weibo-feed-fetcher <account-id> [post-index]");
    };
    let post_index = args
        .next()
        .map(|raw| {
            raw.parse::<usize>()
                .with_context(|| format!("post-index must be a number, got '{raw}'"))
        })
        .transpose()?;

    let settings = Settings::from_env().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    tokio::fs::create_dir_all(&settings.images_cache)
        .await
        .with_context(|| {
            format!(
                "Failed to create cache directory: {}",
                settings.images_cache.display()
            )
        })?;

    let client = reqwest::Client::builder()
        .timeout(settings.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let cache = MediaCache::new(settings.images_cache.clone());
    let mut account = FeedAccount::new(account_id, &settings);

    match post_index {
        None => list_feed(&client, &mut account).await,
        Some(index) => show_post(&client, &mut account, &cache, index).await,
    }

    Ok(())
}

async fn list_feed(client: &reqwest::Client, account: &mut FeedAccount) {
    let cards = feed::list_cards(client, account).await;
    let summaries = feed::summarize(&cards);
    if summaries.is_empty() {
        println!("No posts found.");
        return;
    }
    info!(
        account = account.account_id(),
        name = account.display_name(),
        posts = summaries.len(),
        "Feed fetched"
    );
    for summary in summaries {
        println!("{:>3}  {}  {}", summary.index, summary.date, summary.excerpt);
    }
}

async fn show_post(
    client: &reqwest::Client,
    account: &mut FeedAccount,
    cache: &MediaCache,
    index: usize,
) {
    match feed::resolve(client, account, cache, index).await {
        Some(content) => {
            println!("{} | {}", content.user_name, content.detail_url);
            println!("{}", content.text);
            for path in &content.pics_list {
                println!("pic: {}", path.display());
            }
            for path in &content.gif_list {
                println!("gif: {}", path.display());
            }
        }
        None => println!("Post could not be resolved."),
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,weibo_feed_fetcher=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        // Pretty-printed logging for development
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
