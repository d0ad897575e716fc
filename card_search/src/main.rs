//! Card Search - command line and web front end
//!
//! Runs one hybrid search and prints the ranked results, or serves the search
//! API when `--web-port` is given. The result cache is persisted between runs.

use card_search::{web, Aggregator, CardCandidate, SearchCache, SearchConfig, SearchOptions, Source};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Search two trading card catalogs at once
#[derive(Parser, Debug)]
#[command(name = "card_search")]
#[command(version, about, long_about = None)]
struct Args {
    /// Free-text query, e.g. "charizard 4" or "pikachu vmax"
    query: Option<String>,

    /// Base URL of the pokemon_tcg catalog
    #[arg(long, env = "CARD_SEARCH_POKEMON_TCG_URL")]
    pokemon_tcg_url: Option<String>,

    /// Base URL of the tcgdex catalog
    #[arg(long, env = "CARD_SEARCH_TCGDEX_URL")]
    tcgdex_url: Option<String>,

    /// Maximum number of results to return
    #[arg(short, long)]
    max_results: Option<usize>,

    /// Serve expired cache entries instead of refetching
    #[arg(long, default_value_t = false)]
    allow_expired: bool,

    /// Skip the cache lookup (fresh results are still cached)
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Path to the persisted search cache
    #[arg(long, default_value_t = default_cache_path())]
    cache_file: String,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Serve the search API on the specified port instead of running one search
    #[arg(long)]
    web_port: Option<u16>,
}

fn default_cache_path() -> String {
    SearchCache::default_path().to_string_lossy().to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = SearchConfig::default();
    if let Some(url) = &args.pokemon_tcg_url {
        config.pokemon_tcg.base_url = url.clone();
    }
    if let Some(url) = &args.tcgdex_url {
        config.tcgdex.base_url = url.clone();
    }

    let cache_path = PathBuf::from(&args.cache_file);
    let cache = SearchCache::load(&cache_path, config.cache_ttl(), config.cache_capacity);
    let aggregator = Arc::new(Aggregator::with_cache(config, Arc::new(RwLock::new(cache))));

    if let Some(port) = args.web_port {
        tokio::select! {
            result = web::serve(Arc::clone(&aggregator), port) => {
                if let Err(e) = result {
                    log::error!("Web server error: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
            }
        }
        save_cache(&aggregator, &cache_path).await;
        return;
    }

    let Some(query) = args.query.as_deref() else {
        eprintln!("Error: a search query is required unless --web-port is given");
        std::process::exit(2);
    };

    let options = SearchOptions {
        use_cache: !args.no_cache,
        allow_expired: args.allow_expired,
        max_results: args.max_results,
    };
    let results = aggregator.search(query, options).await;
    save_cache(&aggregator, &cache_path).await;

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize results: {}", e);
                std::process::exit(1);
            }
        }
    } else if results.is_empty() {
        println!("No cards found for '{}'", query);
    } else {
        for (rank, card) in results.iter().enumerate() {
            println!("{:>3}. {}", rank + 1, format_candidate(card));
        }
    }
}

async fn save_cache(aggregator: &Aggregator, path: &std::path::Path) {
    if let Err(e) = aggregator.cache().read().await.save(path) {
        log::warn!("Failed to save search cache: {}", e);
    }
}

/// One result line: name, set and number, rarity, prices, contributing catalogs
fn format_candidate(card: &CardCandidate) -> String {
    let mut line = card.name.clone();
    if !card.set_name.is_empty() || !card.number.is_empty() {
        line.push_str(&format!(" [{} #{}]", card.set_name, card.number));
    }
    if !card.rarity.is_empty() {
        line.push_str(&format!(" ({})", card.rarity));
    }

    for source in Source::ALL {
        if let Some(market) = card.prices.get(source).and_then(|block| {
            block.market.or(block.low).map(|price| (price, &block.currency))
        }) {
            line.push_str(&format!(" {}={:.2} {}", source, market.0, market.1));
        }
    }

    let sources: Vec<&str> = card.sources.iter().map(|s| s.as_str()).collect();
    line.push_str(&format!(" <{}>", sources.join("+")));
    line
}
