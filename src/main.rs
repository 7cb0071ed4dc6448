use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keyword_search_engine::engine::DEFAULT_SNAPSHOT_PATH;
use keyword_search_engine::{Engine, EngineConfig, ReqwestFetcher};

#[derive(Parser)]
#[command(name = "engine", about = "Crawl a web subgraph, index it, and answer keyword queries.")]
struct Cli {
    /// Path to an `engine.toml` config file; defaults apply for anything it omits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl from a seed URL and build a fresh index.
    Crawl {
        seed: String,
        #[arg(long)]
        page_cap: Option<usize>,
        #[arg(long)]
        max_retries: Option<u32>,
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Rank indexed pages against a free-form query.
    Search {
        query: String,
        #[arg(long)]
        boost: bool,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        #[arg(long)]
        load: Option<PathBuf>,
    },
    /// Like `search`, with URL, page rank, and boost flag in each row.
    SearchPlus {
        query: String,
        #[arg(long)]
        boost: bool,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        #[arg(long)]
        load: Option<PathBuf>,
    },
    /// Print the statistical lookups for a URL (and, optionally, a word).
    Stats {
        url: String,
        #[arg(long)]
        word: Option<String>,
        #[arg(long)]
        load: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Crawl { seed, page_cap, max_retries, save } => {
            let mut config = config;
            if let Some(cap) = page_cap {
                config.page_cap = cap;
            }
            if let Some(retries) = max_retries {
                config.max_retries = retries;
            }

            let fetcher = Arc::new(ReqwestFetcher::new(&config.user_agent, config.request_timeout()));
            let mut engine = Engine::new(fetcher, config);

            println!("Crawling from {seed}...");
            engine.crawl(&seed).await?;
            println!("Indexed {} pages.", engine.total_docs());

            let path = save.unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
            engine.save(&path)?;
            println!("Saved index snapshot to {}.", path.display());
        }

        Command::Search { query, boost, top_k, load } => {
            let engine = load_engine(config, load)?;
            let results = engine.search(&query, boost, top_k);
            if results.is_empty() {
                println!("No results for '{query}'.");
            }
            for r in results {
                println!("[{:.3}] {}", r.score, r.title);
            }
        }

        Command::SearchPlus { query, boost, top_k, load } => {
            let engine = load_engine(config, load)?;
            let results = engine.search_plus(&query, boost, top_k);
            if results.is_empty() {
                println!("No results for '{query}'.");
            }
            for r in results {
                println!(
                    "[{:.3}] {}  url={}  page_rank={:.6}  boosted={}",
                    r.score, r.title, r.url, r.page_rank, r.boosted
                );
            }
        }

        Command::Stats { url, word, load } => {
            let engine = load_engine(config, load)?;
            println!("page_rank({url}) = {}", engine.page_rank(&url));
            println!("outgoing({url}) = {:?}", engine.outgoing(&url));
            println!("incoming({url}) = {:?}", engine.incoming(&url));
            if let Some(word) = word {
                println!("idf({word}) = {}", engine.idf(&word));
                println!("tf({url}, {word}) = {}", engine.tf(&url, &word));
                println!("tf_idf({url}, {word}) = {}", engine.tf_idf(&url, &word));
            }
        }
    }

    Ok(())
}

fn load_engine(config: EngineConfig, load: Option<PathBuf>) -> anyhow::Result<Engine<ReqwestFetcher>> {
    let fetcher = Arc::new(ReqwestFetcher::new(&config.user_agent, config.request_timeout()));
    let mut engine = Engine::new(fetcher, config);
    let path = load.unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
    engine
        .load(&path)
        .map_err(|e| anyhow::anyhow!("failed to load index snapshot from {}: {e}", path.display()))?;
    Ok(engine)
}
