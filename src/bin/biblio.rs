//! CLI binary for biblio.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use biblio::AppConfig;
use biblio_search::{
    FilterCriteria, FormatOptions, Item, Primitives, SearchOrchestrator, TagCombinator,
    ZoteroWebBackend,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// biblio: bounded multi-strategy search over a Zotero library.
#[derive(Parser)]
#[command(name = "biblio", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zotero API key. Overrides the config file.
    #[arg(long, env = "ZOTERO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Zotero library id. Overrides the config file.
    #[arg(long)]
    library_id: Option<String>,

    /// Print items as JSON instead of Markdown.
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search the library with every enabled strategy.
    Search(SearchArgs),

    /// List the most recently added items.
    Recent {
        /// Number of items to list.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// List every tag in the library.
    Tags,
}

#[derive(Args)]
struct SearchArgs {
    /// Free-text query.
    query: String,

    /// Maximum number of items to return.
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Maximum number of items each strategy may contribute.
    #[arg(long)]
    per_strategy_limit: Option<usize>,

    /// Include the recent-items strategy.
    #[arg(long)]
    recent: bool,

    /// Skip the semantic strategy.
    #[arg(long)]
    no_semantic: bool,

    /// Skip the keyword strategy.
    #[arg(long)]
    no_keyword: bool,

    /// Skip the tag strategy.
    #[arg(long)]
    no_tags: bool,

    /// Let the tag strategy match items carrying any matched tag instead of all.
    #[arg(long)]
    any_tags: bool,

    /// Keep only items of these types.
    #[arg(long = "item-type")]
    item_types: Vec<String>,

    /// Keep only items published in or after this year.
    #[arg(long, requires = "to_year")]
    from_year: Option<i32>,

    /// Keep only items published in or before this year.
    #[arg(long, requires = "from_year")]
    to_year: Option<i32>,

    /// Keep only items carrying every one of these tags.
    #[arg(long = "tag")]
    required_tags: Vec<String>,

    /// Drop items carrying any of these tags.
    #[arg(long = "exclude-tag")]
    excluded_tags: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biblio=info,biblio_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(key) = cli.api_key {
        config.zotero.api_key = Some(key);
    }
    if let Some(id) = cli.library_id {
        config.zotero.library_id = id;
    }

    let backend =
        ZoteroWebBackend::new(config.zotero.clone()).context("failed to set up Zotero backend")?;
    let options = FormatOptions::from(config.output);

    match cli.command {
        Command::Search(args) => run_search(backend, config, args, &options, cli.json).await,
        Command::Recent { limit } => {
            let primitives = Primitives::with_timeout(
                backend,
                Duration::from_secs(config.search.strategy_timeout_seconds),
            );
            let items = primitives.recent(limit).await?;
            print_items(&items, &options, cli.json)
        }
        Command::Tags => {
            let tags = Primitives::new(backend).tags().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                for tag in tags {
                    println!("{tag}");
                }
            }
            Ok(())
        }
    }
}

async fn run_search(
    backend: ZoteroWebBackend,
    mut config: AppConfig,
    args: SearchArgs,
    options: &FormatOptions,
    json: bool,
) -> anyhow::Result<()> {
    let search = &mut config.search;
    if let Some(max) = args.max_results {
        search.max_results = max;
    }
    if let Some(limit) = args.per_strategy_limit {
        search.per_strategy_limit = limit;
    }
    search.strategies.recent |= args.recent;
    search.strategies.semantic &= !args.no_semantic;
    search.strategies.keyword &= !args.no_keyword;
    search.strategies.tags &= !args.no_tags;
    if args.any_tags {
        search.tag_combinator = TagCombinator::Any;
    }

    let mut criteria = FilterCriteria::new()
        .with_item_types(args.item_types)
        .with_required_tags(args.required_tags)
        .with_excluded_tags(args.excluded_tags);
    if let (Some(from), Some(to)) = (args.from_year, args.to_year) {
        criteria = criteria.with_date_range(from, to);
    }
    criteria.validate()?;

    let orchestrator = SearchOrchestrator::new(backend);
    let report = orchestrator
        .comprehensive_search_report(&args.query, &config.search)
        .await?;
    if report.all_failed() {
        anyhow::bail!("every search strategy failed; is the Zotero library reachable?");
    }

    let items = orchestrator.filter_by_criteria(report.items, &criteria)?;
    print_items(&items, options, json)
}

fn print_items(items: &[Item], options: &FormatOptions, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        println!("{}", biblio_search::format_results(items, options));
    }
    Ok(())
}
