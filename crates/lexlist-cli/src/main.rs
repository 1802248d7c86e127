mod display;

use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use lexlist_core::filters::parse_pair;
use lexlist_core::{
    Act, ActFilters, ErrorKind, Judgment, JudgmentFilters, LawMapping, ListItem, ListingFilters,
    MappingFilters, PageSize,
};
use lexlist_fetch::{ApiConfig, HttpPageFetcher};
use lexlist_loader::{ListLoader, LoadOutcome, LoaderConfig};
use serde::de::DeserializeOwned;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

const RETRY_PAUSE: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "lexlist", version, about = "Page through legal listings")]
struct Cli {
    /// Base URL of the listing API.
    #[arg(long, env = "LEXLIST_API_URL", default_value = "http://localhost:4000")]
    api_url: String,

    /// Bearer token for authenticated endpoints.
    #[arg(long, env = "LEXLIST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Items per page.
    #[arg(long, env = "LEXLIST_PAGE_SIZE", default_value_t = 20)]
    page_size: usize,

    /// Stop after this many pages.
    #[arg(long, default_value_t = 3)]
    pages: usize,

    /// Manual retries per failed page before giving up.
    #[arg(long, default_value_t = 2)]
    retries: u32,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    listing: Listing,
}

#[derive(Subcommand)]
enum Listing {
    /// Court judgments (cursor paginated).
    Judgments(FilterArgs),
    /// Central or state acts; pass `-f section=state` for state acts.
    Acts(FilterArgs),
    /// Old-to-new law section mappings.
    Mappings(FilterArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Filter as KEY=VALUE; repeatable.
    #[arg(short = 'f', long = "filter", value_name = "KEY=VALUE")]
    filters: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("lexlist v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;
    LocalSet::new().block_on(&runtime, run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.listing {
        Listing::Judgments(args) => run_listing::<JudgmentFilters, Judgment>(&cli, args).await,
        Listing::Acts(args) => run_listing::<ActFilters, Act>(&cli, args).await,
        Listing::Mappings(args) => run_listing::<MappingFilters, LawMapping>(&cli, args).await,
    }
}

async fn run_listing<F, T>(cli: &Cli, args: &FilterArgs) -> anyhow::Result<()>
where
    F: ListingFilters + 'static,
    T: ListItem + DeserializeOwned + 'static,
{
    let pairs = args
        .filters
        .iter()
        .map(|arg| parse_pair(arg))
        .collect::<Result<Vec<_>, _>>()?;
    let filters = F::from_pairs(pairs).context("parsing filters")?;
    let page_size = PageSize::new(cli.page_size)?;

    let api = ApiConfig {
        base_url: cli.api_url.clone(),
        bearer_token: cli.token.clone(),
        timeout: Some(Duration::from_secs(cli.timeout)),
    };
    let fetcher = HttpPageFetcher::<F, T>::new(api)?;
    let loader = ListLoader::new(
        fetcher,
        filters,
        LoaderConfig::default().with_page_size(page_size),
    );

    let mut printed = 0;
    let mut pages = 0;
    let mut outcome = loader.load_initial().await;
    loop {
        outcome = settle(&loader, outcome, cli.retries).await?;
        if !matches!(outcome, LoadOutcome::Applied { .. }) {
            break;
        }
        printed = loader.view(|state| {
            for (i, item) in state.items().iter().enumerate().skip(printed) {
                display::print_card(i + 1, item);
            }
            state.items().len()
        });
        pages += 1;
        if pages >= cli.pages || !loader.has_more() {
            break;
        }
        outcome = loader.load_more().await;
    }

    let (total, has_more) = loader.view(|s| (s.total_count(), s.has_more()));
    display::print_summary(F::LISTING, printed, total, has_more);
    Ok(())
}

/// Retry a failed load up to `retries` times, pausing between attempts.
async fn settle<P>(
    loader: &ListLoader<P>,
    mut outcome: LoadOutcome,
    retries: u32,
) -> anyhow::Result<LoadOutcome>
where
    P: lexlist_core::PageFetcher + 'static,
    P::Item: 'static,
    P::Filters: 'static,
{
    let mut attempts = 0;
    while let LoadOutcome::Failed(kind) = outcome {
        if attempts >= retries {
            match kind {
                ErrorKind::Auth => bail!("the API rejected our credentials; set LEXLIST_TOKEN and try again"),
                kind => bail!(
                    "giving up after {} consecutive {kind} failures",
                    loader.consecutive_failures()
                ),
            }
        }
        attempts += 1;
        tracing::warn!(%kind, attempt = attempts, "page failed, retrying");
        tokio::time::sleep(RETRY_PAUSE).await;
        outcome = loader.retry().await;
    }
    Ok(outcome)
}
