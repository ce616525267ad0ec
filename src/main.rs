//! Review feed driver - Entry Point
//!
//! Serves a JSON dataset through the pagination engine and scrolls it to the
//! end, printing one line per row.

use clap::Parser;
use review_feed::config::{self, ResolvedConfig};
use review_feed::model::error::AppError;
use review_feed::model::ListItem;
use review_feed::source::{FilePageFetcher, PageFetcher};
use review_feed::state::{PaginationEngine, RequestPhase, ScrollMetrics};
use review_feed::view_state::{Height, MonospaceMeasurer, TextMeasurer, Width};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Consecutive failed fetches tolerated before the driver stops scrolling.
const MAX_CONSECUTIVE_FAILURES: usize = 3;

/// Review feed - page through a review dataset like an infinite list
#[derive(Parser, Debug)]
#[command(name = "review-feed")]
#[command(version)]
#[command(about = "Scroll a paginated review feed to the end and print its rows")]
pub struct Args {
    /// Path to JSON dataset (`{"items": [...]}`)
    pub dataset: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reviews per page (overrides config and environment)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Layout width in points
    #[arg(long, default_value_t = 375.0)]
    pub width: f64,

    /// Viewport height in points
    #[arg(long, default_value_t = 800.0)]
    pub viewport_height: f64,

    /// Simulated network latency per page, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,
}

/// Resolve configuration: Defaults → Config File → Env Vars → CLI Args.
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged)?;
    let resolved = config::apply_cli_overrides(with_env, args.page_size);
    resolved.validate()?;
    Ok(resolved)
}

/// One printable line for a feed row.
fn render_row(index: usize, item: &ListItem, height: Option<Height>) -> String {
    let height = height.map_or_else(|| "?".to_string(), |h| format!("{:.0}pt", h.get()));
    match item {
        ListItem::Review(review) => {
            let first_line = review.body_text.lines().next().unwrap_or_default();
            format!(
                "{index:>4} [{height:>6}] {} {} ({}): {first_line}",
                review.rating, review.author, review.created_at
            )
        }
        ListItem::Summary(summary) => {
            format!("{index:>4} [{height:>6}] {} reviews", summary.total_count)
        }
    }
}

/// Scroll to the bottom after every merge until the feed is exhausted.
///
/// Returns the number of failed fetches seen.
async fn drive_to_end(
    engine: &mut PaginationEngine,
    width: Width,
    viewport_height: f64,
    measurer: &dyn TextMeasurer,
) -> usize {
    let mut failures = 0;
    let mut consecutive_failures = 0;

    engine.start();
    while engine.phase() != RequestPhase::Exhausted {
        if !engine.process_next().await {
            break;
        }

        match engine.phase() {
            RequestPhase::Idle => {
                consecutive_failures = 0;
                let content = engine.content_height(width, measurer).get();
                let bottom = (content - viewport_height).max(0.0);
                engine.on_scroll_settled(&ScrollMetrics::new(viewport_height, content, bottom));
            }
            RequestPhase::Errored => {
                failures += 1;
                consecutive_failures += 1;
                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    warn!(failures, "Giving up after repeated fetch failures");
                    break;
                }
                engine.request_next_page();
            }
            RequestPhase::Loading | RequestPhase::Exhausted => {}
        }
    }
    failures
}

/// Open the dataset, scroll the feed to the end and print every row.
async fn run(args: Args, config: ResolvedConfig) -> Result<(), AppError> {
    let fetcher = FilePageFetcher::open(&args.dataset)?
        .with_latency(Duration::from_millis(args.latency_ms));
    info!(path = %fetcher.path().display(), reviews = fetcher.len(), "Dataset opened");
    let fetcher: Arc<dyn PageFetcher> = Arc::new(fetcher);

    let mut engine = PaginationEngine::new(fetcher, config.engine_config()?);
    engine.on_state_changed(|snapshot| {
        tracing::debug!(
            phase = %snapshot.phase,
            items = snapshot.len(),
            offset = snapshot.offset,
            "Feed state changed"
        );
    });

    let width = Width::from_points(args.width);
    let measurer = MonospaceMeasurer::default();
    let failures = drive_to_end(&mut engine, width, args.viewport_height, &measurer).await;

    let snapshot = engine.snapshot();
    for (index, item) in snapshot.items().iter().enumerate() {
        let height = engine.measure_height(item.id(), width, &measurer);
        println!("{}", render_row(index, item, height));
    }

    info!(
        rows = snapshot.len(),
        phase = %snapshot.phase,
        failures,
        "Feed finished"
    );
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    review_feed::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args, config))
}
