use std::hint::black_box;
use std::time::{Duration, Instant};

use bounded_merge::indexed::{top_k_indexed, top_k_rows};
use bounded_merge::presort::presort_blocks;
use bounded_merge::{EngineConfig, SortOrder};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use voracious_radix_sort::RadixSort;

#[derive(Parser)]
#[command(name = "bounded-merge", about = "Top-K block merge benchmark")]
struct Cli {
    /// Engine config (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Number of elements to select
    #[arg(short, long, default_value_t = 1000)]
    k: usize,

    /// Smallest input size, as a power of two
    #[arg(long, default_value_t = 10)]
    min_lg_size: u32,

    /// Largest input size, as a power of two
    #[arg(long, default_value_t = 22)]
    max_lg_size: u32,

    /// Row length for the row-parallel benchmark
    #[arg(long, default_value_t = 1024)]
    row_len: usize,

    /// Override the configured sort order
    #[arg(long)]
    order: Option<SortOrder>,
}

fn benchmark(name: &str, repeats: usize, mut f: impl FnMut()) {
    // Warmup.
    for _ in 0..repeats {
        f();
    }
    let start = Instant::now();
    for _ in 0..repeats {
        f();
    }
    let duration = start.elapsed();
    info!("  {}: {}", name, human_time(repeats, duration));
}

fn human_time(repeats: usize, duration: Duration) -> String {
    let mut duration = duration.as_nanos() as f64 / repeats as f64;
    if duration < 1000.0 {
        return format!("{:.1}ns", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}us", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}ms", duration);
    }
    duration /= 1000.0;
    format!("{:.1}s", duration)
}

fn human_size(size: usize) -> String {
    if size < 1024 {
        return format!("{}B", size);
    }
    let mut size = size as f64;
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{}KiB", size);
    }
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{}MiB", size);
    }
    size /= 1024.0;
    format!("{}GiB", size)
}

/// Top-K by sorting everything, for reference.
fn sort_top_k(data: &[f32], k: usize, order: SortOrder) -> Vec<f32> {
    let mut sorted = data.to_vec();
    match order {
        SortOrder::Ascending => sorted.sort_unstable_by(|a, b| a.total_cmp(b)),
        SortOrder::Descending => sorted.sort_unstable_by(|a, b| b.total_cmp(a)),
    }
    sorted.truncate(k);
    sorted
}

fn radix_top_k(data: &[f32], k: usize, order: SortOrder) -> Vec<f32> {
    let mut sorted = data.to_vec();
    sorted.voracious_sort();
    match order {
        SortOrder::Ascending => sorted.truncate(k),
        SortOrder::Descending => {
            sorted.reverse();
            sorted.truncate(k);
        }
    }
    sorted
}

fn block_top_k(config: &EngineConfig, data: &[f32], k: usize) -> Vec<f32> {
    let mut buf = data.to_vec();
    let sorter = config.sorter();
    let len = buf.len();
    presort_blocks(&mut buf, config.base_block, &config.order)
        .and_then(|()| sorter.top_k(&mut buf, config.base_block, len, k))
        .unwrap_or_default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(order) = cli.order {
        config.order = order;
    }
    info!(?config, k = cli.k, "starting");

    let mut rng = fastrand::Rng::with_seed(0);
    for lg_size in cli.min_lg_size..=cli.max_lg_size {
        let data: Vec<f32> = (0..1usize << lg_size).map(|_| rng.f32()).collect();
        let k = cli.k.min(data.len());
        let repeats = 1usize << 20u32.saturating_sub(lg_size);
        info!(
            "size: {}",
            human_size(std::mem::size_of::<f32>() * data.len())
        );

        let expected = sort_top_k(&data, k, config.order);
        if block_top_k(&config, &data, k) != expected {
            error!(lg_size, "block top-k disagrees with full sort");
        }

        benchmark("sort_unstable", repeats, || {
            black_box(sort_top_k(&data, k, config.order));
        });

        benchmark("voracious_sort", repeats, || {
            black_box(radix_top_k(&data, k, config.order));
        });

        benchmark("block top-k", repeats, || {
            black_box(block_top_k(&config, &data, k));
        });

        benchmark("indexed top-k", repeats, || {
            black_box(top_k_indexed(&config, &data, k).ok());
        });

        if cli.row_len > 0 && data.len() % cli.row_len == 0 {
            let row_k = k.min(cli.row_len);
            benchmark("row top-k (rayon)", repeats, || {
                black_box(top_k_rows(&config, &data, cli.row_len, row_k).ok());
            });
        }
    }
    Ok(())
}
