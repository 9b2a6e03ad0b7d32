//! Command-line front end: load a JSON candidate dataset, run one zone
//! recompute, and print the ranked zones.
//!
//! Build with: cargo run --features cli -- --dataset candidates.json

use clap::Parser;
use farm_zone_lib::{
    CandidateRecord, ScoringFormula, SelectionPolicy, ZoneConfig, ZoneEngine, ZoneStrategy,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Zone detection and ranking for candidate factory-farm sites
struct Args {
    /// JSON file containing an array of {id, lat, lng, probability} records
    #[clap(short, long, value_name = "FILE")]
    dataset: PathBuf,

    /// Minimum probability for a candidate to be eligible
    #[clap(short, long, default_value = "0.5")]
    threshold: f64,

    /// Clustering strategy: grid | radius-linkage
    #[clap(short, long, default_value = "radius-linkage")]
    strategy: String,

    /// Scoring formula: size-only | high-confidence-ratio | weighted-density | log-weighted-count
    #[clap(long, default_value = "log-weighted-count")]
    scoring: String,

    /// Number of zones to keep
    #[clap(short = 'k', long, default_value = "8")]
    top_k: usize,

    /// Linkage radius in kilometers (radius-linkage strategy)
    #[clap(long, default_value = "5.0")]
    radius_km: f64,

    /// Grid cell size in degrees (grid strategy)
    #[clap(long, default_value = "0.5")]
    grid_size: f64,

    /// Minimum members for a group to become a zone
    #[clap(long, default_value = "2")]
    min_members: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let strategy = match args.strategy.as_str() {
        "grid" => ZoneStrategy::Grid,
        "radius-linkage" => ZoneStrategy::RadiusLinkage,
        other => return Err(format!("unknown strategy: {other}").into()),
    };
    let scoring = ScoringFormula::all()
        .iter()
        .find(|f| f.name() == args.scoring)
        .copied()
        .ok_or_else(|| format!("unknown scoring formula: {}", args.scoring))?;

    let config = ZoneConfig {
        probability_threshold: args.threshold,
        strategy,
        scoring,
        selection: SelectionPolicy::TopK(args.top_k),
        linkage_radius_km: args.radius_km,
        grid_size_degrees: args.grid_size,
        min_cluster_members: args.min_members,
        ..ZoneConfig::default()
    };

    let file = std::fs::File::open(&args.dataset)?;
    let records: Vec<CandidateRecord> = serde_json::from_reader(std::io::BufReader::new(file))?;
    tracing::info!(records = records.len(), dataset = %args.dataset.display(), "Dataset read");

    let mut engine = ZoneEngine::new(config)?;
    engine.load_dataset(&records);
    engine.enable();

    if engine.zones().is_empty() {
        println!("no zones for the given parameters");
        return Ok(());
    }

    println!(
        "{:>4}  {:>10}  {:>9}  {:>9}  {:>7}  {:>8}  {:>6}",
        "rank", "lat", "lng", "score", "members", "high-p", "mean-p"
    );
    for display in engine.displays() {
        println!(
            "{:>4}  {:>10.5}  {:>9.5}  {:>9.3}  {:>7}  {:>8}  {:>6.3}",
            display.rank,
            display.center_lat,
            display.center_lng,
            engine.zones()[display.rank - 1].score,
            display.member_count,
            display.high_confidence_count,
            display.mean_probability,
        );
    }

    Ok(())
}
