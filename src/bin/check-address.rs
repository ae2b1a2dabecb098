use aml_checker::blockchain::{ChainabuseConfig, HttpEvidenceGateway, TronscanConfig};
use aml_checker::{Blocklist, EngineConfig, Evaluator, SqliteVerdictStore, Status, VerdictStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// AML risk check for a blockchain address
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to check
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// Network the address belongs to; evidence comes from Tronscan, so only TRON is served
    #[arg(short, long, default_value = "tron", value_parser = ["tron"])]
    network: String,

    /// Risk policy as JSON (defaults apply to omitted fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verdict cache database
    #[arg(long, default_value = "data/aml_cache.sqlite")]
    db: PathBuf,

    /// Tronscan API base URL
    #[arg(long, default_value = aml_checker::blockchain::tronscan::TRONSCAN_API)]
    tronscan_url: String,

    /// Tronscan API key
    #[arg(long, env = "TRON_API_KEY")]
    tron_api_key: Option<String>,

    /// Chainabuse API key; reputation lookups are skipped without one
    #[arg(long, env = "CHAINABUSE_API_KEY")]
    chainabuse_key: Option<String>,

    /// Ignore the cached verdict
    #[arg(short, long)]
    force_refresh: bool,

    /// Record a manual block for the address instead of evaluating it
    #[arg(long, conflicts_with = "forget")]
    mark_blocked: bool,

    /// Delete the cached verdict for the address
    #[arg(long)]
    forget: bool,

    /// Treat these addresses as locally blocked (repeatable)
    #[arg(long = "block", value_name = "ADDR")]
    blocked: Vec<String>,

    /// Print the verdict as JSON
    #[arg(long)]
    json: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Setup logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("aml_checker=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("aml_checker=info")
            .init();
    }

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    config.network = args.network.clone();

    let store = Arc::new(SqliteVerdictStore::open(&args.db)?);
    let gateway = Arc::new(HttpEvidenceGateway::new(
        TronscanConfig {
            base_url: args.tronscan_url.clone(),
            api_key: args.tron_api_key.clone(),
            ..TronscanConfig::default()
        },
        ChainabuseConfig {
            api_key: args.chainabuse_key.clone(),
            ..ChainabuseConfig::default()
        },
    )?);
    let blocklist = Arc::new(Blocklist::with_addresses(args.blocked.iter().cloned()));

    let evaluator = Evaluator::new(config, store.clone(), gateway)?.with_blocklist(blocklist);

    if args.forget {
        store.delete(&args.network, &args.address)?;
        println!("🗑  Cached verdict removed for {} on {}", args.address, args.network);
        return Ok(());
    }

    let verdict = if args.mark_blocked {
        evaluator.mark_manual_block(&args.address)?
    } else {
        evaluator.check(&args.address, args.force_refresh).await
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("\n🔍 Address: {} ({})\n", args.address, args.network);
        println!("{}", verdict);
    }

    // Exit code: 0 = safe, 1 = blocked, 2 = warning, 3 = could not assess
    let code = match verdict.status {
        Status::Safe => 0,
        Status::Blocked => 1,
        Status::Warning => 2,
        Status::Error => 3,
    };
    std::process::exit(code);
}
