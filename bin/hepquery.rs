use anyhow::{Context, Result};
use clap::Parser;
use hepquery::{QueryConfig, QueryTranslator, SearchFilter};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "hepquery")]
#[command(about = "Translate a HEPData search into an index request", long_about = None)]
struct Args {
    /// Query as typed into the search box
    #[arg(default_value = "")]
    query: String,

    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, env = "HEPQUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Filter as name=value; repeat for several filters
    #[arg(long = "filter", short = 'f')]
    filters: Vec<SearchFilter>,

    /// Offset of the first hit
    #[arg(long)]
    from: Option<usize>,

    /// Maximum number of hits
    #[arg(long)]
    size: Option<usize>,

    /// Pretty-print the request body
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading query configuration from {}", path.display());
            QueryConfig::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => QueryConfig::default(),
    };

    let translator = QueryTranslator::new(config.freeze()?)?;
    debug!(version = hepquery::VERSION, "translator ready");

    let mut request = translator.build_search(&args.query, &args.filters)?;
    if let Some(from) = args.from {
        request = request.with_from(from);
    }
    if let Some(size) = args.size {
        request = request.with_size(size);
    }

    let body = if args.pretty {
        serde_json::to_string_pretty(&request)?
    } else {
        serde_json::to_string(&request)?
    };
    println!("{}", body);

    Ok(())
}
