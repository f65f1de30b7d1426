use clap::Parser;
use dogmatch_api::{AppState, RestApi};
use dogmatch_storage::{load_breed_metadata, PredictorCache};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Hybrid dog breed recommendation server
#[derive(Parser, Debug)]
#[command(name = "dogmatch")]
#[command(about = "Hybrid dog breed recommendation server", long_about = None)]
struct Args {
    /// Directory holding the fitted artifact bundle
    #[arg(short, long, env = "DOGMATCH_ARTIFACTS_DIR", default_value = "./models")]
    artifacts_dir: PathBuf,

    /// Breed reference CSV served by /api/breeds
    #[arg(long, env = "DOGMATCH_METADATA_CSV")]
    metadata_csv: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, env = "DOGMATCH_HTTP_PORT", default_value_t = 5000)]
    http_port: u16,

    /// Address to bind
    #[arg(long, env = "DOGMATCH_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Log level
    #[arg(long, env = "DOGMATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Check artifacts against manifest.json
    #[arg(
        long,
        env = "DOGMATCH_VERIFY_CHECKSUMS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    verify_checksums: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting DogMatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Artifacts directory: {:?}", args.artifacts_dir);
    info!("HTTP API port: {}", args.http_port);

    let cache = Arc::new(
        PredictorCache::new(&args.artifacts_dir).verify_checksums(args.verify_checksums),
    );
    let predictor = cache.get()?;
    info!(
        breeds = predictor.n_breeds(),
        features = predictor.layout().len(),
        "Predictor loaded"
    );

    let breeds = load_breed_metadata(args.metadata_csv.as_deref());
    let state = AppState::new(cache, breeds);

    let bind = args.bind.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, &bind, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("DogMatch started successfully");
    info!("HTTP API: http://{}:{}/", args.bind, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
