//! QLD structure approval server
//!
//! Answers "which approvals does this backyard structure need at this
//! address?" and exports the answer as a printable report.
//!
//! - Approval checks (address lookup + rules engine)
//! - Report export (PDF/SVG/PNG via typst-engine)
//! - Static frontend hosting with SPA fallback
//!
//! Per-IP rate limiting is applied in front of everything.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use approval_engine::{ApprovalEngine, RuleConfig};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use location_resolver::{LocationResolver, QldSpatialConfig, QldSpatialResolver, StaticResolver};
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::PeerIpKeyExtractor,
    GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod report;

use api::{handle_check_approval, handle_generate_pdf, handle_health, handle_list_structure_types};

/// Command-line arguments for the approval server
#[derive(Parser, Debug)]
#[command(name = "approval-server")]
#[command(about = "Queensland backyard structure approval checker")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "APPROVAL_PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "APPROVAL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Report render timeout in milliseconds
    #[arg(long, env = "APPROVAL_TIMEOUT_MS", default_value = "10000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "APPROVAL_RATE_LIMIT", default_value = "10")]
    rate_limit: u32,

    /// Directory with the built frontend; unknown paths get its index.html
    #[arg(long, env = "APPROVAL_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// JSON rule table overriding the built-in Queensland limits
    #[arg(long, env = "APPROVAL_RULES")]
    rules: Option<PathBuf>,

    /// Resolve addresses from local fixtures instead of QLD Spatial
    #[arg(long, env = "APPROVAL_OFFLINE")]
    offline: bool,

    /// Address fixtures used with --offline
    #[arg(long, env = "APPROVAL_FIXTURES", requires = "offline")]
    fixtures: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ApprovalEngine>,
    pub resolver: Arc<dyn LocationResolver>,
    /// Report render timeout in milliseconds
    pub timeout_ms: u64,
}

/// Routes, static hosting, CORS and request tracing
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(handle_health))
        .route("/api/structure-types", get(handle_list_structure_types))
        .route("/api/check-approval", post(handle_check_approval))
        .route("/api/generate-pdf", post(handle_generate_pdf));

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Per-IP limiter: `rate_limit` requests per second, bursts of twice that
pub fn rate_limiter(
    rate_limit: u32,
) -> anyhow::Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    anyhow::ensure!(
        rate_limit > 0,
        "Invalid rate limit: must be at least 1 request per second"
    );

    // The builder takes the interval between refilled tokens, not a rate
    let refill_ms = (1000 / u64::from(rate_limit)).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(refill_ms)
        .burst_size(rate_limit.saturating_mul(2))
        .finish()
        .context("Invalid rate limiter configuration")
}

fn load_engine(rules: Option<&Path>) -> anyhow::Result<ApprovalEngine> {
    match rules {
        Some(path) => {
            let config = RuleConfig::from_path(path)
                .with_context(|| format!("Failed to load rule table from {}", path.display()))?;
            info!(
                "Loaded rule table from {} ({} councils)",
                path.display(),
                config.table.jurisdictions().len()
            );
            Ok(ApprovalEngine::from_config(config))
        }
        None => Ok(ApprovalEngine::new()),
    }
}

fn load_resolver(args: &Args) -> anyhow::Result<Arc<dyn LocationResolver>> {
    if args.offline {
        let resolver = match &args.fixtures {
            Some(path) => StaticResolver::from_path(path)
                .with_context(|| format!("Failed to load fixtures from {}", path.display()))?,
            None => {
                warn!("Offline mode without fixtures: every address resolves to the fallback");
                StaticResolver::new()
            }
        };
        info!("Offline resolver with {} addresses", resolver.len());
        return Ok(Arc::new(resolver));
    }

    let config = QldSpatialConfig::from_env().context("Invalid QLD Spatial configuration")?;
    info!("Resolving addresses against {}", config.base_url);
    let resolver = QldSpatialResolver::new(config).context("Failed to build QLD Spatial client")?;
    Ok(Arc::new(resolver))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting approval server on {}:{}", args.host, args.port);

    let governor_conf = Arc::new(rate_limiter(args.rate_limit)?);

    let state = AppState {
        engine: Arc::new(load_engine(args.rules.as_deref())?),
        resolver: load_resolver(&args)?,
        timeout_ms: args.timeout_ms,
    };

    if let Some(dir) = &args.static_dir {
        info!("Serving frontend from {}", dir.display());
    }

    let app = build_router(state, args.static_dir.as_deref()).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Render timeout: {}ms", args.timeout_ms);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
