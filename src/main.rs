use clap::Parser;
use color_eyre::Result;
use std::{
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tencent_api::{
    ApiClient,
    Credential,
};
use tencent_info_exporter::{
    collectors::{
        CbsCollector,
        CdnCollector,
        EsCollector,
        Registry,
    },
    config::parse_config,
    server::create_router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on for web interface and telemetry.
    #[arg(long, env = "TC_INFO_LISTEN_ADDRESS", default_value = "0.0.0.0:9150")]
    web_listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(long, default_value = "/metrics")]
    web_telemetry_path: String,

    /// Path to the exporter config file (yaml).
    #[arg(long, env = "TC_INFO_CONFIG", default_value = "config.yml")]
    config: PathBuf,

    /// Enable the CBS disk collector.
    #[arg(long)]
    collect_cbs: bool,

    /// Enable the ES instance collector.
    #[arg(long)]
    collect_es: bool,

    /// Enable the CDN ratio collector.
    #[arg(long)]
    collect_cdn: bool,

    /// CBS page size, capped at the provider maximum of 100.
    #[arg(long, default_value_t = 100)]
    cbs_page_limit: u64,

    /// Tencent Cloud API region.
    #[arg(long, env = "TC_INFO_REGION", default_value = "ap-beijing")]
    region: String,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn init_logging() {
    color_eyre::install().expect("color_eyre init");
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(EnvFilter::from_default_env()))
        .with(tracing_error::ErrorLayer::default())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    info!(version = env!("CARGO_PKG_VERSION"), "starting tencent cloud info exporter");

    let config = parse_config(&args.config)?;
    config.validate(args.collect_cdn)?;

    let credential = Credential::from_env()?;
    let timeout = Duration::from_secs(args.timeout);

    let mut registry = Registry::new();
    if args.collect_cbs {
        let client = ApiClient::new(credential.clone(), args.region.clone(), timeout)?;
        registry.register(Box::new(CbsCollector::new(Arc::new(client), args.cbs_page_limit)));
    }
    if args.collect_es {
        let client = ApiClient::new(credential.clone(), args.region.clone(), timeout)?;
        registry.register(Box::new(EsCollector::new(Arc::new(client))));
    }
    if args.collect_cdn {
        let client = ApiClient::new(credential.clone(), args.region.clone(), timeout)?;
        registry.register(Box::new(CdnCollector::new(
            config.clone(),
            Arc::new(client),
            CancellationToken::new(),
        )));
    }
    info!(collectors = ?registry.collector_names(), "registered collectors");

    let app = create_router(Arc::new(registry), &args.web_telemetry_path);
    let listener = TcpListener::bind(args.web_listen_address).await?;
    info!(address = %args.web_listen_address, "listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
