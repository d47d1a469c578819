//! Txn Uploadr - transactions CSV upload function
//!
//! Runs under the AWS Lambda runtime behind an API Gateway HTTP API.

use anyhow::anyhow;
use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use clap::Parser;
use lambda_runtime::{run, service_fn, LambdaEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use txn_uploadr::{bootstrap::UploadApi, config::Config};

/// Txn Uploadr - validating CSV upload function
#[derive(Parser, Debug)]
#[command(name = "txn-uploadr")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    info!("Starting Txn Uploadr v{}", txn_uploadr::VERSION);

    let config = match &args.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::from_env()?,
    };

    info!(
        s3_bucket = %config.storage.bucket,
        s3_region = %config.storage.region,
        "Upload API configuration loaded"
    );

    let api = Arc::new(UploadApi::initialize(&config).await?);

    run(service_fn(move |event: LambdaEvent<ApiGatewayV2httpRequest>| {
        let api = api.clone();
        async move { Ok::<_, lambda_runtime::Error>(api.handler.handle(event.payload).await) }
    }))
    .await
    .map_err(|e| anyhow!(e))?;

    Ok(())
}
