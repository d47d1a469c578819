//! Txn Uploadr Library
//!
//! Serverless endpoint that accepts a transactions CSV, validates it against a
//! fixed schema and stores the accepted bytes in S3.
//!
//! # Features
//!
//! - **Schema Gate**: `Id,Date,Transaction` header and per-row type checks, fail-fast
//! - **Raw or Multipart**: Accepts the CSV as the body or as the first form part
//! - **Unique Keys**: Every upload lands at `{base_path}/{uuid}.csv`
//! - **Pluggable Storage**: S3 in production, in-memory for tests
//!
//! # Example
//!
//! ```no_run
//! use txn_uploadr::{bootstrap::UploadApi, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let api = UploadApi::initialize(&config).await?;
//!     let _handler = &api.handler;
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod handler;
pub mod storage;
pub mod upload;
pub mod validate;

// Re-export commonly used types
pub use config::Config;
pub use upload::{CsvUploadService, UploadError, UploadRequest, UploadResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
