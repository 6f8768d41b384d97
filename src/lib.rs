//! devscout - devfile and Dockerfile discovery for monorepo components
//!
//! Given a checked-out repository, devscout answers for every component
//! directory: is there a devfile, is there a Dockerfile, and if neither,
//! which devfile registry sample fits the code and which ports it exposes.
//!
//! ```no_run
//! use devscout::config::DevscoutConfig;
//! use devscout::scan::{ContentResolver, ScanRequest};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DevscoutConfig::default();
//! let resolver = ContentResolver::from_config(&config)?;
//! let request = ScanRequest::new("/work/checkout", &config.registry_url)
//!     .with_source("https://github.com/org/repo", "main");
//!
//! let result = resolver.scan(&request).await?;
//! for (context, url) in &result.devfile_urls {
//!     println!("{}: {}", context, url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! - [`scan`]: the resolution engine and its result types
//! - [`devfile`], [`detector`], [`catalog`]: the services the engine consumes
//! - [`git`]: hosted-repository links

pub mod catalog;
pub mod cli;
pub mod config;
pub mod detector;
pub mod devfile;
pub mod error;
pub mod fs;
pub mod git;
pub mod scan;
pub mod util;

pub use config::{ConfigError, DevscoutConfig};
pub use error::ScanError;
pub use scan::{ContentResolver, ScanRequest, ScanResult};
pub use util::{init_from_env, init_logging, LoggingConfig};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");
