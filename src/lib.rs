pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, SiteConfig};
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    etl::{EtlEngine, RunReport},
    pipeline::HarvestPipeline,
};
pub use utils::error::{HarvestError, Result};
