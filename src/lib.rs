pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::ServerConfig, ProcessJob};
pub use core::{
    etl::{EtlEngine, EtlOutcome},
    pipeline::CleaningPipeline,
};
pub use domain::options::ProcessingOptions;
pub use utils::error::{EtlError, Result};
