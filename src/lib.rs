pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::ReleaseInfoPipeline};
pub use domain::model::{PackageEntry, ReleaseSummary, RunRecord};
pub use domain::os::OsFamily;
pub use utils::error::{EtlError, Result};
