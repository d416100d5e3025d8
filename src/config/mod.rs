pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_exact_count, validate_field_name, validate_path};

#[cfg(feature = "cli")]
use crate::domain::model::{Denylist, FieldNames};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_WORKDIR: &str = ".";
pub const DEFAULT_INPUT_FILE: &str = "ci-run-info.xml";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "relinfo")]
#[command(about = "Turn a CI run report into a release info JSON summary")]
pub struct CliConfig {
    /// Directory holding the report and receiving the summary [default: .]
    #[arg(long)]
    pub workdir: Option<String>,

    /// Report file name inside the working directory [default: ci-run-info.xml]
    #[arg(long)]
    pub input: Option<String>,

    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Also write <os>.<version>.changes.json
    #[arg(long)]
    pub package_changes: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip)]
    pub fields: FieldNames,

    #[arg(skip)]
    pub denylist: Denylist,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_file(&self) -> &str {
        self.input.as_deref().unwrap_or(DEFAULT_INPUT_FILE)
    }

    fn output_path(&self) -> &str {
        self.workdir.as_deref().unwrap_or(DEFAULT_WORKDIR)
    }

    fn field_names(&self) -> &FieldNames {
        &self.fields
    }

    fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    fn package_changes(&self) -> bool {
        self.package_changes
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_path("input.workdir", config.output_path())?;
    validate_path("input.file", config.input_file())?;

    let fields = config.field_names();
    validate_field_name("fields.config", &fields.config)?;
    validate_field_name("fields.version", &fields.version)?;
    validate_field_name("fields.timestamp", &fields.timestamp)?;
    validate_field_name("fields.packages", &fields.packages)?;
    validate_exact_count("fields.package_sources", &fields.package_sources, 2)?;
    for source in &fields.package_sources {
        validate_field_name("fields.package_sources", source)?;
    }

    if config.package_changes() {
        validate_field_name("fields.changes_before", &fields.changes_before)?;
        validate_field_name("fields.changes_after", &fields.changes_after)?;
    }

    Ok(())
}
