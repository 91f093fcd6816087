pub mod file;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use crate::logs::{Encoding, Format, OpenMode};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use crate::verbosity::Verbosity;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "logtune")]
#[command(about = "Demonstrate log verbosity control and file handlers")]
pub struct CliConfig {
    /// Minimum severity of emitted records
    #[arg(long, value_enum)]
    pub level: Option<Verbosity>,

    /// Shorthand for --level info (--level wins when both are given)
    #[arg(long)]
    pub verbose: bool,

    /// Also write records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OpenMode::Append)]
    pub mode: OpenMode,

    #[arg(long, value_enum, default_value_t = Encoding::Utf8)]
    pub encoding: Encoding,

    /// Allow truncate mode to replace an existing file
    #[arg(long)]
    pub overwrite: bool,

    /// Threshold applied to just the file handler
    #[arg(long, value_enum)]
    pub file_level: Option<Verbosity>,

    /// Load logging settings from a TOML file before applying flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Console output format
    #[arg(long, value_enum, default_value_t = Format::Compact)]
    pub format: Format,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(log_file) = &self.log_file {
            validation::validate_path("log_file", &log_file.to_string_lossy())?;
        }
        if let Some(config) = &self.config {
            validation::validate_path("config", &config.to_string_lossy())?;
        }
        Ok(())
    }
}
