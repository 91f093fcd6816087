use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logs::{self, Encoding, FileHandler, FileHandlerGuard, Format, OpenMode};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use crate::verbosity::Verbosity;

/// Logging configuration loaded from a TOML file.
///
/// ```toml
/// level = "debug"
/// format = "compact"
///
/// [file]
/// path = "app.log"
/// mode = "append"
/// verbose = "warning"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<Verbosity>,
    #[serde(default)]
    pub format: Format,
    pub file: Option<FileHandlerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHandlerConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub mode: OpenMode,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default)]
    pub overwrite: bool,
    pub verbose: Option<Verbosity>,
}

impl LoggingConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Initialize logging from this configuration: install the runtime
    /// with the configured format, apply the level, and attach the file
    /// handler if one is configured.
    pub fn apply(&self) -> Result<Option<FileHandlerGuard>> {
        self.validate()?;
        logs::init_with_format(self.format)?;
        if let Some(level) = self.level {
            logs::set_log_level(level)?;
        }
        match &self.file {
            Some(file) => file.attach().map(Some),
            None => Ok(None),
        }
    }
}

impl FileHandlerConfig {
    pub fn attach(&self) -> Result<FileHandlerGuard> {
        let mut handler = FileHandler::new()
            .mode(self.mode)
            .encoding(self.encoding)
            .overwrite(self.overwrite);
        if let Some(verbose) = self.verbose {
            handler = handler.verbose(verbose);
        }
        handler.attach(&self.path)
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<()> {
        if let Some(file) = &self.file {
            validation::validate_path("file.path", &file.path.to_string_lossy())?;
        }
        Ok(())
    }
}
