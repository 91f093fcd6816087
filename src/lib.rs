//! Logging convenience utilities built on `tracing`: attach file
//! handlers at runtime and set the verbosity level gradually, from a
//! level name, a boolean, or a numeric scale.

pub mod config;
pub mod logs;
pub mod utils;
pub mod verbosity;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::file::{FileHandlerConfig, LoggingConfig};
pub use logs::{
    add_file_handler, init, init_with_format, log_level, scoped_log_level, set_log_level,
    Encoding, FileHandler, FileHandlerGuard, Format, LevelGuard, OpenMode,
};
pub use utils::error::{LogError, Result};
pub use verbosity::{Verbosity, VerbosityArg};
