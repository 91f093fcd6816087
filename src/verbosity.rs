use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::utils::error::{LogError, Result};

/// A verbosity threshold for the logging system.
///
/// `Error` and `Critical` admit the same records: the underlying tracing
/// facility has no severity above `error`, so `critical` exists for
/// callers thinking in the classic six-token scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Verbosity {
    /// Suppress all output.
    #[serde(alias = "none")]
    #[cfg_attr(feature = "cli", value(alias = "none"))]
    Off,
    Debug,
    Info,
    #[serde(alias = "warn")]
    #[cfg_attr(feature = "cli", value(alias = "warn"))]
    Warning,
    Error,
    Critical,
}

impl Verbosity {
    /// Map a numeric level onto the named scale.
    ///
    /// Values follow the classic 0-50 severity numbering, one decade per
    /// named level: 1-10 debug, 11-20 info, 21-30 warning, 31-40 error,
    /// 41-50 critical. 0 and values above 50 are rejected.
    pub fn from_numeric(value: i64) -> Result<Self> {
        match value {
            1..=10 => Ok(Verbosity::Debug),
            11..=20 => Ok(Verbosity::Info),
            21..=30 => Ok(Verbosity::Warning),
            31..=40 => Ok(Verbosity::Error),
            41..=50 => Ok(Verbosity::Critical),
            _ => Err(LogError::invalid_value(
                "verbose",
                value,
                "numeric levels range from 1 to 50",
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verbosity::Off => "none",
            Verbosity::Debug => "debug",
            Verbosity::Info => "info",
            Verbosity::Warning => "warning",
            Verbosity::Error => "error",
            Verbosity::Critical => "critical",
        }
    }

    /// The filter directive understood by the subscriber.
    pub(crate) fn as_directive(self) -> &'static str {
        match self {
            Verbosity::Off => "off",
            Verbosity::Debug => "debug",
            Verbosity::Info => "info",
            Verbosity::Warning => "warn",
            Verbosity::Error | Verbosity::Critical => "error",
        }
    }

    pub(crate) fn to_level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Off => LevelFilter::OFF,
            Verbosity::Debug => LevelFilter::DEBUG,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Warning => LevelFilter::WARN,
            Verbosity::Error | Verbosity::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Verbosity::Off),
            "debug" => Ok(Verbosity::Debug),
            "info" => Ok(Verbosity::Info),
            "warning" | "warn" => Ok(Verbosity::Warning),
            "error" => Ok(Verbosity::Error),
            "critical" => Ok(Verbosity::Critical),
            _ => Err(LogError::invalid_value(
                "verbose",
                s,
                "expected one of none, debug, info, warning, error, critical",
            )),
        }
    }
}

/// Loose spelling of a verbosity argument, as accepted by
/// [`set_log_level`](crate::set_log_level) and friends.
///
/// Mirrors the accepted inputs: a named token, a boolean shorthand
/// (`true` means info, `false` means warning), a numeric level, or an
/// absent value meaning "leave the level unchanged".
#[derive(Debug, Clone)]
pub enum VerbosityArg {
    Unset,
    Level(Verbosity),
    Flag(bool),
    Numeric(i64),
    Token(String),
}

impl VerbosityArg {
    /// Resolve to a concrete level, or `None` for "leave unchanged".
    pub fn resolve(self) -> Result<Option<Verbosity>> {
        match self {
            VerbosityArg::Unset => Ok(None),
            VerbosityArg::Level(level) => Ok(Some(level)),
            VerbosityArg::Flag(true) => Ok(Some(Verbosity::Info)),
            VerbosityArg::Flag(false) => Ok(Some(Verbosity::Warning)),
            VerbosityArg::Numeric(value) => Verbosity::from_numeric(value).map(Some),
            VerbosityArg::Token(token) => token.parse().map(Some),
        }
    }
}

impl From<Verbosity> for VerbosityArg {
    fn from(level: Verbosity) -> Self {
        VerbosityArg::Level(level)
    }
}

impl From<bool> for VerbosityArg {
    fn from(flag: bool) -> Self {
        VerbosityArg::Flag(flag)
    }
}

impl From<i32> for VerbosityArg {
    fn from(value: i32) -> Self {
        VerbosityArg::Numeric(i64::from(value))
    }
}

impl From<u8> for VerbosityArg {
    fn from(value: u8) -> Self {
        VerbosityArg::Numeric(i64::from(value))
    }
}

impl From<&str> for VerbosityArg {
    fn from(token: &str) -> Self {
        VerbosityArg::Token(token.to_string())
    }
}

impl From<String> for VerbosityArg {
    fn from(token: String) -> Self {
        VerbosityArg::Token(token)
    }
}

impl<T: Into<VerbosityArg>> From<Option<T>> for VerbosityArg {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => VerbosityArg::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_canonical_tokens() {
        assert_eq!("none".parse::<Verbosity>().unwrap(), Verbosity::Off);
        assert_eq!("debug".parse::<Verbosity>().unwrap(), Verbosity::Debug);
        assert_eq!("info".parse::<Verbosity>().unwrap(), Verbosity::Info);
        assert_eq!("warning".parse::<Verbosity>().unwrap(), Verbosity::Warning);
        assert_eq!("error".parse::<Verbosity>().unwrap(), Verbosity::Error);
        assert_eq!("critical".parse::<Verbosity>().unwrap(), Verbosity::Critical);
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_aliases() {
        assert_eq!("DEBUG".parse::<Verbosity>().unwrap(), Verbosity::Debug);
        assert_eq!("Warning".parse::<Verbosity>().unwrap(), Verbosity::Warning);
        assert_eq!("warn".parse::<Verbosity>().unwrap(), Verbosity::Warning);
        assert_eq!("off".parse::<Verbosity>().unwrap(), Verbosity::Off);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert!("verbose".parse::<Verbosity>().is_err());
        assert!("".parse::<Verbosity>().is_err());
        assert!("30".parse::<Verbosity>().is_err());
    }

    #[test]
    fn numeric_levels_map_by_decade() {
        assert_eq!(Verbosity::from_numeric(5).unwrap(), Verbosity::Debug);
        assert_eq!(Verbosity::from_numeric(10).unwrap(), Verbosity::Debug);
        assert_eq!(Verbosity::from_numeric(11).unwrap(), Verbosity::Info);
        assert_eq!(Verbosity::from_numeric(20).unwrap(), Verbosity::Info);
        assert_eq!(Verbosity::from_numeric(30).unwrap(), Verbosity::Warning);
        assert_eq!(Verbosity::from_numeric(40).unwrap(), Verbosity::Error);
        assert_eq!(Verbosity::from_numeric(50).unwrap(), Verbosity::Critical);
    }

    #[test]
    fn numeric_levels_reject_out_of_range() {
        assert!(Verbosity::from_numeric(0).is_err());
        assert!(Verbosity::from_numeric(51).is_err());
        assert!(Verbosity::from_numeric(-1).is_err());
    }

    #[test]
    fn bool_shorthand_resolves() {
        assert_eq!(
            VerbosityArg::from(true).resolve().unwrap(),
            Some(Verbosity::Info)
        );
        assert_eq!(
            VerbosityArg::from(false).resolve().unwrap(),
            Some(Verbosity::Warning)
        );
    }

    #[test]
    fn unset_resolves_to_none() {
        assert_eq!(
            VerbosityArg::from(None::<Verbosity>).resolve().unwrap(),
            None
        );
    }

    #[test]
    fn token_resolution_propagates_errors() {
        assert!(VerbosityArg::from("bogus").resolve().is_err());
        assert!(VerbosityArg::from(0).resolve().is_err());
    }

    #[test]
    fn critical_and_error_share_a_filter() {
        assert_eq!(
            Verbosity::Critical.to_level_filter(),
            Verbosity::Error.to_level_filter()
        );
    }

    #[test]
    fn display_uses_canonical_tokens() {
        assert_eq!(Verbosity::Off.to_string(), "none");
        assert_eq!(Verbosity::Warning.to_string(), "warning");
    }
}
