//! The logging runtime: a lazily installed tracing subscriber plus the
//! convenience operations for controlling it at runtime.

mod sink;

use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, reload, EnvFilter, Layer, Registry};

use crate::utils::error::{LogError, Result};
use crate::utils::validation;
use crate::verbosity::{Verbosity, VerbosityArg};
use sink::{FileSink, SinkSet};

const DEFAULT_LEVEL: Verbosity = Verbosity::Info;

/// Console output format, fixed at initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Format {
    #[default]
    Compact,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Compact => f.write_str("compact"),
            Format::Json => f.write_str("json"),
        }
    }
}

/// How the log file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OpenMode {
    /// Append to the file, creating it if missing.
    #[default]
    #[serde(alias = "a")]
    #[cfg_attr(feature = "cli", value(alias = "a"))]
    Append,
    /// Start the file fresh. Requires `overwrite` when the file exists.
    #[serde(alias = "w")]
    #[cfg_attr(feature = "cli", value(alias = "w"))]
    Truncate,
}

/// Text encoding applied to records written to a file handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    #[cfg_attr(feature = "cli", value(name = "utf-8", alias = "utf8"))]
    Utf8,
    /// Non-ASCII characters are written as `\u{..}` escapes.
    Ascii,
}

struct Runtime {
    filter: reload::Handle<EnvFilter, Registry>,
    sinks: SinkSet,
    level: Mutex<Verbosity>,
    format: Format,
    next_sink_id: AtomicU64,
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static INSTALL: Mutex<()> = Mutex::new(());

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn build_layers(
    format: Format,
    sinks: SinkSet,
) -> (Vec<BoxedLayer>, reload::Handle<EnvFilter, Registry>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL.as_directive()));
    let (filter, handle) = reload::Layer::new(env_filter);

    let console_base = tracing_fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    let console: BoxedLayer = match format {
        Format::Compact => console_base.compact().boxed(),
        Format::Json => console_base.json().boxed(),
    };

    let files: BoxedLayer = tracing_fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(sinks)
        .boxed();

    (vec![filter.boxed(), console, files], handle)
}

fn install(format: Format) -> Result<&'static Runtime> {
    let _guard = INSTALL.lock().expect("install lock poisoned");
    if let Some(runtime) = RUNTIME.get() {
        if runtime.format == format {
            return Ok(runtime);
        }
        return Err(LogError::AlreadyInitialized {
            active: runtime.format,
        });
    }

    let sinks = SinkSet::default();
    let (layers, filter) = build_layers(format, sinks.clone());
    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(RUNTIME.get_or_init(|| Runtime {
        filter,
        sinks,
        level: Mutex::new(DEFAULT_LEVEL),
        format,
        next_sink_id: AtomicU64::new(0),
    }))
}

fn runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    install(Format::Compact)
}

/// Install the logging runtime with the default compact console output.
///
/// All other operations install it on first use, so calling this is only
/// needed to surface installation errors early.
pub fn init() -> Result<()> {
    runtime().map(|_| ())
}

/// Install the logging runtime with an explicit console [`Format`].
///
/// The format is fixed for the life of the process; initializing again
/// with a different one is an error.
pub fn init_with_format(format: Format) -> Result<()> {
    if let Some(runtime) = RUNTIME.get() {
        if runtime.format == format {
            return Ok(());
        }
        return Err(LogError::AlreadyInitialized {
            active: runtime.format,
        });
    }
    install(format).map(|_| ())
}

/// Set the minimum severity of emitted records.
///
/// Accepts a [`Verbosity`], a level name, a boolean (`true` means info,
/// `false` means warning), or a numeric level on the 1-50 scale. An
/// absent value leaves the current level unchanged:
///
/// ```
/// logtune::set_log_level("debug")?;
/// logtune::set_log_level(None::<logtune::Verbosity>)?; // no-op
/// # Ok::<(), logtune::LogError>(())
/// ```
///
/// Until the first call, the `RUST_LOG` environment variable is honored;
/// afterwards the level set here wins.
pub fn set_log_level(verbose: impl Into<VerbosityArg>) -> Result<()> {
    let Some(level) = verbose.into().resolve()? else {
        return Ok(());
    };
    let runtime = runtime()?;
    runtime.filter.reload(EnvFilter::new(level.as_directive()))?;
    *runtime.level.lock().expect("level lock poisoned") = level;
    Ok(())
}

/// The current minimum severity.
pub fn log_level() -> Result<Verbosity> {
    let runtime = runtime()?;
    let level = *runtime.level.lock().expect("level lock poisoned");
    Ok(level)
}

/// Set the level for the lifetime of the returned guard, restoring the
/// previous level when it drops.
pub fn scoped_log_level(verbose: impl Into<VerbosityArg>) -> Result<LevelGuard> {
    let previous = log_level()?;
    set_log_level(verbose)?;
    Ok(LevelGuard { previous })
}

/// Restores the previous log level on drop. See [`scoped_log_level`].
#[must_use = "dropping the guard immediately restores the previous level"]
pub struct LevelGuard {
    previous: Verbosity,
}

impl Drop for LevelGuard {
    fn drop(&mut self) {
        let _ = set_log_level(self.previous);
    }
}

/// Options for attaching a file handler, in the style of
/// [`std::fs::OpenOptions`].
///
/// ```no_run
/// use logtune::{FileHandler, OpenMode, Verbosity};
///
/// let guard = FileHandler::new()
///     .mode(OpenMode::Truncate)
///     .overwrite(true)
///     .verbose(Verbosity::Debug)
///     .attach("debug.log")?;
/// tracing::info!("lands in debug.log");
/// guard.close()?;
/// # Ok::<(), logtune::LogError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileHandler {
    mode: OpenMode,
    encoding: Encoding,
    overwrite: bool,
    verbose: Option<Verbosity>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Allow [`OpenMode::Truncate`] to replace an existing file.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Threshold applied to just this handler. Without one, the handler
    /// receives everything the global level admits.
    pub fn verbose(mut self, verbose: Verbosity) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Open the file and attach it as a log destination.
    pub fn attach(self, path: impl AsRef<Path>) -> Result<FileHandlerGuard> {
        let path = path.as_ref();
        validation::validate_path("fname", &path.to_string_lossy())?;

        if matches!(self.mode, OpenMode::Truncate) && !self.overwrite && path.exists() {
            return Err(LogError::FileExists {
                path: path.to_path_buf(),
            });
        }

        let runtime = runtime()?;
        let file = match self.mode {
            OpenMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
            OpenMode::Truncate => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?,
        };

        let id = runtime.next_sink_id.fetch_add(1, Ordering::Relaxed);
        runtime
            .sinks
            .attach(FileSink::new(id, file, self.encoding, self.verbose));

        Ok(FileHandlerGuard {
            id,
            path: path.to_path_buf(),
            sinks: runtime.sinks.clone(),
            detached: false,
        })
    }
}

/// Attach `path` as a log destination with the default options
/// (append mode, UTF-8, no per-handler threshold).
///
/// The file stays attached until the returned guard is closed or
/// dropped, so keep it alive for as long as records should be captured:
///
/// ```no_run
/// let guard = logtune::add_file_handler("app.log")?;
/// tracing::warn!("recorded in app.log");
/// guard.close()?;
/// # Ok::<(), logtune::LogError>(())
/// ```
pub fn add_file_handler(path: impl AsRef<Path>) -> Result<FileHandlerGuard> {
    FileHandler::new().attach(path)
}

/// Keeps a file handler attached. Dropping it detaches the file; call
/// [`close`](FileHandlerGuard::close) instead to observe flush errors.
#[must_use = "dropping the guard detaches the file handler"]
pub struct FileHandlerGuard {
    id: u64,
    path: PathBuf,
    sinks: SinkSet,
    detached: bool,
}

impl FileHandlerGuard {
    /// The file this handler writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detach the handler and flush the file.
    pub fn close(mut self) -> Result<()> {
        self.detach()
    }

    fn detach(&mut self) -> Result<()> {
        if self.detached {
            return Ok(());
        }
        self.detached = true;
        if let Some(sink) = self.sinks.detach(self.id) {
            sink.flush()?;
        }
        Ok(())
    }
}

impl Drop for FileHandlerGuard {
    fn drop(&mut self) {
        let _ = self.detach();
    }
}

impl fmt::Debug for FileHandlerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandlerGuard")
            .field("path", &self.path)
            .field("detached", &self.detached)
            .finish()
    }
}
