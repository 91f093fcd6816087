use anyhow::Context;
use clap::Parser;
use logtune::utils::validation::Validate;
use logtune::{set_log_level, CliConfig, FileHandler, Format, LoggingConfig};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // A --format other than the default overrides the config file's.
    let file_config = match &config.config {
        Some(path) => Some(
            LoggingConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => None,
    };

    let format = if config.format != Format::Compact {
        config.format
    } else {
        file_config.as_ref().map(|c| c.format).unwrap_or(config.format)
    };
    logtune::init_with_format(format)?;

    let mut guards = Vec::new();
    if let Some(file_config) = &file_config {
        if let Some(level) = file_config.level {
            set_log_level(level)?;
        }
        if let Some(file) = &file_config.file {
            guards.push(file.attach()?);
        }
    }

    match config.level {
        Some(level) => set_log_level(level)?,
        None => set_log_level(config.verbose.then_some(true))?,
    }

    if let Some(log_file) = &config.log_file {
        let mut handler = FileHandler::new()
            .mode(config.mode)
            .encoding(config.encoding)
            .overwrite(config.overwrite);
        if let Some(level) = config.file_level {
            handler = handler.verbose(level);
        }
        guards.push(handler.attach(log_file)?);
    }

    tracing::info!("Log level set to {}", logtune::log_level()?);

    // One record per severity so the configured thresholds are visible.
    tracing::debug!("debug message");
    tracing::info!("info message");
    tracing::warn!("warning message");
    tracing::error!("error message");
    tracing::error!("critical message");

    for guard in guards {
        let path = guard.path().to_path_buf();
        guard.close()?;
        println!("📁 Log written to: {}", path.display());
    }

    Ok(())
}
