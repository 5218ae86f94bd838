use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Installs the logger backing `tracing` events. Defaults to warnings only,
/// `RUST_LOG` overrides the level.
pub fn configure_app() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;
    Ok(())
}
