use std::time::SystemTime;

use crate::config::LogConfig;

/// sets up the global logger: stdout always, plus the configured log file if there is one.
///
/// Rocket's own logger will fail to install after this, which is fine - its records go through here instead
pub fn init_logger(log_config: &LogConfig) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log_config.level_filter())
        // rocket is very chatty at info
        .level_for("rocket", log::LevelFilter::Warn)
        .level_for("_", log::LevelFilter::Warn)
        .chain(std::io::stdout());
    if let Some(file) = &log_config.file {
        dispatch = dispatch.chain(fern::log_file(file)?);
    }
    dispatch.apply()?;
    Ok(())
}
