use env_logger::WriteStyle;
use log::LevelFilter;
use std::io::Write;

/// Installs a compact `env_logger` backend for the filtering diagnostics.
///
/// Fails if the host already installed a logger, in which case ours is simply not used.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "[CFLT | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Always)
        .filter(None, LevelFilter::Info)
        .try_init()
}
