use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

enum Target {
    Stderr,
    File(PathBuf),
}

struct CliLogger {
    level: LevelFilter,
    target: Target,
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match &self.target {
            Target::Stderr => {
                let _ = writeln!(std::io::stderr(), "[{}] {}", record.level(), record.args());
            }
            Target::File(path) => {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = writeln!(file, "[{}] {}", record.level(), record.args());
                }
            }
        }
    }

    fn flush(&self) {}
}

/// Maps repeated `-v` flags to a level: warnings by default, then info,
/// debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the process-wide logger, writing to `path` when given and to
/// stderr otherwise.
pub fn init_logger(verbosity: u8, path: Option<&Path>) -> Result<(), log::SetLoggerError> {
    let level = level_for(verbosity);
    let target = match path {
        Some(path) => Target::File(path.to_path_buf()),
        None => Target::Stderr,
    };
    log::set_boxed_logger(Box::new(CliLogger { level, target }))?;
    log::set_max_level(level);
    Ok(())
}
