//! Host layer for [`ctrl_core`]: theme files, file-level builds, and logging
//! for the `css-ctrl` binary.

pub mod build;
pub mod cli;
pub mod error;
pub mod log_init;
pub mod theme_file;

pub use ctrl_core;
pub use ctrl_core::{CompiledUnit, Compiler, CtrlError, ScopeRegistry, Theme, compile};
pub use error::{CliError, Result};
pub use theme_file::ThemeFile;
