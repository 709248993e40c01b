//! File-level driver: reads sources, compiles them with one shared scope
//! registry, and writes the CSS next to them or into an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use ctrl_core::theme_css::build_theme_css;
use ctrl_core::{Compiler, ScopeRegistry, Theme};

use crate::error::Result;
use crate::theme_file::ThemeFile;

/// Where compiled CSS goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Next to each input.
    Sibling,
    /// Into one directory, keeping file names.
    Dir(PathBuf),
    /// Concatenated and returned to the caller.
    Stdout,
}

/// `button.ctrl.ts` becomes `button.ctrl.css`; any other final extension is
/// replaced the same way.
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let renamed = input.with_extension("css");
    match (out_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}

/// Compiles every input in order. Returns the concatenated CSS for
/// [`Output::Stdout`], and an empty string otherwise.
///
/// The first failing unit aborts the build; files already written stay.
pub fn build(inputs: &[PathBuf], theme: &Theme, output: &Output) -> Result<String> {
    let compiler = Compiler::new(theme);
    let mut registry = ScopeRegistry::new();
    let mut collected = String::new();

    for input in inputs {
        let source = fs::read_to_string(input)?;
        let css = compiler.compile(&mut registry, &source).inspect_err(|err| {
            log::error!("{}: {}", input.display(), err.message());
        })?;

        let dir = match output {
            Output::Stdout => {
                collected.push_str(&css);
                continue;
            }
            Output::Sibling => None,
            Output::Dir(dir) => Some(dir.as_path()),
        };

        let target = output_path(input, dir);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, css)?;
        log::info!("{} -> {}", input.display(), target.display());
    }

    Ok(collected)
}

/// Loads `path` as a theme file and renders its global CSS.
pub fn theme_css(path: &Path) -> Result<String> {
    let file = ThemeFile::load(path)?;
    let theme = file.theme()?;
    Ok(build_theme_css(&file.sheet(), &theme)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("src/button.ctrl.ts"), None),
            PathBuf::from("src/button.ctrl.css")
        );
        assert_eq!(
            output_path(Path::new("src/button.ctrl"), None),
            PathBuf::from("src/button.css")
        );
        assert_eq!(
            output_path(Path::new("src/button.ctrl.ts"), Some(Path::new("dist"))),
            PathBuf::from("dist/button.ctrl.css")
        );
    }
}
