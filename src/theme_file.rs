//! JSON theme files.
//!
//! Every section is optional:
//!
//! ```json
//! {
//!   "abbreviations": { "bgc": "background-color" },
//!   "breakpoints": { "md": "min-w[768px]" },
//!   "typography": { "h1": "fs[32px] fw[700]" },
//!   "defines": { "button": { "primary": "bg[blue] c[white] hover(bg[navy])" } },
//!   "palette": [["dark", "light"], ["fg", "#fff", "#000"]],
//!   "variables": { "radius": "4px" },
//!   "keyframes": { "fade": "from(op[0]) to(op[1])" }
//! }
//! ```

use std::fs;
use std::path::Path;

use ctrl_core::Theme;
use ctrl_core::theme_css::ThemeSheet;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeFile {
    /// Added on top of the standard table; existing entries are overridden.
    pub abbreviations: IndexMap<String, String>,
    pub breakpoints: IndexMap<String, String>,
    pub typography: IndexMap<String, String>,
    /// Parsed in file order, so a define may use the ones listed before it.
    pub defines: IndexMap<String, IndexMap<String, String>>,
    pub palette: Vec<Vec<String>>,
    pub variables: IndexMap<String, String>,
    pub keyframes: IndexMap<String, String>,
}

impl ThemeFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Builds the compile-time theme: standard abbreviations, then this file's
    /// tables, then its defines.
    pub fn theme(&self) -> Result<Theme> {
        let mut theme = Theme::standard();
        for (abbr, property) in &self.abbreviations {
            theme = theme.with_abbreviation(abbr.as_str(), property.as_str());
        }
        for (name, condition) in &self.breakpoints {
            theme = theme.with_breakpoint(name.as_str(), condition.as_str());
        }
        for (name, tokens) in &self.typography {
            theme = theme.with_typography(name.as_str(), tokens.as_str());
        }
        for (main, subs) in &self.defines {
            for (sub, raw) in subs {
                theme.define(main, sub, raw)?;
            }
        }
        log::debug!(
            "theme loaded: {} abbreviation overrides, {} breakpoints, {} typography, {} defines",
            self.abbreviations.len(),
            self.breakpoints.len(),
            self.typography.len(),
            self.defines.len()
        );
        Ok(theme)
    }

    /// The global parts of the theme: palette, variables, keyframes.
    pub fn sheet(&self) -> ThemeSheet {
        ThemeSheet {
            palette: self.palette.clone(),
            variables: self.variables.clone(),
            keyframes: self.keyframes.clone(),
        }
    }
}
