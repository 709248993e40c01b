//! Theme tables consulted while compiling.
//!
//! A [`Theme`] bundles every lookup table the compiler reads:
//!
//! | Table          | Used by                                    |
//! |----------------|--------------------------------------------|
//! | abbreviations  | every `abbr[value]` token                  |
//! | breakpoints    | `screen(md, ...)` and `container(md, ...)` |
//! | typography     | `ty[body-1]`                               |
//! | defines        | `button[primary]` style presets            |
//!
//! The theme is built once by the host and shared read-only between compilations.
//!
//! ```rust
//! use ctrl_core::Theme;
//!
//! let mut theme = Theme::standard()
//!     .with_breakpoint("md", "min-w[768px]")
//!     .with_typography("body", "fs[16px] lh[1.5]");
//! theme.define("button", "primary", "bg[blue] c[white]\nhover(bg[navy])").unwrap();
//!
//! assert_eq!(theme.property("bg"), Some("background"));
//! assert!(theme.is_define("button"));
//! ```

use std::collections::HashMap;

use crate::error::Result;
use crate::parser::resolver::{ParseContext, Resolver};
use crate::types::abbr::STANDARD_ABBREVIATIONS;
use crate::types::style::StyleDefinition;

#[derive(Debug, Clone, Default)]
pub struct Theme {
    abbreviations: HashMap<String, String>,
    breakpoints: HashMap<String, String>,
    typography: HashMap<String, String>,
    defines: HashMap<String, HashMap<String, StyleDefinition>>,
}

impl Theme {
    /// An empty theme with no abbreviations at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A theme seeded with the built-in abbreviation table.
    pub fn standard() -> Self {
        let abbreviations = STANDARD_ABBREVIATIONS
            .entries()
            .map(|(abbr, prop)| (abbr.to_string(), prop.to_string()))
            .collect();
        Self {
            abbreviations,
            ..Self::default()
        }
    }

    /// Adds or overrides an abbreviation.
    pub fn with_abbreviation(mut self, abbr: impl Into<String>, property: impl Into<String>) -> Self {
        self.abbreviations.insert(abbr.into(), property.into());
        self
    }

    /// Adds a breakpoint; `condition` has the `min-w[768px]` form.
    pub fn with_breakpoint(mut self, name: impl Into<String>, condition: impl Into<String>) -> Self {
        self.breakpoints.insert(name.into(), condition.into());
        self
    }

    /// Adds a typography preset; `tokens` is a space-separated declaration list.
    pub fn with_typography(mut self, name: impl Into<String>, tokens: impl Into<String>) -> Self {
        self.typography.insert(name.into(), tokens.into());
        self
    }

    /// Parses `raw` as the `main[sub]` define preset.
    ///
    /// The body follows constant rules: no `!important`, no local or runtime
    /// variables, no `@query`. It is resolved against the abbreviations,
    /// typography, and defines already on the theme.
    pub fn define(&mut self, main: &str, sub: &str, raw: &str) -> Result<()> {
        let resolver = Resolver::new(self, ParseContext::CONST | ParseContext::DEFINE);
        let mut style = StyleDefinition::new();
        for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            resolver.parse_line(line, &mut style)?;
        }

        log::trace!("theme define {}[{}] parsed", main, sub);
        self.defines
            .entry(main.to_string())
            .or_default()
            .insert(sub.to_string(), style);
        Ok(())
    }

    /// The CSS property an abbreviation maps to.
    pub fn property(&self, abbr: &str) -> Option<&str> {
        self.abbreviations.get(abbr).map(String::as_str)
    }

    pub fn has_abbreviation(&self, abbr: &str) -> bool {
        self.abbreviations.contains_key(abbr)
    }

    pub fn breakpoint(&self, name: &str) -> Option<&str> {
        self.breakpoints.get(name).map(String::as_str)
    }

    pub fn typography(&self, name: &str) -> Option<&str> {
        self.typography.get(name).map(String::as_str)
    }

    pub fn is_define(&self, main: &str) -> bool {
        self.defines.contains_key(main)
    }

    pub fn define_entry(&self, main: &str, sub: &str) -> Option<&StyleDefinition> {
        self.defines.get(main).and_then(|subs| subs.get(sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CtrlError;

    #[test]
    fn test_standard_table_is_seeded() {
        let theme = Theme::standard();
        assert_eq!(theme.property("w"), Some("width"));
        assert_eq!(theme.property("jc"), Some("justify-content"));
        assert!(Theme::new().property("w").is_none());
    }

    #[test]
    fn test_with_abbreviation_overrides() {
        let theme = Theme::standard().with_abbreviation("bg", "background-color");
        assert_eq!(theme.property("bg"), Some("background-color"));
    }

    #[test]
    fn test_define_parses_states() {
        let mut theme = Theme::standard();
        theme
            .define("button", "primary", "bg[blue]\nhover(bg[navy])")
            .unwrap();

        let entry = theme.define_entry("button", "primary").unwrap();
        assert_eq!(entry.base["background"].to_string(), "blue");
        assert_eq!(entry.states["hover"]["background"].to_string(), "navy");
        assert!(theme.define_entry("button", "ghost").is_none());
    }

    #[test]
    fn test_define_rejects_runtime_variables() {
        let mut theme = Theme::standard();
        let err = theme.define("button", "primary", "$bg[blue]").unwrap_err();
        assert!(matches!(err, CtrlError::VariableScope(_)));
        assert!(!theme.is_define("button"));
    }

    #[test]
    fn test_define_rejects_important() {
        let mut theme = Theme::standard();
        let err = theme.define("button", "primary", "bg[blue]!").unwrap_err();
        assert!(matches!(err, CtrlError::DirectiveSyntax(_)));
    }
}
