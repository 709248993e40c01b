//! Resolves declaration lines into a [`StyleDefinition`].
//!
//! One line holds any number of top-level tokens. Each token is dispatched on its
//! `name(` prefix: state names, pseudo-element names, `screen` and `container`
//! open conditional blocks (see [`blocks`](super::blocks)); everything else is a
//! base declaration:
//!
//! | Token               | Meaning                                         |
//! |---------------------|-------------------------------------------------|
//! | `bg[red]`           | `background:red`                                |
//! | `bg[red]!`          | `background:red !important`                     |
//! | `--&gap[8px]`       | declares the local variable `gap`               |
//! | `p[--&gap]`         | references the local variable `gap`             |
//! | `$bg[red]`          | runtime variable exposed as a root property     |
//! | `ty[body]`          | expands a typography preset                     |
//! | `button[primary]`   | merges a theme define preset                    |

use bitflags::bitflags;

use crate::error::{CtrlError, Result};
use crate::parser::scan::{detect_important, split_abbr_value, split_call, split_top_level};
use crate::types::abbr::{is_known_state, is_supported_pseudo};
use crate::types::style::StyleDefinition;
use crate::types::theme::Theme;
use crate::types::value::Value;

bitflags! {
    /// Where the tokens being resolved come from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParseContext: u8 {
        /// Inside `@const` or a theme define.
        const CONST = 1 << 0;
        /// Inside a nested `@query` block.
        const QUERY = 1 << 1;
        /// Inside a theme define.
        const DEFINE = 1 << 2;
    }
}

/// Resolves tokens against a theme within one parse context.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'t> {
    pub(crate) theme: &'t Theme,
    pub(crate) ctx: ParseContext,
}

impl<'t> Resolver<'t> {
    pub fn new(theme: &'t Theme, ctx: ParseContext) -> Self {
        Self { theme, ctx }
    }

    /// Resolves every token of one source line into `def`.
    pub fn parse_line(&self, line: &str, def: &mut StyleDefinition) -> Result<()> {
        let line = line.trim();
        if line.starts_with("@query") {
            if self.ctx.contains(ParseContext::QUERY) {
                return Err(CtrlError::Syntax("Nested @query is not allowed.".to_string()));
            }
            if self.ctx.contains(ParseContext::CONST) {
                return Err(CtrlError::DirectiveSyntax(format!(
                    "@query is not allowed in @const or theme define block. Found: \"{}\"",
                    line
                )));
            }
        }

        for token in split_top_level(line) {
            self.parse_token(token, def)?;
        }
        Ok(())
    }

    /// Resolves a single top-level token into `def`.
    pub fn parse_token(&self, token: &str, def: &mut StyleDefinition) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }

        let has_runtime_var = contains_runtime_var(token);
        if has_runtime_var && self.ctx.contains(ParseContext::DEFINE) {
            return Err(CtrlError::VariableScope(format!(
                "$variable is not allowed in theme define block. Found: \"{}\"",
                token
            )));
        }
        if self.ctx.contains(ParseContext::QUERY) {
            if token.starts_with("--&") {
                return Err(CtrlError::VariableScope(format!(
                    "Local var not allowed inside @query block. Found: \"{}\"",
                    token
                )));
            }
            if has_runtime_var {
                return Err(CtrlError::VariableScope(format!(
                    "Runtime variable ($var) not allowed inside @query block. Found: \"{}\"",
                    token
                )));
            }
        }
        def.has_runtime_var |= has_runtime_var;

        if let Some((name, inner)) = split_call(token) {
            if is_known_state(name) {
                return self.parse_state(name, inner, def);
            }
            if is_supported_pseudo(name) {
                return self.parse_pseudo(name, inner, def);
            }
            match name {
                "screen" => return self.parse_screen(inner, def),
                "container" => return self.parse_container(inner, def),
                _ => {}
            }
        }

        self.parse_base(token, def)
    }

    fn parse_base(&self, token: &str, def: &mut StyleDefinition) -> Result<()> {
        let (token, important) = detect_important(token);
        if important && self.ctx.contains(ParseContext::CONST) {
            return Err(CtrlError::DirectiveSyntax(format!(
                "!important is not allowed in @const (or theme define) block. Found: \"{}\"",
                token
            )));
        }

        let (abbr, raw_value) = split_abbr_value(token).ok_or_else(|| {
            CtrlError::Syntax(format!("expected \"abbr[value]\", found \"{}\"", token))
        })?;

        if self.theme.has_abbreviation(abbr) && self.theme.is_define(abbr) {
            return Err(CtrlError::NameCollision(format!(
                "\"{}\" is defined both as an abbreviation and in theme define - name collision not allowed.",
                abbr
            )));
        }

        if let Some(name) = abbr.strip_prefix("--&") {
            return self.declare_local(name, raw_value, important, def);
        }
        if let Some(real) = abbr.strip_prefix('$') {
            return self.declare_runtime(real, raw_value, important, def);
        }
        if abbr == "ty" {
            if important {
                return Err(CtrlError::Syntax(format!(
                    "!important cannot be applied to typography. Found: \"{}\"",
                    token
                )));
            }
            return self.expand_typography(raw_value, def);
        }

        let Some(prop) = self.theme.property(abbr) else {
            if self.theme.is_define(abbr) {
                if important {
                    return Err(CtrlError::Syntax(format!(
                        "!important cannot be applied to a theme define. Found: \"{}\"",
                        token
                    )));
                }
                return self.merge_define(abbr, raw_value, def);
            }
            return Err(CtrlError::UnknownAbbreviation(format!(
                "\"{}\" not defined in style abbreviation or theme define. Found: \"{}\"",
                abbr, token
            )));
        };

        let value = Value::parse(raw_value).with_important(important);
        self.record_local_refs(&value, "base", def)?;
        log::trace!("resolved {} -> {}:{}", abbr, prop, value);
        def.base.insert(prop.to_string(), value);
        Ok(())
    }

    fn declare_local(
        &self,
        name: &str,
        raw_value: &str,
        important: bool,
        def: &mut StyleDefinition,
    ) -> Result<()> {
        if self.ctx.contains(ParseContext::CONST) {
            return Err(CtrlError::VariableScope(format!(
                "Local var \"--&{}\" not allowed inside @const or theme define block.",
                name
            )));
        }
        if self.ctx.contains(ParseContext::QUERY) {
            return Err(CtrlError::VariableScope(format!(
                "Local var \"--&{}\" not allowed inside @query block.",
                name
            )));
        }
        if important {
            return Err(CtrlError::VariableScope(format!(
                "!important is not allowed with local var \"--&{}\".",
                name
            )));
        }
        if name.is_empty() {
            return Err(CtrlError::Syntax(
                "Missing local var name after \"--&\". Usage: \"--&<name>[value]\"".to_string(),
            ));
        }
        if def.local_vars.contains_key(name) {
            return Err(CtrlError::VariableScope(format!(
                "local var \"{}\" is already declared in this class.",
                name
            )));
        }

        let value = Value::parse(raw_value);
        self.record_local_refs(&value, "base", def)?;
        def.local_vars.insert(name.to_string(), value);
        Ok(())
    }

    fn declare_runtime(
        &self,
        real: &str,
        raw_value: &str,
        important: bool,
        def: &mut StyleDefinition,
    ) -> Result<()> {
        if real == "ty" {
            return Err(CtrlError::VariableScope(
                "\"$ty[...]\": cannot use runtime variable to reference typography.".to_string(),
            ));
        }
        if raw_value.contains("--&") {
            return Err(CtrlError::VariableScope(format!(
                "$variable is not allowed to reference local var (--&xxx). Found: \"${}[{}]\"",
                real, raw_value
            )));
        }
        let prop = self.property(real)?;

        def.var_base.insert(real.to_string(), Value::parse(raw_value));
        def.base.insert(
            prop.to_string(),
            Value::runtime_var(real, None).with_important(important),
        );
        Ok(())
    }

    fn expand_typography(&self, key: &str, def: &mut StyleDefinition) -> Result<()> {
        let key = key.trim();
        let expansion = self.theme.typography(key).ok_or_else(|| {
            CtrlError::LookupMiss(format!(
                "Typography key \"{}\" not found in theme typography.",
                key
            ))
        })?;

        for token in split_top_level(expansion) {
            if token.starts_with("ty[") {
                return Err(CtrlError::Syntax(format!(
                    "typography \"{}\" cannot reference another typography preset.",
                    key
                )));
            }
            self.parse_token(token, def)?;
        }
        Ok(())
    }

    fn merge_define(&self, main: &str, raw_value: &str, def: &mut StyleDefinition) -> Result<()> {
        let subs: Vec<&str> = raw_value.split_whitespace().collect();
        let sub = match subs.as_slice() {
            [sub] => *sub,
            [] => {
                return Err(CtrlError::Syntax(format!(
                    "Missing subKey for \"{}[...]\"",
                    main
                )));
            }
            _ => {
                return Err(CtrlError::Syntax(format!(
                    "Multiple subKey not allowed. Found: \"{}[{}]\"",
                    main, raw_value
                )));
            }
        };

        let partial = self.theme.define_entry(main, sub).ok_or_else(|| {
            CtrlError::LookupMiss(format!("\"{}[{}]\" not found in theme define.", main, sub))
        })?;
        def.merge(partial);
        Ok(())
    }

    /// The CSS property behind an abbreviation.
    pub(crate) fn property(&self, abbr: &str) -> Result<&'t str> {
        self.theme.property(abbr).ok_or_else(|| {
            CtrlError::UnknownAbbreviation(format!(
                "\"{}\" not defined in style abbreviation.",
                abbr
            ))
        })
    }

    /// Records the local variables `value` refers to.
    ///
    /// Outside constants each reference must already be declared.
    pub(crate) fn record_local_refs(
        &self,
        value: &Value,
        place: &str,
        def: &mut StyleDefinition,
    ) -> Result<()> {
        for name in value.local_refs() {
            if !self.ctx.contains(ParseContext::CONST) && !def.local_vars.contains_key(name) {
                return Err(CtrlError::VariableScope(format!(
                    "Using local var \"--&{}\" in {} before it is declared.",
                    name, place
                )));
            }
            def.used_local_vars.insert(name.to_string());
        }
        Ok(())
    }
}

/// True if `token` contains a `$name[` runtime variable.
fn contains_runtime_var(token: &str) -> bool {
    token.match_indices('$').any(|(i, _)| {
        let after = &token[i + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after.len());
        len > 0 && after[len..].starts_with('[')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(theme: &Theme, ctx: ParseContext, line: &str) -> Result<StyleDefinition> {
        let mut def = StyleDefinition::new();
        Resolver::new(theme, ctx).parse_line(line, &mut def)?;
        Ok(def)
    }

    #[test]
    fn test_base_declarations() {
        let theme = Theme::standard();
        let def = parse(&theme, ParseContext::empty(), "bg[red] c[--brand]! w[calc(100% - 2px)]").unwrap();
        assert_eq!(def.base["background"].to_string(), "red");
        assert_eq!(def.base["color"].to_string(), "var(--brand) !important");
        assert_eq!(def.base["width"].to_string(), "calc(100% - 2px)");
    }

    #[test]
    fn test_malformed_token_is_syntax_error() {
        let theme = Theme::standard();
        let err = parse(&theme, ParseContext::empty(), "bg red").unwrap_err();
        assert!(matches!(err, CtrlError::Syntax(_)));
    }

    #[test]
    fn test_unknown_abbreviation() {
        let theme = Theme::standard();
        let err = parse(&theme, ParseContext::empty(), "zz[1px]").unwrap_err();
        assert!(matches!(err, CtrlError::UnknownAbbreviation(_)));
    }

    #[test]
    fn test_important_rejected_in_const() {
        let theme = Theme::standard();
        let err = parse(&theme, ParseContext::CONST, "bg[red]!").unwrap_err();
        assert!(matches!(err, CtrlError::DirectiveSyntax(_)));
    }

    #[test]
    fn test_local_var_rules() {
        let theme = Theme::standard();

        let def = parse(&theme, ParseContext::empty(), "--&gap[8px] p[--&gap]").unwrap();
        assert_eq!(def.local_vars["gap"].to_string(), "8px");
        assert!(def.used_local_vars.contains("gap"));

        for (ctx, line) in [
            (ParseContext::empty(), "p[--&gap]"),
            (ParseContext::empty(), "--&gap[1px] --&gap[2px]"),
            (ParseContext::empty(), "--&gap[1px]!"),
            (ParseContext::CONST, "--&gap[1px]"),
            (ParseContext::QUERY, "--&gap[1px]"),
        ] {
            let err = parse(&theme, ctx, line).unwrap_err();
            assert!(matches!(err, CtrlError::VariableScope(_)), "{line}");
        }
    }

    #[test]
    fn test_local_refs_deferred_in_const() {
        let theme = Theme::standard();
        let def = parse(&theme, ParseContext::CONST, "p[--&gap]").unwrap();
        assert_eq!(def.undeclared_local_var(), Some("gap"));
    }

    #[test]
    fn test_runtime_var_base() {
        let theme = Theme::standard();
        let def = parse(&theme, ParseContext::empty(), "$bg[red]!").unwrap();
        assert!(def.has_runtime_var);
        assert_eq!(def.var_base["bg"].to_string(), "red");
        assert_eq!(def.base["background"].to_string(), "var(--bg) !important");
    }

    #[test]
    fn test_runtime_var_rules() {
        let theme = Theme::standard();
        for (ctx, line) in [
            (ParseContext::QUERY, "$bg[red]"),
            (ParseContext::QUERY, "hover($bg[red])"),
            (ParseContext::CONST | ParseContext::DEFINE, "$bg[red]"),
            (ParseContext::empty(), "$ty[body]"),
            (ParseContext::empty(), "$bg[--&x]"),
        ] {
            let err = parse(&theme, ctx, line).unwrap_err();
            assert!(matches!(err, CtrlError::VariableScope(_)), "{line}");
        }
    }

    #[test]
    fn test_typography_expansion() {
        let theme = Theme::standard()
            .with_typography("body", "fs[16px] lh[1.5]")
            .with_typography("loop", "ty[body]");
        let def = parse(&theme, ParseContext::empty(), "ty[body] fs[18px]").unwrap();
        assert_eq!(def.base["font-size"].to_string(), "18px");
        assert_eq!(def.base["line-height"].to_string(), "1.5");

        let err = parse(&theme, ParseContext::empty(), "ty[missing]").unwrap_err();
        assert!(matches!(err, CtrlError::LookupMiss(_)));
        let err = parse(&theme, ParseContext::empty(), "ty[loop]").unwrap_err();
        assert!(matches!(err, CtrlError::Syntax(_)));
    }

    #[test]
    fn test_define_merge_and_errors() {
        let mut theme = Theme::standard();
        theme.define("button", "primary", "bg[blue] hover(c[white])").unwrap();

        let def = parse(&theme, ParseContext::empty(), "button[primary] bg[red]").unwrap();
        assert_eq!(def.base["background"].to_string(), "red");
        assert_eq!(def.states["hover"]["color"].to_string(), "white");

        let err = parse(&theme, ParseContext::empty(), "button[primary ghost]").unwrap_err();
        assert!(matches!(err, CtrlError::Syntax(_)));
        let err = parse(&theme, ParseContext::empty(), "button[ghost]").unwrap_err();
        assert!(matches!(err, CtrlError::LookupMiss(_)));
    }

    #[test]
    fn test_abbreviation_define_collision() {
        let mut theme = Theme::standard();
        theme.define("bg", "x", "c[red]").unwrap();
        let err = parse(&theme, ParseContext::empty(), "bg[x]").unwrap_err();
        assert!(matches!(err, CtrlError::NameCollision(_)));
    }

    #[test]
    fn test_nested_query_lines() {
        let theme = Theme::standard();
        let err = parse(&theme, ParseContext::QUERY, "@query .x {").unwrap_err();
        assert!(matches!(err, CtrlError::Syntax(_)));
        let err = parse(&theme, ParseContext::CONST, "@query .x {").unwrap_err();
        assert!(matches!(err, CtrlError::DirectiveSyntax(_)));
    }

    #[test]
    fn test_contains_runtime_var() {
        assert!(contains_runtime_var("$bg[red]"));
        assert!(contains_runtime_var("hover($c[red])"));
        assert!(!contains_runtime_var("ct[$5]"));
        assert!(!contains_runtime_var("bg[red]"));
    }
}
