//! Conditional blocks: `hover(...)`, `before(...)`, `screen(...)`, `container(...)`.
//!
//! Tokens inside a block resolve like base declarations, with a few limits: no
//! local variable declarations, no theme defines, and no runtime variables inside
//! `screen`/`container`. Local variable references must already be declared.

use indexmap::IndexMap;

use crate::error::{CtrlError, Result};
use crate::parser::resolver::{ParseContext, Resolver};
use crate::parser::scan::{detect_important, split_abbr_value, split_top_level};
use crate::types::style::{ConditionBlock, PropMap, StyleDefinition};
use crate::types::value::Value;

/// The kind of block a token sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind<'a> {
    State(&'a str),
    Pseudo(&'a str),
    Screen,
    Container,
}

impl BlockKind<'_> {
    fn label(&self) -> String {
        match self {
            BlockKind::State(name) => format!("state \"{}\"", name),
            BlockKind::Pseudo(name) => format!("pseudo \"{}\"", name),
            BlockKind::Screen => "screen(...)".to_string(),
            BlockKind::Container => "container(...)".to_string(),
        }
    }

    fn context(&self) -> Option<&str> {
        match *self {
            BlockKind::State(name) | BlockKind::Pseudo(name) => Some(name),
            BlockKind::Screen | BlockKind::Container => None,
        }
    }
}

impl Resolver<'_> {
    /// `hover(...)` and other states. Merges into an existing entry.
    pub(crate) fn parse_state(&self, name: &str, inner: &str, def: &mut StyleDefinition) -> Result<()> {
        let mut props = def.states.get(name).cloned().unwrap_or_default();
        let mut runtime = IndexMap::new();
        self.resolve_block(BlockKind::State(name), inner, def, &mut props, &mut runtime)?;

        if !runtime.is_empty() {
            def.var_states.entry(name.to_string()).or_default().extend(runtime);
        }
        def.states.insert(name.to_string(), props);
        Ok(())
    }

    /// `before(...)` and other pseudo-elements. Merges into an existing entry.
    pub(crate) fn parse_pseudo(&self, name: &str, inner: &str, def: &mut StyleDefinition) -> Result<()> {
        let mut props = def.pseudos.get(name).cloned().unwrap_or_default();
        let mut runtime = IndexMap::new();
        self.resolve_block(BlockKind::Pseudo(name), inner, def, &mut props, &mut runtime)?;

        if !runtime.is_empty() {
            def.var_pseudos.entry(name.to_string()).or_default().extend(runtime);
        }
        def.pseudos.insert(name.to_string(), props);
        Ok(())
    }

    /// `screen(md, ...)` or `screen(min-w[600px], ...)`, emitted as a media query.
    pub(crate) fn parse_screen(&self, inner: &str, def: &mut StyleDefinition) -> Result<()> {
        let block = self.parse_condition(BlockKind::Screen, inner, def)?;
        def.screens.push(block);
        Ok(())
    }

    /// `container(md, ...)`, emitted as a container query.
    pub(crate) fn parse_container(&self, inner: &str, def: &mut StyleDefinition) -> Result<()> {
        let block = self.parse_condition(BlockKind::Container, inner, def)?;
        def.containers.push(block);
        Ok(())
    }

    fn parse_condition(
        &self,
        kind: BlockKind<'_>,
        inner: &str,
        def: &mut StyleDefinition,
    ) -> Result<ConditionBlock> {
        let (condition, body) = inner.split_once(',').ok_or_else(|| {
            CtrlError::Syntax(format!("{} syntax error: \"{}\"", kind.label(), inner))
        })?;

        let mut condition = condition.trim();
        if !(condition.starts_with("min") || condition.starts_with("max")) {
            condition = self.theme.breakpoint(condition).ok_or_else(|| {
                CtrlError::LookupMiss(format!(
                    "unknown breakpoint key \"{}\" not found in theme breakpoints for {}",
                    condition,
                    kind.label()
                ))
            })?;
        }

        let (abbr, value) = split_abbr_value(condition.trim()).ok_or_else(|| {
            CtrlError::Syntax(format!(
                "{} must contain something like min-w[600px]. Got \"{}\"",
                kind.label(),
                condition
            ))
        })?;
        let prop = self.property(abbr)?;
        let query = format!("({}:{})", prop, value.trim());

        let mut props = PropMap::new();
        let mut runtime = IndexMap::new();
        self.resolve_block(kind, body, def, &mut props, &mut runtime)?;
        Ok(ConditionBlock { query, props })
    }

    fn resolve_block(
        &self,
        kind: BlockKind<'_>,
        inner: &str,
        def: &mut StyleDefinition,
        props: &mut PropMap,
        runtime: &mut IndexMap<String, Value>,
    ) -> Result<()> {
        for token in split_top_level(inner) {
            self.resolve_block_token(kind, token, def, props, runtime)?;
        }
        Ok(())
    }

    fn resolve_block_token(
        &self,
        kind: BlockKind<'_>,
        token: &str,
        def: &mut StyleDefinition,
        props: &mut PropMap,
        runtime: &mut IndexMap<String, Value>,
    ) -> Result<()> {
        let (token, important) = detect_important(token);
        if important && self.ctx.contains(ParseContext::CONST) {
            return Err(CtrlError::DirectiveSyntax(format!(
                "!important is not allowed in @const block. Found: \"{}\" in {}",
                token,
                kind.label()
            )));
        }

        let (abbr, raw_value) = split_abbr_value(token).ok_or_else(|| {
            CtrlError::Syntax(format!(
                "expected \"abbr[value]\" in {}, found \"{}\"",
                kind.label(),
                token
            ))
        })?;

        if abbr.starts_with("--&") {
            return Err(CtrlError::VariableScope(format!(
                "local var \"{}\" cannot be declared inside {}; declare it in base.",
                abbr,
                kind.label()
            )));
        }

        if let Some(real) = abbr.strip_prefix('$') {
            let Some(context) = kind.context() else {
                return Err(CtrlError::VariableScope(format!(
                    "$variable cannot be used in {}. Found: \"{}\"",
                    kind.label(),
                    token
                )));
            };
            if self.ctx.intersects(ParseContext::QUERY | ParseContext::DEFINE) {
                return Err(CtrlError::VariableScope(format!(
                    "$variable is not allowed here. Found: \"{}\" in {}",
                    token,
                    kind.label()
                )));
            }
            if real == "ty" {
                return Err(CtrlError::VariableScope(
                    "\"$ty[...]\": cannot use runtime variable to reference typography."
                        .to_string(),
                ));
            }
            if raw_value.contains("--&") {
                return Err(CtrlError::VariableScope(format!(
                    "$variable is not allowed to reference local var (--&xxx). Found: \"{}\"",
                    token
                )));
            }
            let prop = self.property(real)?;
            runtime.insert(real.to_string(), Value::parse(raw_value));
            props.insert(
                prop.to_string(),
                Value::runtime_var(real, Some(context)).with_important(important),
            );
            return Ok(());
        }

        if abbr == "ty" {
            if important {
                return Err(CtrlError::Syntax(format!(
                    "!important cannot be applied to typography. Found: \"{}\" in {}",
                    token,
                    kind.label()
                )));
            }
            return self.expand_block_typography(kind, raw_value, def, props);
        }

        if abbr == "ct" && matches!(kind, BlockKind::Pseudo(_)) {
            let value = Value::literal(format!("\"{}\"", raw_value)).with_important(important);
            props.insert("content".to_string(), value);
            return Ok(());
        }

        let prop = self.property(abbr)?;
        let value = Value::parse(raw_value).with_important(important);
        self.record_local_refs(&value, &kind.label(), def)?;
        props.insert(prop.to_string(), value);
        Ok(())
    }

    fn expand_block_typography(
        &self,
        kind: BlockKind<'_>,
        key: &str,
        def: &mut StyleDefinition,
        props: &mut PropMap,
    ) -> Result<()> {
        let key = key.trim();
        let expansion = self.theme.typography(key).ok_or_else(|| {
            CtrlError::LookupMiss(format!(
                "Typography key \"{}\" not found in theme typography for {}.",
                key,
                kind.label()
            ))
        })?;

        for token in split_top_level(expansion) {
            let (token, important) = detect_important(token);
            let (abbr, raw_value) = split_abbr_value(token).ok_or_else(|| {
                CtrlError::Syntax(format!(
                    "typography \"{}\" has a malformed token \"{}\"",
                    key, token
                ))
            })?;
            let prop = self.property(abbr)?;
            let value = Value::parse(raw_value).with_important(important);
            self.record_local_refs(&value, &kind.label(), def)?;
            props.insert(prop.to_string(), value);
        }
        Ok(())
    }
}
