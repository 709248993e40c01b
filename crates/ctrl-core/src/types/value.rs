//! Declaration values with symbolic variable references.
//!
//! Parsing produces values whose variable references are still symbolic: a local
//! variable (`--&size`) or a runtime variable (`$bg[...]`) cannot be named until the
//! owning class has its final key. The transform pass later swaps those parts for
//! scope-qualified `var(...)` text.

use std::fmt;

/// One piece of a declaration value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValuePart {
    /// Plain CSS text.
    Literal(String),
    /// Reference to a class-local variable declared with `--&name[...]`.
    LocalVar(String),
    /// Reference to a pending runtime variable. `context` is the state or
    /// pseudo-element the variable was declared in.
    RuntimeVar {
        abbr: String,
        context: Option<String>,
    },
}

/// A declaration value: ordered parts plus the `!important` flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Value {
    pub parts: Vec<ValuePart>,
    pub important: bool,
}

impl Value {
    /// A value made of a single literal.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ValuePart::Literal(text.into())],
            important: false,
        }
    }

    /// A value referring to a runtime variable.
    pub fn runtime_var(abbr: &str, context: Option<&str>) -> Self {
        Self {
            parts: vec![ValuePart::RuntimeVar {
                abbr: abbr.to_string(),
                context: context.map(str::to_string),
            }],
            important: false,
        }
    }

    /// Parses raw bracket content.
    ///
    /// `--&name` becomes a [`ValuePart::LocalVar`]; a bare custom property `--name`
    /// is wrapped as `var(--name)` unless it already sits inside `var(`.
    ///
    /// ```rust
    /// use ctrl_core::types::{Value, ValuePart};
    ///
    /// let value = Value::parse("1px solid --brand");
    /// assert_eq!(value.to_string(), "1px solid var(--brand)");
    ///
    /// let value = Value::parse("--&gap");
    /// assert_eq!(value.parts, vec![ValuePart::LocalVar("gap".into())]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("--&") {
                let len = ident_len(after);
                if len > 0 {
                    if !literal.is_empty() {
                        parts.push(ValuePart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(ValuePart::LocalVar(after[..len].to_string()));
                    rest = &after[len..];
                    continue;
                }
            } else if let Some(after) = rest.strip_prefix("--") {
                let len = ident_len(after);
                let joined_to_word = literal.chars().last().is_some_and(is_ident_char);
                if len > 0 && !joined_to_word {
                    let name = &after[..len];
                    if literal.trim_end().ends_with("var(") {
                        literal.push_str("--");
                        literal.push_str(name);
                    } else {
                        literal.push_str("var(--");
                        literal.push_str(name);
                        literal.push(')');
                    }
                    rest = &after[len..];
                    continue;
                }
            }

            let Some(c) = rest.chars().next() else { break };
            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if !literal.is_empty() {
            parts.push(ValuePart::Literal(literal));
        }
        Self {
            parts,
            important: false,
        }
    }

    /// Sets the `!important` flag.
    pub fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Names of local variables referenced by this value.
    pub fn local_refs(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            ValuePart::LocalVar(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// True once no symbolic references remain.
    pub fn is_resolved(&self) -> bool {
        self.parts
            .iter()
            .all(|p| matches!(p, ValuePart::Literal(_)))
    }

    /// Replaces references to the runtime variable `abbr` declared in `context`
    /// with `var(<qualified>)`.
    pub fn resolve_runtime(&mut self, abbr: &str, context: Option<&str>, qualified: &str) {
        for part in &mut self.parts {
            let matches = match part {
                ValuePart::RuntimeVar { abbr: a, context: c } => {
                    a == abbr && c.as_deref() == context
                }
                _ => false,
            };
            if matches {
                *part = ValuePart::Literal(format!("var({})", qualified));
            }
        }
    }

    /// Replaces every local variable reference with `var(--<name>-<scope_part>)`.
    pub fn resolve_locals(&mut self, scope_part: &str) {
        for part in &mut self.parts {
            if let ValuePart::LocalVar(name) = part {
                *part = ValuePart::Literal(format!("var({})", local_var_name(name, scope_part)));
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                ValuePart::Literal(text) => f.write_str(text)?,
                ValuePart::LocalVar(name) => write!(f, "var(--{})", name)?,
                ValuePart::RuntimeVar { abbr, context: None } => write!(f, "var(--{})", abbr)?,
                ValuePart::RuntimeVar {
                    abbr,
                    context: Some(ctx),
                } => write!(f, "var(--{}-{})", abbr, ctx)?,
            }
        }
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// The scope-qualified custom property name of a local variable.
pub fn local_var_name(name: &str, scope_part: &str) -> String {
    format!("--{}-{}", name, scope_part)
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn ident_len(input: &str) -> usize {
    input
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map(|(i, _)| i)
        .unwrap_or(input.len())
}
