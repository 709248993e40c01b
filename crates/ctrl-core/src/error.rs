//! Error types for compiling css-ctrl sources.
//!
//! Every failure aborts the compilation of the whole source unit. The rendered
//! message always starts with the `[CSS-CTRL-ERR]` tag so hosts can tell compiler
//! diagnostics apart from their own errors.

use thiserror::Error;

/// Errors that can occur while compiling a css-ctrl source unit.
///
/// # Examples
///
/// ```rust
/// use ctrl_core::{compile, CtrlError, ScopeRegistry, Theme};
///
/// let theme = Theme::standard();
/// let mut registry = ScopeRegistry::new();
///
/// let err = compile(".box { nope[1px] }", &theme, &mut registry).unwrap_err();
/// assert!(matches!(err, CtrlError::UnknownAbbreviation(_)));
/// assert!(err.to_string().starts_with("[CSS-CTRL-ERR]"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CtrlError {
    /// A top-level directive (`@scope`, `@bind`, `@const`) is malformed, or a
    /// constant body uses a construct constants cannot hold.
    #[error("[CSS-CTRL-ERR] {0}")]
    DirectiveSyntax(String),

    /// A declaration token does not have the `abbr[value]` shape, a block is not
    /// terminated, or a conditional block is malformed.
    #[error("[CSS-CTRL-ERR] {0}")]
    Syntax(String),

    /// The token is neither an abbreviation nor a theme define.
    #[error("[CSS-CTRL-ERR] {0}")]
    UnknownAbbreviation(String),

    /// Two things claim the same name: abbreviation vs define, duplicate class,
    /// duplicate bind key, bind key vs class, or a reused scope.
    #[error("[CSS-CTRL-ERR] {0}")]
    NameCollision(String),

    /// A local (`--&x`) or runtime (`$x`) variable is used where it is not allowed.
    #[error("[CSS-CTRL-ERR] {0}")]
    VariableScope(String),

    /// A breakpoint, typography, define, constant, or bound class was not found.
    #[error("[CSS-CTRL-ERR] {0}")]
    LookupMiss(String),
}

impl CtrlError {
    /// The message without the error tag.
    pub fn message(&self) -> &str {
        match self {
            CtrlError::DirectiveSyntax(msg)
            | CtrlError::Syntax(msg)
            | CtrlError::UnknownAbbreviation(msg)
            | CtrlError::NameCollision(msg)
            | CtrlError::VariableScope(msg)
            | CtrlError::LookupMiss(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, CtrlError>;
