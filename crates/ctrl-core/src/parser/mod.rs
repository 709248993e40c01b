//! Source parsing: from raw text to per-class style definitions.
//!
//! ## Submodules
//!
//! - [`scan`]: nom micro-grammars and the brace-depth block scanner
//! - [`directives`]: `@scope`, `@bind`, `@const` and `.class { }` extraction
//! - [`resolver`]: token dispatch and base declarations
//! - [`blocks`]: state, pseudo-element, `screen` and `container` blocks
//! - [`classes`]: `@use`, `@query`, local-variable checks and final class keys
//! - [`bind`]: `@bind` validation

pub mod bind;
pub mod blocks;
pub mod classes;
pub mod directives;
pub mod resolver;
pub mod scan;

pub use crate::parser::bind::handle_bind_directives;
pub use crate::parser::classes::{ClassRule, process_class_blocks};
pub use crate::parser::directives::{
    ClassBlock, ConstBlock, Directive, ParsedSource, parse_directives,
};
pub use crate::parser::resolver::{ParseContext, Resolver};
