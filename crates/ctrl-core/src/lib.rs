//! # ctrl-core
//!
//! Compiler for the css-ctrl abbreviation DSL.
//!
//! Sources are made of directives, constants, and class blocks written with short
//! property abbreviations:
//!
//! ```text
//! @scope app
//!
//! @const card-base {
//!   p[16px] br[8px]
//! }
//!
//! .card {
//!   @use card-base
//!   --&accent[#07f]
//!   bg[white] bd[1px solid --&accent]
//!   hover(bg[#f5f5f5])
//!   screen(md, p[24px])
//!   @query & > h2 {
//!     c[--&accent]
//!   }
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`parser::directives`] splits the source into directives, constants and class blocks.
//! 2. [`parser::classes`] resolves every class body into a [`StyleDefinition`].
//! 3. [`parser::bind`] validates `@bind` groups.
//! 4. [`transform`] qualifies local and runtime variables with the final class key.
//! 5. [`emitter`] writes compact CSS.
//!
//! ## Example
//!
//! ```rust
//! use ctrl_core::{ScopeRegistry, Theme, compile};
//!
//! let theme = Theme::standard();
//! let mut registry = ScopeRegistry::new();
//!
//! let css = compile(".box { $bg[red] }", &theme, &mut registry).unwrap();
//! assert_eq!(css, ":root{--bg-box:red;}.box{background:var(--bg-box);}");
//! ```

pub mod compiler;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod theme_css;
pub mod transform;
pub mod types;

pub use compiler::{CompiledUnit, Compiler, compile};
pub use error::{CtrlError, Result};
pub use parser::ClassRule;
pub use types::{FinalName, Scope, ScopeRegistry, StyleDefinition, Theme};
