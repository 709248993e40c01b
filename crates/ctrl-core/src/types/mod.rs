//! Data types shared by the parser, the transform pass, and the emitter.

pub mod abbr;
pub mod scope;
pub mod style;
pub mod theme;
pub mod value;

pub use abbr::{is_known_state, is_supported_pseudo};
pub use scope::{FinalName, Scope, ScopeRegistry, generate_class_id};
pub use style::{ConditionBlock, PropMap, QueryBlock, StyleDefinition};
pub use theme::Theme;
pub use value::{Value, ValuePart};
