//! Drives one source unit through parsing, transformation, and emission.

use indexmap::IndexMap;

use crate::emitter::build_css_text;
use crate::error::Result;
use crate::parser::bind::handle_bind_directives;
use crate::parser::classes::{ClassRule, process_class_blocks};
use crate::parser::directives::parse_directives;
use crate::transform::{transform_local_variables, transform_variables};
use crate::types::scope::{Scope, ScopeRegistry};
use crate::types::theme::Theme;

/// Compiles source units against a theme.
///
/// ```rust
/// use ctrl_core::{Compiler, ScopeRegistry, Theme};
///
/// let theme = Theme::standard();
/// let mut registry = ScopeRegistry::new();
/// let compiler = Compiler::new(&theme);
///
/// let css = compiler
///     .compile(&mut registry, "@scope app\n.box { bg[red] hover(bg[blue]) }")
///     .unwrap();
/// assert_eq!(css, ".app_box{background:red;}.app_box:hover{background:blue;}");
///
/// // The scope now belongs to that unit.
/// assert!(compiler.compile(&mut registry, "@scope app\n.x { c[red] }").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'t> {
    theme: &'t Theme,
}

/// The result of compiling one source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub scope: Scope,
    /// Classes in source order, with variables already qualified.
    pub classes: Vec<ClassRule>,
    /// `@bind` groups: key to emitted class names.
    pub binds: IndexMap<String, Vec<String>>,
}

impl CompiledUnit {
    /// Renders the whole unit as one stylesheet.
    pub fn to_css(&self) -> String {
        self.classes
            .iter()
            .map(|rule| build_css_text(&rule.key, &rule.style))
            .collect()
    }

    /// Looks up a class by its source name.
    pub fn class(&self, class_name: &str) -> Option<&ClassRule> {
        self.classes.iter().find(|c| c.class_name == class_name)
    }
}

impl<'t> Compiler<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self { theme }
    }

    /// Compiles `source` without rendering it.
    ///
    /// The unit's named scope is checked against `registry` up front and
    /// claimed only if compilation succeeds.
    pub fn compile_unit(&self, registry: &mut ScopeRegistry, source: &str) -> Result<CompiledUnit> {
        let parsed = parse_directives(source, self.theme)?;

        let mut scopes = parsed.directive_values("scope");
        let scope = match scopes.next() {
            Some(value) => Scope::parse(value)?,
            None => Scope::None,
        };
        for extra in scopes {
            log::warn!("ignoring extra @scope {} (using {})", extra, scope);
        }
        registry.ensure_available(&scope)?;

        let consts = parsed.const_map();
        let mut classes = process_class_blocks(&scope, &parsed.class_blocks, &consts, self.theme)?;
        let binds = handle_bind_directives(&scope, &parsed.directives, &classes)?;

        for rule in &mut classes {
            transform_variables(&mut rule.style, &rule.key);
            transform_local_variables(&mut rule.style, &rule.key);
            for query in &mut rule.style.queries {
                transform_variables(&mut query.style, &rule.key);
                transform_local_variables(&mut query.style, &rule.key);
            }
        }

        registry.claim(&scope)?;
        log::debug!(
            "compiled unit: scope={}, {} classes, {} binds",
            scope,
            classes.len(),
            binds.len()
        );
        Ok(CompiledUnit {
            scope,
            classes,
            binds,
        })
    }

    /// Compiles `source` straight to CSS text.
    pub fn compile(&self, registry: &mut ScopeRegistry, source: &str) -> Result<String> {
        Ok(self.compile_unit(registry, source)?.to_css())
    }
}

/// Compiles one source unit to CSS.
pub fn compile(source: &str, theme: &Theme, registry: &mut ScopeRegistry) -> Result<String> {
    Compiler::new(theme).compile(registry, source)
}
