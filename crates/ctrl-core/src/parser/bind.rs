//! `@bind key .a .b` directives: named groups of classes.

use indexmap::IndexMap;

use crate::error::{CtrlError, Result};
use crate::parser::classes::ClassRule;
use crate::parser::directives::Directive;
use crate::types::scope::Scope;

/// Validates every `@bind` directive and returns `key -> [emitted class names]`.
///
/// Under a named scope a bind key may not shadow a class, and every referenced
/// class must exist. Under `none` references must exist. Under `hash` references
/// are not checked, since hashed names cannot be predicted.
pub fn handle_bind_directives(
    scope: &Scope,
    directives: &[Directive],
    classes: &[ClassRule],
) -> Result<IndexMap<String, Vec<String>>> {
    let mut binds: IndexMap<String, Vec<String>> = IndexMap::new();

    for directive in directives.iter().filter(|d| d.name == "bind") {
        let tokens: Vec<&str> = directive.value.split_whitespace().collect();
        let Some((key, refs)) = tokens.split_first().filter(|(_, refs)| !refs.is_empty()) else {
            return Err(CtrlError::DirectiveSyntax(format!(
                "@bind needs a key and at least one class. Found: \"@bind {}\"",
                directive.value
            )));
        };
        if binds.contains_key(*key) {
            return Err(CtrlError::NameCollision(format!(
                "@bind key \"{}\" is already defined in this file.",
                key
            )));
        }
        if scope.is_named() {
            let shadowed = scope.predicted_key(key);
            if classes.iter().any(|c| c.key == shadowed) {
                return Err(CtrlError::NameCollision(format!(
                    "@bind key \"{}\" conflicts with class \".{}\".",
                    key, key
                )));
            }
        }

        let mut targets = Vec::with_capacity(refs.len());
        for reference in refs {
            let class_name = reference.strip_prefix('.').ok_or_else(|| {
                CtrlError::DirectiveSyntax(format!(
                    "@bind \"{}\" must reference classes with a leading \".\". Found: \"{}\"",
                    key, reference
                ))
            })?;

            let existing = classes.iter().find(|c| c.class_name == class_name);
            let target = match (scope, existing) {
                (_, Some(rule)) => rule.key.clone(),
                (Scope::Hash, None) => scope.predicted_key(class_name),
                (_, None) => {
                    return Err(CtrlError::LookupMiss(format!(
                        "@bind \"{}\" refers to \".{}\", which is not defined in this file.",
                        key, class_name
                    )));
                }
            };
            targets.push(target);
        }

        log::trace!("bind {} -> {:?}", key, targets);
        binds.insert(key.to_string(), targets);
    }

    Ok(binds)
}
