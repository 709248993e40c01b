//! Scope-qualifies variable references once a class has its final key.
//!
//! | Declared as            | Custom property           |
//! |------------------------|---------------------------|
//! | `$bg[red]`             | `--bg-<key>`              |
//! | `hover($bg[red])`      | `--bg-<key>-hover`        |
//! | `before($c[red])`      | `--c-<key>-before`        |
//! | `--&gap[4px]`          | `--gap-<key>`             |

use indexmap::IndexMap;

use crate::types::style::StyleDefinition;
use crate::types::value::{Value, local_var_name};

/// Materializes pending runtime variables into `root_vars` and points every
/// reference at the qualified name.
pub fn transform_variables(def: &mut StyleDefinition, scope_part: &str) {
    for (abbr, value) in std::mem::take(&mut def.var_base) {
        let qualified = format!("--{}-{}", abbr, scope_part);
        for props in def.prop_maps_mut() {
            for v in props.values_mut() {
                v.resolve_runtime(&abbr, None, &qualified);
            }
        }
        def.root_vars.insert(qualified, value);
    }

    let states = std::mem::take(&mut def.var_states);
    qualify_nested(def, states, scope_part);
    let pseudos = std::mem::take(&mut def.var_pseudos);
    qualify_nested(def, pseudos, scope_part);
}

fn qualify_nested(
    def: &mut StyleDefinition,
    pending: IndexMap<String, IndexMap<String, Value>>,
    scope_part: &str,
) {
    for (context, vars) in pending {
        for (abbr, value) in vars {
            let qualified = format!("--{}-{}-{}", abbr, scope_part, context);
            for props in def.prop_maps_mut() {
                for v in props.values_mut() {
                    v.resolve_runtime(&abbr, Some(&context), &qualified);
                }
            }
            def.root_vars.insert(qualified, value);
        }
    }
}

/// Rewrites local variable references to `var(--name-<part>)` and records the
/// declarations under their qualified names in `resolved_local_vars`.
pub fn transform_local_variables(def: &mut StyleDefinition, scope_part: &str) {
    for (name, value) in &def.local_vars {
        let mut value = value.clone();
        value.resolve_locals(scope_part);
        def.resolved_local_vars
            .insert(local_var_name(name, scope_part), value);
    }

    for props in def.prop_maps_mut() {
        for v in props.values_mut() {
            v.resolve_locals(scope_part);
        }
    }
}
