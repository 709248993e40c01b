//! Serializes transformed style definitions to CSS text.
//!
//! Output is compact: `selector{prop:value;}` with no whitespace, in a fixed
//! order per class:
//!
//! 1. `:root{...}` for runtime variables
//! 2. `.key{...}` with local variables first, then base declarations
//! 3. `.key:state{...}`
//! 4. `@media only screen and (q){.key{...}}`
//! 5. `@container (q){.key{...}}`
//! 6. `.key::pseudo{...}`
//! 7. every `@query` block, in the same order under its own selector

use std::fmt::Write;

use crate::types::style::{PropMap, QueryBlock, StyleDefinition};

/// CSS for one class under its final key.
pub fn build_css_text(key: &str, def: &StyleDefinition) -> String {
    let mut out = String::new();

    if !def.root_vars.is_empty() {
        out.push_str(":root{");
        write_props(&mut out, &def.root_vars);
        out.push('}');
    }

    let class_selector = format!(".{}", key);
    write_rule_set(&mut out, def, |suffix| format!("{}{}", class_selector, suffix));

    for query in &def.queries {
        out.push_str(&build_query_css_text(key, query));
    }
    out
}

/// CSS for a nested `@query` block of the class `parent_key`.
pub fn build_query_css_text(parent_key: &str, query: &QueryBlock) -> String {
    let mut out = String::new();
    write_rule_set(&mut out, &query.style, |suffix| {
        transform_selector(parent_key, &format!("{}{}", query.selector, suffix))
    });
    out
}

/// Anchors a query selector to its class: `&` becomes `.key`, anything else is
/// treated as a descendant selector.
pub fn transform_selector(parent_key: &str, selector: &str) -> String {
    let selector = selector.trim();
    let class_selector = format!(".{}", parent_key);
    if selector.contains('&') {
        selector.replace('&', &class_selector)
    } else {
        format!("{} {}", class_selector, selector)
    }
}

/// Writes base, states, screens, containers and pseudos. `selector` maps a
/// suffix such as `:hover` to the full selector.
fn write_rule_set(out: &mut String, def: &StyleDefinition, selector: impl Fn(&str) -> String) {
    let mut base = String::new();
    write_props(&mut base, &def.resolved_local_vars);
    write_props(&mut base, &def.base);
    if !base.is_empty() {
        let _ = write!(out, "{}{{{}}}", selector(""), base);
    }

    for (state, props) in &def.states {
        let _ = write!(out, "{}{{", selector(&format!(":{}", state)));
        write_props(out, props);
        out.push('}');
    }

    for screen in &def.screens {
        let _ = write!(out, "@media only screen and {}{{{}{{", screen.query, selector(""));
        write_props(out, &screen.props);
        out.push_str("}}");
    }

    for container in &def.containers {
        let _ = write!(out, "@container {}{{{}{{", container.query, selector(""));
        write_props(out, &container.props);
        out.push_str("}}");
    }

    for (pseudo, props) in &def.pseudos {
        let _ = write!(out, "{}{{", selector(&format!("::{}", pseudo)));
        write_props(out, props);
        out.push('}');
    }
}

fn write_props(out: &mut String, props: &PropMap) {
    for (prop, value) in props {
        let _ = write!(out, "{}:{};", prop, value);
    }
}
