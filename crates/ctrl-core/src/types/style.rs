//! The style definition built while parsing one class, constant, define entry,
//! or `@query` block.

use indexmap::{IndexMap, IndexSet};

use crate::types::value::Value;

/// Ordered CSS property → value declarations.
pub type PropMap = IndexMap<String, Value>;

/// A `screen(...)` or `container(...)` entry: a feature query and its declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionBlock {
    /// Feature query in parentheses, e.g. `(min-width:768px)`.
    pub query: String,
    pub props: PropMap,
}

/// A nested `@query <selector> { ... }` block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryBlock {
    /// The raw selector, relative to the owning class (`&` or descendant).
    pub selector: String,
    pub style: StyleDefinition,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleDefinition {
    /// Unconditional declarations.
    pub base: PropMap,
    /// `hover(...)`, `focus(...)` and friends, in first-seen order.
    pub states: IndexMap<String, PropMap>,
    /// `before(...)`, `after(...)` and other pseudo-elements.
    pub pseudos: IndexMap<String, PropMap>,
    /// Media queries in source order. Duplicates are kept.
    pub screens: Vec<ConditionBlock>,
    /// Container queries in source order. Duplicates are kept.
    pub containers: Vec<ConditionBlock>,
    /// Nested query blocks. Their own `queries` stay empty.
    pub queries: Vec<QueryBlock>,

    /// Local variables declared with `--&name[value]`.
    pub local_vars: IndexMap<String, Value>,
    /// Local variables referenced by any value, checked once the body is parsed.
    pub used_local_vars: IndexSet<String>,
    /// Local variables under their qualified names, filled by the transform pass.
    pub resolved_local_vars: IndexMap<String, Value>,

    /// Pending `$abbr[value]` declarations in the base block.
    pub var_base: IndexMap<String, Value>,
    /// Pending runtime variables per state.
    pub var_states: IndexMap<String, IndexMap<String, Value>>,
    /// Pending runtime variables per pseudo-element.
    pub var_pseudos: IndexMap<String, IndexMap<String, Value>>,
    /// Materialized runtime variables, emitted in `:root{}`.
    pub root_vars: IndexMap<String, Value>,

    /// Set once any `$name[` token is seen.
    pub has_runtime_var: bool,
}

impl StyleDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `source` into `self`.
    ///
    /// Base properties overwrite, states and pseudo-elements merge per property,
    /// screens and containers are appended without deduplication, and the pending
    /// variable maps merge per key.
    pub fn merge(&mut self, source: &StyleDefinition) {
        for (prop, value) in &source.base {
            self.base.insert(prop.clone(), value.clone());
        }
        merge_nested(&mut self.states, &source.states);
        merge_nested(&mut self.pseudos, &source.pseudos);
        self.screens.extend(source.screens.iter().cloned());
        self.containers.extend(source.containers.iter().cloned());

        for (name, value) in &source.var_base {
            self.var_base.insert(name.clone(), value.clone());
        }
        merge_nested(&mut self.var_states, &source.var_states);
        merge_nested(&mut self.var_pseudos, &source.var_pseudos);
        for (name, value) in &source.root_vars {
            self.root_vars.insert(name.clone(), value.clone());
        }

        self.used_local_vars
            .extend(source.used_local_vars.iter().cloned());
        self.has_runtime_var |= source.has_runtime_var;
    }

    /// The first local variable referenced but never declared, if any.
    pub fn undeclared_local_var(&self) -> Option<&str> {
        self.used_local_vars
            .iter()
            .find(|name| !self.local_vars.contains_key(*name))
            .map(String::as_str)
    }

    /// Every declaration map that can hold variable references.
    pub(crate) fn prop_maps_mut(&mut self) -> impl Iterator<Item = &mut PropMap> {
        std::iter::once(&mut self.base)
            .chain(self.states.values_mut())
            .chain(self.pseudos.values_mut())
            .chain(self.screens.iter_mut().map(|s| &mut s.props))
            .chain(self.containers.iter_mut().map(|c| &mut c.props))
    }
}

fn merge_nested(target: &mut IndexMap<String, PropMap>, source: &IndexMap<String, PropMap>) {
    for (key, props) in source {
        let entry = target.entry(key.clone()).or_default();
        for (prop, value) in props {
            entry.insert(prop.clone(), value.clone());
        }
    }
}
