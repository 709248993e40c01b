//! Turns class blocks into style definitions keyed by their final class name.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{CtrlError, Result};
use crate::parser::directives::ClassBlock;
use crate::parser::resolver::{ParseContext, Resolver};
use crate::parser::scan::extract_keyword_blocks;
use crate::types::scope::Scope;
use crate::types::style::{QueryBlock, StyleDefinition};
use crate::types::theme::Theme;

/// A fully parsed class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRule {
    /// The name written in the source, without the leading dot.
    pub class_name: String,
    /// The emitted class name under the unit's scope.
    pub key: String,
    pub style: StyleDefinition,
}

/// Parses every class block of a unit.
///
/// Constants named on the `@use` line are merged before the body's own lines,
/// so literal declarations win over constant ones.
pub fn process_class_blocks(
    scope: &Scope,
    blocks: &[ClassBlock],
    consts: &IndexMap<String, StyleDefinition>,
    theme: &Theme,
) -> Result<Vec<ClassRule>> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(blocks.len());

    for block in blocks {
        if !seen.insert(block.class_name.as_str()) {
            return Err(CtrlError::NameCollision(format!(
                "Duplicate class \".{}\" in scope \"{}\" (same file).",
                block.class_name, scope
            )));
        }

        let (query_blocks, body) = extract_keyword_blocks(&block.body, "@query")?;

        let mut style = StyleDefinition::new();
        let (uses, lines) = split_use_line(&body, &block.class_name)?;
        for name in uses {
            style.merge(lookup_const(consts, name)?);
        }
        let resolver = Resolver::new(theme, ParseContext::empty());
        for line in lines {
            resolver.parse_line(line, &mut style)?;
        }

        let query_resolver = Resolver::new(theme, ParseContext::QUERY);
        for query in query_blocks {
            if query.header.is_empty() {
                return Err(CtrlError::Syntax(format!(
                    "@query in \".{}\" is missing a selector.",
                    block.class_name
                )));
            }

            let mut query_style = StyleDefinition::new();
            query_style.local_vars = style.local_vars.clone();

            let (uses, lines) = split_use_line(&query.body, &block.class_name)?;
            for name in uses {
                let partial = lookup_const(consts, name)?;
                if partial.has_runtime_var {
                    return Err(CtrlError::VariableScope(format!(
                        "@use \"{}\" has $variable, not allowed inside @query block.",
                        name
                    )));
                }
                query_style.merge(partial);
            }
            for line in lines {
                query_resolver.parse_line(line, &mut query_style)?;
            }

            if let Some(missing) = query_style.undeclared_local_var() {
                return Err(CtrlError::VariableScope(format!(
                    "local var \"{}\" is used but not declared in query \"{}\" of \".{}\".",
                    missing, query.header, block.class_name
                )));
            }
            style.queries.push(QueryBlock {
                selector: query.header,
                style: query_style,
            });
        }

        if let Some(missing) = style.undeclared_local_var() {
            return Err(CtrlError::VariableScope(format!(
                "local var \"{}\" is used but not declared in \".{}\" (scope=\"{}\").",
                missing, block.class_name, scope
            )));
        }

        let key = scope.final_key(&block.class_name, &block.body);
        log::debug!("class .{} -> .{}", block.class_name, key);
        rules.push(ClassRule {
            class_name: block.class_name.clone(),
            key,
            style,
        });
    }

    Ok(rules)
}

/// Separates the single `@use a b` line from the declaration lines.
fn split_use_line<'a>(body: &'a str, class_name: &str) -> Result<(Vec<&'a str>, Vec<&'a str>)> {
    let mut uses: Option<Vec<&str>> = None;
    let mut lines = Vec::new();

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(names) = strip_use(line) else {
            lines.push(line);
            continue;
        };
        if uses.is_some() {
            return Err(CtrlError::Syntax(format!(
                "Multiple @use lines in \".{}\".",
                class_name
            )));
        }
        let names: Vec<&str> = names.split_whitespace().collect();
        if names.is_empty() {
            return Err(CtrlError::Syntax(format!(
                "@use in \".{}\" must name at least one @const.",
                class_name
            )));
        }
        uses = Some(names);
    }

    Ok((uses.unwrap_or_default(), lines))
}

fn strip_use(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("@use")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn lookup_const<'a>(
    consts: &'a IndexMap<String, StyleDefinition>,
    name: &str,
) -> Result<&'a StyleDefinition> {
    consts
        .get(name)
        .ok_or_else(|| CtrlError::LookupMiss(format!("@use refers to unknown const \"{}\".", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &str, body: &str) -> ClassBlock {
        ClassBlock {
            class_name: name.to_string(),
            body: body.to_string(),
        }
    }

    fn consts(theme: &Theme, entries: &[(&str, &str)]) -> IndexMap<String, StyleDefinition> {
        let resolver = Resolver::new(theme, ParseContext::CONST);
        entries
            .iter()
            .map(|(name, body)| {
                let mut style = StyleDefinition::new();
                resolver.parse_line(body, &mut style).unwrap();
                (name.to_string(), style)
            })
            .collect()
    }

    #[test]
    fn test_use_merges_before_literals() {
        let theme = Theme::standard();
        let consts = consts(&theme, &[("base", "bg[red] c[white]")]);
        let rules = process_class_blocks(
            &Scope::None,
            &[block("box", "@use base\nbg[blue]")],
            &consts,
            &theme,
        )
        .unwrap();

        let base = &rules[0].style.base;
        assert_eq!(base["background"].to_string(), "blue");
        assert_eq!(base["color"].to_string(), "white");
    }

    #[test]
    fn test_use_errors() {
        let theme = Theme::standard();
        let consts = consts(&theme, &[("a", "bg[red]"), ("b", "c[red]")]);

        let err = process_class_blocks(&Scope::None, &[block("x", "@use nope")], &consts, &theme)
            .unwrap_err();
        assert!(matches!(err, CtrlError::LookupMiss(_)));

        let err =
            process_class_blocks(&Scope::None, &[block("x", "@use a\n@use b")], &consts, &theme)
                .unwrap_err();
        assert!(matches!(err, CtrlError::Syntax(_)));
    }

    #[test]
    fn test_duplicate_class() {
        let theme = Theme::standard();
        let blocks = [block("x", "bg[red]"), block("x", "c[red]")];
        let err = process_class_blocks(&Scope::None, &blocks, &IndexMap::new(), &theme).unwrap_err();
        assert!(matches!(err, CtrlError::NameCollision(_)));
    }

    #[test]
    fn test_const_local_ref_checked_after_merge() {
        let theme = Theme::standard();
        let consts = consts(&theme, &[("spaced", "p[--&gap]")]);

        let rules = process_class_blocks(
            &Scope::None,
            &[block("ok", "--&gap[4px]\n@use spaced")],
            &consts,
            &theme,
        )
        .unwrap();
        assert_eq!(rules[0].style.base["padding"].to_string(), "var(--gap)");

        let err = process_class_blocks(&Scope::None, &[block("bad", "@use spaced")], &consts, &theme)
            .unwrap_err();
        assert!(matches!(err, CtrlError::VariableScope(_)));
    }

    #[test]
    fn test_query_blocks() {
        let theme = Theme::standard();
        let body = "--&c[red]\nbg[white]\n@query .child {\n c[--&c]\n hover(c[blue])\n}";
        let rules =
            process_class_blocks(&Scope::None, &[block("box", body)], &IndexMap::new(), &theme)
                .unwrap();

        let style = &rules[0].style;
        assert_eq!(style.queries.len(), 1);
        let query = &style.queries[0];
        assert_eq!(query.selector, ".child");
        assert_eq!(query.style.base["color"].to_string(), "var(--c)");
        assert_eq!(query.style.states["hover"]["color"].to_string(), "blue");
        assert!(query.style.local_vars.contains_key("c"));
        assert!(!style.base.contains_key("color"));
    }

    #[test]
    fn test_query_rejects_runtime_consts() {
        let theme = Theme::standard();
        let mut consts = IndexMap::new();
        let mut runtime = StyleDefinition::new();
        Resolver::new(&theme, ParseContext::empty())
            .parse_line("$bg[red]", &mut runtime)
            .unwrap();
        consts.insert("dyn".to_string(), runtime);

        let body = "@query & > p {\n @use dyn\n}";
        let err = process_class_blocks(&Scope::None, &[block("box", body)], &consts, &theme)
            .unwrap_err();
        assert!(matches!(err, CtrlError::VariableScope(_)));
    }

    #[test]
    fn test_nested_query_rejected() {
        let theme = Theme::standard();
        let body = "@query .a {\n @query .b {\n c[red]\n }\n}";
        let err = process_class_blocks(&Scope::None, &[block("box", body)], &IndexMap::new(), &theme)
            .unwrap_err();
        assert!(matches!(err, CtrlError::Syntax(_)));
    }

    #[test]
    fn test_keys_follow_scope() {
        let theme = Theme::standard();
        let blocks = [block("box", "bg[red]")];
        let named = process_class_blocks(
            &Scope::Named("app".into()),
            &blocks,
            &IndexMap::new(),
            &theme,
        )
        .unwrap();
        assert_eq!(named[0].key, "app_box");

        let hashed = process_class_blocks(&Scope::Hash, &blocks, &IndexMap::new(), &theme).unwrap();
        assert_eq!(hashed[0].key, Scope::Hash.final_key("box", "bg[red]"));
    }
}
