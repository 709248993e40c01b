//! Splits a source unit into directives, constants, and class blocks.

use indexmap::IndexMap;

use crate::error::{CtrlError, Result};
use crate::parser::resolver::{ParseContext, Resolver};
use crate::parser::scan::{
    extract_keyword_blocks, is_ident, parse_class_header, parse_directive_line, take_block,
};
use crate::types::scope::Scope;
use crate::types::style::StyleDefinition;
use crate::types::theme::Theme;

/// A top-level `@name value` line such as `@scope app` or `@bind btn .a .b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: String,
}

/// A `.class { body }` block with its raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBlock {
    pub class_name: String,
    pub body: String,
}

/// A parsed `@const name { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstBlock {
    pub name: String,
    pub style: StyleDefinition,
}

/// Everything found at the top level of a source unit.
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub directives: Vec<Directive>,
    pub class_blocks: Vec<ClassBlock>,
    pub const_blocks: Vec<ConstBlock>,
}

impl ParsedSource {
    /// Values of every directive named `name`, in source order.
    pub fn directive_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.directives
            .iter()
            .filter(move |d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Constants keyed by name.
    pub fn const_map(&self) -> IndexMap<String, StyleDefinition> {
        self.const_blocks
            .iter()
            .map(|c| (c.name.clone(), c.style.clone()))
            .collect()
    }
}

/// Parses the top level of `source`.
///
/// `@const` blocks are cut out and parsed first, then directive lines and class
/// blocks are read in order. Class bodies are skipped as a whole, so nothing
/// inside a body is taken for a top-level construct.
pub fn parse_directives(source: &str, theme: &Theme) -> Result<ParsedSource> {
    let mut parsed = ParsedSource::default();

    let (const_blocks, remaining) = extract_keyword_blocks(source, "@const")?;
    let resolver = Resolver::new(theme, ParseContext::CONST);
    for block in const_blocks {
        if !is_ident(&block.header) {
            return Err(CtrlError::DirectiveSyntax(format!(
                "invalid @const name \"{}\"",
                block.header
            )));
        }
        if parsed.const_blocks.iter().any(|c| c.name == block.header) {
            return Err(CtrlError::NameCollision(format!(
                "@const \"{}\" is declared more than once.",
                block.header
            )));
        }

        let mut style = StyleDefinition::new();
        for line in block.body.lines().map(str::trim).filter(|l| !l.is_empty()) {
            resolver.parse_line(line, &mut style)?;
        }
        log::trace!("parsed @const {}", block.header);
        parsed.const_blocks.push(ConstBlock {
            name: block.header,
            style,
        });
    }

    let mut rest = remaining.as_str();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if rest.starts_with('@') {
            let (line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
            rest = tail;
            if let Some(directive) = read_directive(line.trim())? {
                parsed.directives.push(directive);
            }
            continue;
        }

        if let Ok((body_start, class_name)) = parse_class_header(rest) {
            let (body, tail) = take_block(body_start).ok_or_else(|| {
                CtrlError::Syntax(format!("unterminated class block \".{}\"", class_name))
            })?;
            parsed.class_blocks.push(ClassBlock {
                class_name: class_name.to_string(),
                body: body.trim().to_string(),
            });
            rest = tail;
            continue;
        }

        rest = skip_unrecognized(rest);
    }

    Ok(parsed)
}

fn read_directive(line: &str) -> Result<Option<Directive>> {
    let (_, (name, value)) = parse_directive_line(line)
        .map_err(|_| CtrlError::DirectiveSyntax(format!("malformed directive \"{}\"", line)))?;

    match name {
        "use" | "query" => {
            log::warn!("ignoring \"{}\" outside of a class block", line);
            return Ok(None);
        }
        "scope" | "bind" if value.is_empty() => {
            return Err(CtrlError::DirectiveSyntax(format!(
                "@{} requires a value. Found: \"{}\"",
                name, line
            )));
        }
        "scope" => {
            Scope::parse(value)?;
        }
        "bind" => {}
        _ => log::debug!("unhandled directive @{}", name),
    }

    Ok(Some(Directive {
        name: name.to_string(),
        value: value.to_string(),
    }))
}

/// Skips text the scanner does not understand: up to the next `.class {`
/// header on the same line, or else to the end of the line. Blocks opened by
/// unknown text are not skipped as a whole, so a class written after them on
/// a later line is still found.
fn skip_unrecognized(input: &str) -> &str {
    let line_end = input.find('\n').unwrap_or(input.len());
    let line = &input[..line_end];

    let header = line
        .match_indices('.')
        .map(|(i, _)| i)
        .find(|&i| parse_class_header(&input[i..]).is_ok());
    if let Some(start) = header {
        log::trace!("skipping \"{}\" before class header", line[..start].trim());
        return &input[start..];
    }

    log::warn!("ignoring unrecognized text \"{}\"", line.trim());
    &input[line_end..]
}
