//! Low-level scanning helpers.
//!
//! Small grammars (identifiers, `.class {` headers, `@name value` directives,
//! `abbr[value]` tokens) are nom parsers. Block bodies are cut out with a plain
//! brace-depth scanner.

use nom::{
    IResult,
    bytes::complete::{tag, take_till1, take_while1},
    character::complete::{char, multispace0, space0},
    combinator::{all_consuming, rest},
    sequence::{preceded, terminated, tuple},
};

use crate::error::{CtrlError, Result};

/// Parses an identifier: ASCII letters, digits, `-` and `_`.
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

/// True when the whole input is one identifier.
pub fn is_ident(input: &str) -> bool {
    all_consuming(parse_ident)(input).is_ok()
}

/// Parses a `.name {` class header, leaving the input right after the brace.
pub fn parse_class_header(input: &str) -> IResult<&str, &str> {
    terminated(
        preceded(char('.'), parse_ident),
        tuple((multispace0, char('{'))),
    )(input)
}

/// Parses one `@name rest-of-line` directive line.
pub fn parse_directive_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, name) = preceded(char('@'), parse_ident)(input)?;
    let (input, value) = preceded(space0, rest)(input)?;
    Ok((input, (name, value.trim())))
}

/// Splits `abbr[value]` into its two halves.
///
/// The abbreviation is everything before the first `[`; the value runs to the
/// final `]`, so values may contain brackets of their own.
pub fn split_abbr_value(token: &str) -> Option<(&str, &str)> {
    let parsed: IResult<&str, &str> = terminated(take_till1(|c| c == '['), char('['))(token);
    let (remaining, abbr) = parsed.ok()?;
    let value = remaining.strip_suffix(']')?;
    let abbr = abbr.trim();
    if abbr.is_empty() {
        return None;
    }
    Some((abbr, value))
}

/// Splits `name(inner)` into the call name and its arguments.
pub fn split_call(token: &str) -> Option<(&str, &str)> {
    let parsed: IResult<&str, &str> = terminated(parse_ident, char('('))(token);
    let (remaining, name) = parsed.ok()?;
    let inner = remaining.strip_suffix(')')?;
    Some((name, inner.trim()))
}

/// Strips a trailing `!` or `!important` and reports whether one was present.
pub fn detect_important(token: &str) -> (&str, bool) {
    let token = token.trim();
    if let Some(stripped) = token.strip_suffix("!important") {
        (stripped.trim_end(), true)
    } else if let Some(stripped) = token.strip_suffix('!') {
        (stripped.trim_end(), true)
    } else {
        (token, false)
    }
}

/// Splits a line into tokens on whitespace that is not inside `[...]` or `(...)`.
pub fn split_top_level(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in line.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                tokens.push(&line[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&line[s..]);
    }
    tokens
}

/// Returns the body of a block whose opening brace was already consumed, and
/// the input after the matching closing brace.
///
/// Braces are counted blindly; quotes do not protect them.
pub fn take_block(input: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    for (i, c) in input.char_indices() {
        if c == '{' {
            depth += 1;
        } else if c == '}' {
            depth -= 1;
            if depth == 0 {
                return Some((&input[..i], &input[i + 1..]));
            }
        }
    }
    None
}

/// A `<keyword> <header> { body }` block cut out of a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordBlock {
    pub header: String,
    pub body: String,
}

/// Removes every line-anchored `keyword header { ... }` block from `text`.
///
/// Returns the blocks in source order and the text with the blocks removed.
pub fn extract_keyword_blocks(text: &str, keyword: &str) -> Result<(Vec<KeywordBlock>, String)> {
    let mut blocks = Vec::new();
    let mut remaining = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = find_line_keyword(rest, keyword) {
        remaining.push_str(&rest[..pos]);
        let after_keyword = &rest[pos + keyword.len()..];

        let Some(open) = after_keyword.find('{') else {
            return Err(CtrlError::Syntax(format!(
                "expected \"{{\" after \"{}{}\"",
                keyword,
                after_keyword.lines().next().unwrap_or_default()
            )));
        };
        let header = after_keyword[..open].trim();
        let Some((body, tail)) = take_block(&after_keyword[open + 1..]) else {
            return Err(CtrlError::Syntax(format!(
                "unterminated block \"{} {}\"",
                keyword, header
            )));
        };

        blocks.push(KeywordBlock {
            header: header.to_string(),
            body: body.trim().to_string(),
        });
        rest = tail;
    }

    remaining.push_str(rest);
    Ok((blocks, remaining))
}

/// Byte offset of the first line starting with `keyword` followed by whitespace.
fn find_line_keyword(text: &str, keyword: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start_matches([' ', '\t']);
        let matched: IResult<&str, (&str, &str)> =
            tuple((tag(keyword), take_while1(char::is_whitespace)))(trimmed);
        if matched.is_ok() {
            return Some(offset + line.len() - trimmed.len());
        }
        offset += line.len();
    }
    None
}
