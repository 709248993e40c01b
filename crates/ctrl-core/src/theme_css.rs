//! Theme-wide CSS: color palettes, root variables, and keyframes.
//!
//! ```rust
//! use ctrl_core::Theme;
//! use ctrl_core::theme_css::{ThemeSheet, build_theme_css};
//!
//! let mut sheet = ThemeSheet::default();
//! sheet.palette = vec![
//!     vec!["dark".into(), "light".into()],
//!     vec!["fg".into(), "#fff".into(), "#000".into()],
//! ];
//! sheet.keyframes.insert("pulse".into(), "from(op[0]) to(op[1])".into());
//!
//! let css = build_theme_css(&sheet, &Theme::standard()).unwrap();
//! assert_eq!(
//!     css,
//!     "html.dark{--fg:#fff;}html.light{--fg:#000;}\
//!      @keyframes pulse{from{opacity:0;}to{opacity:1;}}"
//! );
//! ```

use std::fmt::Write;

use indexmap::IndexMap;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::recognize,
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};

use crate::error::{CtrlError, Result};
use crate::types::theme::Theme;

/// Theme data that becomes global CSS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSheet {
    /// First row lists the modes; each following row is `[name, value per mode...]`.
    pub palette: Vec<Vec<String>>,
    /// Emitted as `:root{--key:value;}`.
    pub variables: IndexMap<String, String>,
    /// Keyframe name to `label(abbr[value] ...)` steps.
    pub keyframes: IndexMap<String, String>,
}

/// Renders palette, variables, then keyframes.
pub fn build_theme_css(sheet: &ThemeSheet, theme: &Theme) -> Result<String> {
    let mut css = generate_palette_css(&sheet.palette);
    css.push_str(&generate_variable_css(&sheet.variables));
    for (name, raw) in &sheet.keyframes {
        css.push_str(&generate_keyframe_css(name, raw, theme)?);
    }
    Ok(css)
}

/// One `html.<mode>{...}` rule per mode.
pub fn generate_palette_css(palette: &[Vec<String>]) -> String {
    let Some((modes, rows)) = palette.split_first() else {
        return String::new();
    };

    let mut css = String::new();
    for (i, mode) in modes.iter().enumerate() {
        let _ = write!(css, "html.{}{{", mode);
        for row in rows {
            let Some(name) = row.first() else { continue };
            let value = row.get(i + 1).map(String::as_str).unwrap_or_default();
            let _ = write!(css, "--{}:{};", name, value);
        }
        css.push('}');
    }
    css
}

pub fn generate_variable_css(variables: &IndexMap<String, String>) -> String {
    if variables.is_empty() {
        return String::new();
    }
    let mut css = String::from(":root{");
    for (key, value) in variables {
        let _ = write!(css, "--{}:{};", key, value);
    }
    css.push('}');
    css
}

/// Renders one keyframe definition such as `0%(bg[red] $w[10px]) to(bg[blue])`.
///
/// Runtime variables become `--<abbr>-<name>-<label>` with their value as the
/// default in a `:root{}` rule. Unknown abbreviations are used as raw
/// property names.
pub fn generate_keyframe_css(name: &str, raw: &str, theme: &Theme) -> Result<String> {
    let (rest, steps) = many0(parse_keyframe_step)(raw).map_err(|e| {
        CtrlError::Syntax(format!("invalid keyframe \"{}\": {}", name, e))
    })?;
    if !rest.trim().is_empty() {
        return Err(CtrlError::Syntax(format!(
            "invalid keyframe \"{}\" near \"{}\"",
            name,
            rest.trim()
        )));
    }

    let mut defaults = String::new();
    let mut body = String::new();
    for (label, declarations) in steps {
        let (rest, items) = many0(parse_keyframe_item)(declarations).map_err(|e| {
            CtrlError::Syntax(format!("invalid keyframe \"{}\" step {}: {}", name, label, e))
        })?;
        if !rest.trim().is_empty() {
            return Err(CtrlError::Syntax(format!(
                "invalid keyframe \"{}\" step {} near \"{}\"",
                name,
                label,
                rest.trim()
            )));
        }

        let _ = write!(body, "{}{{", label);
        for (abbr, raw_value) in items {
            let value = wrap_custom_properties(raw_value);
            match abbr.strip_prefix('$') {
                Some("ty") => {
                    return Err(CtrlError::VariableScope(
                        "\"$ty[...]\": cannot use runtime variable to reference typography."
                            .to_string(),
                    ));
                }
                Some(real) => {
                    let prop = theme.property(real).unwrap_or(real);
                    let var_name = format!("--{}-{}-{}", real, name, label.replace('%', ""));
                    let _ = write!(body, "{}:var({});", prop, var_name);
                    let _ = write!(defaults, "{}:{};", var_name, value);
                }
                None => {
                    let prop = theme.property(abbr).unwrap_or(abbr);
                    let _ = write!(body, "{}:{};", prop, value);
                }
            }
        }
        body.push('}');
    }

    let mut css = String::new();
    if !defaults.is_empty() {
        let _ = write!(css, ":root{{{}}}", defaults);
    }
    let _ = write!(css, "@keyframes {}{{{}}}", name, body);
    Ok(css)
}

/// `label(declarations)` where label is `N%`, `from` or `to`.
fn parse_keyframe_step(input: &str) -> IResult<&str, (&str, &str)> {
    let label = alt((recognize(pair(digit1, char('%'))), tag("from"), tag("to")));
    preceded(
        multispace0,
        pair(label, delimited(char('('), balanced_body, char(')'))),
    )(input)
}

/// Text up to the `)` closing an already opened parenthesis.
fn balanced_body(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Ok((&input[i..], &input[..i])),
            ')' => depth -= 1,
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}

/// `abbr[value]`, with an optional `$` prefix on the abbreviation.
fn parse_keyframe_item(input: &str) -> IResult<&str, (&str, &str)> {
    let abbr = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '$');
    preceded(
        multispace0,
        pair(abbr, terminated(preceded(char('['), take_until("]")), char(']'))),
    )(input)
}

/// `--brand` becomes `var(--brand)`.
fn wrap_custom_properties(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find("--") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push_str("--");
        } else {
            let _ = write!(out, "var(--{})", &after[..len]);
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}
