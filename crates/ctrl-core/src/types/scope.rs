//! Class-naming strategies and the cross-unit scope registry.
//!
//! A source unit picks its strategy with `@scope`:
//!
//! | Directive      | `.box` becomes      |
//! |----------------|---------------------|
//! | `@scope none`  | `box`               |
//! | `@scope hash`  | `box_<hash>`        |
//! | `@scope app`   | `app_box`           |

use std::collections::HashSet;
use std::fmt;

use nom::{IResult, bytes::complete::take_while1, combinator::all_consuming};

use crate::error::{CtrlError, Result};

/// The naming strategy of one source unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Class names are emitted verbatim.
    #[default]
    None,
    /// Class names get a content-addressed suffix.
    Hash,
    /// Class names are prefixed with the scope name.
    Named(String),
}

impl Scope {
    /// Parses the value of an `@scope` directive.
    ///
    /// ```rust
    /// use ctrl_core::types::Scope;
    ///
    /// assert_eq!(Scope::parse("hash").unwrap(), Scope::Hash);
    /// assert_eq!(Scope::parse("app").unwrap(), Scope::Named("app".into()));
    /// assert!(Scope::parse("my app").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        match value {
            "none" => Ok(Scope::None),
            "hash" => Ok(Scope::Hash),
            _ => match parse_scope_name(value) {
                Ok((_, name)) => Ok(Scope::Named(name.to_string())),
                Err(_) => Err(CtrlError::DirectiveSyntax(format!(
                    "scope name must contain only letters, digits, underscore, or dash. Got: \"{}\"",
                    value
                ))),
            },
        }
    }

    /// Computes the emitted class key for `class_name` whose raw block body is `body`.
    pub fn final_key(&self, class_name: &str, body: &str) -> String {
        match self {
            Scope::None => class_name.to_string(),
            Scope::Hash => {
                let normalized: String = body.chars().filter(|c| !c.is_whitespace()).collect();
                let id = generate_class_id(&format!("{}{}", class_name, normalized));
                format!("{}_{}", class_name, id)
            }
            Scope::Named(scope) => format!("{}_{}", scope, class_name),
        }
    }

    /// The key a bind reference resolves to when the class body is unknown.
    ///
    /// Hashed keys cannot be predicted from the class name, so `hash` returns the
    /// bare name.
    pub fn predicted_key(&self, class_name: &str) -> String {
        match self {
            Scope::None | Scope::Hash => class_name.to_string(),
            Scope::Named(scope) => format!("{}_{}", scope, class_name),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Scope::Named(_))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::None => f.write_str("none"),
            Scope::Hash => f.write_str("hash"),
            Scope::Named(name) => f.write_str(name),
        }
    }
}

fn parse_scope_name(input: &str) -> IResult<&str, &str> {
    all_consuming(take_while1(|c: char| {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }))(input)
}

/// Named scopes already taken by compiled source units.
///
/// The host owns one registry for every unit it compiles together. `none` and
/// `hash` are never recorded.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    used: HashSet<String>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if `scope` is a named scope another unit already claimed.
    pub fn ensure_available(&self, scope: &Scope) -> Result<()> {
        if let Scope::Named(name) = scope {
            if self.used.contains(name) {
                return Err(CtrlError::NameCollision(format!(
                    "scope \"{}\" is already used in another file.",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Records `scope` as taken.
    pub fn claim(&mut self, scope: &Scope) -> Result<()> {
        self.ensure_available(scope)?;
        if let Scope::Named(name) = scope {
            self.used.insert(name.clone());
        }
        Ok(())
    }

    /// Frees a named scope, e.g. when the host recompiles the unit that owns it.
    pub fn release(&mut self, scope: &Scope) -> bool {
        match scope {
            Scope::Named(name) => self.used.remove(name),
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}

/// An emitted class key split back into its scope and class parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalName {
    pub scope: Scope,
    pub class_name: String,
}

impl FinalName {
    /// Best-effort inverse of [`Scope::final_key`].
    ///
    /// A key without `_` is unscoped. A right-hand part of 4 to 10 characters
    /// from `[A-Za-z0-9-]` is taken as a hash suffix, in which case the class name
    /// is the whole key. Anything else splits at the first `_`.
    pub fn parse(key: &str) -> Self {
        let Some((left, right)) = key.split_once('_') else {
            return Self {
                scope: Scope::None,
                class_name: key.to_string(),
            };
        };

        let looks_hashed = (4..=10).contains(&right.len())
            && right.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if looks_hashed {
            Self {
                scope: Scope::Hash,
                class_name: key.to_string(),
            }
        } else {
            Self {
                scope: Scope::Named(left.to_string()),
                class_name: right.to_string(),
            }
        }
    }
}

const CHARS_LENGTH: u32 = 52;

fn alphabetic_char(code: u32) -> char {
    let offset = if code < 26 { 97 } else { 39 };
    char::from_u32(code + offset).unwrap_or('a')
}

/// 32-bit string hash: seed 2929, `h = (h * 33) ^ unit` over UTF-16 units from
/// the last to the first.
pub fn hash_string(input: &str) -> u32 {
    let units: Vec<u16> = input.encode_utf16().collect();
    let mut h: i32 = 2929;
    for &unit in units.iter().rev() {
        h = (h.wrapping_shl(5).wrapping_add(h)) ^ i32::from(unit);
    }
    h as u32
}

/// Renders the hash of `input` as letters, with every `ad` split as `a-d`.
pub fn generate_class_id(input: &str) -> String {
    let mut x = hash_string(input);
    let mut name = Vec::new();
    while x > CHARS_LENGTH {
        name.push(alphabetic_char(x % CHARS_LENGTH));
        x /= CHARS_LENGTH;
    }
    name.push(alphabetic_char(x % CHARS_LENGTH));
    name.reverse();

    let mut out = String::with_capacity(name.len() + 2);
    let mut i = 0;
    while i < name.len() {
        let c = name[i];
        out.push(c);
        let next_is_d = name.get(i + 1).is_some_and(|n| n.eq_ignore_ascii_case(&'d'));
        if c.eq_ignore_ascii_case(&'a') && next_is_d {
            out.push('-');
            out.push(name[i + 1]);
            i += 2;
            continue;
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reserved_scopes() {
        assert_eq!(Scope::parse("none").unwrap(), Scope::None);
        assert_eq!(Scope::parse(" hash ").unwrap(), Scope::Hash);
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        for bad in ["my app", "app!", "", "a.b"] {
            let err = Scope::parse(bad).unwrap_err();
            assert!(matches!(err, CtrlError::DirectiveSyntax(_)), "{bad}");
        }
    }

    #[test]
    fn test_final_key_none_and_named() {
        assert_eq!(Scope::None.final_key("box", "bg[red]"), "box");
        assert_eq!(Scope::Named("app".into()).final_key("box", "bg[red]"), "app_box");
    }

    #[test]
    fn test_hash_ignores_whitespace() {
        let a = Scope::Hash.final_key("box", "bg[red]\n  c[blue]");
        let b = Scope::Hash.final_key("box", "bg[red] c[blue]");
        assert_eq!(a, b);
        assert!(a.starts_with("box_"));
    }

    #[test]
    fn test_hash_changes_with_body_or_name() {
        let a = Scope::Hash.final_key("box", "bg[red]");
        assert_ne!(a, Scope::Hash.final_key("box", "bg[blue]"));
        assert_ne!(a, Scope::Hash.final_key("card", "bg[red]"));
    }

    #[test]
    fn test_hash_string_known_values() {
        assert_eq!(hash_string(""), 2929);
        assert_eq!(hash_string("a"), 96752);
    }

    #[test]
    fn test_generate_class_id_small_values() {
        // 2929 -> digits [1, 4, 17]
        assert_eq!(generate_class_id(""), "ber");
        assert_eq!(generate_class_id("boxbg[red]"), "detWVO");
    }

    #[test]
    fn test_registry_rejects_reuse_of_named_scope() {
        let mut registry = ScopeRegistry::new();
        let app = Scope::Named("app".into());
        registry.claim(&app).unwrap();
        assert!(registry.contains("app"));
        assert!(matches!(
            registry.claim(&app),
            Err(CtrlError::NameCollision(_))
        ));

        registry.claim(&Scope::Hash).unwrap();
        registry.claim(&Scope::Hash).unwrap();
        registry.claim(&Scope::None).unwrap();
        registry.claim(&Scope::None).unwrap();

        assert!(registry.release(&app));
        registry.claim(&app).unwrap();
    }

    #[test]
    fn test_final_name_parse() {
        assert_eq!(
            FinalName::parse("box"),
            FinalName {
                scope: Scope::None,
                class_name: "box".into()
            }
        );
        assert_eq!(
            FinalName::parse("app_box"),
            FinalName {
                scope: Scope::Named("app".into()),
                class_name: "box".into()
            }
        );
        assert_eq!(FinalName::parse("box_bXkQz").scope, Scope::Hash);
    }
}
