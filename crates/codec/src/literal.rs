//! The parsed nested-literal value tree.
//!
//! Exported artifacts are nested-literal text; the parser produces
//! this tree, migration transforms operate on it, and the importer
//! reads live objects out of it. Dict entries are ordered pairs, not
//! a map, since attribute order in the text is meaningful and preserved.

use serde::{Deserialize, Serialize};

/// One value in the nested-literal tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// The `None` sentinel.
    None,
    /// `True` / `False`.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal (single- or double-quoted in text).
    Str(String),
    /// Parenthesized tuple.
    Tuple(Vec<Literal>),
    /// Bracketed list.
    List(Vec<Literal>),
    /// Braced set (no key/value pairs).
    Set(Vec<Literal>),
    /// Braced dict as ordered `(key, value)` pairs.
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Short kind name for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Dict(_) => "dict",
        }
    }

    /// Borrow as a string, if this is a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow as a bool, if this is a bool literal.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Borrow as an integer, if this is an int literal.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric value of an int or float literal.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Elements of a tuple or list literal.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Self::Tuple(items) | Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Elements of a list literal specifically.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Ordered pairs of a dict literal.
    #[must_use]
    pub fn as_dict(&self) -> Option<&[(Literal, Literal)]> {
        match self {
            Self::Dict(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a dict entry by string key.
    #[must_use]
    pub fn dict_get(&self, key: &str) -> Option<&Literal> {
        self.as_dict()?
            .iter()
            .find_map(|(k, v)| (k.as_str() == Some(key)).then_some(v))
    }
}

/// Quote a string as a single-quoted literal, escaping as needed.
#[must_use]
pub fn quote_single(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => {
                let text = value.to_string();
                if text.contains(['.', 'e', 'E']) || !value.is_finite() {
                    write!(f, "{text}")
                } else {
                    // Keep float literals float-looking on re-emit.
                    write!(f, "{text}.0")
                }
            }
            Self::Str(value) => write!(f, "{}", quote_single(value)),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Set(items) => {
                if items.is_empty() {
                    return write!(f, "set()");
                }
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "}}")
            }
            Self::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dict_get() {
        let dict = Literal::Dict(vec![(
            Literal::Str("profile".to_string()),
            Literal::Str("/interaction_profiles/oculus/touch_controller".to_string()),
        )]);
        assert_eq!(
            dict.dict_get("profile").and_then(Literal::as_str),
            Some("/interaction_profiles/oculus/touch_controller")
        );
        assert!(dict.dict_get("missing").is_none());
    }

    #[test]
    fn test_display_reprs() {
        assert_eq!(Literal::None.to_string(), "None");
        assert_eq!(Literal::Bool(true).to_string(), "True");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(Literal::Str("a'b".to_string()).to_string(), "'a\\'b'");
        assert_eq!(
            Literal::Tuple(vec![Literal::Int(3)]).to_string(),
            "(3,)"
        );
        assert_eq!(Literal::Set(Vec::new()).to_string(), "set()");
    }

    #[test]
    fn test_as_float_accepts_int() {
        assert_eq!(Literal::Int(3).as_float(), Some(3.0));
        assert_eq!(Literal::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Literal::Str("x".to_string()).as_float(), None);
    }
}
