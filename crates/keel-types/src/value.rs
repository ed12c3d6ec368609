//! Coerced argument values.

use std::fmt;

/// A coerced argument value, produced by the binder and consumed by
/// command bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Sequence-typed argument (repeated flag or variadic positional).
    List(Vec<Value>),
    /// Mapping-typed argument (`key=value` pairs, insertion order kept).
    Map(Vec<(Value, Value)>),
    /// An optional parameter that was not supplied.
    None,
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// True for `Value::None` (an absent optional).
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            },
            Value::Map(pairs) => {
                let parts: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            },
            Value::None => write!(f, "(none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Int(7).as_float(), Some(7.0));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Text("hi".into()).as_text(), Some("hi"));
        assert_eq!(Value::Text("hi".into()).as_int(), None);
        assert!(Value::None.is_none());
    }

    #[test]
    fn display_scalars() {
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Text("ok".into()).to_string(), "ok");
        assert_eq!(Value::None.to_string(), "(none)");
    }

    #[test]
    fn display_containers() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list.to_string(), "[1, 2]");
        let map = Value::Map(vec![(Value::Text("a".into()), Value::Int(1))]);
        assert_eq!(map.to_string(), "{a=1}");
    }
}
