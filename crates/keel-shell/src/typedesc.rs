//! Type descriptors.
//!
//! A [`TypeDesc`] normalizes a parameter's declared type into the closed
//! set of shapes the binder and completion engine reason about. Schemas
//! are declared explicitly at registration time; there is no runtime
//! reflection over callables.

/// Closed set of argument shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Bool,
    Int,
    Float,
    Text,
    /// A fixed set of allowed literal values.
    Enumerated(Vec<String>),
    /// May be absent; binds `Value::None` when unassigned.
    Optional(Box<TypeDesc>),
    /// Repeated flag occurrences or a variadic trailing positional.
    Sequence(Box<TypeDesc>),
    /// `key=value` pairs.
    Mapping(Box<TypeDesc>, Box<TypeDesc>),
    /// A named converter looked up in the converter registry.
    Custom(String),
}

impl TypeDesc {
    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Optional(Box::new(inner))
    }

    pub fn sequence(inner: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(inner))
    }

    pub fn mapping(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Mapping(Box::new(key), Box::new(value))
    }

    pub fn enumerated<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeDesc::Enumerated(choices.into_iter().map(Into::into).collect())
    }

    /// Human-readable shape name for error messages.
    pub fn expected_shape(&self) -> String {
        match self {
            TypeDesc::Bool => "a boolean (true/false/1/0/yes/no)".to_string(),
            TypeDesc::Int => "an integer".to_string(),
            TypeDesc::Float => "a number".to_string(),
            TypeDesc::Text => "text".to_string(),
            TypeDesc::Enumerated(choices) => format!("one of [{}]", choices.join(", ")),
            TypeDesc::Optional(inner) => format!("optionally {}", inner.expected_shape()),
            TypeDesc::Sequence(inner) => format!("a list of {}", inner.expected_shape()),
            TypeDesc::Mapping(key, value) => format!(
                "{}={} pairs",
                key.expected_shape(),
                value.expected_shape()
            ),
            TypeDesc::Custom(name) => format!("a valid {name}"),
        }
    }

    /// True for `Sequence` (directly or under `Optional`), which is what
    /// makes a trailing positional variadic.
    pub fn is_sequence(&self) -> bool {
        match self {
            TypeDesc::Sequence(_) => true,
            TypeDesc::Optional(inner) => inner.is_sequence(),
            _ => false,
        }
    }

    /// Structural checks applied when a command is registered.
    ///
    /// Enumerated choices must be non-empty, `Optional` does not nest,
    /// and custom converter names must be non-empty (existence in the
    /// converter registry is checked separately).
    pub fn validate(&self) -> Result<(), String> {
        match self {
            TypeDesc::Enumerated(choices) if choices.is_empty() => {
                Err("enumerated type with no choices".to_string())
            },
            TypeDesc::Optional(inner) => {
                if matches!(**inner, TypeDesc::Optional(_)) {
                    return Err("nested optional type".to_string());
                }
                inner.validate()
            },
            TypeDesc::Sequence(inner) => inner.validate(),
            TypeDesc::Mapping(key, value) => {
                key.validate()?;
                value.validate()
            },
            TypeDesc::Custom(name) if name.is_empty() => {
                Err("custom type with empty converter name".to_string())
            },
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_shapes() {
        assert_eq!(TypeDesc::Int.expected_shape(), "an integer");
        assert_eq!(
            TypeDesc::enumerated(["red", "green"]).expected_shape(),
            "one of [red, green]"
        );
        assert_eq!(
            TypeDesc::sequence(TypeDesc::Text).expected_shape(),
            "a list of text"
        );
        assert_eq!(TypeDesc::Custom("mac-address".into()).expected_shape(), "a valid mac-address");
    }

    #[test]
    fn variadic_detection() {
        assert!(TypeDesc::sequence(TypeDesc::Int).is_sequence());
        assert!(TypeDesc::optional(TypeDesc::sequence(TypeDesc::Int)).is_sequence());
        assert!(!TypeDesc::Text.is_sequence());
    }

    #[test]
    fn validate_rejects_empty_enum() {
        assert!(TypeDesc::Enumerated(vec![]).validate().is_err());
        assert!(TypeDesc::enumerated(["a"]).validate().is_ok());
    }

    #[test]
    fn validate_rejects_nested_optional() {
        let ty = TypeDesc::optional(TypeDesc::optional(TypeDesc::Int));
        assert!(ty.validate().is_err());
    }

    #[test]
    fn validate_recurses_into_containers() {
        let ty = TypeDesc::sequence(TypeDesc::Enumerated(vec![]));
        assert!(ty.validate().is_err());
        let ty = TypeDesc::mapping(TypeDesc::Text, TypeDesc::Custom(String::new()));
        assert!(ty.validate().is_err());
    }
}
