//! Command and parameter descriptors.
//!
//! Commands implement the [`Command`] trait and declare their parameter
//! schema as an ordered list of [`ParamSpec`]s. The registry validates
//! the declaration once at registration; the binder and completion
//! engine then drive everything from the declared shapes.

use std::collections::HashMap;

use keel_types::{Result, Value};

use crate::bind::BoundCall;
use crate::typedesc::TypeDesc;

/// Normalize a declared name into its user-facing form: runs of
/// underscores become single dashes, leading/trailing dashes dropped
/// (`lookup_hosts` -> `lookup-hosts`).
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch == '_' || ch == '-' {
            pending_dash = !out.is_empty();
        } else {
            if pending_dash {
                out.push('-');
                pending_dash = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Declared schema for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: TypeDesc,
    /// Must be assigned (or carry a default) for binding to succeed.
    pub required: bool,
    pub default: Option<Value>,
    /// Bound by position rather than by `--name`.
    pub positional: bool,
    pub description: String,
}

impl ParamSpec {
    /// A required named (`--name value`) parameter.
    pub fn named(name: &str, ty: TypeDesc) -> Self {
        ParamSpec {
            name: normalize_name(name),
            ty,
            required: true,
            default: None,
            positional: false,
            description: String::new(),
        }
    }

    /// A required positional parameter.
    pub fn positional(name: &str, ty: TypeDesc) -> Self {
        ParamSpec {
            name: normalize_name(name),
            ty,
            required: true,
            default: None,
            positional: true,
            description: String::new(),
        }
    }

    /// Mark the parameter optional (binds `Value::None` when absent and
    /// no default is declared).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Declare a default value; implies optional.
    pub fn default(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    /// Variadic = the trailing sequence-typed positional.
    pub fn is_variadic(&self) -> bool {
        self.positional && self.ty.is_sequence()
    }
}

/// Result of running a command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to hand to the output sink.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal the REPL loop to terminate.
    Exit,
}

/// Shared mutable session state passed to every command body.
///
/// The host populates it before the loop starts; command bodies may read
/// and write values across invocations.
#[derive(Default)]
pub struct Env {
    vars: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }
}

/// A single executable command.
pub trait Command {
    /// Full command path (e.g. `["db", "migrate"]`). Segments are
    /// normalized by the registry on registration.
    fn path(&self) -> Vec<String>;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Declared parameter schema, in declaration order.
    fn params(&self) -> Vec<ParamSpec>;

    /// Execute with a fully bound call. Binding has already coerced and
    /// validated every argument.
    fn run(&self, call: &BoundCall, env: &mut Env) -> Result<Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_names() {
        assert_eq!(normalize_name("lookup_hosts"), "lookup-hosts");
        assert_eq!(normalize_name("some__very___special"), "some-very-special");
        assert_eq!(normalize_name("__special__"), "special");
        assert_eq!(normalize_name("plain"), "plain");
    }

    #[test]
    fn named_param_defaults() {
        let p = ParamSpec::named("dry_run", TypeDesc::Bool);
        assert_eq!(p.name, "dry-run");
        assert!(p.required);
        assert!(!p.positional);
        assert!(p.default.is_none());
    }

    #[test]
    fn default_implies_optional() {
        let p = ParamSpec::named("count", TypeDesc::Int).default(Value::Int(1));
        assert!(!p.required);
        assert_eq!(p.default, Some(Value::Int(1)));
    }

    #[test]
    fn variadic_is_trailing_sequence_positional() {
        let p = ParamSpec::positional("rest", TypeDesc::sequence(TypeDesc::Text));
        assert!(p.is_variadic());
        let p = ParamSpec::named("rest", TypeDesc::sequence(TypeDesc::Text));
        assert!(!p.is_variadic());
    }

    #[test]
    fn env_round_trip() {
        let mut env = Env::new();
        env.set("verbose", Value::Bool(true));
        assert_eq!(env.get("verbose"), Some(&Value::Bool(true)));
        assert_eq!(env.remove("verbose"), Some(Value::Bool(true)));
        assert_eq!(env.get("verbose"), None);
    }
}
