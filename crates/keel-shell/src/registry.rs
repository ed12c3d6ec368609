//! Command registry: a trie keyed by path segment.
//!
//! Built once before the session starts, read-only afterwards. Each node
//! holds its children plus an optional command, so an internal node may
//! itself be invocable (a super command registered at a prefix of its
//! subcommands). Resolution walks the trie consuming leading tokens; it
//! never guesses -- near-miss suggestions live in the fuzzy layer.

use std::collections::BTreeMap;

use keel_types::{ResolveError, Result, ShellError};
use log::debug;

use crate::command::{Command, ParamSpec, normalize_name};
use crate::convert::ConverterRegistry;
use crate::token::Token;

#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
    command: Option<Box<dyn Command>>,
}

/// Read-only (after construction) mapping from command path to command.
#[derive(Default)]
pub struct Registry {
    root: Node,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a command under its declared path.
    ///
    /// Validates the declaration: non-empty unique path, positionals
    /// before named parameters, at most one variadic and only in last
    /// position, unique parameter names, and custom types resolvable
    /// through `converters`. Declaration errors are configuration
    /// errors, caught at startup rather than at bind time.
    pub fn register(
        &mut self,
        cmd: Box<dyn Command>,
        converters: &ConverterRegistry,
    ) -> Result<()> {
        let path: Vec<String> = cmd.path().iter().map(|s| normalize_name(s)).collect();
        if path.is_empty() || path.iter().any(String::is_empty) {
            return Err(ShellError::Config("command with empty path".to_string()));
        }
        validate_params(&path.join(" "), &cmd.params(), converters)?;

        let mut node = &mut self.root;
        for segment in &path {
            node = node.children.entry(segment.clone()).or_default();
        }
        if node.command.is_some() {
            return Err(ShellError::Config(format!(
                "duplicate command path '{}'",
                path.join(" ")
            )));
        }
        debug!("registered command '{}'", path.join(" "));
        node.command = Some(cmd);
        Ok(())
    }

    /// Walk the trie consuming leading path-segment tokens.
    ///
    /// Descends while the next token is an unquoted non-flag token that
    /// exactly (case-sensitively) names a child. Returns the resolved
    /// command and the remaining argument tokens.
    pub fn resolve<'a>(
        &self,
        tokens: &'a [Token],
    ) -> std::result::Result<(&dyn Command, &'a [Token]), ResolveError> {
        let (node, consumed, rest) = self.walk(tokens);
        match &node.command {
            Some(cmd) => Ok((cmd.as_ref(), rest)),
            None => {
                // Name the token that failed to match, or the last
                // matched segment if input stopped at an internal node.
                let name = rest
                    .first()
                    .map(|t| t.text.clone())
                    .or_else(|| consumed.last().cloned())
                    .unwrap_or_default();
                Err(ResolveError::UnknownCommand { name })
            },
        }
    }

    /// Walk as far as possible without requiring a command at the end.
    /// Returns the matched path and the tokens left over.
    pub fn resolve_prefix<'a>(&self, tokens: &'a [Token]) -> (Vec<String>, &'a [Token]) {
        let (_, consumed, rest) = self.walk(tokens);
        (consumed, rest)
    }

    fn walk<'a>(&self, tokens: &'a [Token]) -> (&Node, Vec<String>, &'a [Token]) {
        let mut node = &self.root;
        let mut consumed = Vec::new();
        let mut idx = 0;
        for token in tokens {
            if token.was_quoted || token.text.starts_with("--") {
                break;
            }
            match node.children.get(&token.text) {
                Some(child) => {
                    node = child;
                    consumed.push(token.text.clone());
                    idx += 1;
                },
                None => break,
            }
        }
        (node, consumed, &tokens[idx..])
    }

    /// Command registered at exactly `path`, if any.
    pub fn command_at(&self, path: &[String]) -> Option<&dyn Command> {
        let mut node = &self.root;
        for segment in path {
            node = node.children.get(segment)?;
        }
        node.command.as_deref()
    }

    /// Child segment names under `path` (empty path = top level), in
    /// sorted order. Empty if the path does not exist.
    pub fn child_names(&self, path: &[String]) -> Vec<String> {
        let mut node = &self.root;
        for segment in path {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        node.children.keys().cloned().collect()
    }

    /// All registered commands as `(path, command)`, in path order.
    /// Drives `help` output.
    pub fn commands(&self) -> Vec<(Vec<String>, &dyn Command)> {
        let mut out = Vec::new();
        collect(&self.root, &mut Vec::new(), &mut out);
        out
    }
}

fn collect<'a>(
    node: &'a Node,
    path: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a dyn Command)>,
) {
    if let Some(cmd) = &node.command {
        out.push((path.clone(), cmd.as_ref()));
    }
    for (name, child) in &node.children {
        path.push(name.clone());
        collect(child, path, out);
        path.pop();
    }
}

fn validate_params(
    path: &str,
    params: &[ParamSpec],
    converters: &ConverterRegistry,
) -> Result<()> {
    let mut seen_named = false;
    for (i, param) in params.iter().enumerate() {
        if params[..i].iter().any(|p| p.name == param.name) {
            return Err(ShellError::Config(format!(
                "{path}: duplicate parameter '{}'",
                param.name
            )));
        }
        if param.positional {
            if seen_named {
                return Err(ShellError::Config(format!(
                    "{path}: positional '{}' declared after named parameters",
                    param.name
                )));
            }
            if param.ty.is_sequence() && i + 1 != params.len() {
                // Only the trailing positional may be variadic; anything
                // after it could never be reached.
                let next_positional = params[i + 1..].iter().any(|p| p.positional);
                if next_positional {
                    return Err(ShellError::Config(format!(
                        "{path}: variadic '{}' must be the last positional",
                        param.name
                    )));
                }
            }
        } else {
            seen_named = true;
        }
        if param.required && param.default.is_some() {
            return Err(ShellError::Config(format!(
                "{path}: required parameter '{}' cannot carry a default",
                param.name
            )));
        }
        param.ty.validate().map_err(|msg| {
            ShellError::Config(format!("{path}: parameter '{}': {msg}", param.name))
        })?;
        if let Some(name) = custom_name(&param.ty)
            && !converters.contains(name)
        {
            return Err(ShellError::Config(format!(
                "{path}: parameter '{}' uses unknown converter '{name}'",
                param.name
            )));
        }
    }
    Ok(())
}

fn custom_name(ty: &crate::typedesc::TypeDesc) -> Option<&str> {
    use crate::typedesc::TypeDesc;
    match ty {
        TypeDesc::Custom(name) => Some(name),
        TypeDesc::Optional(inner) | TypeDesc::Sequence(inner) => custom_name(inner),
        TypeDesc::Mapping(key, value) => custom_name(key).or_else(|| custom_name(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::BoundCall;
    use crate::command::{Env, Outcome};
    use crate::typedesc::TypeDesc;

    struct Stub {
        path: Vec<&'static str>,
        params: Vec<ParamSpec>,
    }

    impl Stub {
        fn boxed(path: Vec<&'static str>) -> Box<Self> {
            Box::new(Stub {
                path,
                params: Vec::new(),
            })
        }

        fn with_params(path: Vec<&'static str>, params: Vec<ParamSpec>) -> Box<Self> {
            Box::new(Stub { path, params })
        }
    }

    impl Command for Stub {
        fn path(&self) -> Vec<String> {
            self.path.iter().map(|s| s.to_string()).collect()
        }
        fn description(&self) -> &str {
            "stub"
        }
        fn params(&self) -> Vec<ParamSpec> {
            self.params.clone()
        }
        fn run(&self, _call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
            Ok(Outcome::None)
        }
    }

    fn registry_with(paths: &[Vec<&'static str>]) -> Registry {
        let converters = ConverterRegistry::new();
        let mut reg = Registry::new();
        for path in paths {
            reg.register(Stub::boxed(path.clone()), &converters).unwrap();
        }
        reg
    }

    fn toks(texts: &[&str]) -> Vec<Token> {
        texts.iter().map(|t| Token::bare(t)).collect()
    }

    #[test]
    fn resolve_top_level() {
        let reg = registry_with(&[vec!["status"], vec!["stop"]]);
        let tokens = toks(&["status"]);
        let (cmd, rest) = reg.resolve(&tokens).unwrap();
        assert_eq!(cmd.path(), vec!["status"]);
        assert!(rest.is_empty());
    }

    #[test]
    fn resolve_nested_leaves_args() {
        let reg = registry_with(&[vec!["db", "migrate"]]);
        let tokens = toks(&["db", "migrate", "--steps", "3"]);
        let (cmd, rest) = reg.resolve(&tokens).unwrap();
        assert_eq!(cmd.path(), vec!["db", "migrate"]);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn resolve_unknown_command() {
        let reg = registry_with(&[vec!["status"]]);
        let tokens = toks(&["stah"]);
        assert_eq!(
            reg.resolve(&tokens).map(|_| ()).unwrap_err(),
            ResolveError::UnknownCommand { name: "stah".into() }
        );
    }

    #[test]
    fn resolve_internal_node_without_command() {
        let reg = registry_with(&[vec!["db", "migrate"]]);
        let tokens = toks(&["db"]);
        assert_eq!(
            reg.resolve(&tokens).map(|_| ()).unwrap_err(),
            ResolveError::UnknownCommand { name: "db".into() }
        );
    }

    #[test]
    fn super_command_directly_invocable() {
        let reg = registry_with(&[vec!["db"], vec!["db", "migrate"]]);
        let tokens = toks(&["db"]);
        assert!(reg.resolve(&tokens).is_ok());
    }

    #[test]
    fn quoted_token_never_matches_a_segment() {
        let reg = registry_with(&[vec!["status"]]);
        let mut tokens = toks(&["status"]);
        tokens[0].was_quoted = true;
        assert!(reg.resolve(&tokens).is_err());
    }

    #[test]
    fn duplicate_path_rejected() {
        let converters = ConverterRegistry::new();
        let mut reg = Registry::new();
        reg.register(Stub::boxed(vec!["status"]), &converters).unwrap();
        assert!(reg.register(Stub::boxed(vec!["status"]), &converters).is_err());
    }

    #[test]
    fn path_segments_are_normalized() {
        let reg = registry_with(&[vec!["lookup_hosts"]]);
        let tokens = toks(&["lookup-hosts"]);
        assert!(reg.resolve(&tokens).is_ok());
    }

    #[test]
    fn positional_after_named_rejected() {
        let converters = ConverterRegistry::new();
        let mut reg = Registry::new();
        let cmd = Stub::with_params(
            vec!["bad"],
            vec![
                ParamSpec::named("flag", TypeDesc::Bool),
                ParamSpec::positional("pos", TypeDesc::Text),
            ],
        );
        assert!(reg.register(cmd, &converters).is_err());
    }

    #[test]
    fn variadic_must_be_last_positional() {
        let converters = ConverterRegistry::new();
        let mut reg = Registry::new();
        let cmd = Stub::with_params(
            vec!["bad"],
            vec![
                ParamSpec::positional("rest", TypeDesc::sequence(TypeDesc::Text)),
                ParamSpec::positional("after", TypeDesc::Text),
            ],
        );
        assert!(reg.register(cmd, &converters).is_err());
    }

    #[test]
    fn unknown_converter_rejected() {
        let converters = ConverterRegistry::new();
        let mut reg = Registry::new();
        let cmd = Stub::with_params(
            vec!["mac"],
            vec![ParamSpec::named("addr", TypeDesc::Custom("mac-address".into()))],
        );
        assert!(reg.register(cmd, &converters).is_err());
    }

    #[test]
    fn child_names_and_listing() {
        let reg = registry_with(&[vec!["db", "migrate"], vec!["db", "status"], vec!["stop"]]);
        assert_eq!(reg.child_names(&[]), vec!["db", "stop"]);
        assert_eq!(
            reg.child_names(&["db".to_string()]),
            vec!["migrate", "status"]
        );
        let paths: Vec<String> = reg
            .commands()
            .iter()
            .map(|(p, _)| p.join(" "))
            .collect();
        assert_eq!(paths, vec!["db migrate", "db status", "stop"]);
    }
}
