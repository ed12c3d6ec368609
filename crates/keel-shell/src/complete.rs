//! Interactive completion engine.
//!
//! Given a partial line and cursor offset, computes valid continuations:
//! command path segments, flag names, or literal values for enumerated
//! and bool parameters. Exact-prefix candidates come first; with none,
//! near misses are ranked by edit distance. Read-only and idempotent --
//! this engine never invokes command bodies.

use crate::command::{Command, ParamSpec};
use crate::fuzzy::find_approx;
use crate::registry::Registry;
use crate::token::{Token, tokenize_partial};
use crate::typedesc::TypeDesc;

/// Candidate continuations plus the byte span of the line the caller
/// should replace with a picked candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub candidates: Vec<String>,
    pub span: (usize, usize),
}

impl Completion {
    fn empty(at: usize) -> Self {
        Completion {
            candidates: Vec::new(),
            span: (at, at),
        }
    }
}

/// Compute completions for `line` with the cursor at byte `cursor`.
pub fn complete(registry: &Registry, line: &str, cursor: usize) -> Completion {
    let mut cursor = cursor.min(line.len());
    while cursor > 0 && !line.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let prefix = &line[..cursor];

    // Tolerant lex: an open quote is "still typing", not an error.
    let (tokens, in_token) = tokenize_partial(prefix);
    let (completed, partial, span_start) = if in_token {
        let last = tokens.len() - 1;
        (&tokens[..last], tokens[last].clone(), tokens[last].start)
    } else {
        (
            &tokens[..],
            Token {
                text: String::new(),
                was_quoted: false,
                start: cursor,
                end: cursor,
            },
            cursor,
        )
    };
    let span = (span_start, cursor);

    let (path, rest) = registry.resolve_prefix(completed);
    let command = registry.command_at(&path);

    if !rest.is_empty() {
        // Tokens beyond the trie walk: argument territory, or garbage
        // after an unresolvable path (nothing useful to offer there).
        return match command {
            Some(cmd) => complete_args(cmd, rest, &partial, span, cursor),
            None => Completion::empty(cursor),
        };
    }

    // Flag-ish partial after a resolved command is never a path segment.
    if let Some(cmd) = command
        && partial.text.starts_with("--")
        && !partial.was_quoted
    {
        return complete_args(cmd, rest, &partial, span, cursor);
    }

    let names = registry.child_names(&path);
    let candidates = rank(&partial.text, &names);
    if !candidates.is_empty() {
        return Completion { candidates, span };
    }
    match command {
        Some(cmd) => complete_args(cmd, rest, &partial, span, cursor),
        None => Completion::empty(cursor),
    }
}

/// Prefix matches first (case-sensitive, already sorted by the trie);
/// with none, fall back to fuzzy ranking.
fn rank(partial: &str, names: &[String]) -> Vec<String> {
    let exact: Vec<String> = names
        .iter()
        .filter(|n| n.starts_with(partial))
        .cloned()
        .collect();
    if !exact.is_empty() {
        return exact;
    }
    if partial.is_empty() {
        return Vec::new();
    }
    find_approx(partial, names)
}

fn complete_args(
    cmd: &dyn Command,
    rest: &[Token],
    partial: &Token,
    span: (usize, usize),
    cursor: usize,
) -> Completion {
    let params = cmd.params();

    if partial.text.starts_with("--") && !partial.was_quoted {
        // `--name=val` completes the value; otherwise the flag name.
        if let Some((name, value_partial)) = partial.text[2..].split_once('=') {
            let Some(param) = params.iter().find(|p| !p.positional && p.name == name) else {
                return Completion::empty(cursor);
            };
            let value_span = (span.0 + 2 + name.len() + 1, cursor);
            return Completion {
                candidates: rank_literals(param, value_partial),
                span: value_span,
            };
        }
        return Completion {
            candidates: flag_candidates(&params, rest, &partial.text),
            span,
        };
    }

    // Value position directly after `--name` (non-bool flags consume the
    // following token as their value).
    if let Some(prev) = rest.last()
        && prev.is_flag()
        && !prev.text.contains('=')
    {
        let name = &prev.text[2..];
        if let Some(param) = params
            .iter()
            .find(|p| !p.positional && p.name == name)
            .filter(|p| !matches!(base_type(&p.ty), TypeDesc::Bool))
        {
            return Completion {
                candidates: rank_literals(param, &partial.text),
                span,
            };
        }
    }

    // Positional slot: enumerated positionals complete their choices,
    // free-form slots complete nothing.
    match positional_slot(&params, rest) {
        Some(param) => Completion {
            candidates: rank_literals(param, &partial.text),
            span,
        },
        None => Completion::empty(cursor),
    }
}

/// Declared flag names not yet present on the line, as `--name`,
/// filtered by the typed prefix.
fn flag_candidates(params: &[ParamSpec], rest: &[Token], partial: &str) -> Vec<String> {
    let present: Vec<&str> = rest
        .iter()
        .filter(|t| t.is_flag())
        .map(|t| {
            let body = &t.text[2..];
            let name = body.split_once('=').map_or(body, |(n, _)| n);
            name.strip_prefix("no-").unwrap_or(name)
        })
        .collect();

    let mut names: Vec<String> = params
        .iter()
        .filter(|p| !p.positional)
        .filter(|p| {
            let repeatable = matches!(
                base_type(&p.ty),
                TypeDesc::Sequence(_) | TypeDesc::Mapping(_, _)
            );
            repeatable || !present.contains(&p.name.as_str())
        })
        .map(|p| format!("--{}", p.name))
        .filter(|n| n.starts_with(partial))
        .collect();
    names.sort();
    names
}

/// Allowed literals for enumerated and bool shapes; empty for free-form.
fn rank_literals(param: &ParamSpec, partial: &str) -> Vec<String> {
    let literals: Vec<String> = match literal_type(&param.ty) {
        Some(TypeDesc::Bool) => ["false", "no", "true", "yes"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        Some(TypeDesc::Enumerated(choices)) => {
            let mut sorted = choices.clone();
            sorted.sort();
            sorted
        },
        _ => return Vec::new(),
    };
    rank(partial, &literals)
}

/// The shape whose literal values a completion should offer, looking
/// through optional and sequence wrappers.
fn literal_type(ty: &TypeDesc) -> Option<&TypeDesc> {
    match ty {
        TypeDesc::Bool | TypeDesc::Enumerated(_) => Some(ty),
        TypeDesc::Optional(inner) | TypeDesc::Sequence(inner) => literal_type(inner),
        _ => None,
    }
}

fn base_type(ty: &TypeDesc) -> &TypeDesc {
    match ty {
        TypeDesc::Optional(inner) => base_type(inner),
        other => other,
    }
}

/// Which positional parameter the next positional candidate would land
/// on, given the argument tokens already typed.
fn positional_slot<'a>(params: &'a [ParamSpec], rest: &[Token]) -> Option<&'a ParamSpec> {
    let mut used = 0usize;
    let mut i = 0;
    while i < rest.len() {
        let t = &rest[i];
        if t.is_flag() {
            let body = &t.text[2..];
            let inline = body.contains('=');
            let name = body.split_once('=').map_or(body, |(n, _)| n);
            let negation = name.strip_prefix("no-").is_some();
            let consumes_value = !inline
                && !negation
                && params
                    .iter()
                    .find(|p| !p.positional && p.name == name)
                    .is_none_or(|p| !matches!(base_type(&p.ty), TypeDesc::Bool));
            if consumes_value {
                i += 1;
            }
        } else {
            used += 1;
        }
        i += 1;
    }

    let mut seen = 0usize;
    for param in params.iter().filter(|p| p.positional) {
        if param.is_variadic() {
            return Some(param);
        }
        if seen == used {
            return Some(param);
        }
        seen += 1;
    }
    None
}
