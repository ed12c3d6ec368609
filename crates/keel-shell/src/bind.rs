//! Argument binder.
//!
//! Resolves a token sequence against a command's declared parameters in
//! two passes: partition tokens into named and positional candidates,
//! then assign, coerce, and validate. Binding is pure -- it never
//! invokes the command body -- and identical inputs always produce
//! identical results.
//!
//! Named syntax: `--name value` and `--name=value` bind identically.
//! A bool parameter consumes no value token (`--verbose` = true, a
//! declared `--no-verbose` = false; `--verbose=false` also works).
//! A quoted `--foo` is always a positional value. Sequence-typed named
//! parameters accept repeated `--name` occurrences; a single occurrence
//! containing a comma is split on commas. Variadic positionals take one
//! element per token and are never comma-split.

use std::collections::HashMap;

use keel_types::{BindError, Value};

use crate::command::{Command, ParamSpec};
use crate::convert::ConverterRegistry;
use crate::pattern::matches_choice_pattern;
use crate::token::Token;
use crate::typedesc::TypeDesc;

/// A fully bound invocation: command path plus coerced argument values.
/// Constructed fresh per input line and consumed by the invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCall {
    pub path: Vec<String>,
    args: HashMap<String, Value>,
}

impl BoundCall {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn bool_arg(&self, name: &str) -> Option<bool> {
        self.args.get(name).and_then(Value::as_bool)
    }

    pub fn int_arg(&self, name: &str) -> Option<i64> {
        self.args.get(name).and_then(Value::as_int)
    }

    pub fn float_arg(&self, name: &str) -> Option<f64> {
        self.args.get(name).and_then(Value::as_float)
    }

    pub fn text_arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_text)
    }

    pub fn list_arg(&self, name: &str) -> Option<&[Value]> {
        self.args.get(name).and_then(Value::as_list)
    }

    pub fn map_arg(&self, name: &str) -> Option<&[(Value, Value)]> {
        self.args.get(name).and_then(Value::as_map)
    }
}

/// How a named argument arrived during partitioning.
enum RawArg {
    /// Bool presence (`--verbose`) or negation (`--no-verbose`).
    Presence(bool),
    /// Raw value strings, one per occurrence.
    Values(Vec<String>),
}

/// Bind `tokens` against `cmd`'s declared parameters.
pub fn bind(
    cmd: &dyn Command,
    converters: &ConverterRegistry,
    tokens: &[Token],
) -> std::result::Result<BoundCall, BindError> {
    let params = cmd.params();

    // Pass 1: partition into named arguments and positional candidates.
    let mut named: HashMap<String, RawArg> = HashMap::new();
    let mut positionals: Vec<&Token> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if !token.is_flag() {
            positionals.push(token);
            i += 1;
            continue;
        }
        let body = &token.text[2..];
        let (name, inline) = match body.split_once('=') {
            Some((n, v)) => (n, Some(v.to_string())),
            None => (body, None),
        };

        // Declared --no-name negation for bool parameters.
        if inline.is_none()
            && let Some(positive) = name.strip_prefix("no-")
            && find_bool_param(&params, positive).is_some()
        {
            push_presence(&mut named, positive, false)?;
            i += 1;
            continue;
        }

        let Some(param) = find_named_param(&params, name) else {
            return Err(BindError::UnexpectedArgument {
                token: token.text.clone(),
            });
        };

        if matches!(base_type(&param.ty), TypeDesc::Bool) && inline.is_none() {
            push_presence(&mut named, &param.name, true)?;
        } else if let Some(value) = inline {
            push_value(&mut named, param, value)?;
        } else {
            let Some(next) = tokens.get(i + 1) else {
                return Err(BindError::MissingValue {
                    param: param.name.clone(),
                });
            };
            push_value(&mut named, param, next.text.clone())?;
            i += 1;
        }
        i += 1;
    }

    // Pass 2: assign positional candidates in declaration order; a
    // trailing variadic absorbs the rest.
    let mut pos_raw: HashMap<String, Vec<String>> = HashMap::new();
    let mut cursor = 0;
    for param in params.iter().filter(|p| p.positional) {
        if param.is_variadic() {
            let rest: Vec<String> =
                positionals[cursor..].iter().map(|t| t.text.clone()).collect();
            cursor = positionals.len();
            if !rest.is_empty() {
                pos_raw.insert(param.name.clone(), rest);
            }
        } else if cursor < positionals.len() {
            pos_raw.insert(
                param.name.clone(),
                vec![positionals[cursor].text.clone()],
            );
            cursor += 1;
        }
    }
    if cursor < positionals.len() {
        return Err(BindError::UnexpectedArgument {
            token: positionals[cursor].text.clone(),
        });
    }

    // Pass 3: coerce, fill defaults, validate completeness.
    let mut args = HashMap::new();
    for param in &params {
        let value = if param.positional {
            match pos_raw.remove(&param.name) {
                Some(raws) => Some(coerce_occurrences(
                    param,
                    &param.ty,
                    &raws,
                    converters,
                    // Variadic elements are one-per-token, never comma-split.
                    !param.is_variadic(),
                )?),
                None => None,
            }
        } else {
            match named.remove(&param.name) {
                Some(RawArg::Presence(b)) => Some(Value::Bool(b)),
                Some(RawArg::Values(raws)) => Some(coerce_occurrences(
                    param,
                    &param.ty,
                    &raws,
                    converters,
                    true,
                )?),
                None => None,
            }
        };

        match value {
            Some(v) => {
                args.insert(param.name.clone(), v);
            },
            None => {
                if let Some(default) = &param.default {
                    args.insert(param.name.clone(), default.clone());
                } else if param.required {
                    return Err(BindError::MissingRequired {
                        param: param.name.clone(),
                    });
                } else {
                    args.insert(param.name.clone(), Value::None);
                }
            },
        }
    }

    Ok(BoundCall {
        path: cmd.path().iter().map(|s| crate::command::normalize_name(s)).collect(),
        args,
    })
}

fn find_named_param<'a>(params: &'a [ParamSpec], name: &str) -> Option<&'a ParamSpec> {
    params.iter().find(|p| !p.positional && p.name == name)
}

fn find_bool_param<'a>(params: &'a [ParamSpec], name: &str) -> Option<&'a ParamSpec> {
    find_named_param(params, name).filter(|p| matches!(base_type(&p.ty), TypeDesc::Bool))
}

/// Strip `Optional` wrappers to the shape that drives coercion.
fn base_type(ty: &TypeDesc) -> &TypeDesc {
    match ty {
        TypeDesc::Optional(inner) => base_type(inner),
        other => other,
    }
}

fn push_presence(
    named: &mut HashMap<String, RawArg>,
    name: &str,
    value: bool,
) -> std::result::Result<(), BindError> {
    if named.contains_key(name) {
        return Err(BindError::DuplicateArgument {
            param: name.to_string(),
        });
    }
    named.insert(name.to_string(), RawArg::Presence(value));
    Ok(())
}

fn push_value(
    named: &mut HashMap<String, RawArg>,
    param: &ParamSpec,
    value: String,
) -> std::result::Result<(), BindError> {
    let repeatable = matches!(
        base_type(&param.ty),
        TypeDesc::Sequence(_) | TypeDesc::Mapping(_, _)
    );
    match named.get_mut(&param.name) {
        None => {
            named.insert(param.name.clone(), RawArg::Values(vec![value]));
            Ok(())
        },
        Some(RawArg::Values(values)) if repeatable => {
            values.push(value);
            Ok(())
        },
        Some(_) => Err(BindError::DuplicateArgument {
            param: param.name.clone(),
        }),
    }
}

/// Coerce one parameter's raw occurrences into a `Value`.
fn coerce_occurrences(
    param: &ParamSpec,
    ty: &TypeDesc,
    raws: &[String],
    converters: &ConverterRegistry,
    comma_split: bool,
) -> std::result::Result<Value, BindError> {
    match ty {
        TypeDesc::Optional(inner) => {
            coerce_occurrences(param, inner, raws, converters, comma_split)
        },
        TypeDesc::Sequence(inner) => {
            let elements = split_elements(raws, comma_split);
            let mut items = Vec::with_capacity(elements.len());
            for element in &elements {
                items.push(coerce_scalar(param, inner, element, converters)?);
            }
            Ok(Value::List(items))
        },
        TypeDesc::Mapping(key_ty, value_ty) => {
            let elements = split_elements(raws, comma_split);
            let mut pairs = Vec::with_capacity(elements.len());
            for element in &elements {
                let Some((k, v)) = element.split_once('=') else {
                    return Err(BindError::TypeMismatch {
                        param: param.name.clone(),
                        expected: ty.expected_shape(),
                        token: element.clone(),
                        allowed: vec![],
                    });
                };
                pairs.push((
                    coerce_scalar(param, key_ty, k, converters)?,
                    coerce_scalar(param, value_ty, v, converters)?,
                ));
            }
            Ok(Value::Map(pairs))
        },
        scalar => {
            // Duplicate checks guarantee a single occurrence here.
            let raw = raws.first().map(String::as_str).unwrap_or_default();
            coerce_scalar(param, scalar, raw, converters)
        },
    }
}

/// Split raw occurrences into sequence/mapping elements. A single
/// occurrence containing a comma is a comma-separated list.
fn split_elements(raws: &[String], comma_split: bool) -> Vec<String> {
    if comma_split && raws.len() == 1 && raws[0].contains(',') {
        return raws[0].split(',').map(str::to_string).collect();
    }
    raws.to_vec()
}

/// Coerce a single raw string against a non-container shape.
fn coerce_scalar(
    param: &ParamSpec,
    ty: &TypeDesc,
    raw: &str,
    converters: &ConverterRegistry,
) -> std::result::Result<Value, BindError> {
    let mismatch = |allowed: Vec<String>| BindError::TypeMismatch {
        param: param.name.clone(),
        expected: ty.expected_shape(),
        token: raw.to_string(),
        allowed,
    };
    match ty {
        TypeDesc::Bool => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(mismatch(vec![])),
        },
        TypeDesc::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| mismatch(vec![])),
        TypeDesc::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| mismatch(vec![])),
        TypeDesc::Text => Ok(Value::Text(raw.to_string())),
        TypeDesc::Enumerated(choices) => {
            if matches_choice_pattern(raw, choices) {
                Ok(Value::Text(raw.to_string()))
            } else {
                Err(mismatch(choices.clone()))
            }
        },
        TypeDesc::Custom(name) => converters.convert(name, raw).map_err(|msg| {
            log::debug!("converter '{name}' rejected '{raw}': {msg}");
            mismatch(vec![])
        }),
        TypeDesc::Optional(inner) => coerce_scalar(param, inner, raw, converters),
        TypeDesc::Sequence(_) | TypeDesc::Mapping(_, _) => {
            // Nested containers inside sequence elements are handed the
            // single raw string with comma splitting enabled.
            coerce_occurrences(param, ty, &[raw.to_string()], converters, true)
        },
    }
}
