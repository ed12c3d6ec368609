//! Error taxonomy for the keel shell framework.
//!
//! Every failure in the core is a value, never an unwound panic. The
//! tokenizer, resolver, and binder each have their own error enum so
//! callers can match on exactly the failures their stage can produce;
//! [`ShellError`] is the umbrella the REPL loop reports.

use std::io;

/// Tokenizer failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A quote opened at `offset` (byte position) was never closed.
    #[error("unterminated quote starting at offset {offset}")]
    UnterminatedQuote { offset: usize },
}

/// Command-path resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No registered command matches the attempted segment. Resolution
    /// never guesses; "did you mean" candidates come from the fuzzy layer.
    #[error("unknown command: {name}")]
    UnknownCommand { name: String },
}

/// Argument-binding failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// A token could not be coerced to the parameter's declared shape.
    /// `allowed` is non-empty only for enumerated parameters.
    #[error("argument '{param}': expected {expected}, got '{token}'")]
    TypeMismatch {
        param: String,
        expected: String,
        token: String,
        allowed: Vec<String>,
    },

    #[error("missing required argument '{param}'")]
    MissingRequired { param: String },

    #[error("unexpected argument '{token}'")]
    UnexpectedArgument { token: String },

    #[error("argument '{param}' given more than once")]
    DuplicateArgument { param: String },

    /// A trailing `--name` with no value token following it.
    #[error("argument '{param}' expects a value")]
    MissingValue { param: String },
}

/// Top-level error for the shell: the taxonomy above plus execution and
/// host-facing failures.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Bind(#[from] BindError),

    /// Opaque wrapper around whatever a command body raised. Caught at the
    /// invocation boundary; never terminates the loop.
    #[error("command failed: {0}")]
    Exec(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
