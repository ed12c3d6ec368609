//! keel core: the command-line grammar, argument binder, and completion
//! engine of the keel shell framework.
//!
//! The pieces compose in a fixed order: a raw line goes through the
//! [`token`] module's tokenizer, the resulting tokens resolve through
//! the [`registry`] trie, and the leftover tokens bind against the
//! resolved command's declared parameters in [`bind`]. The [`complete`]
//! module runs the same pipeline tolerantly on a half-typed line to
//! produce context-correct suggestions, ranked by [`fuzzy`] when
//! nothing matches exactly. Everything here is pure, synchronous, and
//! free of shared mutable state; the registry is read-only once built.

pub mod bind;
pub mod command;
pub mod complete;
pub mod convert;
pub mod fuzzy;
pub mod pattern;
pub mod registry;
pub mod token;
pub mod typedesc;

pub use bind::{BoundCall, bind};
pub use command::{Command, Env, Outcome, ParamSpec, normalize_name};
pub use complete::{Completion, complete};
pub use convert::ConverterRegistry;
pub use fuzzy::{damerau_levenshtein, find_approx, suggestions_msg};
pub use pattern::matches_choice_pattern;
pub use registry::Registry;
pub use token::{Token, tokenize, tokenize_partial};
pub use typedesc::TypeDesc;
