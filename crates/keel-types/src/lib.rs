//! Shared leaf types for the keel shell framework.
//!
//! Everything other keel crates exchange across boundaries lives here:
//! the coerced argument [`Value`] and the error taxonomy.

pub mod error;
pub mod value;

pub use error::{BindError, LexError, ResolveError, Result, ShellError};
pub use value::Value;
