//! keel REPL: thin orchestration over the keel core.
//!
//! The loop owns a built [`keel_shell::Registry`] and drives it against
//! two external collaborators: a [`LineSource`] that produces finished
//! lines and an [`OutputSink`] that renders results. Everything
//! algorithmic (tokenizing, resolution, binding, completion) lives in
//! `keel-shell`; this crate only sequences it and reports errors.

pub mod builtins;
pub mod config;
pub mod io;
pub mod repl;

pub use builtins::register_builtins;
pub use config::ShellConfig;
pub use io::{BufferSink, LineSource, OutputSink, ScriptedSource};
pub use repl::Repl;
