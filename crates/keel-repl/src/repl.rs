//! The REPL loop: thin orchestration over the keel core.
//!
//! One iteration reads a line, tokenizes it, resolves the command path,
//! binds arguments, and invokes the command body. Every core failure is
//! a structured error reported through the sink; the loop then returns
//! to awaiting input. Command-body failures are caught at the
//! invocation boundary -- the one place unexpected conditions are
//! tolerated -- and never terminate the loop. Only [`Outcome::Exit`] or
//! end of input does.

use keel_shell::{
    Command, ConverterRegistry, Env, Outcome, ParamSpec, Registry, bind, complete, find_approx,
    normalize_name, suggestions_msg, tokenize,
};
use keel_types::{BindError, ResolveError, Result, ShellError};
use log::{debug, info};

use crate::builtins::register_builtins;
use crate::config::ShellConfig;
use crate::io::{LineSource, OutputSink};

/// An interactive shell session over a built registry.
pub struct Repl {
    registry: Registry,
    converters: ConverterRegistry,
    config: ShellConfig,
    history: Vec<String>,
}

impl Repl {
    /// Wrap a registry for interactive use, adding the built-in
    /// commands (`help`, `exit`, `quit`).
    pub fn new(
        mut registry: Registry,
        converters: ConverterRegistry,
        config: ShellConfig,
    ) -> Result<Self> {
        register_builtins(&mut registry, &converters)?;
        Ok(Repl {
            registry,
            converters,
            config,
            history: Vec::new(),
        })
    }

    /// The registry, for hosts that drive completion themselves.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Compute completions for a partial line; safe to call from a line
    /// editor on every keystroke.
    pub fn complete(&self, line: &str, cursor: usize) -> keel_shell::Completion {
        complete(&self.registry, line, cursor)
    }

    /// In-session command history, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Run until end of input or an `exit` builtin.
    pub fn run(
        &mut self,
        source: &mut dyn LineSource,
        sink: &mut dyn OutputSink,
        env: &mut Env,
    ) -> Result<()> {
        info!("shell session started");
        loop {
            let Some(line) = source.read_line(&self.config.prompt)? else {
                break;
            };
            match self.eval_line(&line, env) {
                Ok(Outcome::Exit) => break,
                Ok(Outcome::Text(text)) => sink.print(&text),
                Ok(Outcome::None) => {},
                Err(err) => sink.error(&self.render_error(&line, &err)),
            }
        }
        info!("shell session ended");
        Ok(())
    }

    /// Evaluate one line: tokenize, resolve, bind, execute.
    ///
    /// On final submit an unterminated quote is a hard error. The
    /// command body's failure is wrapped as an execution error at the
    /// invocation boundary.
    pub fn eval_line(&mut self, line: &str, env: &mut Env) -> Result<Outcome> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Outcome::None);
        }
        self.push_history(trimmed);

        let tokens = tokenize(trimmed)?;
        if tokens.is_empty() {
            return Ok(Outcome::None);
        }

        // `help` needs the registry, which commands never see; the loop
        // intercepts it before dispatch.
        if !tokens[0].was_quoted && tokens[0].text == "help" {
            return Ok(Outcome::Text(self.render_help(&tokens[1..])));
        }

        let (cmd, rest) = self.registry.resolve(&tokens)?;
        let call = bind(cmd, &self.converters, rest)?;
        debug!("executing '{}'", call.path.join(" "));
        match cmd.run(&call, env) {
            Ok(outcome) => Ok(outcome),
            // Bodies that already raise an execution error pass through
            // unchanged; anything else is wrapped at the boundary.
            Err(err @ ShellError::Exec(_)) => Err(err),
            Err(other) => Err(ShellError::Exec(other.to_string())),
        }
    }

    fn push_history(&mut self, line: &str) {
        if self.history.last().is_some_and(|last| last == line) {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > self.config.history_limit {
            self.history.remove(0);
        }
    }

    /// One-line error rendering, with ranked near-miss suggestions for
    /// unknown commands and enumerated mismatches.
    fn render_error(&self, line: &str, err: &ShellError) -> String {
        match err {
            ShellError::Resolve(ResolveError::UnknownCommand { name }) => {
                let tokens = tokenize(line.trim()).unwrap_or_default();
                let (path, _) = self.registry.resolve_prefix(&tokens);
                let mut suggestions = find_approx(name, self.registry.child_names(&path));
                suggestions.truncate(self.config.max_suggestions);
                format!("{err}{}", suggestions_msg(&suggestions))
            },
            ShellError::Bind(BindError::TypeMismatch { token, allowed, .. })
                if !allowed.is_empty() =>
            {
                let mut suggestions = find_approx(token, allowed);
                suggestions.truncate(self.config.max_suggestions);
                format!("{err}{}", suggestions_msg(&suggestions))
            },
            _ => err.to_string(),
        }
    }

    /// `help` -> command table; `help <path...>` -> one command's usage.
    fn render_help(&self, args: &[keel_shell::Token]) -> String {
        if args.is_empty() {
            let commands = self.registry.commands();
            let width = commands
                .iter()
                .map(|(path, _)| path.join(" ").len())
                .max()
                .unwrap_or(0);
            return commands
                .iter()
                .map(|(path, cmd)| {
                    format!("{:width$}  {}", path.join(" "), cmd.description())
                })
                .collect::<Vec<_>>()
                .join("\n");
        }

        let path: Vec<String> = args.iter().map(|t| normalize_name(&t.text)).collect();
        match self.registry.command_at(&path) {
            Some(cmd) => describe_command(&path, cmd),
            None => {
                let mut suggestions =
                    find_approx(&path.join(" "), self.registry.child_names(&[]));
                suggestions.truncate(self.config.max_suggestions);
                format!(
                    "no such command '{}'{}",
                    path.join(" "),
                    suggestions_msg(&suggestions)
                )
            },
        }
    }
}

fn describe_command(path: &[String], cmd: &dyn Command) -> String {
    let params = cmd.params();
    let mut lines = vec![
        format!("usage: {}", usage_line(path, &params)),
        String::new(),
        cmd.description().to_string(),
    ];
    if !params.is_empty() {
        lines.push(String::new());
        let width = params.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for p in &params {
            let mut detail = p.ty.expected_shape();
            if let Some(default) = &p.default {
                detail.push_str(&format!(" (default: {default})"));
            } else if !p.required {
                detail.push_str(" (optional)");
            }
            if !p.description.is_empty() {
                detail.push_str(&format!(" -- {}", p.description));
            }
            lines.push(format!("  {:width$}  {detail}", p.name));
        }
    }
    lines.join("\n")
}

/// Render a usage synopsis from the declared parameters.
fn usage_line(path: &[String], params: &[ParamSpec]) -> String {
    let mut parts = vec![path.join(" ")];
    for p in params {
        let core = if p.positional {
            if p.is_variadic() {
                format!("<{}>...", p.name)
            } else {
                format!("<{}>", p.name)
            }
        } else if matches!(p.ty, keel_shell::TypeDesc::Bool) {
            format!("--{}", p.name)
        } else {
            format!("--{} <{}>", p.name, p.name)
        };
        parts.push(if p.required {
            core
        } else {
            format!("[{core}]")
        });
    }
    parts.join(" ")
}
