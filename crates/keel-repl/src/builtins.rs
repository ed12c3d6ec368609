//! Built-in commands every keel shell carries.
//!
//! `help` is registered so it lists and completes like any other
//! command, but the loop intercepts it before dispatch because only the
//! loop holds the registry. `exit` and `quit` terminate through the
//! normal dispatch path by returning [`Outcome::Exit`].

use keel_shell::{
    BoundCall, Command, ConverterRegistry, Env, Outcome, ParamSpec, Registry, TypeDesc,
};
use keel_types::Result;

/// Register the built-in commands into a registry.
pub fn register_builtins(registry: &mut Registry, converters: &ConverterRegistry) -> Result<()> {
    registry.register(Box::new(HelpCmd), converters)?;
    registry.register(Box::new(ExitCmd { name: "exit" }), converters)?;
    registry.register(Box::new(ExitCmd { name: "quit" }), converters)?;
    Ok(())
}

struct HelpCmd;

impl Command for HelpCmd {
    fn path(&self) -> Vec<String> {
        vec!["help".to_string()]
    }
    fn description(&self) -> &str {
        "List commands, or show usage for one command"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("command", TypeDesc::sequence(TypeDesc::Text))
                .optional()
                .describe("Command path to describe"),
        ]
    }
    fn run(&self, _call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
        // The loop intercepts `help` before dispatch; this body only
        // runs if a host drives the command directly.
        Ok(Outcome::Text(
            "help is handled by the shell loop".to_string(),
        ))
    }
}

struct ExitCmd {
    name: &'static str,
}

impl Command for ExitCmd {
    fn path(&self) -> Vec<String> {
        vec![self.name.to_string()]
    }
    fn description(&self) -> &str {
        "Leave the shell"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![]
    }
    fn run(&self, _call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
        Ok(Outcome::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_shell::{bind, tokenize};

    #[test]
    fn builtins_register_cleanly() {
        let converters = ConverterRegistry::new();
        let mut registry = Registry::new();
        register_builtins(&mut registry, &converters).unwrap();
        let names = registry.child_names(&[]);
        assert_eq!(names, vec!["exit", "help", "quit"]);
    }

    #[test]
    fn exit_signals_termination() {
        let converters = ConverterRegistry::new();
        let mut registry = Registry::new();
        register_builtins(&mut registry, &converters).unwrap();
        let tokens = tokenize("exit").unwrap();
        let (cmd, rest) = registry.resolve(&tokens).unwrap();
        let call = bind(cmd, &converters, rest).unwrap();
        let mut env = Env::new();
        assert_eq!(cmd.run(&call, &mut env).unwrap(), Outcome::Exit);
    }
}
