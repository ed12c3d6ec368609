//! Sample commands for the demo shell.
//!
//! Exercises the argument surface end to end: positional and named
//! parameters, enumerated choices, variadic positionals, sequences,
//! bool flags, defaults, a nested super command, and a custom
//! converter.

use keel_shell::{
    BoundCall, Command, ConverterRegistry, Env, Outcome, ParamSpec, Registry, TypeDesc,
};
use keel_types::{Result, Value};
use log::debug;

/// Register the demo converters. Must run before `register_commands`
/// because the registry validates custom type names at registration.
pub fn register_converters(converters: &mut ConverterRegistry) {
    converters.register("mac-address", parse_mac_address);
}

/// Register all demo commands into a registry.
pub fn register_commands(registry: &mut Registry, converters: &ConverterRegistry) -> Result<()> {
    registry.register(Box::new(TripleCmd), converters)?;
    registry.register(Box::new(PickCmd), converters)?;
    registry.register(Box::new(AskCmd), converters)?;
    registry.register(Box::new(WakeCmd), converters)?;
    registry.register(Box::new(DbStatusCmd), converters)?;
    registry.register(Box::new(DbMigrateCmd), converters)?;
    Ok(())
}

/// Accepts `aa:bb:cc:dd:ee:ff` and `aabb.ccdd.eeff` forms, plus the
/// enumerated choice patterns (`~regex`, `!~regex`) passed through raw.
fn parse_mac_address(raw: &str) -> std::result::Result<Value, String> {
    if raw.starts_with('~') || raw.starts_with("!~") {
        return Ok(Value::Text(raw.to_string()));
    }
    let digits: String = raw
        .chars()
        .filter(|c| *c != ':' && *c != '.')
        .collect();
    if digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(Value::Text(digits.to_lowercase()));
    }
    Err(format!("'{raw}' is not a MAC address"))
}

// ---------------------------------------------------------------------------
// triple
// ---------------------------------------------------------------------------

struct TripleCmd;

impl Command for TripleCmd {
    fn path(&self) -> Vec<String> {
        vec!["triple".to_string()]
    }
    fn description(&self) -> &str {
        "Calculate the triple of the input value"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::positional("number", TypeDesc::Int).describe("Value to triple")]
    }
    fn run(&self, call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
        let n = call.int_arg("number").unwrap_or(0);
        Ok(Outcome::Text(format!("{n} * 3 = {}", n * 3)))
    }
}

// ---------------------------------------------------------------------------
// pick
// ---------------------------------------------------------------------------

struct PickCmd;

impl Command for PickCmd {
    fn path(&self) -> Vec<String> {
        vec!["pick".to_string()]
    }
    fn description(&self) -> &str {
        "A style picking tool"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::named("style", TypeDesc::enumerated(["test", "toast", "toad"]))
                .describe("Pick a style"),
            ParamSpec::named(
                "colors",
                TypeDesc::sequence(TypeDesc::enumerated(["red", "green", "blue"])),
            )
            .default(Value::List(vec![]))
            .describe("More colors"),
        ]
    }
    fn run(&self, call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
        let style = call.text_arg("style").unwrap_or_default();
        let colors: Vec<String> = call
            .list_arg("colors")
            .unwrap_or_default()
            .iter()
            .map(|v| v.to_string())
            .collect();
        Ok(Outcome::Text(format!(
            "style is '{style}', colors are [{}]",
            colors.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// ask
// ---------------------------------------------------------------------------

struct AskCmd;

impl Command for AskCmd {
    fn path(&self) -> Vec<String> {
        vec!["ask".to_string()]
    }
    fn description(&self) -> &str {
        "Echo back any number of words"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("text", TypeDesc::sequence(TypeDesc::Text))
                .describe("Words to echo"),
        ]
    }
    fn run(&self, call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
        let words: Vec<String> = call
            .list_arg("text")
            .unwrap_or_default()
            .iter()
            .map(|v| v.to_string())
            .collect();
        Ok(Outcome::Text(format!("got strings: {}", words.join(" "))))
    }
}

// ---------------------------------------------------------------------------
// wake
// ---------------------------------------------------------------------------

struct WakeCmd;

impl Command for WakeCmd {
    fn path(&self) -> Vec<String> {
        vec!["wake".to_string()]
    }
    fn description(&self) -> &str {
        "Send a wake-on-LAN packet (pretend)"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("mac", TypeDesc::Custom("mac-address".to_string()))
                .describe("Target MAC address"),
        ]
    }
    fn run(&self, call: &BoundCall, _env: &mut Env) -> Result<Outcome> {
        let mac = call.text_arg("mac").unwrap_or_default();
        debug!("pretend wake packet to {mac}");
        Ok(Outcome::Text(format!("waking {mac}")))
    }
}

// ---------------------------------------------------------------------------
// db (super command with subcommands)
// ---------------------------------------------------------------------------

const MIGRATION_KEY: &str = "db.migration";

struct DbStatusCmd;

impl Command for DbStatusCmd {
    fn path(&self) -> Vec<String> {
        vec!["db".to_string(), "status".to_string()]
    }
    fn description(&self) -> &str {
        "Show the current migration level"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![]
    }
    fn run(&self, call: &BoundCall, env: &mut Env) -> Result<Outcome> {
        debug!("running '{}'", call.path.join(" "));
        let level = env
            .get(MIGRATION_KEY)
            .and_then(Value::as_int)
            .unwrap_or(0);
        Ok(Outcome::Text(format!("migration level: {level}")))
    }
}

struct DbMigrateCmd;

impl Command for DbMigrateCmd {
    fn path(&self) -> Vec<String> {
        vec!["db".to_string(), "migrate".to_string()]
    }
    fn description(&self) -> &str {
        "Apply migrations up or down"
    }
    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("direction", TypeDesc::enumerated(["up", "down"]))
                .describe("Migration direction"),
            ParamSpec::named("steps", TypeDesc::Int)
                .default(Value::Int(1))
                .describe("How many migrations to apply"),
            ParamSpec::named("dry-run", TypeDesc::Bool)
                .default(Value::Bool(false))
                .describe("Report without changing anything"),
        ]
    }
    fn run(&self, call: &BoundCall, env: &mut Env) -> Result<Outcome> {
        let direction = call.text_arg("direction").unwrap_or("up");
        let steps = call.int_arg("steps").unwrap_or(1);
        let dry_run = call.bool_arg("dry-run") == Some(true);

        let level = env
            .get(MIGRATION_KEY)
            .and_then(Value::as_int)
            .unwrap_or(0);
        let delta = if direction == "up" { steps } else { -steps };
        let next = (level + delta).max(0);

        if dry_run {
            return Ok(Outcome::Text(format!(
                "would migrate {direction} {steps} step(s): {level} -> {next}"
            )));
        }
        env.set(MIGRATION_KEY, Value::Int(next));
        Ok(Outcome::Text(format!(
            "migrated {direction} {steps} step(s): {level} -> {next}"
        )))
    }
}
