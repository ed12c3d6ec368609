//! Converter registry for custom argument types.
//!
//! A converter is a pure `&str -> Value` function registered under a
//! type identifier. `TypeDesc::Custom("mac-address")` resolves through
//! this table; lookup is deterministic and the table is populated by the
//! host before the command registry is built.

use std::collections::HashMap;

use keel_types::Value;

type ConvertFn = dyn Fn(&str) -> std::result::Result<Value, String> + Send + Sync;

/// Named `Text -> Value` converters. Read-only once the session starts.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Box<ConvertFn>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        ConverterRegistry::default()
    }

    /// Register a converter under `name`. Replaces any existing one.
    pub fn register<F>(&mut self, name: &str, convert: F)
    where
        F: Fn(&str) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.converters.insert(name.to_string(), Box::new(convert));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Run the named converter over a raw token.
    ///
    /// `Err` carries the converter's own message; a missing converter
    /// reports itself (registration normally prevents that case).
    pub fn convert(&self, name: &str, raw: &str) -> std::result::Result<Value, String> {
        match self.converters.get(name) {
            Some(f) => f(raw),
            None => Err(format!("no converter registered for '{name}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port_converter(raw: &str) -> std::result::Result<Value, String> {
        raw.parse::<u16>()
            .map(|p| Value::Int(i64::from(p)))
            .map_err(|_| format!("'{raw}' is not a port number"))
    }

    #[test]
    fn convert_success() {
        let mut reg = ConverterRegistry::new();
        reg.register("port", port_converter);
        assert!(reg.contains("port"));
        assert_eq!(reg.convert("port", "8080"), Ok(Value::Int(8080)));
    }

    #[test]
    fn convert_failure_keeps_message() {
        let mut reg = ConverterRegistry::new();
        reg.register("port", port_converter);
        assert_eq!(
            reg.convert("port", "high"),
            Err("'high' is not a port number".to_string())
        );
    }

    #[test]
    fn missing_converter() {
        let reg = ConverterRegistry::new();
        assert!(!reg.contains("port"));
        assert!(reg.convert("port", "1").is_err());
    }
}
