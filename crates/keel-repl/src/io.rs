//! Collaborator traits at the REPL boundary.
//!
//! The loop reads whole lines from a [`LineSource`] and hands rendered
//! text to an [`OutputSink`]. Line editing, key bindings, and any
//! per-keystroke completion calls live entirely on the collaborator's
//! side; the loop only ever sees finished lines.

use std::io;

/// Produces one raw input line per call.
pub trait LineSource {
    /// Read the next line, displaying `prompt` however the source sees
    /// fit. `Ok(None)` signals end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Accepts rendered output. Formatting (color, tables) is the sink's
/// business.
pub trait OutputSink {
    fn print(&mut self, text: &str);
    fn error(&mut self, text: &str);
}

/// A line source fed from a fixed script. Used by embedding hosts to
/// drive the shell non-interactively and by tests.
pub struct ScriptedSource {
    lines: std::vec::IntoIter<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedSource {
            lines: lines
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.next())
    }
}

/// A sink that captures output in memory.
#[derive(Default)]
pub struct BufferSink {
    pub printed: Vec<String>,
    pub errors: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }
}

impl OutputSink for BufferSink {
    fn print(&mut self, text: &str) {
        self.printed.push(text.to_string());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_yields_lines_then_eof() {
        let mut source = ScriptedSource::new(["one", "two"]);
        assert_eq!(source.read_line("> ").unwrap(), Some("one".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), Some("two".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), None);
    }

    #[test]
    fn buffer_sink_separates_streams() {
        let mut sink = BufferSink::new();
        sink.print("ok");
        sink.error("bad");
        assert_eq!(sink.printed, vec!["ok"]);
        assert_eq!(sink.errors, vec!["bad"]);
    }
}
