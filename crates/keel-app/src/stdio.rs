//! Stdin/stdout collaborators for the demo shell.

use std::io::{self, BufRead, Write};

use keel_repl::{LineSource, OutputSink};

/// Reads lines from stdin, printing the prompt to stdout first.
pub struct StdinSource {
    stdin: io::Stdin,
}

impl StdinSource {
    pub fn new() -> Self {
        StdinSource { stdin: io::stdin() }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        StdinSource::new()
    }
}

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        let read = self.stdin.lock().read_line(&mut line)?;
        if read == 0 {
            // EOF: finish the prompt line so the host shell starts clean.
            stdout.write_all(b"\n")?;
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Prints results to stdout and errors to stderr.
#[derive(Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn error(&mut self, text: &str) {
        eprintln!("error: {text}");
    }
}
