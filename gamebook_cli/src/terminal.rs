//! Terminal console - Styled story output on stdin/stdout

use crossterm::style::Stylize;
use gamebook_core::{Console, Tone};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Console that colours each line by tone
pub struct TerminalConsole {
    input: StdinLock<'static>,
    output: Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show(&mut self, tone: Tone, line: &str) -> io::Result<()> {
        let mut out = self.output.lock();
        match tone {
            Tone::Plain => writeln!(out, "{}", line),
            Tone::Heading => writeln!(out, "{}", line.bold().cyan()),
            Tone::Combat => writeln!(out, "{}", line.red()),
            Tone::Status => writeln!(out, "{}", line.green()),
            Tone::Warning => writeln!(out, "{}", line.yellow()),
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        let mut out = self.output.lock();
        write!(out, "{}", text.bold())?;
        out.flush()
    }
}
