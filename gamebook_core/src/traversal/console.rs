//! Console - Line-based input and output for a session

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

/// What kind of line is being shown, so front ends can style it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    /// Node text separators and section titles
    Heading,
    /// Blow-by-blow combat narration
    Combat,
    /// Player status block
    Status,
    /// Rejected input and structural problems
    Warning,
}

/// Where a session reads selections from and writes story text to
pub trait Console {
    /// Read one line without its terminator; `None` once input is exhausted
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Write a full line
    fn show(&mut self, tone: Tone, line: &str) -> io::Result<()>;

    /// Write a prompt and leave the cursor after it
    fn prompt(&mut self, text: &str) -> io::Result<()>;

    /// Write a plain line
    fn say(&mut self, line: &str) -> io::Result<()> {
        self.show(Tone::Plain, line)
    }

    /// Pacing delay around narrated events
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Console over any buffered reader and writer
///
/// Ignores tones. Used with stdin/stdout or in-memory buffers.
#[derive(Debug)]
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineConsole { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show(&mut self, _tone: Tone, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()
    }
}
