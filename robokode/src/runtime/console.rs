use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Where `print` writes and `input` reads.
pub trait Console {
    fn print(&mut self, line: &str);
    /// `None` at end of input.
    fn read_line(&mut self) -> Option<String>;
}

/// Process stdout and stdin.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line) {
            log::warn!("print failed: {}", e);
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("input failed: {}", e);
                None
            }
        }
    }
}

/// In-memory console: queued input lines and a transcript of printed lines.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    pub output: Vec<String>,
    pub input: VecDeque<String>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: Vec::new(),
            input: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Console for BufferConsole {
    fn print(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}
