//! Where `print` writes and `input` reads.
//!
//! - `Stdio`: the process's stdout and stdin (default)
//! - `Buffer`: captured output and queued input, for tests and embedders

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

#[derive(Debug, Default)]
pub enum Console {
    #[default]
    Stdio,
    Buffer {
        output: String,
        input: VecDeque<String>,
    },
}

impl Console {
    /// A capturing console with no queued input.
    pub fn buffer() -> Self {
        Console::Buffer {
            output: String::new(),
            input: VecDeque::new(),
        }
    }

    /// A capturing console that answers `input` with `lines`, in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Console::Buffer {
            output: String::new(),
            input: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Writes `line` followed by a newline.
    pub fn println(&mut self, line: &str) -> io::Result<()> {
        match self {
            Console::Stdio => writeln!(io::stdout().lock(), "{}", line),
            Console::Buffer { output, .. } => {
                output.push_str(line);
                output.push('\n');
                Ok(())
            }
        }
    }

    /// Shows `prompt` and reads one line without its terminator.
    ///
    /// End of input reads as an empty line.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        match self {
            Console::Stdio => {
                let mut stdout = io::stdout().lock();
                write!(stdout, "{}", prompt)?;
                stdout.flush()?;

                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                Ok(line.trim_end_matches(['\n', '\r']).to_string())
            }
            Console::Buffer { output, input } => {
                output.push_str(prompt);
                Ok(input.pop_front().unwrap_or_default())
            }
        }
    }

    /// Everything written so far; always empty for `Stdio`.
    pub fn output(&self) -> &str {
        match self {
            Console::Stdio => "",
            Console::Buffer { output, .. } => output,
        }
    }
}
