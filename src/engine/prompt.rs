//! Operator prompt used when a plain source path is both a key and a directory.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::errors::MoveError;

/// How to treat a path that holds a value and also has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Key,
    Dir,
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "key" => Ok(Choice::Key),
            "dir" => Ok(Choice::Dir),
            other => Err(format!("expected 'key' or 'dir', got '{other}'")),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Choice::Key => "key",
            Choice::Dir => "dir",
        })
    }
}

/// Strategy consulted by the resolver for ambiguous paths.
pub trait AmbiguityPrompt {
    fn choose(&mut self, path: &str) -> Result<Choice, MoveError>;
}

impl<F> AmbiguityPrompt for F
where
    F: FnMut(&str) -> Result<Choice, MoveError>,
{
    fn choose(&mut self, path: &str) -> Result<Choice, MoveError> {
        self(path)
    }
}

/// Line-oriented prompt over any reader/writer pair. Re-asks until it gets a valid
/// answer; end of input is an error.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr so stdout stays clean for the move summary.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn io_failed(path: &str, e: io::Error) -> MoveError {
        MoveError::PromptFailed {
            path: path.to_string(),
            reason: e.to_string(),
        }
    }
}

impl<R: BufRead, W: Write> AmbiguityPrompt for TerminalPrompt<R, W> {
    fn choose(&mut self, path: &str) -> Result<Choice, MoveError> {
        loop {
            write!(
                self.output,
                "{path} is both a key and a directory. Move the key or the dir? [key/dir]: "
            )
            .and_then(|_| self.output.flush())
            .map_err(|e| Self::io_failed(path, e))?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| Self::io_failed(path, e))?;
            if read == 0 {
                return Err(MoveError::PromptFailed {
                    path: path.to_string(),
                    reason: "no answer on standard input".into(),
                });
            }

            match line.parse::<Choice>() {
                Ok(choice) => return Ok(choice),
                Err(msg) => {
                    writeln!(self.output, "{msg}").map_err(|e| Self::io_failed(path, e))?;
                }
            }
        }
    }
}
