//! Per-file confirmation for interactive removal.
//!
//! The [`Prompter`] writes `Delete <path>? [y/N] ` to its output and reads
//! one line from its input. Only `y` or `yes` (any case, surrounding
//! whitespace ignored) confirms. Anything else, including end of input or a
//! read error, declines.

use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Asks yes/no questions over an injected reader and writer.
pub struct Prompter {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl fmt::Debug for Prompter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompter")
            .field("input", &"<reader>")
            .field("output", &"<writer>")
            .finish()
    }
}

impl Prompter {
    /// Create a prompter over arbitrary input and output streams.
    #[must_use]
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self { input, output }
    }

    /// Prompter reading stdin and writing to stderr.
    ///
    /// Prompts go to stderr so stdout stays clean for the per-pair lines.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stderr()),
        )
    }

    /// Ask whether `path` should be deleted.
    ///
    /// Returns `true` only for an explicit yes.
    pub fn confirm_delete(&mut self, path: &Path) -> bool {
        if let Err(e) = write!(self.output, "Delete {}? [y/N] ", path.display())
            .and_then(|()| self.output.flush())
        {
            log::warn!("Could not write prompt: {}", e);
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) => {
                log::debug!("End of input at prompt for {}, skipping", path.display());
                false
            }
            Ok(_) => is_yes(&answer),
            Err(e) => {
                log::warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
