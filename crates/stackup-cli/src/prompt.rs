//! Terminal implementations of the `Prompter` port.
//!
//! [`DialoguerPrompter`] drives an interactive terminal; [`LinePrompter`]
//! reads plain lines and is used whenever stdin is piped.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use tracing::debug;

use stackup_core::{
    application::{ApplicationError, ports::Prompter},
    domain::ValidationRejected,
    error::{StackupError, StackupResult},
};

/// Pick the richest prompter the current stdin supports.
pub fn terminal_prompter() -> Arc<dyn Prompter> {
    #[cfg(feature = "interactive")]
    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        debug!("Using interactive prompter");
        return Arc::new(DialoguerPrompter::new());
    }

    debug!(tty = io::stdin().is_terminal(), "Using line prompter");
    Arc::new(LinePrompter::new(io::BufReader::new(io::stdin()), io::stderr()))
}

fn prompt_error(reason: impl Into<String>) -> StackupError {
    ApplicationError::Prompt {
        reason: reason.into(),
    }
    .into()
}

// ── LinePrompter ──────────────────────────────────────────────────────────────

/// Line-oriented prompter.
///
/// An empty line accepts the default. `select` takes a 1-based index or the
/// exact option text. End of input is a `Prompt` error.
pub struct LinePrompter<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> LinePrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn write(&self, text: &str) -> StackupResult<()> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| prompt_error("prompt output lock poisoned"))?;
        output
            .write_all(text.as_bytes())
            .and_then(|_| output.flush())
            .map_err(|e| prompt_error(format!("failed to write prompt: {e}")))
    }

    fn read_line(&self) -> StackupResult<String> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| prompt_error("prompt input lock poisoned"))?;
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| prompt_error(format!("failed to read input: {e}")))?;
        if read == 0 {
            return Err(prompt_error("input closed before all questions were answered"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl<R, W> Prompter for LinePrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask(&self, label: &str, default: &str) -> StackupResult<String> {
        if default.is_empty() {
            self.write(&format!("{label}: "))?;
        } else {
            self.write(&format!("{label} [{default}]: "))?;
        }

        let answer = self.read_line()?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn select(&self, label: &str, options: &[String]) -> StackupResult<usize> {
        if options.is_empty() {
            return Err(prompt_error(format!("nothing to choose for '{label}'")));
        }

        let mut menu = format!("{label}:\n");
        for (i, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {}) {}\n", i + 1, option));
        }
        self.write(&menu)?;

        loop {
            self.write("Choice [1]: ")?;
            let answer = self.read_line()?;
            if let Some(index) = parse_choice(&answer, options) {
                return Ok(index);
            }
            self.write(&format!(
                "  Enter a number between 1 and {} or an option name\n",
                options.len()
            ))?;
        }
    }

    fn reject(&self, rejection: &ValidationRejected) {
        // A failed write here surfaces on the next ask.
        let _ = self.write(&format!("  {rejection}\n"));
    }
}

fn parse_choice(answer: &str, options: &[String]) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Some(0);
    }
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    options.iter().position(|o| o == answer)
}

// ── DialoguerPrompter ─────────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
pub use interactive::DialoguerPrompter;

#[cfg(feature = "interactive")]
mod interactive {
    use console::Term;
    use dialoguer::{Input, Select, theme::ColorfulTheme};

    use super::*;

    /// Rich terminal prompts with arrow-key selection.
    #[derive(Default)]
    pub struct DialoguerPrompter {
        theme: ColorfulTheme,
    }

    impl DialoguerPrompter {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Prompter for DialoguerPrompter {
        fn ask(&self, label: &str, default: &str) -> StackupResult<String> {
            let mut input = Input::<String>::with_theme(&self.theme)
                .with_prompt(label)
                .allow_empty(true);
            if !default.is_empty() {
                input = input.default(default.to_string());
            }
            input
                .interact_text()
                .map_err(|e| prompt_error(e.to_string()))
        }

        fn select(&self, label: &str, options: &[String]) -> StackupResult<usize> {
            Select::with_theme(&self.theme)
                .with_prompt(label)
                .items(options)
                .default(0)
                .interact()
                .map_err(|e| prompt_error(e.to_string()))
        }

        fn reject(&self, rejection: &ValidationRejected) {
            let _ = Term::stderr().write_line(&format!("  {rejection}"));
        }
    }
}
