//! Terminal seam for interactive actions.

use std::io::{self, Write};

/// Line-oriented terminal I/O used by notify / confirm / prompt actions.
pub trait Console: Send + Sync {
    /// Print one line to the user.
    fn print(&self, line: &str) -> io::Result<()>;

    /// Ask a yes/no question; `true` only on an explicit yes.
    fn confirm(&self, prompt: &str) -> io::Result<bool>;

    /// Read one line, optionally without echoing it.
    fn read_line(&self, prompt: &str, hidden: bool) -> io::Result<String>;
}

/// [`Console`] backed by the process terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn print(&self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(io::Error::other)
    }

    fn read_line(&self, prompt: &str, hidden: bool) -> io::Result<String> {
        if hidden {
            dialoguer::Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .map_err(io::Error::other)
        } else {
            dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(io::Error::other)
        }
    }
}
