//! Shell: the top-level read–eval loop.
//!
//! `AwaitingInput → read_line → Dispatching → parse_and_run →
//! AwaitingInput`, indefinitely. A dispatch error with a message is
//! revealed through the typing engine; one without is swallowed.
//! Errors never end the session — only the key channel closing does.

use crate::console::Console;
use crate::dispatch::Dispatcher;
use crate::typer::TypeConfig;
use std::io;
use std::time::Duration;

/// The read–eval loop over a console and a dispatcher.
pub struct Shell {
    console: Console,
    dispatcher: Dispatcher,
}

impl Shell {
    /// Create a shell.
    pub const fn new(console: Console, dispatcher: Dispatcher) -> Self {
        Self {
            console,
            dispatcher,
        }
    }

    /// The console, for host setup around the loop.
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// The console, mutably.
    pub const fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Run a pre-seeded first command, if any.
    ///
    /// Mirrors the hosting page passing a command and debug flag via
    /// query parameters: the command line is typed as an echo first
    /// (slowly, like a ghost operator) unless `debug` is set, then
    /// dispatched.
    pub fn boot(&mut self, command: Option<&str>, debug: bool) -> io::Result<()> {
        let Some(command) = command else {
            return Ok(());
        };

        if !debug {
            let echo_cfg = TypeConfig {
                initial_delay: Duration::from_millis(3000),
                final_delay: Duration::from_millis(1500),
                ..TypeConfig::default()
            };
            self.console.type_text(format!("> {command}"), &echo_cfg)?;
        }

        self.dispatch_and_report(command)
    }

    /// Loop forever: read a line, dispatch it, reveal any error.
    ///
    /// Returns only when the key listener goes away (the hosting
    /// terminal is being torn down).
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let line = self.console.read_line(false)?;
            self.dispatch_and_report(&line)?;
        }
    }

    /// Dispatch one line, revealing a non-empty error message.
    fn dispatch_and_report(&mut self, line: &str) -> io::Result<()> {
        if let Err(e) = self.dispatcher.parse_and_run(line, &mut self.console) {
            let message = e.to_string();
            if message.is_empty() {
                log::debug!("command failed without a message");
            } else {
                self.console.type_text(message, &TypeConfig::default())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use crate::dispatch::{CommandModule, StaticRegistry};
    use crate::input::{History, InputEvent, KeyCode};
    use crate::speech::NullVoice;
    use crate::storage::MemoryStore;
    use crate::surface::{LogAssets, MemorySurface};
    use crate::typer::Typist;
    use std::sync::Arc;

    fn console_with_lines(lines: &[&str]) -> Console {
        let (tx, rx) = crossbeam_channel::unbounded();
        for line in lines {
            for c in line.chars() {
                tx.send(InputEvent::key(KeyCode::Char(c))).unwrap();
            }
            tx.send(InputEvent::key(KeyCode::Enter)).unwrap();
        }
        // sender dropped: the loop ends once the script is drained

        Console::new(
            Box::new(MemorySurface::new()),
            Typist::new(Box::new(VirtualClock::new()), Arc::new(NullVoice)),
            History::load(Box::new(MemoryStore::new())),
            rx,
            Arc::new(NullVoice),
        )
    }

    fn shell_over(lines: &[&str], registry: StaticRegistry) -> Shell {
        Shell::new(
            console_with_lines(lines),
            Dispatcher::new(Arc::new(registry), Arc::new(LogAssets)),
        )
    }

    #[test]
    fn test_unknown_command_revealed_and_loop_resumes() {
        let registry = StaticRegistry::new().with("real", CommandModule::new().with_output("ok"));
        let mut shell = shell_over(&["warble", "real"], registry);

        // ends with an error only once the scripted keys run out
        assert!(shell.run().is_err());

        let transcript = shell.console().surface().visible_text();
        assert!(transcript.contains("Unknown command: warble"));
        // the loop resumed and ran the next command
        assert!(transcript.contains("ok"));
    }

    #[test]
    fn test_prohibited_language_revealed() {
        let mut shell = shell_over(&["dieoff"], StaticRegistry::new());
        assert!(shell.run().is_err());
        assert!(shell
            .console()
            .surface()
            .visible_text()
            .contains("Please don't use that language"));
    }

    #[test]
    fn test_empty_handler_error_swallowed() {
        let registry = StaticRegistry::new().with(
            "quiet",
            CommandModule::new().with_entry(|_: Option<&str>, _: &mut Console| {
                Err(anyhow::anyhow!(""))
            }),
        );
        let mut shell = shell_over(&["quiet"], registry);
        assert!(shell.run().is_err());

        let transcript = shell.console().surface().visible_text();
        // the submitted line is in the transcript; no error text follows
        assert!(!transcript.contains("Error"));
    }

    #[test]
    fn test_boot_echoes_then_dispatches() {
        let registry =
            StaticRegistry::new().with("status", CommandModule::new().with_output("all green"));
        let mut shell = shell_over(&[], registry);
        shell.boot(Some("status"), false).unwrap();

        let transcript = shell.console().surface().visible_text();
        assert!(transcript.contains("> status"));
        assert!(transcript.contains("all green"));
    }

    #[test]
    fn test_boot_debug_skips_echo() {
        let registry =
            StaticRegistry::new().with("status", CommandModule::new().with_output("all green"));
        let mut shell = shell_over(&[], registry);
        shell.boot(Some("status"), true).unwrap();

        let transcript = shell.console().surface().visible_text();
        assert!(!transcript.contains("> status"));
        assert!(transcript.contains("all green"));
    }

    #[test]
    fn test_boot_without_command_is_noop() {
        let mut shell = shell_over(&[], StaticRegistry::new());
        shell.boot(None, false).unwrap();
        assert!(shell.console().surface().visible_text().is_empty());
    }

    #[test]
    fn test_boot_error_revealed_not_fatal() {
        let mut shell = shell_over(&[], StaticRegistry::new());
        shell.boot(Some("missing"), true).unwrap();
        assert!(shell
            .console()
            .surface()
            .visible_text()
            .contains("Unknown command: missing"));
    }
}
