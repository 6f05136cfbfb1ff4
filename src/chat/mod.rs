//! Chat command: a streaming conversation inside the console.
//!
//! The module prompts for lines, transmits them over a
//! [`ChatTransport`], and reveals each reply through the typing
//! engine. A literal `exit` ends the loop. Transport failures are
//! logged and the prompt continues; only engine failures propagate.

mod transport;

pub use transport::{ChatTransport, TcpLineTransport};

use crate::console::Console;
use crate::dispatch::CommandModule;
use crate::typer::TypeConfig;
use std::io;

/// The prompt shown before each outgoing message.
const CHAT_PROMPT: &str = "You: ";

/// Build the chat command module.
///
/// `connect` is invoked once per chat session when the entry point
/// runs. A failed connection is logged and the session ends quietly;
/// lifecycle problems are never thrown at the dispatcher.
pub fn chat_module<F>(connect: F) -> CommandModule
where
    F: Fn() -> io::Result<Box<dyn ChatTransport>> + Send + Sync + 'static,
{
    CommandModule::new()
        .with_output("Connecting to the oracle. Type 'exit' to leave.")
        .with_entry(move |_args: Option<&str>, console: &mut Console| {
            match connect() {
                Ok(transport) => chat_loop(transport, console).map_err(Into::into),
                Err(e) => {
                    log::error!("chat connection failed: {e}");
                    Ok(())
                }
            }
        })
}

/// Prompt, transmit, reveal — until `exit` or the remote hangs up.
fn chat_loop(mut transport: Box<dyn ChatTransport>, console: &mut Console) -> io::Result<()> {
    loop {
        let line = console.prompt(CHAT_PROMPT, false)?;

        if line == "exit" {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        if let Err(e) = transport.send(&line) {
            log::warn!("chat send failed: {e}");
            continue;
        }

        match transport.recv() {
            Ok(Some(reply)) => {
                console.type_text(reply, &TypeConfig::default())?;
            }
            Ok(None) => {
                log::info!("chat remote closed the connection");
                return Ok(());
            }
            Err(e) => log::warn!("chat receive failed: {e}"),
        }
    }
}
