//! Dispatch error taxonomy.

use thiserror::Error;

/// Everything that can go wrong between a submitted line and a
/// finished handler.
///
/// The dispatcher never recovers locally; every error is thrown to the
/// read–eval loop, which reveals the message (when there is one) and
/// resumes.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The line does not lexically parse as a command.
    #[error("Invalid command")]
    InvalidCommand,

    /// The command word contains a denylisted word.
    #[error("Please don't use that language")]
    ProhibitedLanguage,

    /// The registry has no module under this name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The module resolved but could not be loaded or started.
    #[error("Error while executing command")]
    ModuleLoad(#[source] anyhow::Error),

    /// The module's entry point failed; passed through unmodified.
    #[error(transparent)]
    Handler(anyhow::Error),
}
