//! Command modules and the registry that resolves them.
//!
//! The registry is an injected port: the dispatcher asks it for a
//! module by name and only needs to distinguish "not found" from any
//! other load failure. [`StaticRegistry`] covers hosts that assemble
//! their command set up front, and keeps unit tests free of any
//! filesystem or network.

use crate::console::Console;
use crate::typer::TextSource;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Why a command name failed to resolve.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No module is registered under the name.
    #[error("module not found")]
    NotFound,

    /// The module exists but failed to load.
    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

/// A command's executable entry point.
///
/// Handlers receive the parsed argument remainder and the console, so
/// they can type output and prompt for further input.
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    fn run(&self, args: Option<&str>, console: &mut Console) -> anyhow::Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(Option<&str>, &mut Console) -> anyhow::Result<()> + Send + Sync,
{
    fn run(&self, args: Option<&str>, console: &mut Console) -> anyhow::Result<()> {
        self(args, console)
    }
}

/// A resolved command module.
///
/// Everything is optional: a module may carry only static output, only
/// an entry point, or both, plus stylesheet and template asset names
/// loaded as side effects before invocation.
#[derive(Default)]
pub struct CommandModule {
    output: Option<TextSource>,
    stylesheets: Vec<String>,
    templates: Vec<String>,
    entry: Option<Box<dyn CommandHandler>>,
}

impl CommandModule {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Static output typed before the entry point runs.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<TextSource>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Declare stylesheet asset names.
    #[must_use]
    pub fn with_stylesheets(mut self, names: &[&str]) -> Self {
        self.stylesheets = names.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Declare template asset names.
    #[must_use]
    pub fn with_templates(mut self, names: &[&str]) -> Self {
        self.templates = names.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Attach the entry point.
    #[must_use]
    pub fn with_entry(mut self, entry: impl CommandHandler + 'static) -> Self {
        self.entry = Some(Box::new(entry));
        self
    }

    /// The static output, if any.
    pub const fn output(&self) -> Option<&TextSource> {
        self.output.as_ref()
    }

    /// Declared stylesheet asset names.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Declared template asset names.
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// The entry point, if any.
    pub fn entry(&self) -> Option<&dyn CommandHandler> {
        self.entry.as_deref()
    }
}

/// Resolves command names to modules.
pub trait ModuleRegistry: Send + Sync {
    /// Look up the module for `name`.
    fn resolve(&self, name: &str) -> Result<Arc<CommandModule>, ResolveError>;
}

/// A fixed name-to-module map.
#[derive(Default)]
pub struct StaticRegistry {
    modules: HashMap<String, Arc<CommandModule>>,
}

impl StaticRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Replaces any module with the same name.
    pub fn register(&mut self, name: &str, module: CommandModule) {
        self.modules.insert(name.to_string(), Arc::new(module));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: &str, module: CommandModule) -> Self {
        self.register(name, module);
        self
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ModuleRegistry for StaticRegistry {
    fn resolve(&self, name: &str) -> Result<Arc<CommandModule>, ResolveError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or(ResolveError::NotFound)
    }
}
