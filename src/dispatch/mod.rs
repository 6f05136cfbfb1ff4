//! Command dispatch: from a submitted line to a finished handler.
//!
//! The pipeline is: normalize, lexically parse, denylist-check, resolve
//! through the injected registry, load declared assets, type any static
//! output, invoke the entry point. Errors are classified, logged, and
//! thrown to the read–eval loop; nothing is recovered here.

mod error;
mod registry;

pub use error::DispatchError;
pub use registry::{CommandHandler, CommandModule, ModuleRegistry, ResolveError, StaticRegistry};

use crate::console::Console;
use crate::surface::AssetSink;
use crate::typer::TypeConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

/// Words that disqualify a command name, matched as substrings.
const DENYLIST: [&str; 5] = ["fuck", "shit", "die", "ass", "cunt"];

/// Normalize a raw input line: lowercase, then trim.
///
/// Shared by the input device and the dispatcher so a submitted line
/// and a re-dispatched one normalize identically.
pub fn normalize(input: &str) -> String {
    input.to_lowercase().trim().to_string()
}

/// A lexically parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The leading command word.
    pub name: String,
    /// The argument remainder, if present.
    pub args: Option<String>,
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Match a normalized line against the command pattern.
///
/// The accepted shape is one leading word, optionally followed by a
/// single whitespace separator and a remainder of single-space-
/// separated words — the literal pattern
/// `^(\w+)(?:\s((?:\w+(?:\s\w+)*)))?$`. Digits are word characters, so
/// purely numeric command names parse. Doubled separators do not.
pub fn parse_line(line: &str) -> Option<CommandLine> {
    let mut chars = line.chars().peekable();

    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if is_word(c) {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if name.is_empty() {
        return None;
    }

    match chars.next() {
        None => return Some(CommandLine { name, args: None }),
        Some(sep) if sep.is_whitespace() => {}
        Some(_) => return None,
    }

    // remainder: \w+(\s\w+)*
    let rest: String = chars.collect();
    let mut expect_word = true;
    for c in rest.chars() {
        if is_word(c) {
            expect_word = false;
        } else if c.is_whitespace() {
            if expect_word {
                return None;
            }
            expect_word = true;
        } else {
            return None;
        }
    }
    if expect_word {
        return None;
    }

    Some(CommandLine {
        name,
        args: Some(rest),
    })
}

/// The command dispatcher.
///
/// Owns the registry and asset sink; stylesheet registrations are
/// deduplicated per command/name pair for the dispatcher's lifetime.
pub struct Dispatcher {
    registry: Arc<dyn ModuleRegistry>,
    assets: Arc<dyn AssetSink>,
    loaded_stylesheets: HashSet<String>,
}

impl Dispatcher {
    /// Create a dispatcher over a registry and asset sink.
    pub fn new(registry: Arc<dyn ModuleRegistry>, assets: Arc<dyn AssetSink>) -> Self {
        Self {
            registry,
            assets,
            loaded_stylesheets: HashSet::new(),
        }
    }

    /// Parse `raw` and run the command it names.
    ///
    /// An empty normalized line is a silent no-op. Every failure is
    /// returned to the caller; the read–eval loop decides what the
    /// user sees.
    pub fn parse_and_run(&mut self, raw: &str, console: &mut Console) -> Result<(), DispatchError> {
        let line = normalize(raw);
        if line.is_empty() {
            return Ok(());
        }

        let command = parse_line(&line).ok_or(DispatchError::InvalidCommand)?;

        if DENYLIST.iter().any(|word| command.name.contains(word)) {
            return Err(DispatchError::ProhibitedLanguage);
        }

        let module = match self.registry.resolve(&command.name) {
            Ok(module) => module,
            Err(ResolveError::NotFound) => {
                log::error!("unknown command: {}", command.name);
                return Err(DispatchError::UnknownCommand(command.name));
            }
            Err(ResolveError::Load(e)) => {
                log::error!("command {} failed to load: {e:#}", command.name);
                return Err(DispatchError::ModuleLoad(e));
            }
        };

        for name in module.stylesheets() {
            let key = format!("{}/{name}", command.name);
            if self.loaded_stylesheets.insert(key) {
                self.assets.add_stylesheet(&command.name, name);
            }
        }

        if !module.templates().is_empty() {
            self.preload_templates(&command.name, module.templates());
        }

        if let Some(output) = module.output() {
            console
                .type_text(output.clone(), &TypeConfig::default())
                .map_err(|e| DispatchError::ModuleLoad(e.into()))?;
            console.pause();
        }

        if let Some(entry) = module.entry() {
            entry
                .run(command.args.as_deref(), console)
                .map_err(DispatchError::Handler)?;
        }

        Ok(())
    }

    /// Kick off best-effort template loading; never awaited.
    fn preload_templates(&self, command: &str, templates: &[String]) {
        let assets = Arc::clone(&self.assets);
        let command = command.to_string();
        let templates = templates.to_vec();

        thread::Builder::new()
            .name("phosphor-assets".to_string())
            .spawn(move || {
                for name in &templates {
                    if let Err(e) = assets.load_template(&command, name) {
                        log::warn!("template {command}/{name} failed to load: {e:#}");
                    }
                }
            })
            .expect("Failed to spawn template loader thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use crate::input::{History, InputEvent};
    use crate::speech::NullVoice;
    use crate::storage::MemoryStore;
    use crate::surface::{LogAssets, MemorySurface};
    use crate::typer::Typist;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn test_console() -> Console {
        let (tx, rx) = crossbeam_channel::unbounded::<InputEvent>();
        std::mem::forget(tx);
        Console::new(
            Box::new(MemorySurface::new()),
            Typist::new(Box::new(VirtualClock::new()), Arc::new(NullVoice)),
            History::load(Box::new(MemoryStore::new())),
            rx,
            Arc::new(NullVoice),
        )
    }

    fn dispatcher(registry: StaticRegistry) -> Dispatcher {
        Dispatcher::new(Arc::new(registry), Arc::new(LogAssets))
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Help Me  "), "help me");
        assert_eq!(normalize("\tCHAT\n"), "chat");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_parse_name_and_args() {
        let parsed = parse_line("help me").unwrap();
        assert_eq!(parsed.name, "help");
        assert_eq!(parsed.args.as_deref(), Some("me"));

        let parsed = parse_line("help me please now").unwrap();
        assert_eq!(parsed.args.as_deref(), Some("me please now"));
    }

    #[test]
    fn test_parse_bare_command() {
        let parsed = parse_line("chat").unwrap();
        assert_eq!(parsed.name, "chat");
        assert_eq!(parsed.args, None);
    }

    #[test]
    fn test_digits_are_word_characters() {
        // \w includes 0-9 and _, so these parse
        assert_eq!(parse_line("123abc").unwrap().name, "123abc");
        assert_eq!(parse_line("42").unwrap().name, "42");
        assert_eq!(parse_line("do_it").unwrap().name, "do_it");
    }

    #[test]
    fn test_parse_rejections() {
        // doubled separator fails the literal pattern
        assert_eq!(parse_line("help  me"), None);
        assert_eq!(parse_line("he!lp"), None);
        assert_eq!(parse_line("help me!"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_empty_line_is_silent_noop() {
        let mut console = test_console();
        let mut dispatcher = dispatcher(StaticRegistry::new());
        assert!(dispatcher.parse_and_run("   ", &mut console).is_ok());
        assert!(console.surface().visible_text().is_empty());
    }

    #[test]
    fn test_invalid_line_errors() {
        let mut console = test_console();
        let mut dispatcher = dispatcher(StaticRegistry::new());
        let err = dispatcher.parse_and_run("not-a-command!", &mut console);
        assert!(matches!(err, Err(DispatchError::InvalidCommand)));
    }

    #[test]
    fn test_denylist_blocks_before_resolution() {
        struct PanickingRegistry;
        impl ModuleRegistry for PanickingRegistry {
            fn resolve(&self, _name: &str) -> Result<Arc<CommandModule>, ResolveError> {
                panic!("registry must not be consulted for denylisted names");
            }
        }

        let mut console = test_console();
        let mut dispatcher = Dispatcher::new(Arc::new(PanickingRegistry), Arc::new(LogAssets));
        let err = dispatcher.parse_and_run("dieoff", &mut console);
        assert!(matches!(err, Err(DispatchError::ProhibitedLanguage)));
    }

    #[test]
    fn test_unknown_command_names_the_command() {
        let mut console = test_console();
        let mut dispatcher = dispatcher(StaticRegistry::new());
        match dispatcher.parse_and_run("warble", &mut console) {
            Err(DispatchError::UnknownCommand(name)) => assert_eq!(name, "warble"),
            other => panic!("expected UnknownCommand, got {other:?}"),
        }
    }

    #[test]
    fn test_load_failure_is_execution_error() {
        struct BrokenRegistry;
        impl ModuleRegistry for BrokenRegistry {
            fn resolve(&self, _name: &str) -> Result<Arc<CommandModule>, ResolveError> {
                Err(ResolveError::Load(anyhow::anyhow!("disk on fire")))
            }
        }

        let mut console = test_console();
        let mut dispatcher = Dispatcher::new(Arc::new(BrokenRegistry), Arc::new(LogAssets));
        let err = dispatcher.parse_and_run("anything", &mut console).unwrap_err();
        assert_eq!(err.to_string(), "Error while executing command");
    }

    #[test]
    fn test_static_output_typed_before_entry() {
        static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        let registry = StaticRegistry::new().with(
            "greet",
            CommandModule::new()
                .with_output("hello there")
                .with_entry(|_: Option<&str>, console: &mut Console| {
                    let typed = console.surface().visible_text().contains("hello");
                    ORDER.lock().unwrap().push(if typed { "output-first" } else { "entry-first" });
                    Ok(())
                }),
        );

        let mut console = test_console();
        dispatcher(registry).parse_and_run("greet", &mut console).unwrap();
        assert_eq!(*ORDER.lock().unwrap(), vec!["output-first"]);
    }

    #[test]
    fn test_entry_receives_args_remainder() {
        static SEEN: Mutex<Option<Option<String>>> = Mutex::new(None);

        let registry = StaticRegistry::new().with(
            "echo",
            CommandModule::new().with_entry(|args: Option<&str>, _: &mut Console| {
                *SEEN.lock().unwrap() = Some(args.map(str::to_string));
                Ok(())
            }),
        );

        let mut console = test_console();
        let mut dispatcher = dispatcher(registry);
        dispatcher.parse_and_run("echo hello world", &mut console).unwrap();
        assert_eq!(
            SEEN.lock().unwrap().clone(),
            Some(Some("hello world".to_string()))
        );

        dispatcher.parse_and_run("echo", &mut console).unwrap();
        assert_eq!(SEEN.lock().unwrap().clone(), Some(None));
    }

    #[test]
    fn test_handler_error_propagates_unmodified() {
        let registry = StaticRegistry::new().with(
            "boom",
            CommandModule::new().with_entry(|_: Option<&str>, _: &mut Console| {
                Err(anyhow::anyhow!("exact handler words"))
            }),
        );

        let mut console = test_console();
        let err = dispatcher(registry).parse_and_run("boom", &mut console).unwrap_err();
        assert_eq!(err.to_string(), "exact handler words");
    }

    #[test]
    fn test_stylesheets_registered_once_per_name() {
        #[derive(Default)]
        struct RecordingAssets {
            seen: Mutex<Vec<String>>,
        }
        impl AssetSink for RecordingAssets {
            fn add_stylesheet(&self, command: &str, name: &str) {
                self.seen.lock().unwrap().push(format!("{command}/{name}"));
            }
            fn load_template(&self, _command: &str, _name: &str) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let registry = StaticRegistry::new().with(
            "styled",
            CommandModule::new().with_stylesheets(&["main", "crt"]),
        );
        let assets = Arc::new(RecordingAssets::default());
        let mut dispatcher = Dispatcher::new(Arc::new(registry), assets.clone());
        let mut console = test_console();

        dispatcher.parse_and_run("styled", &mut console).unwrap();
        dispatcher.parse_and_run("styled", &mut console).unwrap();

        assert_eq!(*assets.seen.lock().unwrap(), vec!["styled/main", "styled/crt"]);
    }

    #[test]
    fn test_templates_loaded_off_thread() {
        static LOADED: AtomicUsize = AtomicUsize::new(0);

        struct CountingAssets;
        impl AssetSink for CountingAssets {
            fn add_stylesheet(&self, _command: &str, _name: &str) {}
            fn load_template(&self, _command: &str, _name: &str) -> anyhow::Result<()> {
                LOADED.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let registry = StaticRegistry::new().with(
            "templated",
            CommandModule::new().with_templates(&["panel", "dialog"]),
        );
        let mut dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(CountingAssets));
        let mut console = test_console();
        dispatcher.parse_and_run("templated", &mut console).unwrap();

        // best-effort preload: give the loader thread a moment
        for _ in 0..100 {
            if LOADED.load(Ordering::SeqCst) == 2 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(LOADED.load(Ordering::SeqCst), 2);
    }
}
