//! Console Demo: a retro terminal you can actually talk to.
//!
//! Boots with a typed banner, optionally gates on a masked login, then
//! drops into the command loop. A few commands are registered:
//! `help`, `echo`, `clear`, and `chat` (set `PHOSPHOR_CHAT_ADDR` to a
//! line-JSON endpoint for a live conversation).
//!
//! Flags, mirroring the original hosting page's query parameters:
//!
//! - `--command <name>` run a command immediately after boot
//! - `--debug` skip the typed command echo (and the boot animation)
//! - `--login` require a username/password before the loop

use phosphor::chat::{chat_module, TcpLineTransport};
use phosphor::{
    Attrs, BellVoice, ChatTransport, CommandModule, Console, Dispatcher, FileStore, History,
    InputEvent, KeyListener, LogAssets, Shell, StaticRegistry, SystemClock, TermSurface,
    TermSurfaceConfig, TextSource, TypeConfig, Typist,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

const USER: &str = "admin";
const PW: &str = "admin";

struct Flags {
    command: Option<String>,
    debug: bool,
    login: bool,
}

fn parse_flags() -> Flags {
    let mut flags = Flags {
        command: None,
        debug: false,
        login: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--command" => flags.command = args.next(),
            "--debug" => flags.debug = true,
            "--login" => flags.login = true,
            other => eprintln!("ignoring unknown flag: {other}"),
        }
    }
    flags
}

fn history_store() -> FileStore {
    let root = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("phosphor");
    FileStore::new(root)
}

fn registry() -> StaticRegistry {
    let chat_addr =
        std::env::var("PHOSPHOR_CHAT_ADDR").unwrap_or_else(|_| "127.0.0.1:5543".to_string());

    StaticRegistry::new()
        .with(
            "help",
            CommandModule::new().with_output(TextSource::Lines(vec![
                "Available commands:".to_string(),
                "  help          this text".to_string(),
                "  echo <words>  say them back".to_string(),
                "  clear         wipe the screen".to_string(),
                "  chat          talk to the oracle".to_string(),
                "  exit          power down".to_string(),
            ])),
        )
        .with(
            "echo",
            CommandModule::new().with_entry(|args: Option<&str>, console: &mut Console| {
                let line = args.unwrap_or("...").to_string();
                console.type_text(line, &TypeConfig::default())?;
                Ok(())
            }),
        )
        .with(
            "clear",
            CommandModule::new().with_entry(|_: Option<&str>, console: &mut Console| {
                console.clear()?;
                Ok(())
            }),
        )
        .with(
            "chat",
            chat_module(move || {
                TcpLineTransport::connect(&chat_addr)
                    .map(|t| Box::new(t) as Box<dyn ChatTransport>)
            }),
        )
        .with(
            "exit",
            CommandModule::new().with_output("Goodbye.").with_entry(
                |_: Option<&str>, _: &mut Console| {
                    // restore the terminal by hand: process::exit skips Drop
                    let mut out = std::io::stdout();
                    let _ = crossterm::execute!(
                        out,
                        crossterm::cursor::Show,
                        crossterm::terminal::LeaveAlternateScreen
                    );
                    let _ = crossterm::terminal::disable_raw_mode();
                    std::process::exit(0);
                },
            ),
        )
}

/// Typed boot banner and loading animation.
fn boot_screen(console: &mut Console) -> io::Result<()> {
    console.type_text(
        "Welcome to the PHOSPHOR terminal",
        &TypeConfig {
            initial_delay: Duration::from_millis(3000),
            style_class: "banner".to_string(),
            ..TypeConfig::default()
        },
    )?;

    console.type_text(
        TextSource::Lines(vec![
            "> SET TERMINAL/BOOT".to_string(),
            "Loading........................".to_string(),
        ]),
        &TypeConfig {
            line_delay: Duration::from_millis(1000),
            ..TypeConfig::default()
        },
    )?;

    console.type_text(
        TextSource::Lines(vec![
            "OK.".to_string(),
            "> SET TERMINAL/LOGON".to_string(),
            "USER AUTHENTICATION CHECK".to_string(),
        ]),
        &TypeConfig {
            line_delay: Duration::from_millis(500),
            ..TypeConfig::default()
        },
    )?;

    console.pause();
    console.type_text(
        "Press any key to continue.",
        &TypeConfig {
            initial_delay: Duration::from_millis(200),
            ..TypeConfig::default()
        },
    )?;
    console.wait_for_key()?;
    console.clear()?;
    Ok(())
}

/// Prompt for credentials until they match.
fn login(console: &mut Console) -> io::Result<()> {
    loop {
        let user = console.prompt("Username: ", false)?;
        let password = console.prompt("Password: ", true)?;

        if user == USER && password == PW {
            console.type_text("AUTHENTICATION SUCCESSFUL", &TypeConfig::default())?;
            console.pause();
            console.clear()?;
            return Ok(());
        }

        console.type_text(
            TextSource::Lines(vec![
                "Incorrect user and/or password.".to_string(),
                "Please try again".to_string(),
            ]),
            &TypeConfig::default(),
        )?;
        console.pause_for(Duration::from_secs(3));
        console.clear()?;
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let flags = parse_flags();

    let mut surface = TermSurface::new(TermSurfaceConfig::default())?;
    surface.define_class("banner", Attrs::BOLD);

    let (tx, rx) = crossbeam_channel::bounded::<InputEvent>(64);
    let listener = KeyListener::spawn(tx, Duration::from_millis(10));

    let voice = Arc::new(BellVoice);
    let console = Console::new(
        Box::new(surface),
        Typist::new(Box::new(SystemClock::new()), voice.clone()),
        History::load(Box::new(history_store())),
        rx,
        voice,
    );
    let dispatcher = Dispatcher::new(Arc::new(registry()), Arc::new(LogAssets));
    let mut shell = Shell::new(console, dispatcher);

    if !flags.debug {
        boot_screen(shell.console_mut())?;
    }
    if flags.login {
        login(shell.console_mut())?;
    }

    shell.boot(flags.command.as_deref(), flags.debug)?;
    let result = shell.run();

    listener.join();
    result
}
