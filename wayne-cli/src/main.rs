use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod chat;
mod cli_app;
mod cli_events;
mod render;
mod theme;
mod ui;

use chat::{Conversation, Outcome};
use cli_app::App;
use wayne_core::Config;
use wayne_knowledge::{load_knowledge_base, source_from_settings};

const USAGE: &str = "\
Usage: wayne-chat [COMMAND]

Commands:
  (none)            open the chat TUI
  ask <question>    answer one question and exit
  check             load the knowledge base and report what it contains";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Chat,
    Ask(String),
    Check,
    Help,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum UsageError {
    #[error("`ask` needs a question")]
    MissingQuery,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

fn parse_mode<I>(args: I) -> Result<Mode, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Mode::Chat);
    };

    match command.as_str() {
        "ask" => {
            let query = args.collect::<Vec<_>>().join(" ");
            if query.trim().is_empty() {
                return Err(UsageError::MissingQuery);
            }
            Ok(Mode::Ask(query))
        }
        "check" => Ok(Mode::Check),
        "help" | "-h" | "--help" => Ok(Mode::Help),
        _ => Err(UsageError::UnknownCommand(command)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mode = match parse_mode(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if mode == Mode::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::load()?;
    init_tracing(&config, &mode)?;
    info!(
        knowledge = %config.knowledge_settings().source_path.display(),
        "Settings loaded"
    );

    match mode {
        Mode::Chat => run_chat_mode(&config).await,
        Mode::Ask(query) => run_ask_mode(&config, &query).await,
        Mode::Check => run_check_mode(&config).await,
        Mode::Help => Ok(()),
    }
}

/// Install the subscriber. The TUI owns the terminal, so chat mode logs to
/// the configured file or nowhere.
fn init_tracing(config: &Config, mode: &Mode) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level().into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (mode, &config.settings.logging.file_path) {
        (Mode::Chat, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (Mode::Chat, None) => builder.with_writer(io::sink).init(),
        _ => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// Run the chat TUI mode
async fn run_chat_mode(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let conversation = Conversation::open(config).await;
    let mut app = App::new(
        conversation,
        &config.settings.chat.welcome,
        config.settings.reply_delay(),
    );

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match app.run(&mut terminal).await {
        Ok(()) => {
            info!("Application exited normally");
            Ok(())
        }
        Err(e) => {
            error!("Application error: {}", e);
            Err(e)
        }
    };

    // Restore terminal
    terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Answer one question on stdout
async fn run_ask_mode(config: &Config, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut conversation = Conversation::open(config).await;
    if conversation.session().is_degraded() {
        eprintln!("{}", render::LOAD_FAILED);
    }

    match conversation.handle_input(query) {
        Outcome::Answer { reply, .. } | Outcome::Reply(reply) => println!("{}", reply.text),
        Outcome::Notice(text) => println!("{text}"),
        Outcome::Reload => println!("{}", conversation.reload().await),
        Outcome::Quit | Outcome::Ignored => {}
    }
    Ok(())
}

/// Load the knowledge base and summarize it. Fails on a load error.
async fn run_check_mode(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = source_from_settings(&config.knowledge_settings())?;
    println!("Knowledge base: {}", source.describe());

    let loaded = load_knowledge_base(&source).await?;
    println!("Groups:          {}", loaded.groups);
    println!("Entries:         {}", loaded.entries.len());
    println!("Skipped records: {}", loaded.skipped);
    println!("Categories:");
    for category in loaded.categories() {
        let count = loaded
            .entries
            .iter()
            .filter(|entry| entry.category == category)
            .count();
        println!("  {category} ({count})");
    }
    Ok(())
}
