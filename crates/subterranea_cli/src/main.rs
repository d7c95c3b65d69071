//! `subterranea` command-line reader.
//!
//! # Responsibility
//! - Resolve configuration, start logging, connect to the catalog.
//! - Drive one browsing session per invocation and print its view.
//! - Map failures to a message on stderr and a distinct exit code.

mod args;
mod render;

use args::{Cli, Commands};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use subterranea_core::{
    connect, init_logging, AppConfig, BrowseSession, ConfigError, LayoutConfig, LoadError,
    LoadErrorKind, LoggingError, Route, SessionError, SessionView,
};
use thiserror::Error;

const EXIT_FETCH: u8 = 1;
const EXIT_CONFIGURATION: u8 = 2;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("{}", .0.user_message())]
    Load(#[from] LoadError),
    #[error("{}", .0.message)]
    View(SessionError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        let kind = match self {
            Self::Config(_) | Self::Logging(_) => LoadErrorKind::Configuration,
            Self::Load(err) => err.kind(),
            Self::View(err) => err.kind,
            Self::Output(_) => LoadErrorKind::Fetch,
        };
        match kind {
            LoadErrorKind::Configuration => ExitCode::from(EXIT_CONFIGURATION),
            LoadErrorKind::Fetch => ExitCode::from(EXIT_FETCH),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.log_dir.as_deref().or(config.logging.dir.as_deref()) {
        init_logging(&config.logging.level, dir)?;
    }
    let layout = config.layout_config()?;

    match cli.command {
        Commands::Inventory {
            page,
            shuffle,
            seed,
        } => {
            let seed = seed.or_else(|| (shuffle || config.layout.shuffle).then(clock_seed));
            let mut session = BrowseSession::new();
            if let Some(seed) = seed {
                session = session.with_shuffle_seed(seed);
            }
            info!(
                "event=cli_command module=cli status=start command=inventory shuffled={}",
                seed.is_some()
            );
            browse(&config, &layout, session, None, page, cli.json)
        }
        Commands::Search { term, page } => {
            info!(
                "event=cli_command module=cli status=start command=search term_chars={}",
                term.trim().chars().count()
            );
            if !cli.json {
                println!("{}", Route::search(&term));
            }
            browse(&config, &layout, BrowseSession::new(), Some(&term), page, cli.json)
        }
        Commands::Book { id } => {
            info!("event=cli_command module=cli status=start command=book");
            let loader = connect(&config.store)?;
            let book = loader.get_book(&id)?;
            match (book, cli.json) {
                (book, true) => print_json(&book),
                (Some(book), false) => {
                    print!("{}", render::book_detail(&book));
                    Ok(())
                }
                (None, false) => {
                    println!("{}", render::BOOK_NOT_FOUND);
                    Ok(())
                }
            }
        }
        Commands::Shelf => {
            info!("event=cli_command module=cli status=start command=shelf");
            let mut session = BrowseSession::new();
            load(&config, &mut session, None);
            let shelf = match session.view(&layout) {
                SessionView::Failed(err) => return Err(CliError::View(err.clone())),
                _ => session.shelf(layout.numbering()),
            };
            match (shelf, cli.json) {
                (shelf, true) => print_json(&shelf),
                (Some(shelf), false) => {
                    print!("{}", render::shelf(&shelf));
                    Ok(())
                }
                (None, false) => {
                    println!("{}", render::NO_RESULTS);
                    Ok(())
                }
            }
        }
    }
}

fn browse(
    config: &AppConfig,
    layout: &LayoutConfig,
    mut session: BrowseSession,
    term: Option<&str>,
    page: u32,
    json: bool,
) -> Result<(), CliError> {
    load(config, &mut session, term);

    let total_pages = layout.total_pages(session.books().len());
    session.go_to_page(page.clamp(1, total_pages.max(1)), layout);

    let view = session.view(layout);
    if let SessionView::Failed(err) = &view {
        return Err(CliError::View((*err).clone()));
    }
    if json {
        print_json(&view)
    } else {
        print!("{}", render::session_view(&view));
        Ok(())
    }
}

/// Loads into `session`; connection failures land in the session like any
/// other failed load.
fn load(config: &AppConfig, session: &mut BrowseSession, term: Option<&str>) {
    match connect(&config.store) {
        Ok(loader) => {
            session.load_from(&loader, term);
        }
        Err(err) => {
            let ticket = session.begin_load(term);
            session.complete_load(ticket, Err(err));
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
        })
}
