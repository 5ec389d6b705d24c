//! # nihongo-quiz
//!
//! A terminal Japanese practice app: kana drills, picture-word matching and
//! sentence construction by conversation topic.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nihongo_quiz::{Config, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     nihongo_quiz::run(Config::default()).await
//! }
//! ```

pub mod app;
pub mod config;
pub mod data;
mod input;
pub mod models;
pub mod quiz;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub use app::{App, AppEvent, Effect, Request};
pub use config::Config;
pub use data::{DataSource, FetchError, LoadError};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading or validating bundled content.
    Load(LoadError),
    /// Error fetching content from a data source.
    Fetch(FetchError),
    /// A session was started without any questions.
    EmptySession(&'static str),
    /// IO error during quiz execution.
    Io(io::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load content: {}", e),
            QuizError::Fetch(e) => write!(f, "Failed to fetch content: {}", e),
            QuizError::EmptySession(kind) => write!(f, "No {} questions to practice", kind),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Fetch(e) => Some(e),
            QuizError::EmptySession(_) => None,
            QuizError::Io(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<FetchError> for QuizError {
    fn from(err: FetchError) -> Self {
        QuizError::Fetch(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

/// Run the app in the terminal until the user quits.
pub async fn run(config: Config) -> Result<(), QuizError> {
    let source = data::build_source(&config)?;
    let mut app = App::new(config.timings);

    let mut term = terminal::init()?;
    let result = run_event_loop(&mut term, &mut app, source).await;
    terminal::restore()?;
    result
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    source: Arc<dyn DataSource>,
) -> Result<(), QuizError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut events = EventStream::new();
    info!("event loop started");

    while !app.should_quit() {
        terminal.draw(|frame| ui::render(frame, app))?;

        let effects = tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key)
                }
                Some(Ok(_)) => Vec::new(),
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = rx.recv() => {
                app.handle_event(event);
                Vec::new()
            }
        };

        for effect in effects {
            perform(effect, &source, &tx);
        }
    }

    info!("event loop finished");
    Ok(())
}

/// Carry out an effect in the background, reporting back through `tx`.
pub fn perform(
    effect: Effect,
    source: &Arc<dyn DataSource>,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let tx = tx.clone();
    match effect {
        Effect::Fetch { session, request } => {
            let source = Arc::clone(source);
            tokio::spawn(async move {
                let result = fetch(source.as_ref(), &request).await;
                if tx.send(AppEvent::Fetched { session, result }).is_err() {
                    debug!("event loop gone, dropping fetch result");
                }
            });
        }
        Effect::Hold { session, hold } => {
            tokio::spawn(async move {
                tokio::time::sleep(hold.duration).await;
                let ticket = hold.ticket;
                if tx.send(AppEvent::HoldElapsed { session, ticket }).is_err() {
                    debug!("event loop gone, dropping hold");
                }
            });
        }
    }
}

/// Fetch the collection behind `request`.
pub async fn fetch(
    source: &dyn DataSource,
    request: &Request,
) -> Result<data::Payload, FetchError> {
    let payload = match request {
        Request::Categories => data::Payload::Categories(source.fetch_categories().await?),
        Request::Kana { .. } => data::Payload::Kana(source.fetch_kana().await?),
        Request::WordPics => data::Payload::WordPics(source.fetch_word_pics().await?),
        Request::Sentences { category_id } => data::Payload::Sentences(
            source.fetch_sentences_by_category(category_id).await?,
        ),
    };
    Ok(payload)
}
