//! Screen navigation and session ownership.
//!
//! `App` never performs I/O or sleeps. Actions return [`Effect`]s that the
//! event loop carries out; their outcomes come back as [`AppEvent`]s tagged
//! with the session that asked for them. Every navigation starts a new
//! session, so anything still in flight for an abandoned screen is dropped
//! when it arrives.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Timings;
use crate::data::{FetchError, Payload};
use crate::models::{Category, KanaQuestion, KanaScript, WordPicQuestion};
use crate::quiz::{
    ChoiceQuestion, ChoiceQuiz, ExhaustPolicy, Hold, Mode, Phase, Progress, SentenceQuiz,
    SessionStats,
};

pub type SessionId = Uuid;

/// A collection a screen needs before it can start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Categories,
    Kana {
        script: KanaScript,
        row: Option<String>,
    },
    WordPics,
    Sentences {
        category_id: String,
    },
}

impl Request {
    pub fn label(&self) -> String {
        match self {
            Request::Categories => "conversation topics".to_string(),
            Request::Kana { script, row: None } => format!("{} quiz", script),
            Request::Kana {
                script,
                row: Some(row),
            } => format!("{} quiz ({}-row)", script, row),
            Request::WordPics => "picture words".to_string(),
            Request::Sentences { category_id } => format!("sentences for {}", category_id),
        }
    }
}

/// Work the event loop performs on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch {
        session: SessionId,
        request: Request,
    },
    Hold {
        session: SessionId,
        hold: Hold,
    },
}

/// Outcome of an [`Effect`], delivered back to the app.
#[derive(Debug)]
pub enum AppEvent {
    Fetched {
        session: SessionId,
        result: Result<Payload, FetchError>,
    },
    HoldElapsed {
        session: SessionId,
        ticket: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Kana,
    WordPic,
    Conversation,
}

impl HomeItem {
    pub const ALL: [HomeItem; 3] = [HomeItem::Kana, HomeItem::WordPic, HomeItem::Conversation];

    pub fn title(self) -> &'static str {
        match self {
            HomeItem::Kana => "Kana basics",
            HomeItem::WordPic => "Picture words",
            HomeItem::Conversation => "Conversation",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            HomeItem::Kana => "Hiragana and katakana, row by row",
            HomeItem::WordPic => "Match the word to the picture",
            HomeItem::Conversation => "Build sentences for everyday situations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KanaRow {
    pub id: &'static str,
    pub hiragana: &'static str,
    pub katakana: &'static str,
}

impl KanaRow {
    pub fn glyph(&self, script: KanaScript) -> &'static str {
        match script {
            KanaScript::Hiragana => self.hiragana,
            KanaScript::Katakana => self.katakana,
        }
    }
}

pub const KANA_ROWS: [KanaRow; 10] = [
    KanaRow { id: "a", hiragana: "あ", katakana: "ア" },
    KanaRow { id: "ka", hiragana: "か", katakana: "カ" },
    KanaRow { id: "sa", hiragana: "さ", katakana: "サ" },
    KanaRow { id: "ta", hiragana: "た", katakana: "タ" },
    KanaRow { id: "na", hiragana: "な", katakana: "ナ" },
    KanaRow { id: "ha", hiragana: "は", katakana: "ハ" },
    KanaRow { id: "ma", hiragana: "ま", katakana: "マ" },
    KanaRow { id: "ya", hiragana: "や", katakana: "ヤ" },
    KanaRow { id: "ra", hiragana: "ら", katakana: "ラ" },
    KanaRow { id: "wa", hiragana: "わ", katakana: "ワ" },
];

/// Entries on the kana selector: "all" followed by every row.
pub const KANA_ROW_ENTRIES: usize = KANA_ROWS.len() + 1;

/// Row selected by a kana selector cursor; `None` means the whole script.
pub fn kana_row_at(cursor: usize) -> Option<&'static KanaRow> {
    cursor.checked_sub(1).and_then(|i| KANA_ROWS.get(i))
}

/// Result of a finished session, shown instead of a blocking dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub total: usize,
    pub stats: SessionStats,
}

pub enum Screen {
    Home {
        cursor: usize,
    },
    Categories {
        cursor: usize,
    },
    KanaRows {
        script: KanaScript,
        cursor: usize,
    },
    Kana {
        script: KanaScript,
        row: Option<String>,
        quiz: ChoiceQuiz<KanaQuestion>,
        cursor: usize,
    },
    WordPic {
        quiz: ChoiceQuiz<WordPicQuestion>,
        cursor: usize,
    },
    Sentence {
        category: Option<Category>,
        quiz: SentenceQuiz,
        /// Focused slot in hard mode.
        focus: usize,
        /// Highlighted bank entry in easy mode.
        bank_cursor: usize,
    },
    Loading {
        request: Request,
    },
    LoadFailed {
        request: Request,
        message: String,
    },
    Complete {
        summary: Summary,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home { .. } => "home",
            Screen::Categories { .. } => "categories",
            Screen::KanaRows { .. } => "kana-rows",
            Screen::Kana { .. } => "kana-quiz",
            Screen::WordPic { .. } => "word-pic-quiz",
            Screen::Sentence { .. } => "sentence-quiz",
            Screen::Loading { .. } => "loading",
            Screen::LoadFailed { .. } => "load-failed",
            Screen::Complete { .. } => "complete",
        }
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).rem_euclid(len as isize) as usize
}

pub struct App {
    pub screen: Screen,
    session: SessionId,
    categories: Vec<Category>,
    timings: Timings,
    should_quit: bool,
}

impl App {
    pub fn new(timings: Timings) -> Self {
        Self {
            screen: Screen::Home { cursor: 0 },
            session: Uuid::new_v4(),
            categories: Vec::new(),
            timings,
            should_quit: false,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether printable keys are text for a sentence slot.
    pub fn is_typing(&self) -> bool {
        matches!(
            &self.screen,
            Screen::Sentence { quiz, .. }
                if quiz.mode() == Mode::Hard && quiz.phase() == Phase::Answering
        )
    }

    fn enter(&mut self, screen: Screen) {
        self.session = Uuid::new_v4();
        debug!(screen = screen.name(), session = %self.session, "navigate");
        self.screen = screen;
    }

    fn request(&mut self, request: Request) -> Vec<Effect> {
        self.enter(Screen::Loading {
            request: request.clone(),
        });
        vec![Effect::Fetch {
            session: self.session,
            request,
        }]
    }

    fn hold(&self, hold: Option<Hold>) -> Vec<Effect> {
        hold.map(|hold| Effect::Hold {
            session: self.session,
            hold,
        })
        .into_iter()
        .collect()
    }

    fn rng() -> StdRng {
        StdRng::from_os_rng()
    }

    pub fn go_home(&mut self) {
        self.enter(Screen::Home { cursor: 0 });
    }

    pub fn open_home_item(&mut self, item: HomeItem) -> Vec<Effect> {
        match item {
            HomeItem::Kana => {
                self.enter(Screen::KanaRows {
                    script: KanaScript::Hiragana,
                    cursor: 0,
                });
                Vec::new()
            }
            HomeItem::WordPic => self.request(Request::WordPics),
            HomeItem::Conversation => self.open_categories(),
        }
    }

    fn open_categories(&mut self) -> Vec<Effect> {
        if self.categories.is_empty() {
            self.request(Request::Categories)
        } else {
            self.enter(Screen::Categories { cursor: 0 });
            Vec::new()
        }
    }

    pub fn open_category(&mut self, index: usize) -> Vec<Effect> {
        let Some(category) = self.categories.get(index) else {
            return Vec::new();
        };
        let category_id = category.id.clone();
        self.request(Request::Sentences { category_id })
    }

    pub fn open_kana(&mut self, script: KanaScript, row: Option<String>) -> Vec<Effect> {
        self.request(Request::Kana { script, row })
    }

    /// Repeat the request of a failed load.
    pub fn retry(&mut self) -> Vec<Effect> {
        if let Screen::LoadFailed { request, .. } = &self.screen {
            let request = request.clone();
            info!(request = %request.label(), "retrying load");
            return self.request(request);
        }
        Vec::new()
    }

    /// Leave the current screen for its parent.
    pub fn back(&mut self) {
        let parent = match &self.screen {
            Screen::Home { .. } => return,
            Screen::Kana { script, .. } => Screen::KanaRows {
                script: *script,
                cursor: 0,
            },
            Screen::Sentence { .. } => self.categories_or_home(),
            Screen::Loading { request } | Screen::LoadFailed { request, .. } => match request {
                Request::Kana { script, .. } => Screen::KanaRows {
                    script: *script,
                    cursor: 0,
                },
                Request::Sentences { .. } => self.categories_or_home(),
                Request::Categories | Request::WordPics => Screen::Home { cursor: 0 },
            },
            Screen::Categories { .. }
            | Screen::KanaRows { .. }
            | Screen::WordPic { .. }
            | Screen::Complete { .. } => Screen::Home { cursor: 0 },
        };
        self.enter(parent);
    }

    fn categories_or_home(&self) -> Screen {
        if self.categories.is_empty() {
            Screen::Home { cursor: 0 }
        } else {
            Screen::Categories { cursor: 0 }
        }
    }

    /// Move the highlight of the current list by `delta`, wrapping around.
    pub fn move_cursor(&mut self, delta: isize) {
        let categories = self.categories.len();
        match &mut self.screen {
            Screen::Home { cursor } => *cursor = step(*cursor, delta, HomeItem::ALL.len()),
            Screen::Categories { cursor } => *cursor = step(*cursor, delta, categories),
            Screen::KanaRows { cursor, .. } => *cursor = step(*cursor, delta, KANA_ROW_ENTRIES),
            Screen::Kana { quiz, cursor, .. } => {
                *cursor = step(*cursor, delta, quiz.current().options().len())
            }
            Screen::WordPic { quiz, cursor } => {
                *cursor = step(*cursor, delta, quiz.current().options().len())
            }
            Screen::Sentence {
                quiz,
                focus,
                bank_cursor,
                ..
            } => match quiz.mode() {
                Mode::Hard => *focus = step(*focus, delta, quiz.chunks().len()),
                Mode::Easy => *bank_cursor = step(*bank_cursor, delta, quiz.bank_items().len()),
            },
            Screen::Loading { .. } | Screen::LoadFailed { .. } | Screen::Complete { .. } => {}
        }
    }

    /// The primary action of the current screen (Enter).
    pub fn activate(&mut self) -> Vec<Effect> {
        match &mut self.screen {
            Screen::Home { cursor } => {
                let item = HomeItem::ALL[*cursor % HomeItem::ALL.len()];
                self.open_home_item(item)
            }
            Screen::Categories { cursor } => {
                let index = *cursor;
                self.open_category(index)
            }
            Screen::KanaRows { script, cursor } => {
                let script = *script;
                let row = kana_row_at(*cursor).map(|row| row.id.to_string());
                self.open_kana(script, row)
            }
            Screen::Kana { cursor, .. } | Screen::WordPic { cursor, .. } => {
                let index = *cursor;
                self.choose(index)
            }
            Screen::Sentence {
                quiz,
                focus,
                bank_cursor,
                ..
            } => {
                match (quiz.phase(), quiz.mode()) {
                    (Phase::Reviewing, _) => {
                        quiz.dismiss();
                    }
                    (Phase::Answering, Mode::Hard) => {
                        if let Some(next) = quiz.next_slot(*focus) {
                            *focus = next;
                        }
                    }
                    (Phase::Answering, Mode::Easy) => {
                        quiz.pick_bank(*bank_cursor);
                    }
                    (Phase::Checking, _) | (Phase::Finished, _) => {}
                }
                Vec::new()
            }
            Screen::LoadFailed { .. } => self.retry(),
            Screen::Complete { .. } => {
                self.go_home();
                Vec::new()
            }
            Screen::Loading { .. } => Vec::new(),
        }
    }

    /// Pick option `index` on a choice screen.
    pub fn choose(&mut self, index: usize) -> Vec<Effect> {
        let hold = match &mut self.screen {
            Screen::Kana { quiz, cursor, .. } => select_at(quiz, cursor, index),
            Screen::WordPic { quiz, cursor } => select_at(quiz, cursor, index),
            _ => None,
        };
        self.hold(hold)
    }

    /// Tab: switch script on the kana selector, switch mode in a sentence quiz.
    pub fn toggle(&mut self) {
        match &mut self.screen {
            Screen::KanaRows { script, .. } => *script = script.toggled(),
            Screen::Sentence {
                quiz,
                focus,
                bank_cursor,
                ..
            } => {
                quiz.set_mode(quiz.mode().toggled());
                *focus = 0;
                *bank_cursor = 0;
            }
            _ => {}
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Screen::Sentence { quiz, focus, .. } = &mut self.screen {
            let Some(chunk_id) = quiz.chunks().get(*focus).map(|c| c.id) else {
                return;
            };
            let mut value = quiz.answer(chunk_id).to_string();
            value.push(c);
            quiz.input(chunk_id, value);
        }
    }

    /// Backspace: delete in hard mode, empty the last filled slot in easy mode.
    pub fn backspace(&mut self) {
        if let Screen::Sentence { quiz, focus, .. } = &mut self.screen {
            match quiz.mode() {
                Mode::Hard => {
                    let Some(chunk_id) = quiz.chunks().get(*focus).map(|c| c.id) else {
                        return;
                    };
                    let mut value = quiz.answer(chunk_id).to_string();
                    value.pop();
                    quiz.input(chunk_id, value);
                }
                Mode::Easy => {
                    let last = quiz
                        .chunks()
                        .iter()
                        .rev()
                        .find(|c| quiz.is_filled(c.id))
                        .map(|c| c.id);
                    if let Some(chunk_id) = last {
                        quiz.clear_slot(chunk_id);
                    }
                }
            }
        }
    }

    /// Empty slot `index` (easy mode).
    pub fn clear_slot(&mut self, index: usize) {
        if let Screen::Sentence { quiz, .. } = &mut self.screen {
            if let Some(chunk_id) = quiz.chunks().get(index).map(|c| c.id) {
                quiz.clear_slot(chunk_id);
            }
        }
    }

    /// Reveal the focused chunk (hard mode).
    pub fn hint(&mut self) {
        if let Screen::Sentence { quiz, focus, .. } = &mut self.screen {
            if let Some(chunk_id) = quiz.chunks().get(*focus).map(|c| c.id) {
                quiz.hint(chunk_id);
            }
        }
    }

    /// Submit the sentence for grading.
    pub fn check(&mut self) -> Vec<Effect> {
        let hold = match &mut self.screen {
            Screen::Sentence { quiz, .. } => quiz.check(),
            _ => None,
        };
        self.hold(hold)
    }

    /// Continue to the next sentence after a review.
    pub fn next_question(&mut self) {
        let Screen::Sentence {
            category,
            quiz,
            focus,
            bank_cursor,
        } = &mut self.screen
        else {
            return;
        };

        match quiz.next_question() {
            Some(Progress::Completed) => {
                let summary = Summary {
                    title: category
                        .as_ref()
                        .map(|c| c.title.clone())
                        .unwrap_or_else(|| "Conversation".to_string()),
                    total: quiz.len(),
                    stats: quiz.stats(),
                };
                self.enter(Screen::Complete { summary });
            }
            Some(_) => {
                *focus = 0;
                *bank_cursor = 0;
            }
            None => {}
        }
    }

    /// Apply the outcome of an effect.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Fetched { session, result } => {
                if session != self.session {
                    debug!(%session, "dropping fetch result for abandoned session");
                    return;
                }
                self.on_fetched(result);
            }
            AppEvent::HoldElapsed { session, ticket } => {
                if session != self.session {
                    debug!(%session, ticket, "dropping hold for abandoned session");
                    return;
                }
                self.on_hold_elapsed(ticket);
            }
        }
    }

    fn on_hold_elapsed(&mut self, ticket: u64) {
        let completed = match &mut self.screen {
            Screen::Kana { quiz, cursor, .. } => {
                let progress = quiz.resolve(ticket);
                reset_cursor(progress, cursor);
                None
            }
            Screen::WordPic { quiz, cursor } => {
                let progress = quiz.resolve(ticket);
                reset_cursor(progress, cursor);
                (progress == Some(Progress::Completed)).then(|| Summary {
                    title: HomeItem::WordPic.title().to_string(),
                    total: quiz.len(),
                    stats: quiz.stats(),
                })
            }
            Screen::Sentence { quiz, .. } => {
                quiz.resolve(ticket);
                None
            }
            _ => None,
        };

        if let Some(summary) = completed {
            self.enter(Screen::Complete { summary });
        }
    }

    fn on_fetched(&mut self, result: Result<Payload, FetchError>) {
        let Screen::Loading { request } = &self.screen else {
            debug!(screen = self.screen.name(), "fetch result outside loading screen");
            return;
        };
        let request = request.clone();

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                warn!(request = %request.label(), error = %e, "failed to load");
                self.screen = Screen::LoadFailed {
                    request,
                    message: e.to_string(),
                };
                return;
            }
        };

        info!(request = %request.label(), count = payload.len(), "loaded");
        match self.start(&request, payload) {
            Ok(screen) => self.screen = screen,
            Err(message) => {
                warn!(request = %request.label(), %message, "cannot start session");
                self.screen = Screen::LoadFailed { request, message };
            }
        }
    }

    fn start(&mut self, request: &Request, payload: Payload) -> Result<Screen, String> {
        match (request, payload) {
            (Request::Categories, Payload::Categories(categories)) => {
                if categories.is_empty() {
                    return Err("No conversation topics available.".to_string());
                }
                self.categories = categories;
                Ok(Screen::Categories { cursor: 0 })
            }
            (Request::Kana { script, row }, Payload::Kana(all)) => {
                let questions: Vec<KanaQuestion> = all
                    .into_iter()
                    .filter(|q| q.matches(*script, row.as_deref()))
                    .collect();
                let quiz = ChoiceQuiz::new(
                    questions,
                    ExhaustPolicy::Reshuffle,
                    self.timings,
                    Self::rng(),
                )
                .map_err(|e| e.to_string())?;
                Ok(Screen::Kana {
                    script: *script,
                    row: row.clone(),
                    quiz,
                    cursor: 0,
                })
            }
            (Request::WordPics, Payload::WordPics(questions)) => {
                let quiz =
                    ChoiceQuiz::new(questions, ExhaustPolicy::Finish, self.timings, Self::rng())
                        .map_err(|e| e.to_string())?;
                Ok(Screen::WordPic { quiz, cursor: 0 })
            }
            (Request::Sentences { category_id }, Payload::Sentences(questions)) => {
                let category = self
                    .categories
                    .iter()
                    .find(|c| c.id == *category_id)
                    .cloned();
                let quiz = SentenceQuiz::new(questions, self.timings, Self::rng())
                    .map_err(|e| e.to_string())?;
                Ok(Screen::Sentence {
                    category,
                    quiz,
                    focus: 0,
                    bank_cursor: 0,
                })
            }
            (request, _) => Err(format!("Unexpected data for {}.", request.label())),
        }
    }
}

fn select_at<Q: ChoiceQuestion>(
    quiz: &mut ChoiceQuiz<Q>,
    cursor: &mut usize,
    index: usize,
) -> Option<Hold> {
    let option = quiz.current().options().get(index)?.clone();
    let hold = quiz.select_option(&option)?;
    *cursor = index;
    Some(hold)
}

fn reset_cursor(progress: Option<Progress>, cursor: &mut usize) {
    if matches!(
        progress,
        Some(Progress::Next | Progress::Cycled | Progress::Completed)
    ) {
        *cursor = 0;
    }
}
