mod choice;
mod menu;
mod sentence;
mod status;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.screen {
        Screen::Home { cursor } => menu::render_home(frame, area, *cursor),
        Screen::Categories { cursor } => {
            menu::render_categories(frame, area, app.categories(), *cursor)
        }
        Screen::KanaRows { script, cursor } => {
            menu::render_kana_rows(frame, area, *script, *cursor)
        }
        Screen::Kana {
            script,
            row,
            quiz,
            cursor,
        } => {
            let title = match row {
                Some(row) => format!("{} · {}-row", script, row),
                None => script.to_string(),
            };
            choice::render(frame, area, &title, quiz, *cursor)
        }
        Screen::WordPic { quiz, cursor } => {
            choice::render(frame, area, "Picture words", quiz, *cursor)
        }
        Screen::Sentence {
            category,
            quiz,
            focus,
            bank_cursor,
        } => sentence::render(frame, area, category.as_ref(), quiz, *focus, *bank_cursor),
        Screen::Loading { request } => status::render_loading(frame, area, request),
        Screen::LoadFailed { request, message } => {
            status::render_failed(frame, area, request, message)
        }
        Screen::Complete { summary } => status::render_complete(frame, area, summary),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, controls: &str) {
    let widget = Paragraph::new(controls)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::app::{AppEvent, Effect, HomeItem};
    use crate::config::Timings;
    use crate::data::{ContentStore, Payload};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn fetched(app: &mut App, effects: Vec<Effect>, payload: Payload) {
        let Some(Effect::Fetch { session, .. }) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        app.handle_event(AppEvent::Fetched {
            session,
            result: Ok(payload),
        });
    }

    #[test]
    fn test_home_lists_every_mode() {
        let app = App::new(Timings::instant());
        let screen = draw(&app);
        for item in HomeItem::ALL {
            assert!(screen.contains(item.title()), "missing {}", item.title());
        }
    }

    #[test]
    fn test_every_screen_renders() {
        let store = ContentStore::bundled().unwrap();
        let mut app = App::new(Timings::instant());

        let effects = app.open_home_item(HomeItem::WordPic);
        draw(&app);
        fetched(&mut app, effects, Payload::WordPics(store.word_pics.clone()));
        assert!(draw(&app).contains("Picture words"));

        let effects = app.open_kana(crate::models::KanaScript::Hiragana, None);
        fetched(&mut app, effects, Payload::Kana(store.kana.clone()));
        draw(&app);

        let effects = app.open_home_item(HomeItem::Conversation);
        fetched(&mut app, effects, Payload::Categories(store.categories.clone()));
        draw(&app);

        let effects = app.open_category(0);
        let id = app.categories()[0].id.clone();
        let sentences = store
            .sentences
            .iter()
            .filter(|q| q.category_id == id)
            .cloned()
            .collect();
        fetched(&mut app, effects, Payload::Sentences(sentences));
        draw(&app);
        app.toggle();
        draw(&app);

        app.back();
        app.back();
        app.open_home_item(HomeItem::Kana);
        draw(&app);
    }

    #[test]
    fn test_failure_screen_shows_message() {
        let mut app = App::new(Timings::instant());
        let Some(Effect::Fetch { session, .. }) = app.open_home_item(HomeItem::WordPic).pop()
        else {
            panic!("expected fetch");
        };
        app.handle_event(AppEvent::Fetched {
            session,
            result: Err(crate::data::FetchError::NotFound("/word-pic".to_string())),
        });
        let screen = draw(&app);
        assert!(screen.contains("/word-pic"));
    }
}
