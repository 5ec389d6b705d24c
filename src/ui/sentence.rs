use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::models::{Category, Chunk};
use crate::quiz::{Feedback, Mode, Phase, SentenceQuiz};

use super::render_controls;

const DEFAULT_SLOT_WIDTH: usize = 8;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    category: Option<&Category>,
    quiz: &SentenceQuiz,
    focus: usize,
    bank_cursor: usize,
) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], category, quiz);
    render_prompt(frame, chunks[1], &quiz.current().kr_prompt);
    render_slots(frame, chunks[2], quiz, focus);
    if quiz.mode() == Mode::Easy {
        render_bank(frame, chunks[3], quiz, bank_cursor);
    }
    render_controls(frame, chunks[4], controls(quiz));

    match (quiz.phase(), quiz.feedback()) {
        (Phase::Checking, _) => render_checking(frame, area),
        (Phase::Reviewing, Some(feedback)) => render_feedback(frame, area, feedback),
        _ => {}
    }
}

fn controls(quiz: &SentenceQuiz) -> &'static str {
    match (quiz.phase(), quiz.mode()) {
        (Phase::Reviewing, _) => "enter close  ·  n next sentence  ·  esc back",
        (Phase::Checking, _) => "checking...",
        (_, Mode::Hard) => "type  ·  enter next slot  ·  ^t hint  ·  ^g check  ·  tab easy mode",
        (_, Mode::Easy) => "←/→ pick  ·  enter place  ·  1-9 clear slot  ·  c check  ·  tab hard mode",
    }
}

fn render_header(frame: &mut Frame, area: Rect, category: Option<&Category>, quiz: &SentenceQuiz) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let title = category
        .map(|c| format!("{} {}", c.icon, c.title))
        .unwrap_or_else(|| "Conversation".to_string());
    let mode = match quiz.mode() {
        Mode::Easy => "easy",
        Mode::Hard => "hard",
    };
    let progress = format!(
        "{}  ·  {}/{}",
        mode,
        quiz.current_index() + 1,
        quiz.len()
    );

    frame.render_widget(Paragraph::new(title).fg(Color::Cyan).bold(), halves[0]);
    frame.render_widget(
        Paragraph::new(progress)
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
        halves[1],
    );
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &str) {
    let widget = Paragraph::new(prompt.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::vertical(1)),
        );
    frame.render_widget(widget, area);
}

fn slot_text(chunk: &Chunk, value: &str) -> String {
    let width = chunk
        .width_hint()
        .map_or(DEFAULT_SLOT_WIDTH, usize::from)
        .max(chunk.text.chars().count() * 2);
    let used: usize = value
        .chars()
        .map(|c| if c.is_ascii() { 1 } else { 2 })
        .sum();
    format!("{}{}", value, " ".repeat(width.saturating_sub(used)))
}

fn render_slots(frame: &mut Frame, area: Rect, quiz: &SentenceQuiz, focus: usize) {
    let typing = quiz.mode() == Mode::Hard && quiz.phase() == Phase::Answering;
    let mut lines: Vec<Line> = Vec::with_capacity(quiz.chunks().len() * 2);

    for (index, chunk) in quiz.chunks().iter().enumerate() {
        let value = quiz.answer(chunk.id);
        let is_focused = typing && index == focus;
        let style = if quiz.is_hinted(chunk.id) {
            Style::default().fg(Color::Yellow)
        } else if is_focused {
            Style::default().fg(Color::Cyan).bold()
        } else if quiz.is_filled(chunk.id) {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if is_focused { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {}. ", marker, index + 1), style),
            Span::styled(format!("[{}]", slot_text(chunk, value)), style.underlined()),
            Span::styled(
                format!("  {}", chunk.meaning),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, area);
}

fn render_bank(frame: &mut Frame, area: Rect, quiz: &SentenceQuiz, cursor: usize) {
    let visibility = quiz.bank_visibility();
    let mut spans: Vec<Span> = Vec::with_capacity(quiz.bank_items().len() * 2);

    for (index, (word, visible)) in quiz.bank_items().iter().zip(visibility).enumerate() {
        let is_cursor = index == cursor;
        let span = if visible {
            let style = if is_cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(format!(" {} ", word), style)
        } else {
            let style = if is_cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Span::styled(" ".repeat(word.chars().count() * 2 + 2), style)
        };
        spans.push(span);
        spans.push(Span::raw("  "));
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" word bank ")
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn popup_area(area: Rect, height: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(70),
        Constraint::Fill(1),
    ])
    .split(vertical[1])[1]
}

fn render_checking(frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 3);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new("Checking...")
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, popup);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback) {
    let (headline, color) = if feedback.is_perfect {
        ("PERFECT", Color::Green)
    } else {
        ("ALMOST", Color::Yellow)
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(color).bold())),
        Line::from(""),
        Line::from(feedback.message.fg(Color::Gray)),
    ];
    if let Some(correction) = &feedback.correction {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            correction.as_str(),
            Style::default().fg(Color::White).bold(),
        )));
    }
    if feedback.hints_used > 0 {
        content.push(Line::from(""));
        content.push(Line::from(
            format!("hints used: {}", feedback.hints_used).fg(Color::DarkGray),
        ));
    }

    let popup = popup_area(area, content.len() as u16 + 3);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(color),
        );
    frame.render_widget(widget, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_text_pads_to_hint() {
        let chunk = Chunk {
            id: 1,
            text: "ab".to_string(),
            meaning: String::new(),
            width: "90px".to_string(),
        };
        assert_eq!(slot_text(&chunk, "a"), "a        ");
        assert_eq!(slot_text(&chunk, "abcdefghijk"), "abcdefghijk");
    }
}
