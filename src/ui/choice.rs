use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::quiz::{ChoiceQuestion, ChoiceQuiz, ExhaustPolicy};

use super::render_controls;

pub fn render<Q: ChoiceQuestion>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    quiz: &ChoiceQuiz<Q>,
    cursor: usize,
) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], title, quiz);
    render_prompt(frame, chunks[1], quiz.current());
    render_options(frame, chunks[2], quiz, cursor);
    render_controls(
        frame,
        chunks[3],
        "j/k navigate  ·  1-4 or enter pick  ·  esc back  ·  q quit",
    );
}

fn render_progress<Q: ChoiceQuestion>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    quiz: &ChoiceQuiz<Q>,
) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let stats = quiz.stats();
    let progress = match quiz.policy() {
        ExhaustPolicy::Finish => format!("{}/{}", quiz.current_index() + 1, quiz.len()),
        ExhaustPolicy::Reshuffle => format!(
            "{}/{}  ·  round {}",
            quiz.current_index() + 1,
            quiz.len(),
            stats.cycles + 1
        ),
    };

    frame.render_widget(
        Paragraph::new(title.to_string()).fg(Color::Cyan).bold(),
        halves[0],
    );
    frame.render_widget(
        Paragraph::new(progress)
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
        halves[1],
    );
}

fn render_prompt<Q: ChoiceQuestion>(frame: &mut Frame, area: Rect, question: &Q) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            question.prompt().to_string(),
            Style::default().fg(Color::White).bold(),
        )),
    ];
    if let Some(picture) = question.illustration() {
        content.push(Line::from(""));
        content.push(Line::from(format!("[ {} ]", picture).fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_options<Q: ChoiceQuestion>(
    frame: &mut Frame,
    area: Rect,
    quiz: &ChoiceQuiz<Q>,
    cursor: usize,
) {
    let selected = quiz.selected_option();
    let verdict = quiz.is_correct();
    let options = quiz.current().options();
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_cursor = index == cursor;
        let is_picked = selected == Some(option.as_str());
        let style = match (is_picked, verdict) {
            (true, Some(true)) => Style::default().fg(Color::Green).bold(),
            (true, Some(false)) => Style::default().fg(Color::Red).bold(),
            _ if is_cursor => Style::default().fg(Color::Cyan).bold(),
            _ => Style::default().fg(Color::Gray),
        };
        let marker = match (is_picked, verdict) {
            (true, Some(true)) => "+",
            (true, Some(false)) => "-",
            _ if is_cursor => ">",
            _ => " ",
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, area);
}
