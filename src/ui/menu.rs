use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{HomeItem, KANA_ROW_ENTRIES, kana_row_at};
use crate::models::{Category, KanaScript};

use super::render_controls;

const MENU_CONTROLS: &str = "j/k navigate  ·  enter select  ·  esc back  ·  q quit";

fn create_layout(area: Rect, header: u16) -> std::rc::Rc<[Rect]> {
    Layout::vertical([
        Constraint::Length(header),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area)
}

fn render_header(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let content = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(subtitle.to_string().fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn item_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn marker(is_selected: bool) -> &'static str {
    if is_selected { ">" } else { " " }
}

pub fn render_home(frame: &mut Frame, area: Rect, cursor: usize) {
    let chunks = create_layout(area, 3);
    render_header(frame, chunks[0], "NIHONGO QUIZ", "Pick a way to practice");

    let mut lines: Vec<Line> = Vec::with_capacity(HomeItem::ALL.len() * 3);
    for (index, item) in HomeItem::ALL.iter().enumerate() {
        let is_selected = index == cursor;
        let style = item_style(is_selected);
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker(is_selected)), style),
            Span::styled(item.title(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", item.subtitle()),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, chunks[1]);
    render_controls(frame, chunks[2], "j/k navigate  ·  enter select  ·  q quit");
}

/// Terminal colour for a dataset styling hint such as `bg-pink-50 text-pink-700`.
fn accent_color(classes: &str) -> Color {
    let family = classes
        .split_whitespace()
        .find_map(|class| class.strip_prefix("text-"))
        .and_then(|rest| rest.split('-').next())
        .unwrap_or_default();

    match family {
        "red" | "rose" => Color::Red,
        "pink" | "fuchsia" | "purple" => Color::Magenta,
        "yellow" | "amber" | "orange" => Color::Yellow,
        "green" | "emerald" | "lime" => Color::Green,
        "sky" | "cyan" | "teal" => Color::Cyan,
        "blue" | "indigo" => Color::Blue,
        _ => Color::Gray,
    }
}

pub fn render_categories(frame: &mut Frame, area: Rect, categories: &[Category], cursor: usize) {
    let chunks = create_layout(area, 3);
    render_header(frame, chunks[0], "CONVERSATION", "Choose a situation");

    let lines: Vec<Line> = categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let is_selected = index == cursor;
            let accent = accent_color(&category.color_classes);
            let style = if is_selected {
                Style::default().fg(accent).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", marker(is_selected)), style),
                Span::raw(format!("{}  ", category.icon)),
                Span::styled(category.title.as_str(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, chunks[1]);
    render_controls(frame, chunks[2], MENU_CONTROLS);
}

pub fn render_kana_rows(frame: &mut Frame, area: Rect, script: KanaScript, cursor: usize) {
    let chunks = create_layout(area, 3);

    let tabs = [KanaScript::Hiragana, KanaScript::Katakana]
        .iter()
        .map(|s| {
            if *s == script {
                format!("[{}]", s)
            } else {
                format!(" {} ", s)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    render_header(frame, chunks[0], "KANA BASICS", &tabs);

    let lines: Vec<Line> = (0..KANA_ROW_ENTRIES)
        .map(|index| {
            let is_selected = index == cursor;
            let style = item_style(is_selected);
            let label = match kana_row_at(index) {
                Some(row) => format!("{}  {}-row", row.glyph(script), row.id),
                None => format!("All {}", script),
            };
            Line::from(vec![
                Span::styled(format!(" {} ", marker(is_selected)), style),
                Span::styled(label, style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, chunks[1]);
    render_controls(
        frame,
        chunks[2],
        "j/k navigate  ·  tab script  ·  enter start  ·  esc back",
    );
}
