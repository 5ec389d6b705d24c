use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{Request, Summary};

use super::render_controls;

fn centered(area: Rect, height: u16) -> (Rect, Rect) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);
    (chunks[1], chunks[3])
}

fn boxed(content: Vec<Line<'_>>) -> Paragraph<'_> {
    Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        )
}

pub fn render_loading(frame: &mut Frame, area: Rect, request: &Request) {
    let (body, controls) = centered(area, 5);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "LOADING",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(request.label().fg(Color::DarkGray)),
    ];
    frame.render_widget(boxed(content), body);
    render_controls(frame, controls, "esc back  ·  q quit");
}

pub fn render_failed(frame: &mut Frame, area: Rect, request: &Request, message: &str) {
    let (body, controls) = centered(area, 8);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "COULD NOT LOAD",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(request.label().fg(Color::Gray)),
        Line::from(""),
        Line::from(message.to_string().fg(Color::DarkGray)),
    ];
    frame.render_widget(boxed(content), body);
    render_controls(frame, controls, "r retry  ·  esc back  ·  q quit");
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn render_complete(frame: &mut Frame, area: Rect, summary: &Summary) {
    let (body, controls) = centered(area, 10);
    let stats = summary.stats;
    let percentage = calculate_percentage(stats.first_try, summary.total);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "SESSION COMPLETE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(summary.title.clone().fg(Color::Gray)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {} on the first try  ({:.0}%)",
                stats.first_try, summary.total, percentage
            ),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(
            format!("{} attempts  ·  {} solved", stats.attempts, stats.answered)
                .fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(boxed(content), body);
    render_controls(frame, controls, "enter home  ·  q quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_color_bands() {
        assert_eq!(get_grade_color(calculate_percentage(10, 10)), Color::Green);
        assert_eq!(get_grade_color(calculate_percentage(3, 4)), Color::Cyan);
        assert_eq!(get_grade_color(calculate_percentage(1, 2)), Color::Yellow);
        assert_eq!(get_grade_color(calculate_percentage(0, 0)), Color::Red);
    }
}
