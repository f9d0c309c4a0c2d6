use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::store::KeyValueStore;
use crate::tui::App;

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat tiles
            Constraint::Min(0),    // Course list
        ])
        .split(area);

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    let stats = &app.stats;
    draw_tile(
        f,
        tiles[0],
        " Enrolled Courses ",
        stats.enrolled_courses.to_string(),
        Color::Magenta,
    );
    draw_tile(
        f,
        tiles[1],
        " Completed Videos ",
        stats.completed_lessons.to_string(),
        Color::Green,
    );
    draw_tile(
        f,
        tiles[2],
        " Learning Hours ",
        format!("{:.1}", stats.learning_hours),
        Color::Blue,
    );

    draw_courses(f, app, chunks[1]);
}

fn draw_tile(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(color));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )))
    .block(block);
    f.render_widget(paragraph, area);
}

fn draw_courses<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let tracker = app.tracker();

    let items: Vec<ListItem> = app
        .courses
        .items
        .iter()
        .map(|course| {
            let percent = tracker.course_progress_percent(course.id);
            let color = if percent >= 100 {
                Color::Green
            } else {
                Color::Magenta
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("{:<52}", truncate(&course.title, 50)),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(progress_bar(percent), Style::default().fg(color)),
                    Span::styled(format!(" {:>3}%", percent), Style::default().fg(color)),
                ]),
                Line::from(vec![
                    Span::styled(
                        format!("  {:<30}", course.instructor),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        format!("{} ", course.rating),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!("({} students)  ", course.students),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(course.price.as_str(), Style::default().fg(Color::White)),
                ]),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" My Courses ")
        .title_style(Style::default().fg(Color::Magenta));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.courses.selected);

    f.render_stateful_widget(list, area, &mut state);
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
