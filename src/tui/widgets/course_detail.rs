use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::player::Player;
use crate::store::KeyValueStore;
use crate::tui::App;

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(player) = &app.player else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Course ");
        let paragraph = Paragraph::new("Course not found").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header
            Constraint::Length(3), // Progress
            Constraint::Min(0),    // Now playing
        ])
        .split(columns[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Course content
            Constraint::Length(7), // Course details
        ])
        .split(columns[1]);

    let percent = app.tracker().course_progress_percent(player.course().id);

    draw_header(f, player, main[0]);
    draw_progress(f, percent, main[1]);
    draw_now_playing(f, app, player, main[2]);
    draw_lessons(f, app, player, sidebar[0]);
    draw_details(f, player, sidebar[1]);
}

fn draw_header(f: &mut Frame, player: &Player, area: Rect) {
    let course = player.course();
    let stars = format!(
        "{}{}",
        "★".repeat(course.star_count()),
        "☆".repeat(5 - course.star_count())
    );

    let text = vec![
        Line::from(Span::styled(
            course.description.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", course.rating), Style::default().fg(Color::Yellow)),
            Span::styled(stars, Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  ({} students)  ", course.students),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("Created by ", Style::default().fg(Color::Gray)),
            Span::styled(course.instructor.as_str(), Style::default().fg(Color::White)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", course.title))
        .title_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_progress(f: &mut Frame, percent: u8, area: Rect) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Course Progress "),
        )
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .percent(u16::from(percent))
        .label(format!("{}%", percent));

    f.render_widget(gauge, area);
}

fn draw_now_playing<S: KeyValueStore>(f: &mut Frame, app: &App<S>, player: &Player, area: Rect) {
    let lesson = player.current_lesson();
    let completed = app
        .tracker()
        .is_lesson_complete(player.course().id, lesson.id);

    let (status_text, status_color) = if completed {
        ("Completed", Color::Green)
    } else {
        ("Not watched", Color::Yellow)
    };

    let nav = format!(
        "{}  Lesson {}/{}  {}",
        if player.has_previous() { "< prev" } else { "      " },
        player.position() + 1,
        player.course().lesson_count(),
        if player.has_next() { "next >" } else { "" },
    );

    let text = vec![
        Line::from(vec![
            Span::styled("Duration: ", Style::default().fg(Color::Gray)),
            Span::styled(lesson.duration.as_str(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]),
        Line::from(vec![
            Span::styled("Watch: ", Style::default().fg(Color::Gray)),
            Span::styled(lesson.watch_url(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Embed: ", Style::default().fg(Color::Gray)),
            Span::styled(lesson.embed_url(), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "About this video",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(lesson.description.as_str()),
        Line::from(""),
        Line::from(Span::styled(nav, Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Now Playing: {} ", lesson.title))
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_lessons<S: KeyValueStore>(f: &mut Frame, app: &App<S>, player: &Player, area: Rect) {
    let course = player.course();
    let tracker = app.tracker();

    let items: Vec<ListItem> = course
        .lessons
        .iter()
        .map(|lesson| {
            let (mark, color) = if tracker.is_lesson_complete(course.id, lesson.id) {
                ("✓", Color::Green)
            } else {
                ("○", Color::DarkGray)
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", mark), Style::default().fg(color)),
                    Span::styled(lesson.title.as_str(), Style::default().fg(Color::White)),
                ]),
                Line::from(Span::styled(
                    format!("  {}", lesson.duration),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Course Content ")
        .title_style(Style::default().fg(Color::Magenta));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(player.position()));

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_details(f: &mut Frame, player: &Player, area: Rect) {
    let course = player.course();
    let row = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<16}", label), Style::default().fg(Color::Gray)),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ])
    };

    let text = vec![
        row("Total Duration", &course.duration),
        row("Category", &course.category),
        row("Price", &course.price),
        row("Last Updated", &course.last_updated),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Course Details ");

    f.render_widget(Paragraph::new(text).block(block), area);
}
