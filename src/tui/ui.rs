use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{course_detail, dashboard};
use super::{App, View};
use crate::store::KeyValueStore;

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let course_tab = match &app.player {
        Some(player) => player.course().title.clone(),
        None => "Course".to_string(),
    };
    let selected = match app.view {
        View::Dashboard => 0,
        View::Course => 1,
    };

    let tabs = Tabs::new(vec!["My Courses".to_string(), course_tab])
        .block(Block::default().borders(Borders::ALL).title(" BizCoach "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    match app.view {
        View::Dashboard => dashboard::draw(f, app, area),
        View::Course => course_detail::draw(f, app, area),
    }
}

fn draw_help_bar<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));

    let mut spans = match app.view {
        View::Dashboard => vec![
            key("j/k"),
            Span::raw(" Nav  "),
            key("g/G"),
            Span::raw(" Top/Bot  "),
            key("l/<CR>"),
            Span::raw(" Open  "),
        ],
        View::Course => vec![
            key("h/<Esc>"),
            Span::raw(" Back  "),
            key("n/p"),
            Span::raw(" Next/Prev  "),
            key("c"),
            Span::raw(" Mark complete  "),
        ],
    };
    spans.extend(vec![key("q"), Span::raw(" Quit")]);

    if let Some(status) = &app.status {
        spans.push(Span::raw("  | "));
        spans.push(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Green),
        ));
    }

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
