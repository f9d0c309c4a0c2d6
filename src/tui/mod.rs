mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::Result;
use crate::models::{Course, DashboardStats};
use crate::player::Player;
use crate::progress::ProgressTracker;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Course,
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App<S: KeyValueStore> {
    tracker: ProgressTracker<S>,
    pub view: View,
    pub courses: StatefulList<Course>,
    pub player: Option<Player>,
    pub stats: DashboardStats,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(tracker: ProgressTracker<S>) -> Self {
        let courses = tracker.catalog().list_courses().to_vec();
        let stats = tracker.dashboard_stats();

        Self {
            tracker,
            view: View::Dashboard,
            courses: StatefulList::with_items(courses),
            player: None,
            stats,
            status: None,
            should_quit: false,
        }
    }

    pub fn tracker(&self) -> &ProgressTracker<S> {
        &self.tracker
    }

    fn open_course(&mut self) {
        if let Some(course) = self.courses.selected_item() {
            match Player::new(course.clone()) {
                Some(player) => {
                    self.player = Some(player);
                    self.view = View::Course;
                    self.status = None;
                }
                None => self.status = Some(format!("'{}' has no lessons yet", course.title)),
            }
        }
    }

    fn close_course(&mut self) {
        self.view = View::Dashboard;
        self.player = None;
        self.status = None;
    }

    // Same path a finished video takes
    fn complete_current(&mut self) -> Result<()> {
        if let Some(player) = &self.player {
            player.finish_current(&mut self.tracker)?;
            self.status = Some(format!("Completed: {}", player.current_lesson().title));
            self.stats = self.tracker.dashboard_stats();
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left if self.view == View::Course => {
                self.close_course();
            }

            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Dashboard => self.courses.next(),
                View::Course => {
                    if let Some(player) = self.player.as_mut() {
                        player.next();
                    }
                }
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Dashboard => self.courses.previous(),
                View::Course => {
                    if let Some(player) = self.player.as_mut() {
                        player.previous();
                    }
                }
            },

            KeyCode::Char('g') => match self.view {
                View::Dashboard if !self.courses.items.is_empty() => {
                    self.courses.selected = Some(0);
                }
                View::Course => {
                    if let Some(player) = self.player.as_mut() {
                        player.select(0);
                    }
                }
                _ => {}
            },
            KeyCode::Char('G') => match self.view {
                View::Dashboard if !self.courses.items.is_empty() => {
                    self.courses.selected = Some(self.courses.items.len() - 1);
                }
                View::Course => {
                    if let Some(player) = self.player.as_mut() {
                        let last = player.course().lesson_count().saturating_sub(1);
                        player.select(last);
                    }
                }
                _ => {}
            },

            KeyCode::Char('n') if self.view == View::Course => {
                if let Some(player) = self.player.as_mut() {
                    player.next();
                }
            }
            KeyCode::Char('p') if self.view == View::Course => {
                if let Some(player) = self.player.as_mut() {
                    player.previous();
                }
            }

            KeyCode::Char('c') if self.view == View::Course => self.complete_current()?,

            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter
                if self.view == View::Dashboard =>
            {
                self.open_course();
            }

            _ => {}
        }
        Ok(())
    }
}

pub fn run<S: KeyValueStore>(tracker: ProgressTracker<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tracker);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
