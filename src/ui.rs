use crate::status::{derived_color, RowColor};
use crate::storage::MAX_TEXT_BYTES;
use crate::store::{StoreEvent, TaskStore};
use crate::task::{Category, Priority};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::{io, path::Path, sync::mpsc::Receiver, time::Duration};
use tracing::warn;

const EVENT_POLL_MS: u64 = 250;
const COLOR_ORANGE: Color = Color::Rgb(255, 165, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Editing,
}

/// Everything the front end needs, built once at startup.
pub struct App {
    pub store: TaskStore,
    pub categories: Vec<Category>,
    pub category: usize,
    pub priority: usize,
    pub input: String,
    pub mode: Mode,
    pub selected: Option<usize>,
    pub quit: bool,
    changes: Receiver<StoreEvent>,
}

impl App {
    pub fn new(mut store: TaskStore, categories: Vec<Category>) -> Self {
        let changes = store.subscribe();
        let categories = if categories.is_empty() {
            vec![Category::default()]
        } else {
            categories
        };
        let selected = if store.is_empty() { None } else { Some(0) };
        Self {
            store,
            categories,
            category: 0,
            priority: 1, // Medium
            input: String::new(),
            mode: Mode::Normal,
            selected,
            quit: false,
            changes,
        }
    }

    pub fn current_category(&self) -> &Category {
        &self.categories[self.category]
    }

    pub fn current_priority(&self) -> Priority {
        Priority::OPTIONS[self.priority].clone()
    }

    /// Applies pending store notifications to the selection.
    pub fn sync(&mut self) {
        let events: Vec<StoreEvent> = self.changes.try_iter().collect();
        for event in events {
            match event {
                StoreEvent::Added(index) => {
                    if self.selected.is_none() {
                        self.selected = Some(index);
                    }
                }
                StoreEvent::Removed(_) => {
                    self.selected = match (self.selected, self.store.len()) {
                        (_, 0) => None,
                        (Some(i), len) => Some(i.min(len - 1)),
                        (None, _) => None,
                    };
                }
                StoreEvent::Toggled(_) => {}
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Editing => self.handle_editing_key(key),
        }
        self.sync();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('a') | KeyCode::Char('i') => self.mode = Mode::Editing,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = self.selected {
                    self.selected = Some(i.saturating_sub(1));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => match self.selected {
                Some(i) if i + 1 < self.store.len() => self.selected = Some(i + 1),
                None if !self.store.is_empty() => self.selected = Some(0),
                _ => {}
            },
            KeyCode::Char(' ') => {
                if let Some(i) = self.selected {
                    self.store.toggle_done(i);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(i) = self.selected {
                    self.store.remove(i);
                }
            }
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('p') => self.priority = (self.priority + 1) % Priority::OPTIONS.len(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let category = self.current_category().clone();
                let priority = self.current_priority();
                if self.store.add(&self.input, category, priority).is_some() {
                    self.input.clear();
                }
            }
            KeyCode::Tab => self.cycle_category(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.input.len() + c.len_utf8() <= MAX_TEXT_BYTES {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn cycle_category(&mut self) {
        self.category = (self.category + 1) % self.categories.len();
    }
}

/// Runs the terminal front end, then writes the store back to `path`.
pub fn run(mut app: App, path: &Path) -> io::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    shutdown(path, &app.store, || {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()
    });

    result
}

/// Restores the terminal and saves tasks. A restore failure does not skip the save.
fn shutdown(path: &Path, store: &TaskStore, restore: impl FnOnce() -> io::Result<()>) {
    if let Err(err) = restore() {
        warn!(error = %err, "failed to restore terminal");
    }
    if let Err(err) = crate::storage::save(path, store) {
        warn!(path = %path.display(), error = %err, "failed to save tasks");
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| draw(f, app, Utc::now()))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        if app.quit {
            return Ok(());
        }
    }
}

pub fn row_color(color: RowColor) -> Color {
    match color {
        RowColor::Gray => Color::DarkGray,
        RowColor::Purple => Color::Magenta,
        RowColor::Red => Color::Red,
        RowColor::Orange => COLOR_ORANGE,
        RowColor::Default => Color::Reset,
    }
}

pub fn draw(f: &mut Frame, app: &App, now: DateTime<Utc>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let editing = app.mode == Mode::Editing;
    let entry = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .title("New task")
            .borders(Borders::ALL)
            .border_style(if editing {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(entry, chunks[0]);
    if editing {
        let width = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let x = chunks[0].x.saturating_add(1).saturating_add(width).min(max_x);
        f.set_cursor_position((x, chunks[0].y + 1));
    }

    let selectors = Paragraph::new(Line::from(vec![
        Span::raw(" Category: "),
        Span::styled(
            app.current_category().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Priority: "),
        Span::styled(
            app.current_priority().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(selectors, chunks[1]);

    let rows: Vec<Row> = app
        .store
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.text.clone()),
                Cell::from(if t.done { "[x]" } else { "[ ]" }),
                Cell::from(t.category.to_string()),
                Cell::from(t.priority.to_string()),
                Cell::from(t.due_date_label()),
            ])
            .style(Style::default().fg(row_color(derived_color(t, now))))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["Task", "Done", "Category", "Priority", "Due"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Tasks").borders(Borders::ALL))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");
    let mut state = TableState::default().with_selected(app.selected);
    f.render_stateful_widget(table, chunks[2], &mut state);

    let gauge = Gauge::default()
        .block(Block::default().title("Progress").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(app.store.completion_fraction())
        .label(format!("{}/{} done", app.store.done_count(), app.store.len()));
    f.render_widget(gauge, chunks[3]);

    let help = if editing {
        "Enter add  Tab category  Esc done editing"
    } else {
        "a add  Space toggle  d delete  c category  p priority  q quit"
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );
}
