use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::actions::Action;
use crate::session::{UiSink, STANDBY_LABEL};

/// Exercise programs offered by the tracker
pub const EXERCISES: [&str; 5] = [
    "push_ups.exe",
    "squats.exe",
    "sit_ups.exe",
    "jumping_jacks.exe",
    "plank.exe",
];

/// Retro terminal palette for the console
pub struct Theme {
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub ok: Color,
    pub alert: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::Rgb(200, 220, 200),
            dim: Color::Rgb(90, 110, 90),
            accent: Color::Rgb(80, 250, 123),
            ok: Color::Rgb(80, 200, 120),
            alert: Color::Rgb(255, 85, 85),
        }
    }
}

/// Which field is receiving keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingSets,
    EditingReps,
}

/// Main application state
pub struct App {
    /// Cursor over the exercise list
    pub list_state: ListState,
    /// Identifier confirmed with Enter, if any
    pub chosen_exercise: Option<String>,
    /// Raw text of the sets field, parsed on start
    pub sets_input: String,
    /// Raw text of the reps field, parsed on start
    pub reps_input: String,
    /// Displayed exercise label
    pub exercise_label: String,
    /// Displayed "current / total" set counter
    pub set_counter: String,
    /// Displayed "current / goal" rep counter
    pub rep_counter: String,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    /// Latest alert to show in the footer
    pub alert_message: Option<String>,
    pub theme: Theme,
    pub input_mode: InputMode,
    /// Pending action queue
    pub pending_actions: Vec<Action>,
}

impl App {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            list_state,
            chosen_exercise: None,
            sets_input: "3".to_string(),
            reps_input: "10".to_string(),
            exercise_label: STANDBY_LABEL.to_string(),
            set_counter: "0 / 0".to_string(),
            rep_counter: "0 / 0".to_string(),
            start_enabled: true,
            stop_enabled: false,
            alert_message: None,
            theme: Theme::default(),
            input_mode: InputMode::Normal,
            pending_actions: Vec::new(),
        }
    }

    /// The exercise under the list cursor
    pub fn highlighted_exercise(&self) -> Option<&'static str> {
        self.list_state
            .selected()
            .and_then(|i| EXERCISES.get(i).copied())
    }

    /// Take pending actions (drains the queue)
    pub fn take_pending_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Handle an action and return whether to quit
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::KeyPress(key) => self.handle_key(key),
            Action::Quit => Ok(true),
            _ => Ok(false),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Clear the alert on any key press
        if self.alert_message.is_some() && self.input_mode == InputMode::Normal {
            self.alert_message = None;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditingSets | InputMode::EditingReps => self.handle_editing_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(true);
            }
            KeyCode::Char('j') | KeyCode::Down => self.next_exercise(),
            KeyCode::Char('k') | KeyCode::Up => self.previous_exercise(),
            KeyCode::Enter => {
                if let Some(exercise) = self.highlighted_exercise() {
                    self.chosen_exercise = Some(exercise.to_string());
                    self.pending_actions
                        .push(Action::ExerciseSelected(exercise.to_string()));
                }
            }
            KeyCode::Char('e') => self.input_mode = InputMode::EditingSets,
            KeyCode::Char('r') => self.input_mode = InputMode::EditingReps,
            KeyCode::Char('s') => {
                if self.start_enabled {
                    self.pending_actions.push(Action::StartRequested);
                }
            }
            KeyCode::Char('x') => {
                if self.stop_enabled {
                    self.pending_actions.push(Action::StopRequested);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Result<bool> {
        let buffer = match self.input_mode {
            InputMode::EditingSets => &mut self.sets_input,
            InputMode::EditingReps => &mut self.reps_input,
            InputMode::Normal => unreachable!(),
        };

        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if buffer.len() < 3 {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            _ => {}
        }
        Ok(false)
    }

    fn next_exercise(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= EXERCISES.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_exercise(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    EXERCISES.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Footer/status
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_main(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " WorkoutConsole ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "│ Session console for the workout tracker",
                Style::default().fg(self.theme.dim),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(title, area);
    }

    fn render_main(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // Exercise list
                Constraint::Percentage(60), // Session pane
            ])
            .split(area);

        self.render_exercise_list(frame, chunks[0]);
        self.render_session_pane(frame, chunks[1]);
    }

    fn render_exercise_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = EXERCISES
            .iter()
            .map(|exercise| {
                let chosen = self.chosen_exercise.as_deref() == Some(*exercise);
                let marker = if chosen {
                    Span::styled("● ", Style::default().fg(self.theme.accent))
                } else {
                    Span::styled("○ ", Style::default().fg(self.theme.dim))
                };
                let name = Span::styled(*exercise, Style::default().fg(self.theme.fg));
                ListItem::new(Line::from(vec![marker, name]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Exercises ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.dim)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Rgb(40, 55, 40))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_session_pane(&self, frame: &mut Frame, area: Rect) {
        let goal_field = |value: &str, editing: bool| {
            if editing {
                Span::styled(
                    format!("{value}_"),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(value.to_string(), Style::default().fg(self.theme.fg))
            }
        };

        let control = |label: &str, enabled: bool| {
            if enabled {
                Span::styled(label.to_string(), Style::default().fg(self.theme.ok))
            } else {
                Span::styled(label.to_string(), Style::default().fg(self.theme.dim))
            }
        };

        let content = vec![
            Line::from(vec![
                Span::styled("Exercise: ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    &self.exercise_label,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Set:      ", Style::default().fg(self.theme.dim)),
                Span::styled(&self.set_counter, Style::default().fg(self.theme.fg)),
            ]),
            Line::from(vec![
                Span::styled("Reps:     ", Style::default().fg(self.theme.dim)),
                Span::styled(&self.rep_counter, Style::default().fg(self.theme.fg)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Sets goal: ", Style::default().fg(self.theme.dim)),
                goal_field(&self.sets_input, self.input_mode == InputMode::EditingSets),
            ]),
            Line::from(vec![
                Span::styled("Reps goal: ", Style::default().fg(self.theme.dim)),
                goal_field(&self.reps_input, self.input_mode == InputMode::EditingReps),
            ]),
            Line::from(""),
            Line::from(vec![
                control("[s] START", self.start_enabled),
                Span::styled("   ", Style::default()),
                control("[x] STOP", self.stop_enabled),
            ]),
        ];

        let pane = Paragraph::new(content).block(
            Block::default()
                .title(" Session ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(pane, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help_text = match self.input_mode {
            InputMode::Normal => {
                " q: Quit │ j/k: Navigate │ Enter: Select │ e/r: Edit goals │ s: Start │ x: Stop "
            }
            InputMode::EditingSets | InputMode::EditingReps => {
                " Type digits │ Backspace: Erase │ Enter/Esc: Done "
            }
        };

        let content = if let Some(ref msg) = self.alert_message {
            Line::from(Span::styled(
                format!(" {} ", msg),
                Style::default().fg(self.theme.alert),
            ))
        } else {
            Line::from(Span::styled(help_text, Style::default().fg(self.theme.dim)))
        };

        let footer = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(footer, area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSink for App {
    fn set_exercise_label(&mut self, label: &str) {
        self.exercise_label = label.to_string();
    }

    fn set_set_counter(&mut self, current: u32, total: u32) {
        self.set_counter = format!("{current} / {total}");
    }

    fn set_rep_counter(&mut self, current: u32, goal: u32) {
        self.rep_counter = format!("{current} / {goal}");
    }

    fn set_controls_enabled(&mut self, start: bool, stop: bool) {
        self.start_enabled = start;
        self.stop_enabled = stop;
    }

    fn alert(&mut self, message: &str) {
        self.alert_message = Some(message.to_string());
    }
}
