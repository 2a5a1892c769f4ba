use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::stdout;

use crate::config::Config;
use crate::models::{ApplicationFields, ApplicationRecord, Status};
use crate::query::{self, StatusFilter};
use crate::stats;
use crate::storage::Storage;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Dashboard,
    Applications,
    Analytics,
}

const VIEWS: [View; 3] = [View::Dashboard, View::Applications, View::Analytics];

impl View {
    fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Applications => "Applications",
            View::Analytics => "Analytics",
        }
    }

    fn index(&self) -> usize {
        VIEWS.iter().position(|v| v == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        VIEWS[(self.index() + 1) % VIEWS.len()]
    }

    fn prev(self) -> Self {
        VIEWS[(self.index() + VIEWS.len() - 1) % VIEWS.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Company,
    Position,
    Location,
    Salary,
    Status,
    JobType,
    Remote,
    Date,
    Notes,
}

const FIELDS: [Field; 9] = [
    Field::Company,
    Field::Position,
    Field::Location,
    Field::Salary,
    Field::Status,
    Field::JobType,
    Field::Remote,
    Field::Date,
    Field::Notes,
];

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Company => "Company *",
            Field::Position => "Position *",
            Field::Location => "Location",
            Field::Salary => "Salary",
            Field::Status => "Status",
            Field::JobType => "Job type",
            Field::Remote => "Remote",
            Field::Date => "Applied on *",
            Field::Notes => "Notes",
        }
    }
}

/// Add/edit form buffer. The date is kept as typed and only parsed on submit.
#[derive(Debug, Clone)]
struct FormState {
    editing: Option<i64>,
    fields: ApplicationFields,
    date_input: String,
    focus: usize,
}

impl FormState {
    fn blank() -> Self {
        Self {
            editing: None,
            fields: ApplicationFields::default(),
            date_input: String::new(),
            focus: 0,
        }
    }

    fn edit(record: &ApplicationRecord) -> Self {
        Self {
            editing: Some(record.id),
            fields: ApplicationFields::from(record),
            date_input: record.application_date.format("%Y-%m-%d").to_string(),
            focus: 0,
        }
    }

    fn focused(&self) -> Field {
        FIELDS[self.focus]
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FIELDS.len();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            Field::Company => Some(&mut self.fields.company),
            Field::Position => Some(&mut self.fields.position),
            Field::Location => Some(&mut self.fields.location),
            Field::Salary => Some(&mut self.fields.salary),
            Field::Date => Some(&mut self.date_input),
            Field::Notes => Some(&mut self.fields.notes),
            Field::Status | Field::JobType | Field::Remote => None,
        }
    }

    fn cycle(&mut self, forward: bool) {
        match self.focused() {
            Field::Status => {
                self.fields.status = if forward {
                    self.fields.status.next()
                } else {
                    self.fields.status.prev()
                }
            }
            Field::JobType => {
                self.fields.job_type = if forward {
                    self.fields.job_type.next()
                } else {
                    self.fields.job_type.prev()
                }
            }
            Field::Remote => self.fields.remote = !self.fields.remote,
            _ => {}
        }
    }

    fn input(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        } else if c == ' ' {
            self.cycle(true);
        }
    }

    fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    fn value(&self, field: Field) -> String {
        match field {
            Field::Company => self.fields.company.clone(),
            Field::Position => self.fields.position.clone(),
            Field::Location => self.fields.location.clone(),
            Field::Salary => self.fields.salary.clone(),
            Field::Status => format!("< {} >", self.fields.status),
            Field::JobType => format!("< {} >", self.fields.job_type),
            Field::Remote => if self.fields.remote { "[x]" } else { "[ ]" }.to_string(),
            Field::Date => self.date_input.clone(),
            Field::Notes => self.fields.notes.clone(),
        }
    }

    /// An empty date is left for the store to reject as missing.
    fn to_fields(&self) -> Result<ApplicationFields, String> {
        let mut fields = self.fields.clone();
        let raw = self.date_input.trim();
        fields.application_date = if raw.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("'{}' is not a date (use YYYY-MM-DD)", raw))?,
            )
        };
        Ok(fields)
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Normal,
    Search,
    Form(FormState),
    Detail(i64),
    ConfirmDelete(i64),
}

struct AppState {
    view: View,
    mode: Mode,
    search: String,
    status_filter: StatusFilter,
    selected: usize,
    list_state: ListState,
    message: Option<String>,
    today: NaiveDate,
    window_days: u32,
}

impl AppState {
    fn new(today: NaiveDate, window_days: u32) -> Self {
        Self {
            view: View::Dashboard,
            mode: Mode::Normal,
            search: String::new(),
            status_filter: StatusFilter::All,
            selected: 0,
            list_state: ListState::default(),
            message: None,
            today,
            window_days,
        }
    }

    fn visible<'a>(&self, records: &'a [ApplicationRecord]) -> Vec<&'a ApplicationRecord> {
        query::filter(records, &self.search, self.status_filter)
    }

    fn current_id(&self, records: &[ApplicationRecord]) -> Option<i64> {
        self.visible(records).get(self.selected).map(|r| r.id)
    }

    fn clamp_selection(&mut self, records: &[ApplicationRecord]) {
        let len = self.visible(records).len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

pub fn run_browse<S: Storage>(store: &mut RecordStore<S>, config: &Config) -> Result<()> {
    let mut state = AppState::new(Local::now().date_naive(), config.window_days);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    store: &mut RecordStore<S>,
) -> Result<()> {
    loop {
        state.today = Local::now().date_naive();
        terminal.draw(|frame| draw(frame, state, store))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(state, store, key) {
                break;
            }
        }
    }
    Ok(())
}

/// Applies one key press. Returns true when the user asked to quit.
fn handle_key<S: Storage>(state: &mut AppState, store: &mut RecordStore<S>, key: KeyEvent) -> bool {
    match std::mem::replace(&mut state.mode, Mode::Normal) {
        Mode::Normal => return handle_normal(state, store, key),
        Mode::Search => match key.code {
            KeyCode::Enter | KeyCode::Esc => {}
            KeyCode::Backspace => {
                state.search.pop();
                state.selected = 0;
                state.mode = Mode::Search;
            }
            KeyCode::Char(c) => {
                state.search.push(c);
                state.selected = 0;
                state.mode = Mode::Search;
            }
            _ => state.mode = Mode::Search,
        },
        Mode::Form(mut form) => match key.code {
            // Cancelling drops whatever was typed.
            KeyCode::Esc => state.message = None,
            KeyCode::Enter => submit_form(state, store, form),
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                state.mode = Mode::Form(form);
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                state.mode = Mode::Form(form);
            }
            KeyCode::Left => {
                form.cycle(false);
                state.mode = Mode::Form(form);
            }
            KeyCode::Right => {
                form.cycle(true);
                state.mode = Mode::Form(form);
            }
            KeyCode::Backspace => {
                form.backspace();
                state.mode = Mode::Form(form);
            }
            KeyCode::Char(c) => {
                form.input(c);
                state.mode = Mode::Form(form);
            }
            _ => state.mode = Mode::Form(form),
        },
        Mode::Detail(id) => match key.code {
            KeyCode::Char('e') => {
                if let Some(record) = store.get(id) {
                    state.mode = Mode::Form(FormState::edit(record));
                }
            }
            KeyCode::Char('d') => state.mode = Mode::ConfirmDelete(id),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {}
            _ => state.mode = Mode::Detail(id),
        },
        Mode::ConfirmDelete(id) => {
            if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code {
                state.message = Some(match store.delete(id) {
                    Ok(()) => with_save_warning(store, format!("Deleted application #{}", id)),
                    Err(e) => e.to_string(),
                });
                state.clamp_selection(store.list());
            }
        }
    }
    false
}

fn handle_normal<S: Storage>(state: &mut AppState, store: &mut RecordStore<S>, key: KeyEvent) -> bool {
    // A status message lasts until the next key.
    state.message = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab => state.view = state.view.next(),
        KeyCode::BackTab => state.view = state.view.prev(),
        KeyCode::Char('1') => state.view = View::Dashboard,
        KeyCode::Char('2') => state.view = View::Applications,
        KeyCode::Char('3') => state.view = View::Analytics,
        KeyCode::Char('a') => state.mode = Mode::Form(FormState::blank()),
        _ if state.view != View::Applications => {}
        KeyCode::Down | KeyCode::Char('j') => {
            let len = state.visible(store.list()).len();
            if len > 0 && state.selected < len - 1 {
                state.selected += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
        }
        KeyCode::Char('/') => state.mode = Mode::Search,
        KeyCode::Char('s') => {
            state.status_filter = state.status_filter.next();
            state.selected = 0;
        }
        KeyCode::Char('e') => {
            if let Some(record) = state.current_id(store.list()).and_then(|id| store.get(id)) {
                state.mode = Mode::Form(FormState::edit(record));
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = state.current_id(store.list()) {
                state.mode = Mode::ConfirmDelete(id);
            }
        }
        KeyCode::Enter => {
            if let Some(id) = state.current_id(store.list()) {
                state.mode = Mode::Detail(id);
            }
        }
        _ => {}
    }
    false
}

fn submit_form<S: Storage>(state: &mut AppState, store: &mut RecordStore<S>, form: FormState) {
    let fields = match form.to_fields() {
        Ok(fields) => fields,
        Err(msg) => {
            state.message = Some(msg);
            state.mode = Mode::Form(form);
            return;
        }
    };

    let outcome = match form.editing {
        Some(id) => store.update(id, fields).map(|()| format!("Updated application #{}", id)),
        None => store.create(fields).map(|id| format!("Added application #{}", id)),
    };

    match outcome {
        Ok(msg) => {
            state.message = Some(with_save_warning(store, msg));
            state.clamp_selection(store.list());
        }
        Err(e) => {
            state.message = Some(e.to_string());
            state.mode = Mode::Form(form);
        }
    }
}

fn with_save_warning<S: Storage>(store: &RecordStore<S>, msg: String) -> String {
    match store.last_save_error() {
        Some(err) => format!("{} (not saved: {})", msg, err),
        None => msg,
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Applied => Color::Blue,
        Status::Interview => Color::Yellow,
        Status::Offer => Color::Green,
        Status::Rejected => Color::Red,
    }
}

fn draw<S: Storage>(frame: &mut Frame, state: &mut AppState, store: &RecordStore<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let tabs = Tabs::new(VIEWS.iter().map(|v| v.title()).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title(" ORBIT "))
        .select(state.view.index())
        .highlight_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let records = store.list();
    match state.view {
        View::Dashboard => draw_dashboard(frame, chunks[1], state, records),
        View::Applications => draw_applications(frame, chunks[1], state, records),
        View::Analytics => draw_analytics(frame, chunks[1], state, records),
    }

    let footer = match (&state.message, &state.mode) {
        (Some(msg), _) => Paragraph::new(format!(" {}", msg)).style(Style::default().fg(Color::Yellow)),
        (None, mode) => Paragraph::new(help_text(state.view, mode)).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, chunks[2]);

    match &state.mode {
        Mode::Form(form) => draw_form(frame, form),
        Mode::Detail(id) => {
            if let Some(record) = store.get(*id) {
                let area = centered_rect(60, 70, frame.area());
                frame.render_widget(Clear, area);
                let detail = Paragraph::new(build_detail(record))
                    .block(Block::default().borders(Borders::ALL).title(" Application "))
                    .wrap(Wrap { trim: false });
                frame.render_widget(detail, area);
            }
        }
        Mode::ConfirmDelete(id) => {
            let area = centered_rect(40, 20, frame.area());
            frame.render_widget(Clear, area);
            let name = store
                .get(*id)
                .map(|r| format!("{} - {}", r.company, r.position))
                .unwrap_or_default();
            let confirm = Paragraph::new(format!("Delete {}?\n\ny: delete   any other key: keep", name))
                .block(Block::default().borders(Borders::ALL).title(" Confirm "))
                .wrap(Wrap { trim: true });
            frame.render_widget(confirm, area);
        }
        Mode::Normal | Mode::Search => {}
    }
}

fn help_text(view: View, mode: &Mode) -> &'static str {
    match mode {
        Mode::Search => " type to search  Enter/Esc:done",
        Mode::Form(_) => " Tab/Up/Down:field  Left/Right/Space:change  Enter:save  Esc:cancel",
        Mode::Detail(_) => " e:edit  d:delete  Esc:close",
        Mode::ConfirmDelete(_) => " y:confirm delete",
        Mode::Normal if view == View::Applications => {
            " j/k:navigate  Enter:view  a:add  e:edit  d:delete  /:search  s:status  Tab:view  q:quit"
        }
        Mode::Normal => " Tab/1-3:view  a:add application  q:quit",
    }
}

fn draw_dashboard(frame: &mut Frame, area: Rect, state: &AppState, records: &[ApplicationRecord]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let counts = stats::counts(records);
    let tiles = [
        ("Total Applications", counts.total, Color::Magenta),
        ("Applied", counts.applied, status_color(Status::Applied)),
        ("Interviews", counts.interview, status_color(Status::Interview)),
        ("Offers", counts.offer, status_color(Status::Offer)),
    ];
    let tile_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(rows[0]);
    for ((label, value, color), tile_area) in tiles.iter().zip(tile_areas.iter()) {
        let tile = Paragraph::new(Span::styled(
            value.to_string(),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", label)));
        frame.render_widget(tile, *tile_area);
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    draw_trend(frame, charts[0], state, records, " Applications This Week ");
    draw_distribution(frame, charts[1], records);
}

fn draw_analytics(frame: &mut Frame, area: Rect, state: &AppState, records: &[ApplicationRecord]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    draw_trend(frame, columns[0], state, records, " Application Trends ");

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    draw_distribution(frame, right[0], records);
    draw_rates(frame, right[1], records);
}

fn draw_trend(frame: &mut Frame, area: Rect, state: &AppState, records: &[ApplicationRecord], title: &str) {
    let series = stats::daily_series(records, state.today, state.window_days);
    let data: Vec<(&str, u64)> = series
        .iter()
        .map(|bucket| (bucket.label.as_str(), bucket.count as u64))
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(&data[..])
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));
    frame.render_widget(chart, area);
}

fn draw_distribution(frame: &mut Frame, area: Rect, records: &[ApplicationRecord]) {
    let block = Block::default().borders(Borders::ALL).title(" Status Distribution ");
    let slices = stats::status_distribution(records);
    if slices.is_empty() {
        let empty = Paragraph::new(Span::styled("No applications yet", Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let total: usize = slices.iter().map(|s| s.count).sum();
    let bar_room = area.width.saturating_sub(24) as usize;
    let lines: Vec<Line> = slices
        .iter()
        .map(|slice| {
            let share = slice.count as f64 / total as f64;
            let filled = ((share * bar_room as f64).round() as usize).max(1);
            Line::from(vec![
                Span::raw(format!("{:<10} ", slice.status.label())),
                Span::styled("█".repeat(filled), Style::default().fg(status_color(slice.status))),
                Span::raw(format!(" {} ({:.0}%)", slice.count, share * 100.0)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_rates(frame: &mut Frame, area: Rect, records: &[ApplicationRecord]) {
    let block = Block::default().borders(Borders::ALL).title(" Success Rate ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rates = stats::rates(records);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let headline = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{}%", rates.offer),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Offer Rate", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(headline, rows[0]);

    let gauges = [
        ("Interview Rate", rates.interview, Color::Yellow),
        ("Rejection Rate", rates.rejection, Color::Red),
    ];
    for ((label, value, color), gauge_area) in gauges.iter().zip(rows[1..3].iter()) {
        let gauge = Gauge::default()
            .block(Block::default().title(*label))
            .gauge_style(Style::default().fg(*color))
            .percent((*value).min(100) as u16);
        frame.render_widget(gauge, *gauge_area);
    }
}

fn draw_applications(frame: &mut Frame, area: Rect, state: &mut AppState, records: &[ApplicationRecord]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let search_style = if matches!(state.mode, Mode::Search) {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Line::from(vec![
        Span::styled(format!("Search: {}", state.search), search_style),
        Span::raw("    "),
        Span::raw(format!("Status: {}", state.status_filter)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(search, rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let visible = state.visible(records);
    let items: Vec<ListItem> = visible
        .iter()
        .map(|app| {
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(status_color(app.status))),
                Span::raw(format!("{} | {}", app.company, app.position)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Applications ({}) ", visible.len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let selected = if visible.is_empty() { None } else { Some(state.selected) };
    let detail = match selected.and_then(|i| visible.get(i)) {
        Some(record) => build_detail(record),
        None => Text::from(vec![
            Line::from("No applications found"),
            Line::from(Span::styled(
                "Press 'a' to start tracking your job applications!",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
    };

    state.list_state.select(selected);
    frame.render_stateful_widget(list, chunks[0], &mut state.list_state);

    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail_widget, chunks[1]);
}

fn build_detail(app: &ApplicationRecord) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        app.company.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(app.position.clone()));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", app.status.label()),
        Style::default().fg(status_color(app.status)),
    )));
    lines.push(Line::from(""));

    let location = if app.location.is_empty() { "Not specified" } else { app.location.as_str() };
    lines.push(Line::from(format!("Location: {}", location)));
    if !app.salary.is_empty() {
        lines.push(Line::from(format!("Salary: {}", app.salary)));
    }
    lines.push(Line::from(format!(
        "Type: {}{}",
        app.job_type,
        if app.remote { " (remote)" } else { "" }
    )));
    lines.push(Line::from(format!("Applied: {}", app.application_date.format("%b %-d, %Y"))));

    if !app.notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Notes",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&app.notes, 60).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}

fn draw_form(frame: &mut Frame, form: &FormState) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.editing.is_some() {
        " Edit Application "
    } else {
        " Add New Application "
    };

    let lines: Vec<Line> = FIELDS
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut value = form.value(*field);
            if *field == Field::Date && value.is_empty() {
                value = "YYYY-MM-DD".to_string();
            }
            Line::from(vec![
                Span::raw(format!("{}{:<13}", marker, field.label())),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
