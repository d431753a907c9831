// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Provides the interactive admin console (ratatui + crossterm): a paged
//! catalog browser and a tabbed tour editor wired to the remote bridge.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableRow, Table, TableState, Wrap},
};
use tokio::sync::Mutex;

use crate::editor::{BasicField, EditDraft, FieldEditor, LineInput};
use crate::model::{JsonField, Tour, TourFields, TourId, ValidationError};
use crate::query::TourQuery;
use crate::remote::{RemoteCommand, RemoteEvent, RemoteHandle};
use crate::render::{render_tree, TreeValue};
use crate::store::StoreError;
use crate::ui::{NoticeKind, Notifications};

mod theme;

use theme::TuiTheme;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const TOAST_TTL: Duration = Duration::from_secs(2);
const FOOTER_BRAND: &str = "🄲 🄰 🅁 🄰 🅅 🄴 🄻 ";
const INDENT_WIDTH: usize = 2;
const BASIC_LABEL_WIDTH: usize = 14;

/// Runs the interactive terminal UI until the user quits.
pub fn run(
    remote: RemoteHandle,
    notices: Arc<Mutex<Notifications>>,
    page_size: usize,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(remote, notices, page_size, theme);
    app.reload_page();

    while !app.should_quit {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    match app.screen {
        Screen::Browse => draw_browse(frame, app, main_area),
        Screen::Edit => draw_edit(frame, app, main_area),
    }

    draw_footer(frame, app, status_area);

    if let Some((_, title)) = app.confirm_delete.clone() {
        render_confirm(frame, app, main_area, &title);
    }
    if app.show_help {
        render_help(frame, app, main_area);
    }
}

fn draw_browse(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let header = TableRow::new(["Title", "Slug", "Type", "Destination", "Created"])
        .style(app.theme.header_style());
    let rows: Vec<TableRow<'static>> = app
        .visible_rows
        .iter()
        .map(|&idx| {
            let tour = &app.rows[idx];
            TableRow::new(vec![
                Cell::from(tour.fields().title().to_owned()),
                Cell::from(tour.fields().slug().to_owned()),
                Cell::from(tour.fields().tour_type().label()),
                Cell::from(tour.fields().destination().to_owned()),
                Cell::from(format_created(tour.created_at())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(24),
            Constraint::Length(12),
            Constraint::Percentage(22),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .style(app.theme.base_style())
    .highlight_style(app.theme.selection_style())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(browse_title(app))
            .border_style(
                app.theme
                    .panel_border_style(app.browse_input == BrowseInput::None),
            ),
    );

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_edit(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let tabs_area = layout[0];
    let body_area = layout[1];

    frame.render_widget(
        Paragraph::new(tabs_line(app)).style(app.theme.base_style()),
        tabs_area,
    );

    match app.edit_tab {
        EditTab::Basic => draw_basic_tab(frame, app, body_area),
        EditTab::Json(field) => draw_json_tab(frame, app, body_area, field),
    }
}

fn draw_basic_tab(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let Some(draft) = app.draft.as_ref() else {
        return;
    };

    let editing = app.edit_input == EditInput::Basic;
    let mut lines = Vec::<Line<'static>>::new();
    for field in BasicField::ALL {
        let focused = field == app.basic_focus;
        let marker = if focused { "▸ " } else { "  " };
        let label = format!("{marker}{:<width$}", field.label(), width = BASIC_LABEL_WIDTH);
        let label_style = if focused {
            app.theme.header_style()
        } else {
            app.theme.label_style()
        };

        let mut spans = vec![Span::styled(label, label_style)];
        match draft.line_input(field) {
            Some(input) => {
                let text = input.text();
                if text.is_empty() && !(focused && editing) {
                    spans.push(Span::styled(
                        "(empty)".to_owned(),
                        app.theme.placeholder_style(),
                    ));
                } else {
                    spans.push(Span::styled(text.to_owned(), app.theme.base_style()));
                }
            }
            None => {
                spans.push(Span::styled(
                    draft.tour_type().label().to_owned(),
                    app.theme.badge_style(true),
                ));
                spans.push(Span::styled(
                    "  (Enter cycles)".to_owned(),
                    app.theme.label_style(),
                ));
            }
        }
        lines.push(Line::from(spans));
    }
    if let Some(created_at) = draft.created_at() {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<width$}", "Created", width = BASIC_LABEL_WIDTH),
                app.theme.label_style(),
            ),
            Span::styled(created_at.to_owned(), app.theme.placeholder_style()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(edit_title(draft))
        .border_style(app.theme.panel_border_style(true));
    let inner = block.inner(area);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(app.theme.base_style())
            .block(block),
        area,
    );

    if editing {
        if let Some(input) = draft.line_input(app.basic_focus) {
            let row = BasicField::ALL
                .iter()
                .position(|f| *f == app.basic_focus)
                .unwrap_or(0) as u16;
            let cursor_x = inner.x + 2 + BASIC_LABEL_WIDTH as u16 + input.cursor() as u16;
            let cursor_y = inner.y + row;
            if cursor_y < inner.y + inner.height {
                frame.set_cursor(cursor_x.min(inner.right().saturating_sub(1)), cursor_y);
            }
        }
    }
}

fn draw_json_tab(frame: &mut Frame<'_>, app: &mut App, area: Rect, field: JsonField) {
    let Some(draft) = app.draft.as_ref() else {
        return;
    };
    let editor = draft.editor(field);

    let mode_tail = if editor.is_raw() { "[raw]" } else { "[tree]" };
    let generating = if editor.is_generating() {
        " generating… "
    } else {
        " "
    };
    let title = format!("─ {} {mode_tail}{generating}", field.label());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(app.theme.panel_border_style(true));
    let inner = block.inner(area);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    let doc_area = body[0];
    let status_line = body[1];

    frame.render_widget(block, area);

    if editor.is_raw() {
        let (row, col) = editor.raw().cursor();
        let height = doc_area.height.max(1) as usize;
        let scroll = row.saturating_sub(height - 1) as u16;
        frame.render_widget(
            Paragraph::new(Text::from(raw_lines(editor, &app.theme)))
                .style(app.theme.base_style())
                .scroll((scroll, 0)),
            doc_area,
        );
        if app.edit_input == EditInput::Raw {
            let cursor_x = doc_area.x + (col as u16).min(doc_area.width.saturating_sub(1));
            let cursor_y = doc_area.y + (row as u16).saturating_sub(scroll);
            frame.set_cursor(cursor_x, cursor_y);
        }
    } else {
        frame.render_widget(
            Paragraph::new(Text::from(tree_lines(editor, &app.theme)))
                .style(app.theme.base_style())
                .scroll((app.tree_scroll, 0)),
            doc_area,
        );
    }

    if let Some(message) = editor.parse_error() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("⚠ {message}"),
                app.theme.error_style(),
            ))),
            status_line,
        );
    } else {
        let hint = if editor.is_raw() {
            "Esc commits · edits apply on blur"
        } else {
            "m raw · g generate"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hint.to_owned(),
                app.theme.label_style(),
            ))),
            status_line,
        );
    }
}

fn draw_footer(frame: &mut Frame<'_>, app: &mut App, status_area: Rect) {
    let brand = footer_brand_line(&app.theme);
    let brand_width = FOOTER_BRAND.chars().count() as u16;
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(brand_width)])
        .split(status_area);

    let (line, cursor) = match (app.browse_input, app.edit_input) {
        (BrowseInput::Search, _) => (
            footer_input_line("/", &app.search, &app.theme),
            Some(1 + app.search.cursor()),
        ),
        (BrowseInput::Filter, _) => (
            footer_input_line("\\", &app.filter, &app.theme),
            Some(1 + app.filter.cursor()),
        ),
        (_, EditInput::Prompt) => (
            footer_input_line("AI ❯ ", &app.prompt, &app.theme),
            Some(5 + app.prompt.cursor()),
        ),
        _ => (footer_help_line(app, app.toast.as_ref()), None),
    };

    frame.render_widget(Paragraph::new(line).style(app.theme.base_style()), footer[0]);
    frame.render_widget(
        Paragraph::new(brand)
            .style(app.theme.base_style())
            .alignment(Alignment::Right),
        footer[1],
    );

    if let Some(cursor) = cursor {
        let cursor_x = footer[0].x + (cursor as u16).min(footer[0].width.saturating_sub(1));
        frame.set_cursor(cursor_x, status_area.y);
    }
}

include!("chrome.rs");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Browse,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseInput {
    None,
    Search,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditInput {
    None,
    Basic,
    Raw,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchIntent {
    Edit,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveStage {
    SlugCheck,
    Write,
}

/// An in-flight save. The slug is checked for collisions first; the write is
/// dispatched only after the check comes back clean, carrying the same
/// collected fields.
#[derive(Debug)]
struct PendingSave {
    seq: u64,
    id: Option<TourId>,
    fields: TourFields,
    stage: SaveStage,
}

struct Toast {
    kind: NoticeKind,
    message: String,
    expires_at: Instant,
}

struct App {
    remote: RemoteHandle,
    notices: Arc<Mutex<Notifications>>,
    theme: TuiTheme,
    screen: Screen,

    query: TourQuery,
    rows: Vec<Tour>,
    total: usize,
    visible_rows: Vec<usize>,
    table_state: TableState,
    loading: bool,
    browse_input: BrowseInput,
    search: LineInput,
    search_deadline: Option<Instant>,
    filter: LineInput,

    draft: Option<EditDraft>,
    edit_tab: EditTab,
    basic_focus: BasicField,
    edit_input: EditInput,
    prompt: LineInput,
    tree_scroll: u16,

    pending_fetch: Option<(u64, FetchIntent)>,
    pending_save: Option<PendingSave>,
    confirm_delete: Option<(TourId, String)>,
    page_seq: u64,
    seq: u64,

    toast: Option<Toast>,
    show_help: bool,
    help_scroll: u16,
    should_quit: bool,
}

impl App {
    fn new(
        remote: RemoteHandle,
        notices: Arc<Mutex<Notifications>>,
        page_size: usize,
        theme: TuiTheme,
    ) -> Self {
        Self {
            remote,
            notices,
            theme,
            screen: Screen::Browse,
            query: TourQuery::with_page_size(page_size),
            rows: Vec::new(),
            total: 0,
            visible_rows: Vec::new(),
            table_state: TableState::default(),
            loading: false,
            browse_input: BrowseInput::None,
            search: LineInput::new(),
            search_deadline: None,
            filter: LineInput::new(),
            draft: None,
            edit_tab: EditTab::Basic,
            basic_focus: BasicField::Title,
            edit_input: EditInput::None,
            prompt: LineInput::new(),
            tree_scroll: 0,
            pending_fetch: None,
            pending_save: None,
            confirm_delete: None,
            page_seq: 0,
            seq: 0,
            toast: None,
            show_help: false,
            help_scroll: 0,
            should_quit: false,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Drains remote events, flushes an elapsed search debounce and promotes
    /// queued notices into the footer toast. Called once per draw loop.
    fn tick(&mut self, now: Instant) {
        while let Some(event) = self.remote.try_next() {
            self.apply_event(event);
        }

        if let Some(deadline) = self.search_deadline {
            if now >= deadline {
                self.search_deadline = None;
                self.query.set_search(self.search.text());
                self.reload_page();
            }
        }

        self.refresh_toast(now);
    }

    fn refresh_toast(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if toast.expires_at > now {
                return;
            }
            self.toast = None;
        }
        let next = self.notices.blocking_lock().take_next();
        if let Some(notice) = next {
            self.toast = Some(Toast {
                kind: notice.kind(),
                message: notice.message().to_owned(),
                expires_at: now + TOAST_TTL,
            });
        }
    }

    fn reload_page(&mut self) {
        self.page_seq = self.next_seq();
        self.loading = true;
        self.remote.send(RemoteCommand::LoadPage {
            seq: self.page_seq,
            query: self.query.clone(),
        });
    }

    fn apply_event(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::PageLoaded { seq, result } => self.apply_page_loaded(seq, result),
            RemoteEvent::TourFetched { seq, result } => self.apply_tour_fetched(seq, result),
            RemoteEvent::SlugChecked { seq, result } => self.apply_slug_checked(seq, result),
            RemoteEvent::Inserted { seq, result } | RemoteEvent::Updated { seq, result } => {
                self.apply_saved(seq, result)
            }
            RemoteEvent::Deleted { seq: _, id: _, result } => match result {
                Ok(()) => {
                    self.notify_success("Tour deleted");
                    self.reload_page();
                }
                Err(err) => self.notify_store_error(&err),
            },
            RemoteEvent::Generated { seq, field, result } => {
                let Some(draft) = self.draft.as_mut() else {
                    // The editor is gone; nothing to apply the document to.
                    return;
                };
                let mut notices = self.notices.blocking_lock();
                draft
                    .editor_mut(field)
                    .apply_generation(seq, result, &mut notices);
            }
        }
    }

    fn apply_page_loaded(&mut self, seq: u64, result: Result<crate::store::TourPage, StoreError>) {
        if seq != self.page_seq {
            // Stale page; a newer request is already in flight.
            return;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                if page.rows.is_empty() && page.total > 0 && self.query.page() > 0 {
                    // The page emptied out underneath us (deletes); rewind.
                    let last = self.query.last_page(page.total);
                    if self.query.page() > last {
                        self.query.set_page(last);
                        self.reload_page();
                        return;
                    }
                }
                self.rows = page.rows;
                self.total = page.total;
                self.apply_filter();
            }
            Err(err) => self.notify_store_error(&err),
        }
    }

    fn apply_tour_fetched(&mut self, seq: u64, result: Result<Tour, StoreError>) {
        let Some((expected, intent)) = self.pending_fetch else {
            return;
        };
        if seq != expected {
            return;
        }
        self.pending_fetch = None;
        match result {
            Ok(tour) => self.open_draft(&tour, intent),
            Err(err) => self.notify_store_error(&err),
        }
    }

    fn apply_slug_checked(&mut self, seq: u64, result: Result<bool, StoreError>) {
        let Some(pending) = self.pending_save.take() else {
            return;
        };
        if pending.seq != seq || pending.stage != SaveStage::SlugCheck {
            self.pending_save = Some(pending);
            return;
        }
        match result {
            Ok(true) => {
                self.notify_error(ValidationError::SlugTaken.to_string());
                self.focus_basic(BasicField::Slug);
            }
            Ok(false) => {
                let seq = self.next_seq();
                match &pending.id {
                    Some(id) => self.remote.send(RemoteCommand::Update {
                        seq,
                        id: id.clone(),
                        fields: pending.fields.clone(),
                    }),
                    None => self.remote.send(RemoteCommand::Insert {
                        seq,
                        fields: pending.fields.clone(),
                    }),
                }
                self.pending_save = Some(PendingSave {
                    seq,
                    stage: SaveStage::Write,
                    ..pending
                });
            }
            Err(err) => self.notify_store_error(&err),
        }
    }

    fn apply_saved(&mut self, seq: u64, result: Result<Tour, StoreError>) {
        let Some(pending) = self.pending_save.take() else {
            return;
        };
        if pending.seq != seq || pending.stage != SaveStage::Write {
            self.pending_save = Some(pending);
            return;
        }
        match result {
            Ok(tour) => {
                self.notify_success(format!("Saved \"{}\"", tour.fields().title()));
                self.close_editor();
                self.reload_page();
            }
            Err(err) => self.notify_store_error(&err),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1)
                }
                KeyCode::Home => self.help_scroll = 0,
                _ => {}
            }
            return;
        }

        if let Some((id, _)) = self.confirm_delete.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_delete = None;
                    let seq = self.next_seq();
                    self.remote.send(RemoteCommand::Delete { seq, id });
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = None;
                }
                _ => {}
            }
            return;
        }

        match self.screen {
            Screen::Browse => self.handle_browse_key(key),
            Screen::Edit => self.handle_edit_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match self.browse_input {
            BrowseInput::Search => {
                self.handle_search_key(key);
                return;
            }
            BrowseInput::Filter => {
                self.handle_filter_key(key);
                return;
            }
            BrowseInput::None => {}
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.browse_input = BrowseInput::Search,
            KeyCode::Char('\\') => self.browse_input = BrowseInput::Filter,
            KeyCode::Char('s') => {
                self.query.cycle_sort();
                self.reload_page();
            }
            KeyCode::Char('S') => {
                self.query.toggle_direction();
                self.reload_page();
            }
            KeyCode::Char('[') => self.page_back(),
            KeyCode::Char(']') => self.page_forward(),
            KeyCode::Up | KeyCode::Char('k') => self.select_delta(-1),
            KeyCode::Down | KeyCode::Char('j') => self.select_delta(1),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Enter => self.open_selected(FetchIntent::Edit),
            KeyCode::Char('n') => self.open_create(),
            KeyCode::Char('d') => self.open_selected(FetchIntent::Duplicate),
            KeyCode::Char('x') => self.request_delete(),
            KeyCode::Char('y') => self.yank_selected_slug(),
            KeyCode::Char('r') => self.reload_page(),
            KeyCode::Char('?') => self.toggle_help(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.browse_input = BrowseInput::None;
                self.search_deadline = None;
                if self.query.has_search() || !self.search.is_empty() {
                    self.search.clear();
                    self.query.set_search("");
                    self.reload_page();
                }
            }
            KeyCode::Enter => {
                self.browse_input = BrowseInput::None;
                self.search_deadline = None;
                self.query.set_search(self.search.text());
                self.reload_page();
            }
            KeyCode::Char(ch) => {
                self.search.insert(ch);
                self.touch_search();
            }
            KeyCode::Backspace => {
                self.search.backspace();
                self.touch_search();
            }
            KeyCode::Delete => {
                self.search.delete();
                self.touch_search();
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            _ => {}
        }
    }

    fn touch_search(&mut self) {
        self.search_deadline = Some(Instant::now() + SEARCH_DEBOUNCE);
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.browse_input = BrowseInput::None;
                self.filter.clear();
                self.apply_filter();
            }
            KeyCode::Enter => self.browse_input = BrowseInput::None,
            KeyCode::Char(ch) => {
                self.filter.insert(ch);
                self.apply_filter();
            }
            KeyCode::Backspace => {
                self.filter.backspace();
                self.apply_filter();
            }
            KeyCode::Delete => {
                self.filter.delete();
                self.apply_filter();
            }
            KeyCode::Left => self.filter.move_left(),
            KeyCode::Right => self.filter.move_right(),
            KeyCode::Home => self.filter.move_home(),
            KeyCode::End => self.filter.move_end(),
            _ => {}
        }
    }

    fn apply_filter(&mut self) {
        self.visible_rows = filter_row_indices(&self.rows, self.filter.text());
        if self.visible_rows.is_empty() {
            self.table_state.select(None);
        } else {
            let selected = self
                .table_state
                .selected()
                .unwrap_or(0)
                .min(self.visible_rows.len() - 1);
            self.table_state.select(Some(selected));
        }
    }

    fn select_delta(&mut self, delta: i32) {
        if self.visible_rows.is_empty() {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (current + delta as usize).min(self.visible_rows.len() - 1)
        };
        self.table_state.select(Some(next));
    }

    fn select_first(&mut self) {
        if !self.visible_rows.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.visible_rows.is_empty() {
            self.table_state.select(Some(self.visible_rows.len() - 1));
        }
    }

    fn selected_tour(&self) -> Option<&Tour> {
        let selected = self.table_state.selected()?;
        let idx = *self.visible_rows.get(selected)?;
        self.rows.get(idx)
    }

    fn page_back(&mut self) {
        if self.query.page() > 0 {
            self.query.set_page(self.query.page() - 1);
            self.reload_page();
        }
    }

    fn page_forward(&mut self) {
        let last = self.query.last_page(self.total);
        if self.query.page() < last {
            self.query.set_page(self.query.page() + 1);
            self.reload_page();
        }
    }

    fn open_selected(&mut self, intent: FetchIntent) {
        let Some(tour) = self.selected_tour() else {
            self.notify_info("No tour selected");
            return;
        };
        let id = tour.id().clone();
        let seq = self.next_seq();
        self.pending_fetch = Some((seq, intent));
        self.remote.send(RemoteCommand::FetchTour { seq, id });
    }

    fn open_create(&mut self) {
        self.draft = Some(EditDraft::create());
        self.enter_edit_screen();
    }

    fn open_draft(&mut self, tour: &Tour, intent: FetchIntent) {
        let draft = match intent {
            FetchIntent::Edit => EditDraft::edit(tour),
            FetchIntent::Duplicate => EditDraft::duplicate(tour, unix_millis()),
        };
        if intent == FetchIntent::Duplicate {
            self.notify_info("Editing a copy; save to create it");
        }
        self.draft = Some(draft);
        self.enter_edit_screen();
    }

    fn enter_edit_screen(&mut self) {
        self.screen = Screen::Edit;
        self.edit_tab = EditTab::Basic;
        self.basic_focus = BasicField::Title;
        self.edit_input = EditInput::None;
        self.tree_scroll = 0;
        self.pending_save = None;
    }

    fn close_editor(&mut self) {
        self.draft = None;
        self.screen = Screen::Browse;
        self.edit_input = EditInput::None;
        self.pending_save = None;
    }

    fn request_delete(&mut self) {
        let Some(tour) = self.selected_tour() else {
            self.notify_info("No tour selected");
            return;
        };
        self.confirm_delete = Some((tour.id().clone(), tour.fields().title().to_owned()));
    }

    fn yank_selected_slug(&mut self) {
        let Some(tour) = self.selected_tour() else {
            self.notify_info("No tour selected");
            return;
        };
        let slug = tour.fields().slug().to_owned();
        match copy_to_clipboard(&slug) {
            Ok(backend) => self.notify_success(format!("Yanked slug ({backend})")),
            Err(err) => self.notify_error(format!("Clipboard error: {err}")),
        }
    }

    fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.help_scroll = 0;
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S'))
        {
            self.save_draft();
            return;
        }

        match self.edit_input {
            EditInput::Prompt => {
                self.handle_prompt_key(key);
                return;
            }
            EditInput::Basic => {
                self.handle_basic_edit_key(key);
                return;
            }
            EditInput::Raw => {
                self.handle_raw_key(key);
                return;
            }
            EditInput::None => {}
        }

        match key.code {
            KeyCode::Esc => self.close_editor(),
            KeyCode::Tab => self.switch_tab(self.edit_tab.cycle(1)),
            KeyCode::BackTab => self.switch_tab(self.edit_tab.cycle(-1)),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char(ch @ '1'..='7') => {
                if let Some(tab) = EditTab::from_digit(ch) {
                    self.switch_tab(tab);
                }
            }
            _ => match self.edit_tab {
                EditTab::Basic => self.handle_basic_nav_key(key.code),
                EditTab::Json(field) => self.handle_json_nav_key(field, key.code),
            },
        }
    }

    fn switch_tab(&mut self, tab: EditTab) {
        self.edit_tab = tab;
        self.tree_scroll = 0;
        // Raw mode stays live per editor; entering its tab resumes raw input.
        if let EditTab::Json(field) = tab {
            if let Some(draft) = self.draft.as_ref() {
                if draft.editor(field).is_raw() {
                    self.edit_input = EditInput::Raw;
                    return;
                }
            }
        }
        self.edit_input = EditInput::None;
    }

    fn focus_basic(&mut self, field: BasicField) {
        self.edit_tab = EditTab::Basic;
        self.basic_focus = field;
        self.edit_input = EditInput::None;
    }

    fn handle_basic_nav_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.basic_focus = prev_basic_field(self.basic_focus),
            KeyCode::Down => self.basic_focus = next_basic_field(self.basic_focus),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(draft) = self.draft.as_mut() else {
                    return;
                };
                if self.basic_focus == BasicField::TourType {
                    draft.cycle_tour_type();
                } else if code == KeyCode::Enter {
                    self.edit_input = EditInput::Basic;
                }
            }
            _ => {}
        }
    }

    fn handle_basic_edit_key(&mut self, key: KeyEvent) {
        let Some(draft) = self.draft.as_mut() else {
            self.edit_input = EditInput::None;
            return;
        };
        let Some(input) = draft.line_input_mut(self.basic_focus) else {
            self.edit_input = EditInput::None;
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.edit_input = EditInput::None,
            KeyCode::Char(ch) => input.insert(ch),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Up => {
                self.edit_input = EditInput::None;
                self.basic_focus = prev_basic_field(self.basic_focus);
            }
            KeyCode::Down => {
                self.edit_input = EditInput::None;
                self.basic_focus = next_basic_field(self.basic_focus);
            }
            _ => {}
        }
    }

    fn handle_json_nav_key(&mut self, field: JsonField, code: KeyCode) {
        match code {
            KeyCode::Char('m') | KeyCode::Enter => {
                let Some(draft) = self.draft.as_mut() else {
                    return;
                };
                let mut notices = self.notices.blocking_lock();
                let editor = draft.editor_mut(field);
                editor.toggle_mode(&mut notices);
                let raw = editor.is_raw();
                drop(notices);
                self.edit_input = if raw { EditInput::Raw } else { EditInput::None };
            }
            KeyCode::Char('g') => {
                self.prompt.clear();
                self.edit_input = EditInput::Prompt;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.tree_scroll = self.tree_scroll.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.tree_scroll = self.tree_scroll.saturating_add(1)
            }
            KeyCode::PageUp => self.tree_scroll = self.tree_scroll.saturating_sub(10),
            KeyCode::PageDown => self.tree_scroll = self.tree_scroll.saturating_add(10),
            KeyCode::Home => self.tree_scroll = 0,
            _ => {}
        }
    }

    fn handle_raw_key(&mut self, key: KeyEvent) {
        let EditTab::Json(field) = self.edit_tab else {
            self.edit_input = EditInput::None;
            return;
        };
        let Some(draft) = self.draft.as_mut() else {
            self.edit_input = EditInput::None;
            return;
        };

        if key.code == KeyCode::Esc {
            let mut notices = self.notices.blocking_lock();
            draft.editor_mut(field).blur(&mut notices);
            drop(notices);
            self.edit_input = EditInput::None;
            return;
        }

        let editor = draft.editor_mut(field);
        let mutated = match key.code {
            KeyCode::Char(ch) => {
                editor.raw_mut().insert_char(ch);
                true
            }
            KeyCode::Enter => {
                editor.raw_mut().insert_newline();
                true
            }
            KeyCode::Backspace => {
                editor.raw_mut().backspace();
                true
            }
            KeyCode::Delete => {
                editor.raw_mut().delete();
                true
            }
            KeyCode::Left => {
                editor.raw_mut().move_left();
                false
            }
            KeyCode::Right => {
                editor.raw_mut().move_right();
                false
            }
            KeyCode::Up => {
                editor.raw_mut().move_up();
                false
            }
            KeyCode::Down => {
                editor.raw_mut().move_down();
                false
            }
            KeyCode::Home => {
                editor.raw_mut().move_home();
                false
            }
            KeyCode::End => {
                editor.raw_mut().move_end();
                false
            }
            _ => false,
        };
        if mutated {
            editor.revalidate();
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.edit_input = EditInput::None,
            KeyCode::Enter => self.dispatch_generation(),
            KeyCode::Char(ch) => self.prompt.insert(ch),
            KeyCode::Backspace => self.prompt.backspace(),
            KeyCode::Delete => self.prompt.delete(),
            KeyCode::Left => self.prompt.move_left(),
            KeyCode::Right => self.prompt.move_right(),
            KeyCode::Home => self.prompt.move_home(),
            KeyCode::End => self.prompt.move_end(),
            _ => {}
        }
    }

    fn dispatch_generation(&mut self) {
        let EditTab::Json(field) = self.edit_tab else {
            self.edit_input = EditInput::None;
            return;
        };
        let prompt = self.prompt.text().trim().to_owned();
        if prompt.is_empty() {
            self.edit_input = EditInput::None;
            return;
        }
        if self.draft.is_none() {
            self.edit_input = EditInput::None;
            return;
        }
        // Issued from the app counter: a request left behind by a closed
        // draft can never carry a number a later draft's editor expects.
        let seq = self.next_seq();
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let editor = draft.editor_mut(field);
        editor.begin_generation(seq);
        let document = editor.document().clone();
        self.remote.send(RemoteCommand::Generate {
            seq,
            field,
            document,
            prompt,
        });
        self.edit_input = EditInput::None;
    }

    fn save_draft(&mut self) {
        self.blur_active_editor();
        let Some(draft) = self.draft.as_ref() else {
            return;
        };
        match draft.collect() {
            Ok(fields) => {
                let slug = fields.slug().to_owned();
                let exclude = draft.id().cloned();
                let seq = self.next_seq();
                self.pending_save = Some(PendingSave {
                    seq,
                    id: exclude.clone(),
                    fields,
                    stage: SaveStage::SlugCheck,
                });
                self.remote
                    .send(RemoteCommand::CheckSlug { seq, slug, exclude });
            }
            Err(err) => {
                self.notify_error(err.to_string());
                let field = match err {
                    ValidationError::TitleRequired => BasicField::Title,
                    _ => BasicField::Slug,
                };
                self.focus_basic(field);
            }
        }
    }

    fn blur_active_editor(&mut self) {
        if self.edit_input != EditInput::Raw {
            return;
        }
        let EditTab::Json(field) = self.edit_tab else {
            return;
        };
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let mut notices = self.notices.blocking_lock();
        draft.editor_mut(field).blur(&mut notices);
        drop(notices);
        self.edit_input = EditInput::None;
    }

    fn notify_success(&self, message: impl Into<String>) {
        self.notices.blocking_lock().success(message);
    }

    fn notify_error(&self, message: impl Into<String>) {
        self.notices.blocking_lock().error(message);
    }

    fn notify_info(&self, message: impl Into<String>) {
        self.notices.blocking_lock().info(message);
    }

    fn notify_store_error(&self, err: &StoreError) {
        if err.is_permission_denied() {
            self.notify_error(err.to_string());
        } else {
            self.notify_error(format!("Datastore error: {err}"));
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}
