// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use chatsum_app::{
    ApiGateway, Group, KeyValueStore, NavPhase, NavigationState, NoticeLevel, Orchestrator,
    SettingKey, SummaryResult, View, backup_label,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::warn;

const NOTICE_TTL: Duration = Duration::from_secs(4);
const PAGE_LINES: u16 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearNotice { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SettingsUiState {
    visible: bool,
    field: usize,
    editing: Option<String>,
    error: Option<String>,
}

/// Identifies which list the cursor is in; the cursor resets when it changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ListKey {
    view: View,
    entity: Option<String>,
    item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    list_key: ListKey,
    cursor: usize,
    scroll: u16,
    backup_cursor: usize,
    backup_scroll: u16,
    settings: SettingsUiState,
    help_visible: bool,
    notice_token: u64,
    seen_notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pick {
    Character(String),
    Group(Group),
    Chat(String),
}

pub fn run_app<G, S>(session: &mut Orchestrator<G, S>) -> Result<()>
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        session.pump();
        process_internal_events(session, &view_data, &internal_rx);
        sync_view_data(session, &mut view_data, &internal_tx);

        if let Err(error) = terminal.draw(|frame| render(frame, session, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(session, &mut view_data, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<G, S>(
    session: &mut Orchestrator<G, S>,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearNotice { token } if token == view_data.notice_token => {
                session.clear_notice();
            }
            InternalEvent::ClearNotice { .. } => {}
        }
    }
}

fn sync_view_data<G, S>(
    session: &Orchestrator<G, S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let state = session.state();
    let key = ListKey {
        view: state.view,
        entity: state.entity.name().map(str::to_owned),
        item: state.item.clone(),
    };
    if key != view_data.list_key {
        view_data.list_key = key;
        view_data.cursor = 0;
        view_data.scroll = 0;
    }
    let rows = list_rows(state).len();
    view_data.cursor = view_data.cursor.min(rows.saturating_sub(1));

    let backups = session.backups().backups().len();
    view_data.backup_cursor = view_data.backup_cursor.min(backups.saturating_sub(1));

    let notice = session.notice().map(|notice| notice.message.clone());
    if notice != view_data.seen_notice {
        if notice.is_some() {
            view_data.notice_token = view_data.notice_token.saturating_add(1);
            schedule_notice_clear(internal_tx, view_data.notice_token);
        }
        view_data.seen_notice = notice;
    }
}

fn schedule_notice_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(NOTICE_TTL);
        let _ = sender.send(InternalEvent::ClearNotice { token });
    });
}

/// Returns true when the app should exit.
fn handle_key_event<G, S>(
    session: &mut Orchestrator<G, S>,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if session.error().is_some() {
        return matches!(key.code, KeyCode::Char('q') | KeyCode::Esc);
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.settings.visible {
        handle_settings_key(session, view_data, key);
        return false;
    }

    if session.backups().is_open() {
        handle_backups_key(session, view_data, key);
        return false;
    }

    if session.summary().is_some() {
        handle_summary_key(session, key);
        return false;
    }

    let phase = session.state().phase();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char(',') => {
            view_data.settings = SettingsUiState {
                visible: true,
                ..SettingsUiState::default()
            };
        }
        KeyCode::Tab | KeyCode::BackTab if phase == NavPhase::Browsing => {
            let next = match session.state().view {
                View::Characters => View::GroupChats,
                View::GroupChats => View::Characters,
            };
            session.switch_view(next);
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(session.state(), view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(session.state(), view_data, -1),
        KeyCode::PageDown | KeyCode::Char('d') if phase == NavPhase::ItemSelected => {
            view_data.scroll = view_data.scroll.saturating_add(PAGE_LINES);
        }
        KeyCode::PageUp | KeyCode::Char('u') if phase == NavPhase::ItemSelected => {
            view_data.scroll = view_data.scroll.saturating_sub(PAGE_LINES);
        }
        KeyCode::Enter | KeyCode::Char('l') => {
            if let Some(pick) = pick_at(session.state(), view_data.cursor) {
                match pick {
                    Pick::Character(name) => session.select_character(&name),
                    Pick::Group(group) => session.select_group(group),
                    Pick::Chat(chat) => session.select_item(&chat),
                }
            }
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => session.back(),
        KeyCode::Char('s') if phase == NavPhase::ItemSelected => session.summarize(),
        KeyCode::Char('b') if phase != NavPhase::Browsing => {
            view_data.backup_cursor = 0;
            view_data.backup_scroll = 0;
            if let Err(error) = session.open_backups() {
                warn!(error = %error, "open backups failed");
            }
        }
        _ => {}
    }
    false
}

fn handle_summary_key<G, S>(session: &mut Orchestrator<G, S>, key: KeyEvent)
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let Some(summary) = session.summary() else {
        return;
    };
    let len = summary.len();
    let selected = summary.selected();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => session.close_summary(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab if len > 0 => {
            session.select_summary_segment((selected + 1) % len);
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab if len > 0 => {
            session.select_summary_segment((selected + len - 1) % len);
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            session.select_summary_segment(index);
        }
        _ => {}
    }
}

fn handle_backups_key<G, S>(
    session: &mut Orchestrator<G, S>,
    view_data: &mut ViewData,
    key: KeyEvent,
) where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let count = session.backups().backups().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => session.close_backups(),
        KeyCode::Char('j') | KeyCode::Down if count > 0 => {
            view_data.backup_cursor = (view_data.backup_cursor + 1).min(count - 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.backup_cursor = view_data.backup_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(backup) = session.backups().backups().get(view_data.backup_cursor) {
                let backup = backup.clone();
                view_data.backup_scroll = 0;
                session.select_backup(&backup);
            }
        }
        KeyCode::PageDown | KeyCode::Char('d') => {
            view_data.backup_scroll = view_data.backup_scroll.saturating_add(PAGE_LINES);
        }
        KeyCode::PageUp | KeyCode::Char('u') => {
            view_data.backup_scroll = view_data.backup_scroll.saturating_sub(PAGE_LINES);
        }
        KeyCode::Char('r') => session.restore_backup(),
        _ => {}
    }
}

fn handle_settings_key<G, S>(
    session: &mut Orchestrator<G, S>,
    view_data: &mut ViewData,
    key: KeyEvent,
) where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let field = SettingKey::ALL[view_data.settings.field.min(SettingKey::ALL.len() - 1)];

    if let Some(buffer) = view_data.settings.editing.as_mut() {
        match key.code {
            KeyCode::Esc => view_data.settings.editing = None,
            KeyCode::Enter => {
                let value = std::mem::take(buffer);
                view_data.settings.editing = None;
                commit_setting(session, view_data, field, &value);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(ch) => buffer.push(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(',') => {
            view_data.settings = SettingsUiState::default();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.settings.field = (view_data.settings.field + 1).min(SettingKey::ALL.len() - 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.settings.field = view_data.settings.field.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            view_data.settings.error = None;
            view_data.settings.editing = Some(session.settings().get(field).to_owned());
        }
        KeyCode::Char('l') | KeyCode::Right => cycle_setting(session, view_data, field, 1),
        KeyCode::Char('h') | KeyCode::Left => cycle_setting(session, view_data, field, -1),
        _ => {}
    }
}

/// Steps the username or model through the server-provided choices.
fn cycle_setting<G, S>(
    session: &mut Orchestrator<G, S>,
    view_data: &mut ViewData,
    field: SettingKey,
    delta: isize,
) where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let Some(reference) = session.state().reference.as_ref() else {
        return;
    };
    let choices = match field {
        SettingKey::Username => reference.users.clone(),
        SettingKey::Model => reference
            .models
            .iter()
            .map(|model| model.model.clone())
            .collect(),
        SettingKey::MaxTokens | SettingKey::WordLimit => return,
    };
    if choices.is_empty() {
        return;
    }
    let current = session.settings().get(field);
    let len = choices.len() as isize;
    let next = match choices.iter().position(|choice| choice == current) {
        Some(index) => (index as isize + delta).rem_euclid(len) as usize,
        None => 0,
    };
    let value = choices[next].clone();
    commit_setting(session, view_data, field, &value);
}

fn commit_setting<G, S>(
    session: &mut Orchestrator<G, S>,
    view_data: &mut ViewData,
    field: SettingKey,
    value: &str,
) where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    match session.update_setting(field, value) {
        Ok(()) => view_data.settings.error = None,
        Err(error) => {
            warn!(setting = field.as_str(), error = %format!("{error:#}"), "save setting failed");
            view_data.settings.error = Some(format!("{error:#}"));
        }
    }
}

fn move_cursor(state: &NavigationState, view_data: &mut ViewData, delta: isize) {
    if state.phase() == NavPhase::ItemSelected {
        view_data.scroll = if delta > 0 {
            view_data.scroll.saturating_add(1)
        } else {
            view_data.scroll.saturating_sub(1)
        };
        return;
    }
    let rows = list_rows(state).len();
    if rows == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = (view_data.cursor as isize + delta).clamp(0, rows as isize - 1);
    view_data.cursor = next as usize;
}

fn list_rows(state: &NavigationState) -> Vec<String> {
    match state.phase() {
        NavPhase::Browsing => {
            let Some(reference) = state.reference.as_ref() else {
                return Vec::new();
            };
            match state.view {
                View::Characters => reference.characters.iter().cloned().collect(),
                View::GroupChats => reference
                    .groups
                    .iter()
                    .map(|group| {
                        if group.members.is_empty() {
                            group.name.clone()
                        } else {
                            format!("{} ({})", group.name, group.members.join(", "))
                        }
                    })
                    .collect(),
            }
        }
        NavPhase::EntitySelected => state.chats().to_vec(),
        NavPhase::ItemSelected => Vec::new(),
    }
}

fn pick_at(state: &NavigationState, index: usize) -> Option<Pick> {
    match state.phase() {
        NavPhase::Browsing => {
            let reference = state.reference.as_ref()?;
            match state.view {
                View::Characters => reference
                    .characters
                    .iter()
                    .nth(index)
                    .cloned()
                    .map(Pick::Character),
                View::GroupChats => reference.groups.get(index).cloned().map(Pick::Group),
            }
        }
        NavPhase::EntitySelected => state.chats().get(index).cloned().map(Pick::Chat),
        NavPhase::ItemSelected => None,
    }
}

fn render<G, S>(frame: &mut ratatui::Frame<'_>, session: &Orchestrator<G, S>, view_data: &ViewData)
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    if let Some(error) = session.error() {
        let area = frame.area();
        let body = Paragraph::new(format!("Error: {error}\n\nq quit"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("chatsum").borders(Borders::ALL));
        frame.render_widget(body, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let state = session.state();
    if state.phase() == NavPhase::Browsing {
        let selected = View::ALL
            .iter()
            .position(|view| *view == state.view)
            .unwrap_or(0);
        let tabs = Tabs::new(View::ALL.iter().map(|view| view.label()).collect::<Vec<_>>())
            .block(Block::default().title("chatsum").borders(Borders::ALL))
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .select(selected);
        frame.render_widget(tabs, layout[0]);
    } else {
        let breadcrumb = Paragraph::new(breadcrumb_text(state))
            .block(Block::default().title("chatsum").borders(Borders::ALL));
        frame.render_widget(breadcrumb, layout[0]);
    }

    render_body(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(session))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(summary) = session.summary() {
        let area = centered_rect(80, 70, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(summary_overlay_text(summary))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("summary").borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }

    if session.backups().is_open() {
        let area = centered_rect(80, 70, frame.area());
        frame.render_widget(Clear, area);
        let backups = session.backups();
        let title = backups
            .target()
            .map(|target| format!("backups: {}", target.name()))
            .unwrap_or_else(|| "backups".to_owned());
        let overlay = Paragraph::new(backups_overlay_text(
            backups.backups(),
            view_data.backup_cursor,
            backups.selected(),
            backups.content(),
            backups.is_loading(),
        ))
        .wrap(Wrap { trim: false })
        .scroll((
            list_offset(view_data.backup_cursor, area.height)
                .saturating_add(view_data.backup_scroll),
            0,
        ))
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }

    if view_data.settings.visible {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(settings_overlay_text(session, &view_data.settings))
            .block(Block::default().title("settings").borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_body(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &NavigationState,
    view_data: &ViewData,
) {
    if state.phase() == NavPhase::ItemSelected {
        let title = state.item.clone().unwrap_or_default();
        let content = Paragraph::new(state.chat_content.clone().unwrap_or_default())
            .wrap(Wrap { trim: false })
            .scroll((view_data.scroll, 0))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    }

    let title = match state.phase() {
        NavPhase::EntitySelected => "chats",
        _ => state.view.label(),
    };
    let body = Paragraph::new(list_text(&list_rows(state), view_data.cursor))
        .scroll((list_offset(view_data.cursor, area.height), 0))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(body, area);
}

/// First row to draw so the cursor stays inside a bordered box of `height`.
fn list_offset(cursor: usize, height: u16) -> u16 {
    let visible = usize::from(height.saturating_sub(2)).max(1);
    u16::try_from(cursor.saturating_sub(visible - 1)).unwrap_or(u16::MAX)
}

fn list_text(rows: &[String], cursor: usize) -> String {
    if rows.is_empty() {
        return "(empty)".to_owned();
    }
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let prefix = if index == cursor { "> " } else { "  " };
            format!("{prefix}{row}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn breadcrumb_text(state: &NavigationState) -> String {
    let mut parts = vec![state.view.label().to_owned()];
    if let Some(name) = state.entity.name() {
        parts.push(name.to_owned());
    }
    if let Some(item) = &state.item {
        parts.push(item.clone());
    }
    parts.join(" > ")
}

fn status_text<G, S>(session: &Orchestrator<G, S>) -> String
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let mut parts = vec![session.route().href()];
    if session.loading() {
        parts.push("loading...".to_owned());
    }
    if let Some(notice) = session.notice() {
        let tag = match notice.level {
            NoticeLevel::Info => "ok",
            NoticeLevel::Error => "error",
        };
        parts.push(format!("{tag}: {}", notice.message));
    }
    let hint = match session.state().phase() {
        NavPhase::Browsing => "j/k move | enter open | tab view | , settings | ? help | q quit",
        NavPhase::EntitySelected => "j/k move | enter open | esc back | b backups | ? help",
        NavPhase::ItemSelected => "j/k scroll | s summarize | b backups | esc back | ? help",
    };
    parts.push(hint.to_owned());
    parts.join(" | ")
}

fn summary_overlay_text(summary: &SummaryResult) -> String {
    if summary.is_empty() {
        return "(no summary returned)\n\nesc close".to_owned();
    }
    let tabs = (0..summary.len())
        .map(|index| {
            let label = SummaryResult::label(index);
            if index == summary.selected() {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "{tabs}\n\n{}\n\nh/l switch | 1-9 jump | esc close",
        summary.current().unwrap_or_default()
    )
}

fn backups_overlay_text(
    backups: &[String],
    cursor: usize,
    selected: Option<&str>,
    content: Option<&str>,
    loading: bool,
) -> String {
    let mut lines = Vec::new();
    if backups.is_empty() {
        lines.push(if loading { "loading..." } else { "No backups found" }.to_owned());
    }
    for (index, backup) in backups.iter().enumerate() {
        let prefix = if index == cursor { "> " } else { "  " };
        let mark = if selected == Some(backup.as_str()) { " *" } else { "" };
        lines.push(format!("{prefix}{}{mark}", backup_label(backup)));
    }
    lines.push(String::new());
    match content {
        Some(content) => lines.push(content.to_owned()),
        None => lines.push("Select a backup to view its content".to_owned()),
    }
    lines.push(String::new());
    lines.push("j/k move | enter view | d/u scroll | r restore selected | esc close".to_owned());
    lines.join("\n")
}

fn settings_overlay_text<G, S>(session: &Orchestrator<G, S>, ui: &SettingsUiState) -> String
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    let mut lines = Vec::with_capacity(SettingKey::ALL.len() + 4);
    for (index, key) in SettingKey::ALL.iter().enumerate() {
        let prefix = if index == ui.field { "> " } else { "  " };
        let value = match (&ui.editing, index == ui.field) {
            (Some(buffer), true) => format!("{buffer}_"),
            _ if *key == SettingKey::Model => model_label(session, session.settings().get(*key)),
            _ => session.settings().get(*key).to_owned(),
        };
        lines.push(format!("{prefix}{}: {value}", key.label()));
    }
    lines.push(String::new());
    if let Some(error) = &ui.error {
        lines.push(format!("error: {error}"));
    }
    lines.push("j/k field | enter edit/save | h/l cycle user/model | esc close".to_owned());
    lines.join("\n")
}

/// Shows the display name for a stored model id when the server lists it.
fn model_label<G, S>(session: &Orchestrator<G, S>, model: &str) -> String
where
    G: ApiGateway + 'static,
    S: KeyValueStore,
{
    session
        .state()
        .reference
        .as_ref()
        .and_then(|reference| reference.models.iter().find(|info| info.model == model))
        .map(|info| format!("{} ({})", info.name, info.model))
        .unwrap_or_else(|| model.to_owned())
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help | , settings\n\
browse: j/k move | enter open | tab switch characters/group chats\n\
chats: enter open | esc/h back | b backups\n\
chat: j/k scroll | d/u page | s summarize | b backups | esc back\n\
summary: h/l switch part | 1-9 jump | esc close\n\
backups: j/k move | enter view | d/u scroll | r restore | esc close\n\
settings: j/k field | enter edit, enter save | h/l cycle | esc close"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
