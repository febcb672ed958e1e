use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Terminal,
};
use smartagent_core::constants::texts;
use smartagent_core::session::{pipeline, poller};
use smartagent_core::{
    HttpBackend, Message, NotificationGate, Permission, SendRejected, Session,
    SessionEvent, SessionHandle, SessionState, Settings, SnapshotStore,
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};

use crate::commands::{self, CommandResult};
use crate::notifier::{ConsoleNotifier, TerminalNotifier, UiEvent};
use crate::theme::Theme;

const TOAST_TTL: Duration = Duration::from_secs(8);
const SCROLL_STEP: usize = 5;

fn open_state(settings: &Settings, store: Arc<dyn SnapshotStore>) -> SessionState {
    SessionState::restore(store, settings.storage.key.clone())
        .with_reminder_dedup(settings.poller.dedup)
}

// ── Single-prompt mode ──────────────────────────────────────────────────

pub async fn run_single_prompt(
    settings: &Settings,
    store: Arc<dyn SnapshotStore>,
    prompt: &str,
) -> Result<()> {
    let backend = HttpBackend::from_settings(settings)?;
    let mut state = open_state(settings, store);

    match pipeline::send(&mut state, &backend, prompt).await {
        Ok(Some(reply)) => println!("{}", reply.text),
        Ok(None) => eprintln!("Nothing to send."),
        Err(rejected) => eprintln!("{rejected}"),
    }
    Ok(())
}

// ── Reminder check mode ─────────────────────────────────────────────────

pub async fn run_reminder_check(settings: &Settings, store: Arc<dyn SnapshotStore>) -> Result<()> {
    let backend = HttpBackend::from_settings(settings)?;
    let gate = if settings.notifications.enabled {
        NotificationGate::new(Arc::new(ConsoleNotifier::new(
            settings.notifications.permission,
        )))
    } else {
        NotificationGate::disabled()
    };
    let mut state = open_state(settings, store);
    let before = state.messages().len();

    match poller::poll_once(&mut state, &backend, &gate).await {
        Ok(0) => println!("No reminders due."),
        Ok(_) => {
            for message in &state.messages()[before..] {
                println!("{}", message.text);
            }
        }
        Err(e) => {
            tracing::warn!("Reminder check failed: {e}");
            anyhow::bail!("could not check reminders: {e}");
        }
    }
    Ok(())
}

// ── Interactive TUI ─────────────────────────────────────────────────────

enum ChatItem {
    Entry(Message),
    /// Local output of a slash command. Never persisted.
    Notice(String),
}

struct AppState {
    input: String,
    cursor_pos: usize,
    items: Vec<ChatItem>,
    entry_count: usize,
    scroll_offset: usize,
    awaiting_reply: bool,
    pending_permission: Option<oneshot::Sender<bool>>,
    toast: Option<(String, Instant)>,
    status_text: String,
    should_quit: bool,
    theme: Theme,
    base_url: String,
    poll_interval: Duration,
    gate: NotificationGate,
}

impl AppState {
    fn new(settings: &Settings, base_url: &str, theme_name: &str, gate: NotificationGate) -> Self {
        Self {
            input: String::new(),
            cursor_pos: 0,
            items: Vec::new(),
            entry_count: 0,
            scroll_offset: usize::MAX,
            awaiting_reply: false,
            pending_permission: None,
            toast: None,
            status_text: "Ready".into(),
            should_quit: false,
            theme: Theme::by_name(theme_name),
            base_url: base_url.to_string(),
            poll_interval: settings.poll_interval(),
            gate,
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = usize::MAX;
    }

    fn notice(&mut self, text: impl Into<String>) {
        self.items.push(ChatItem::Notice(text.into()));
        self.scroll_to_bottom();
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn set_input(&mut self, text: String) {
        self.cursor_pos = text.chars().count();
        self.input = text;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }
}

pub async fn run_tui(
    settings: Settings,
    store: Arc<dyn SnapshotStore>,
    theme_name: &str,
) -> Result<()> {
    let backend = Arc::new(HttpBackend::from_settings(&settings)?);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let gate = if settings.notifications.enabled {
        NotificationGate::new(Arc::new(TerminalNotifier::new(
            settings.notifications.permission,
            ui_tx,
        )))
    } else {
        drop(ui_tx);
        NotificationGate::disabled()
    };

    let mut state = AppState::new(&settings, backend.base_url(), theme_name, gate.clone());
    let mut running = Session::new(open_state(&settings, store), backend, gate)
        .with_poll_interval(settings.poll_interval())
        .spawn();
    tracing::info!(session = %running.handle.id(), "chat view attached");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let outcome = event_loop(
        &mut terminal,
        &mut state,
        &running.handle,
        &mut running.events,
        &mut ui_rx,
    );

    running.handle.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Ok(final_state) = running.task.await {
        tracing::info!(messages = final_state.messages().len(), "session closed");
    }
    outcome
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    handle: &SessionHandle,
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    ui_events: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, state))?;

        while let Ok(event) = events.try_recv() {
            handle_session_event(state, event);
        }
        while let Ok(event) = ui_events.try_recv() {
            handle_ui_event(state, event);
        }

        if event::poll(Duration::from_millis(33))? {
            if let Event::Key(key) = event::read()? {
                handle_key(state, key, handle);
            }
        }

        if state.should_quit || handle.is_closed() {
            return Ok(());
        }
    }
}

fn handle_session_event(state: &mut AppState, event: SessionEvent) {
    match event {
        SessionEvent::Restored(messages) => {
            state.entry_count = messages.len();
            state.items = messages.into_iter().map(ChatItem::Entry).collect();
            state.scroll_to_bottom();
        }
        SessionEvent::Appended { index, message } => {
            if index < state.entry_count {
                return;
            }
            state.entry_count = index + 1;
            state.items.push(ChatItem::Entry(message));
            state.scroll_to_bottom();
        }
        SessionEvent::AwaitingReply(awaiting) => {
            state.awaiting_reply = awaiting;
            state.status_text = if awaiting { "Waiting for reply" } else { "Ready" }.into();
            if awaiting {
                state.scroll_to_bottom();
            }
        }
        SessionEvent::SendRejected(SendRejected::Busy { input }) => {
            if state.input.is_empty() {
                state.set_input(input);
            }
            state.status_text = "Still waiting for the previous reply".into();
        }
    }
}

fn handle_ui_event(state: &mut AppState, event: UiEvent) {
    match event {
        UiEvent::PermissionPrompt(answer) => {
            state.pending_permission = Some(answer);
        }
        UiEvent::Toast { title, body } => {
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
            let stamp = chrono::Local::now().format("%H:%M");
            state.toast = Some((format!("[{stamp}] {title}: {body}"), Instant::now()));
        }
    }
}

fn answer_permission(state: &mut AppState, granted: bool) {
    if let Some(answer) = state.pending_permission.take() {
        let _ = answer.send(granted);
        state.status_text = if granted {
            "Notifications enabled"
        } else {
            "Notifications disabled"
        }
        .into();
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent, handle: &SessionHandle) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.pending_permission.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => answer_permission(state, true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                answer_permission(state, false)
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => state.should_quit = true,
        KeyCode::Enter => submit_input(state, handle),
        KeyCode::Char(c) => {
            let at = state.byte_index();
            state.input.insert(at, c);
            state.cursor_pos += 1;
        }
        KeyCode::Backspace => {
            if state.cursor_pos > 0 {
                state.cursor_pos -= 1;
                let at = state.byte_index();
                state.input.remove(at);
            }
        }
        KeyCode::Delete => {
            if state.cursor_pos < state.input.chars().count() {
                let at = state.byte_index();
                state.input.remove(at);
            }
        }
        KeyCode::Left => state.cursor_pos = state.cursor_pos.saturating_sub(1),
        KeyCode::Right => {
            state.cursor_pos = (state.cursor_pos + 1).min(state.input.chars().count());
        }
        KeyCode::Home => state.cursor_pos = 0,
        KeyCode::End => state.cursor_pos = state.input.chars().count(),
        KeyCode::PageUp | KeyCode::Up => {
            // Resolved against the real height on the next draw.
            state.scroll_offset = state.scroll_offset.saturating_sub(SCROLL_STEP);
        }
        KeyCode::PageDown | KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_add(SCROLL_STEP);
        }
        _ => {}
    }
}

fn submit_input(state: &mut AppState, handle: &SessionHandle) {
    let text = state.input.clone();
    if text.trim().is_empty() {
        return;
    }

    match commands::handle_command(&text) {
        CommandResult::NotACommand => {
            if state.awaiting_reply {
                state.status_text = "Still waiting for the previous reply".into();
                return;
            }
            if handle.submit(text).is_err() {
                state.status_text = "Session closed".into();
                return;
            }
            state.clear_input();
        }
        CommandResult::Quit => {
            state.clear_input();
            state.should_quit = true;
        }
        CommandResult::Message(msg) => {
            state.clear_input();
            state.notice(msg);
        }
        CommandResult::ShowStatus => {
            state.clear_input();
            let status = format!(
                "Backend: {}\nMessages: {}\nAwaiting reply: {}\nReminder check every {}s\nNotifications: {}",
                state.base_url,
                state.entry_count,
                if state.awaiting_reply { "yes" } else { "no" },
                state.poll_interval.as_secs(),
                permission_label(state.gate.permission()),
            );
            state.notice(status);
        }
        CommandResult::PollNow => {
            state.clear_input();
            if handle.poll_now().is_ok() {
                state.notice("Checking for due reminders...");
            } else {
                state.status_text = "Session closed".into();
            }
        }
    }
}

fn permission_label(permission: Permission) -> &'static str {
    match permission {
        Permission::Default => "not decided",
        Permission::Granted => "on",
        Permission::Denied => "off",
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────

fn draw_ui(f: &mut ratatui::Frame, state: &mut AppState) {
    let input_height = if state.pending_permission.is_some() {
        4
    } else {
        3
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // header
            Constraint::Min(5),               // chat
            Constraint::Length(input_height), // input or permission prompt
            Constraint::Length(1),            // status
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" {}", texts::APP_TITLE),
        Style::default()
            .fg(state.theme.accent)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(header, chunks[0]);

    draw_chat(f, chunks[1], state);

    if state.pending_permission.is_some() {
        draw_permission_prompt(f, chunks[2], &state.theme);
    } else {
        draw_input(f, chunks[2], state);
    }

    draw_status_bar(f, chunks[3], state);
}

fn draw_chat(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    let theme = &state.theme;
    let lines = build_chat_lines(&state.items, state.awaiting_reply, theme);

    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let total_lines: usize = lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(inner_width))
        .sum();
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = total_lines.saturating_sub(visible_height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(chat, area);

    if total_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(max_scroll).position(state.scroll_offset);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v")),
            area,
            &mut scrollbar_state,
        );
    }
}

fn build_chat_lines<'a>(items: &'a [ChatItem], awaiting: bool, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = Vec::new();

    for item in items {
        match item {
            ChatItem::Entry(msg) => {
                let colors = theme.entry_colors(msg);
                let label = if msg.is_user() { "You" } else { "Agent" };
                lines.push(Line::from(Span::styled(
                    format!(" {label}"),
                    Style::default().fg(colors.label).add_modifier(Modifier::BOLD),
                )));
                for text_line in msg.text.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {text_line}"),
                        Style::default().fg(colors.body),
                    )));
                }
            }
            ChatItem::Notice(text) => {
                for text_line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {text_line}"),
                        Style::default().fg(theme.muted),
                    )));
                }
            }
        }
        lines.push(Line::raw(""));
    }

    if awaiting {
        lines.push(Line::from(Span::styled(
            format!("  {}", texts::THINKING),
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn draw_permission_prompt(f: &mut ratatui::Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(Span::styled(
            " Show a notification when a reminder is due?",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            " [y] Allow  [n] Deny ",
            Style::default().fg(theme.accent),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Notifications ")
        .border_style(Style::default().fg(theme.warning));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_input(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let is_command = state.input.starts_with('/');

    let paragraph = if state.input.is_empty() {
        Paragraph::new(Span::styled(
            texts::INPUT_PLACEHOLDER,
            Style::default().fg(theme.muted),
        ))
    } else {
        Paragraph::new(state.input.as_str()).style(Style::default().fg(theme.text))
    };

    let title = if is_command { " Command " } else { " Message " };
    let input = paragraph.block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(if is_command {
                theme.accent
            } else {
                theme.border
            })),
    );
    f.render_widget(input, area);

    let cursor_x = area.x + state.cursor_pos.min(u16::MAX as usize) as u16 + 1;
    let max_x = area.x + area.width.saturating_sub(2);
    f.set_cursor_position((cursor_x.min(max_x), area.y + 1));
}

fn draw_status_bar(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    let theme = &state.theme;

    if state
        .toast
        .as_ref()
        .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
    {
        state.toast = None;
    }

    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.base_url),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| notify {} ", permission_label(state.gate.permission())),
            Style::default().fg(theme.muted),
        ),
        Span::styled("| ", Style::default().fg(theme.muted)),
        Span::styled(state.status_text.clone(), Style::default().fg(theme.muted)),
    ];
    if let Some((toast, _)) = &state.toast {
        spans.push(Span::styled(
            format!("  {toast}"),
            Style::default()
                .fg(theme.reminder.label)
                .add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
