//! TUI implementation for satgraffin

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;

use satgraffin_api::Backend;
use satgraffin_chat::{ChatSession, Role, Status, StatusLine, TranscriptView, ViewItem};

/// Spinner animation frames
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const LOADING_LABEL: &str = "Consulting the SatGraffin graph...";

/// Messages sent from UI to the session driver
#[derive(Debug)]
enum UiMessage {
    /// User submitted input
    Submit(String),
    /// User requested clear
    Clear,
    /// User requested quit
    Quit,
}

/// Run the TUI against the given session
pub async fn run<B: Backend + 'static>(mut session: ChatSession<B>) -> anyhow::Result<()> {
    let (ui_tx, mut ui_rx) = mpsc::channel::<UiMessage>(16);
    let (view_tx, mut view_rx) = mpsc::unbounded_channel::<TranscriptView>();

    let initial_view = TranscriptView::project(session.conversation());

    // The driver owns the session and processes one request at a time, so
    // at most one query is ever in flight.
    let driver = tokio::spawn(async move {
        while let Some(message) = ui_rx.recv().await {
            match message {
                UiMessage::Submit(text) => {
                    if let Some(query) = session.begin(&text) {
                        // Snapshot the connecting state so the loading
                        // indicator shows while the request runs.
                        let _ = view_tx.send(TranscriptView::project(session.conversation()));
                        session.complete(&query).await;
                    }
                    let _ = view_tx.send(TranscriptView::project(session.conversation()));
                }
                UiMessage::Clear => {
                    session.clear();
                    let _ = view_tx.send(TranscriptView::project(session.conversation()));
                }
                UiMessage::Quit => break,
            }
        }
    });

    let mut terminal = setup_terminal()?;
    let mut state = TuiState::new(initial_view, ui_tx.clone());
    let result = event_loop(&mut terminal, &mut state, &mut view_rx).await;
    restore_terminal(&mut terminal)?;

    let _ = ui_tx.send(UiMessage::Quit).await;
    driver.await?;
    result
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut TuiState,
    view_rx: &mut mpsc::UnboundedReceiver<TranscriptView>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| state.render(frame))?;

        tokio::select! {
            maybe_view = view_rx.recv() => {
                match maybe_view {
                    Some(view) => state.set_view(view),
                    None => break,
                }
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if !state.handle_key(key).await {
                            break;
                        }
                    }
                    Some(Ok(Event::Paste(text))) => {
                        if !state.in_flight() {
                            state.input.insert_str(&text);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            // Tick so the spinner animates while a request is in flight
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
    }

    Ok(())
}

/// TUI application state: the latest view snapshot plus input and scroll.
/// All conversation data comes from the projected view; nothing here is
/// authoritative.
struct TuiState {
    view: TranscriptView,
    input: InputLine,
    scroll: usize,
    spinner_start: Instant,
    ui_tx: mpsc::Sender<UiMessage>,
}

impl TuiState {
    fn new(view: TranscriptView, ui_tx: mpsc::Sender<UiMessage>) -> Self {
        Self {
            view,
            input: InputLine::default(),
            scroll: usize::MAX,
            spinner_start: Instant::now(),
            ui_tx,
        }
    }

    fn in_flight(&self) -> bool {
        self.view.status.status == Status::Connecting
    }

    fn set_view(&mut self, view: TranscriptView) {
        self.view = view;
        // Auto-scroll to the newest message
        self.scroll = usize::MAX;
    }

    /// Handle a key event, returning false to quit
    async fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => {
                    let _ = self.ui_tx.send(UiMessage::Quit).await;
                    false
                }
                KeyCode::Char('l') => {
                    if self.view.clear_enabled {
                        let _ = self.ui_tx.send(UiMessage::Clear).await;
                    }
                    true
                }
                KeyCode::Char('u') => {
                    self.input.clear_line();
                    true
                }
                _ => true,
            };
        }

        match key.code {
            KeyCode::Esc => {
                let _ = self.ui_tx.send(UiMessage::Quit).await;
                return false;
            }
            KeyCode::PageUp => {
                self.scroll = self.current_scroll().saturating_sub(10);
                return true;
            }
            KeyCode::PageDown => {
                self.scroll = self.current_scroll().saturating_add(10);
                return true;
            }
            _ => {}
        }

        // The input affordance is disabled for the duration of a request
        if self.in_flight() {
            return true;
        }

        match key.code {
            KeyCode::Enter => {
                let text = self.input.take();
                if !text.trim().is_empty() {
                    let _ = self.ui_tx.send(UiMessage::Submit(text)).await;
                }
            }
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            _ => {}
        }

        true
    }

    fn current_scroll(&self) -> usize {
        if self.scroll == usize::MAX { 0 } else { self.scroll }
    }

    fn spinner_frame(&self) -> &'static str {
        let elapsed = self.spinner_start.elapsed().as_millis();
        SPINNER_FRAMES[(elapsed / 80) as usize % SPINNER_FRAMES.len()]
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Layout: transcript (flex), status bar (1), input (3)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(size);

        self.render_transcript(frame, chunks[0]);
        self.render_status(frame, chunks[1]);
        self.render_input(frame, chunks[2]);
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" SatGraffin │ MOSDAC knowledge base ");

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.view.show_empty_state {
            frame.render_widget(empty_state(), inner);
            return;
        }

        let lines = transcript_lines(&self.view, inner.width as usize, self.spinner_frame());

        // Clamp scroll; usize::MAX means stick to the bottom
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);

        let visible: Vec<Line> = lines
            .into_iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .collect();

        frame.render_widget(Paragraph::new(visible), inner);
    }

    fn render_status(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        frame.render_widget(
            Paragraph::new(status_bar_line(&self.view.status, self.view.clear_enabled)),
            area,
        );
    }

    fn render_input(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let in_flight = self.in_flight();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if in_flight {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Cyan)
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if in_flight {
            frame.render_widget(
                Paragraph::new("waiting for the knowledge store...")
                    .style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        if self.input.content().is_empty() {
            frame.render_widget(
                Paragraph::new("Ask about missions, data access, instruments...")
                    .style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        } else {
            frame.render_widget(Paragraph::new(self.input.content()), inner);
        }

        let cursor_x = inner.x + (self.input.cursor() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// Render the transcript view into styled lines
fn transcript_lines(view: &TranscriptView, width: usize, spinner: &str) -> Vec<Line<'static>> {
    let content_width = width.saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for item in &view.items {
        match item {
            ViewItem::Message(message) => {
                let (header, header_style) = match message.role {
                    Role::User => (
                        "▶ You",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Role::Assistant if message.is_error => (
                        "◀ SatGraffin",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Role::Assistant => (
                        "◀ SatGraffin",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                };
                lines.push(Line::from(Span::styled(header.to_string(), header_style)));

                let content_style = if message.is_error {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::White)
                };
                for wrapped in textwrap::wrap(&message.content, content_width) {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", wrapped),
                        content_style,
                    )));
                }

                for (i, link) in message.sources.iter().enumerate() {
                    lines.push(Line::from(Span::styled(
                        format!("  [{}] {}", i + 1, link),
                        Style::default().fg(Color::Blue),
                    )));
                }

                lines.push(Line::from(""));
            }
            ViewItem::Loading => {
                lines.push(Line::from(Span::styled(
                    format!("{} {}", spinner, LOADING_LABEL),
                    Style::default().fg(Color::Yellow),
                )));
            }
        }
    }

    lines
}

/// Status indicator plus key hints
fn status_bar_line(status: &StatusLine, clear_enabled: bool) -> Line<'static> {
    let (symbol, color) = match status.status {
        Status::Idle => ("○", Color::DarkGray),
        Status::Connecting => ("◌", Color::Yellow),
        Status::Success => ("●", Color::Green),
        Status::Error => ("✕", Color::Red),
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
        Span::styled(
            status.status.label().to_string(),
            Style::default().fg(color),
        ),
    ];

    if let Some(detail) = &status.detail {
        spans.push(Span::styled(
            format!(" - {}", detail),
            Style::default().fg(Color::Red),
        ));
    }

    spans.push(Span::styled(
        "  │  Enter send",
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        "  Ctrl+L clear",
        if clear_enabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        },
    ));
    spans.push(Span::styled(
        "  Ctrl+C quit",
        Style::default().fg(Color::DarkGray),
    ));

    Line::from(spans)
}

/// Panel shown when the transcript is empty and nothing is in flight
fn empty_state() -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  ☄ ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "SatGraffin",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " - satellite-data knowledge assistant",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Ask about MOSDAC missions, data access workflows, or",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "  instrumentation specs to get started.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

/// Minimal single-line editor with a char-indexed cursor
#[derive(Debug, Default)]
struct InputLine {
    content: String,
    cursor: usize,
}

impl InputLine {
    fn content(&self) -> &str {
        &self.content
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_offset(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn insert(&mut self, c: char) {
        let offset = self.byte_offset();
        self.content.insert(offset, c);
        self.cursor += 1;
    }

    fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            // Single-line input: newlines become spaces
            if c == '\n' || c == '\r' {
                if !self.content.ends_with(' ') && self.cursor > 0 {
                    self.insert(' ');
                }
            } else {
                self.insert(c);
            }
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset();
            self.content.remove(offset);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let offset = self.byte_offset();
            self.content.remove(offset);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    fn home(&mut self) {
        self.cursor = 0;
    }

    fn end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    fn clear_line(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content, leaving the editor empty
    fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }
}
