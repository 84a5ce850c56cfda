//! TUI Application - Main entry point and run loop

use std::cell::Cell;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{handle_key_event, poll_event, Action};
use super::theme::{icons, AssistantTheme};
use super::widgets::{utils::truncate, Spinner};
use crate::api::QueryResponse;
use crate::error::EndpointFailure;
use crate::panel::{QueryPanel, RequestStatus, ResultPolicy, Ticket};
use crate::transport::QueryTransport;

const TITLE: &str = "Knowledge Assistant";
const TAGLINE: &str = "Ask questions about your documents and get AI-powered answers";
const PLACEHOLDER: &str = "What is LlamaIndex used for?";
const TRY_ASKING: &str =
    "Try asking: \"What are the key features of LlamaIndex?\" or \"How do I get started with LlamaIndex?\"";
/// Rows moved by PageUp / PageDown
const PAGE_SCROLL: u16 = 10;

/// A finished request travelling back to the UI loop
struct Completion {
    ticket: Ticket,
    outcome: Result<QueryResponse, EndpointFailure>,
}

pub struct TuiApp {
    panel: QueryPanel,
    theme: AssistantTheme,
    transport: Arc<dyn QueryTransport>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    /// Spinner frame counter
    frame: u64,
    /// First visible row of the scrolled results pane
    scroll: u16,
    /// Largest useful offset, measured on the last render
    scroll_limit: Cell<u16>,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(transport: Arc<dyn QueryTransport>, policy: ResultPolicy) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            panel: QueryPanel::with_policy(policy),
            theme: AssistantTheme::new(),
            transport,
            completions_tx,
            completions_rx,
            frame: 0,
            scroll: 0,
            scroll_limit: Cell::new(0),
            should_quit: false,
        }
    }

    pub fn panel(&self) -> &QueryPanel {
        &self.panel
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;
        tracing::debug!(transport = self.transport.name(), "TUI started");

        let result = self.main_loop(&mut terminal).await;

        self.restore_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(16); // ~60fps

        loop {
            self.frame = self.frame.wrapping_add(1);
            self.drain_completions();

            terminal.draw(|frame| self.render(frame))?;

            if let Some(key) = poll_event(tick_rate)? {
                let action = handle_key_event(key, &mut self.panel);
                self.apply(action);
            }

            if self.should_quit {
                break;
            }

            // poll_event blocks this worker; give queued tasks a turn
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => self.start_request(),
            Action::ToggleSources => {
                self.panel.toggle_sources_visible();
                self.scroll = 0;
            }
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollDown => self.scroll_by(1),
            Action::PageUp => self.scroll_by(-i32::from(PAGE_SCROLL)),
            Action::PageDown => self.scroll_by(i32::from(PAGE_SCROLL)),
            Action::Edit | Action::None => {}
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let limit = i32::from(self.scroll_limit.get());
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, limit) as u16;
    }

    /// Submit the panel and spawn the single request of this cycle
    fn start_request(&mut self) {
        let Some(ticket) = self.panel.submit() else {
            return;
        };
        self.scroll = 0;

        let transport = Arc::clone(&self.transport);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.query(&ticket.request()).await;
            // receiver gone means the UI already quit
            let _ = tx.send(Completion { ticket, outcome });
        });
    }

    fn drain_completions(&mut self) {
        while let Ok(done) = self.completions_rx.try_recv() {
            if self.panel.resolve(&done.ticket, done.outcome) {
                self.scroll = 0;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Length(3), // Input
                Constraint::Length(2), // Submit + hint
                Constraint::Min(5),    // Results
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_input(frame, chunks[1]);
        self.render_submit(frame, chunks[2]);
        self.render_results(frame, chunks[3]);
        self.render_footer(frame, chunks[4]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(TITLE, self.theme.header())),
            Line::from(Span::styled(TAGLINE, self.theme.dimmed())),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.header_border());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let line = if self.panel.query().is_empty() {
            Line::from(vec![
                Span::styled(icons::CURSOR.to_string(), self.theme.accent()),
                Span::styled(PLACEHOLDER, self.theme.dimmed()),
            ])
        } else {
            Line::from(vec![
                Span::styled(self.panel.query(), self.theme.text()),
                Span::styled(icons::CURSOR.to_string(), self.theme.accent()),
            ])
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border())
            .title(" Ask Your Documents ");
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_submit(&self, frame: &mut Frame, area: Rect) {
        let disabled = self.panel.is_submit_disabled();
        let label = if disabled { " Processing... " } else { " Ask " };

        let lines = vec![
            Line::from(vec![
                Span::raw(" "),
                Span::styled(label, self.theme.submit_button(disabled)),
            ]),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(icons::HINT, self.theme.accent()),
                Span::raw(" "),
                Span::styled(TRY_ASKING, self.theme.dimmed()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);

        if disabled {
            let x = area.x + label.chars().count() as u16 + 2;
            if x < area.right() {
                let spinner = Spinner::new(self.frame).color(self.theme.sky);
                frame.render_widget(spinner, Rect::new(x, area.y, 1, 1));
            }
        }
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        self.scroll_limit.set(0);

        if let Some(error) = self.panel.error() {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.error())
                .title(format!(" {} Error ", icons::ERROR));
            let paragraph = Paragraph::new(Span::styled(error, self.theme.error()))
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let Some(answer) = self.panel.visible_answer() else {
            return;
        };

        let (answer_area, sources_area) = if self.panel.shows_citations() {
            let sources_height = if self.panel.sources_visible() {
                Constraint::Percentage(50)
            } else {
                Constraint::Length(3)
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), sources_height])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        // the expanded sources list scrolls, otherwise the answer does
        self.render_answer(frame, answer_area, answer);
        if let Some(sources_area) = sources_area {
            self.render_sources(frame, sources_area);
        }
    }

    fn render_answer(&self, frame: &mut Frame, area: Rect, answer: &str) {
        let mut title = vec![
            Span::raw(" "),
            Span::styled(icons::ANSWER, self.theme.accent()),
            Span::styled(" Answer ", self.theme.header()),
            Span::styled("[AI Generated]", self.theme.success()),
        ];
        if let Some(time) = self.panel.query_time() {
            title.push(Span::styled(format!(" {} ", time), self.theme.dimmed()));
        }
        if self.panel.is_loading() {
            title.push(Span::styled(" updating… ", self.theme.warning()));
        }

        let lines: Vec<Line> = answer
            .lines()
            .map(|l| Line::from(Span::styled(l, self.theme.text())))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border())
            .title(Line::from(title));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        let scrolled = !(self.panel.shows_citations() && self.panel.sources_visible());
        self.render_scrollable(frame, area, paragraph, scrolled);
    }

    fn render_sources(&self, frame: &mut Frame, area: Rect) {
        let sources = self.panel.visible_sources();
        let visible = self.panel.sources_visible();
        let (verb, arrow) = if visible {
            ("Hide", icons::EXPANDED)
        } else {
            ("View", icons::COLLAPSED)
        };

        let mut lines = Vec::new();
        if visible {
            let name_width = (area.width as usize).saturating_sub(24).max(8);
            for (index, source) in sources.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", index + 1), self.theme.highlight()),
                    Span::styled(truncate(&source.file_name, name_width), self.theme.text()),
                    Span::styled(
                        format!("  Relevance: {}", source.relevance_label()),
                        self.theme.dimmed(),
                    ),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("   │ ", self.theme.dimmed()),
                    Span::styled(source.text.as_str(), self.theme.text()),
                ]));
            }
        } else {
            lines.push(Line::from(Span::styled(
                " Press Tab to expand",
                self.theme.dimmed(),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border())
            .title(format!(
                " {} {} Sources ({}) {} ",
                icons::SOURCE,
                verb,
                sources.len(),
                arrow
            ));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        self.render_scrollable(frame, area, paragraph, visible);
    }

    /// Render a bordered paragraph at the current offset, with a scrollbar on
    /// its right border when the content overflows.
    fn render_scrollable(
        &self,
        frame: &mut Frame,
        area: Rect,
        paragraph: Paragraph,
        scrolled: bool,
    ) {
        if !scrolled {
            frame.render_widget(paragraph, area);
            return;
        }

        let overflow = paragraph
            .line_count(area.width)
            .saturating_sub(area.height as usize);
        let limit = u16::try_from(overflow).unwrap_or(u16::MAX);
        self.scroll_limit.set(limit);

        let offset = self.scroll.min(limit);
        frame.render_widget(paragraph.scroll((offset, 0)), area);

        if limit > 0 {
            let mut state = ScrollbarState::new(limit as usize + 1).position(offset as usize);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .thumb_style(self.theme.accent())
                .track_style(self.theme.dimmed());
            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let status_style = match self.panel.status() {
            RequestStatus::Succeeded => self.theme.success(),
            RequestStatus::Failed => self.theme.error(),
            RequestStatus::Loading => self.theme.warning(),
            RequestStatus::Idle => self.theme.dimmed(),
        };

        let help = Line::from(vec![
            Span::styled(format!(" {} ", self.panel.status()), status_style),
            Span::styled(" [Enter]", self.theme.accent()),
            Span::styled(" ask  ", self.theme.dimmed()),
            Span::styled("[Tab]", self.theme.accent()),
            Span::styled(" sources  ", self.theme.dimmed()),
            Span::styled("[↑↓/PgUp/PgDn]", self.theme.accent()),
            Span::styled(" scroll  ", self.theme.dimmed()),
            Span::styled("[Ctrl+U]", self.theme.accent()),
            Span::styled(" clear  ", self.theme.dimmed()),
            Span::styled("[Esc]", self.theme.accent()),
            Span::styled(" quit", self.theme.dimmed()),
        ]);
        frame.render_widget(Paragraph::new(help), area);
    }
}
