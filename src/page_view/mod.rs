use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hotelier_dom::Document;
use hotelier_search::{SearchEngine, SearchStats};
use log::LevelFilter;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::AppConfig;

mod layout;
mod render;
mod search;

use layout::{PageLayout, scroll_offset_for};

const POLL_INTERVAL_MS: u64 = 100;

/// Scrollable page with an always-on search bar.
pub struct PageView {
    engine: SearchEngine<Document>,
    title: String,
    query: String,
    stats: SearchStats,
    search_debounce: Duration,
    pending_search_at: Option<Instant>,
    layout: PageLayout,
    layout_dirty: bool,
    layout_width: Option<usize>,
    wrap_lines: bool,
    viewport_height: usize,
    scroll_offset: usize,
    scroll_revision: u64,
    should_quit: bool,
}

impl PageView {
    pub fn new(document: Document, config: &AppConfig) -> Self {
        let title = document.title().unwrap_or_else(|| "Untitled page".to_string());
        let scroll_revision = document.viewport().revision();
        Self {
            engine: SearchEngine::with_style(document, config.highlight.clone()),
            title,
            query: String::new(),
            stats: SearchStats::default(),
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            pending_search_at: None,
            layout: PageLayout::default(),
            layout_dirty: true,
            layout_width: None,
            wrap_lines: config.wrap_lines,
            viewport_height: 0,
            scroll_offset: 0,
            scroll_revision,
            should_quit: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn into_document(self) -> Document {
        self.engine.into_host()
    }

    /// Rebuilds the layout when the page or the window changed, then follows
    /// any scroll request the page recorded since the last frame.
    fn sync_layout(&mut self, width: usize, height: usize) {
        let width = self.wrap_lines.then_some(width);
        if self.layout_dirty || self.layout_width != width {
            self.layout = PageLayout::build(self.engine.host(), self.engine.style(), width);
            self.layout_width = width;
            self.layout_dirty = false;
        }
        self.viewport_height = height;

        let viewport = self.engine.host().viewport();
        if viewport.revision() != self.scroll_revision {
            self.scroll_revision = viewport.revision();
            if let Some(request) = viewport.last_request()
                && let Some(line) = self.layout.line_of(request.node)
            {
                self.scroll_offset = scroll_offset_for(line, self.scroll_offset, height, request.block);
            }
        }
        self.clamp_scroll();
    }

    fn max_scroll(&self) -> usize {
        self.layout.len().saturating_sub(self.viewport_height)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    fn page_size(&self) -> isize {
        self.viewport_height.saturating_sub(1).max(1) as isize
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Esc => {
                if self.query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.clear_search();
                }
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => self.search_previous(),
            KeyCode::Enter | KeyCode::Down => self.search_next(),
            KeyCode::Up | KeyCode::BackTab => self.search_previous(),
            KeyCode::PageUp => self.scroll_by(-self.page_size()),
            KeyCode::PageDown => self.scroll_by(self.page_size()),
            KeyCode::Home if ctrl => self.scroll_offset = 0,
            KeyCode::End if ctrl => self.scroll_offset = self.max_scroll(),
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self.handle_search_input_changed(Instant::now());
                }
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.query.push(c);
                self.handle_search_input_changed(Instant::now());
            }
            _ => {}
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        let idle = Duration::from_millis(POLL_INTERVAL_MS);
        match self.pending_search_at {
            Some(deadline) => deadline.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }
}

pub fn run(document: Document, config: &AppConfig) -> anyhow::Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // stderr shares the alternate screen; only errors may reach it
    let log_level = log::max_level();
    log::set_max_level(quiet_log_level(log_level));

    let mut view = PageView::new(document, config);
    let result = event_loop(&mut view);

    log::set_max_level(log_level);
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    log::info!("closed {:?}", view.title());
    drop(view.into_document());
    result.map_err(Into::into)
}

fn quiet_log_level(level: LevelFilter) -> LevelFilter {
    level.min(LevelFilter::Error)
}

fn event_loop(view: &mut PageView) -> io::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    loop {
        terminal.draw(|f| render::ui(f, view))?;

        if event::poll(view.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => view.handle_key(key),
                Event::Resize(..) => view.layout_dirty = true,
                _ => {}
            }
        }
        view.run_due_search(Instant::now());

        if view.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_logging_is_capped_at_errors() {
        assert_eq!(quiet_log_level(LevelFilter::Trace), LevelFilter::Error);
        assert_eq!(quiet_log_level(LevelFilter::Debug), LevelFilter::Error);
        assert_eq!(quiet_log_level(LevelFilter::Off), LevelFilter::Off);
    }
}
