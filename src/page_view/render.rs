use hotelier_search::HexColor;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::PageView;
use super::layout::{PageLine, SpanKind};

const HELP_TEXT: &str =
    " Enter/Down: Next | Shift-Enter/Up: Previous | Esc: Clear, again to quit | PgUp/PgDn: Scroll ";

pub(super) fn ui(f: &mut Frame, view: &mut PageView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3), Constraint::Length(1)])
        .split(f.area());

    let page_area = chunks[0];
    view.sync_layout(
        page_area.width.saturating_sub(2) as usize,
        page_area.height.saturating_sub(2) as usize,
    );

    let style = view.engine.style();
    let marker_style = Style::default()
        .bg(rgb(style.marker_background))
        .fg(rgb(style.marker_foreground));
    let active_style = Style::default()
        .bg(rgb(style.active_background))
        .fg(rgb(style.marker_foreground))
        .bold();

    let lines: Vec<Line> = view
        .layout()
        .lines()
        .iter()
        .skip(view.scroll_offset())
        .take(page_area.height.saturating_sub(2) as usize)
        .map(|line| styled_line(line, marker_style, active_style))
        .collect();

    let page = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", view.title()))
            .title_style(Style::default().bold()),
    );
    f.render_widget(page, page_area);

    let search = Paragraph::new(Line::from(vec![
        Span::raw(view.query()),
        Span::styled("▏", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .title_bottom(Line::from(match_label(view)).right_aligned()),
    );
    f.render_widget(search, chunks[1]);

    let help = Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

fn styled_line(line: &PageLine, marker_style: Style, active_style: Style) -> Line<'static> {
    let spans: Vec<Span> = line
        .spans
        .iter()
        .map(|span| {
            let style = match span.kind {
                SpanKind::Plain => Style::default(),
                SpanKind::Heading => Style::default().bold(),
                SpanKind::Marker => marker_style,
                SpanKind::ActiveMarker => active_style,
            };
            Span::styled(span.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

fn match_label(view: &PageView) -> String {
    let stats = view.stats();
    if view.query().trim().is_empty() {
        String::new()
    } else if view.pending_search_at.is_some() {
        " … ".to_string()
    } else if stats.is_empty() {
        " No matches ".to_string()
    } else {
        format!(" {} of {} ", stats.current, stats.total)
    }
}

fn rgb(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
