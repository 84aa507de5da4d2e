use std::collections::HashMap;

use hotelier_dom::{Display, Document, NodeId, ScrollBlock, Visibility};
use hotelier_search::{EXCLUDED_TAGS, HighlightStyle};

const LIST_BULLET: &str = "• ";
const CELL_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Heading,
    Marker,
    ActiveMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpan {
    pub text: String,
    pub kind: SpanKind,
    pub marker: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLine {
    pub spans: Vec<PageSpan>,
}

impl PageLine {
    fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    fn ends_with_space(&self) -> bool {
        self.spans.last().is_some_and(|span| span.text.ends_with(' '))
    }

    fn width(&self) -> usize {
        self.spans.iter().map(|span| span.text.chars().count()).sum()
    }

    fn push(&mut self, text: &str, kind: SpanKind, marker: Option<NodeId>) {
        if let Some(last) = self.spans.last_mut()
            && last.kind == kind
            && last.marker == marker
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(PageSpan {
            text: text.to_string(),
            kind,
            marker,
        });
    }

    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Page flattened into terminal lines.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    lines: Vec<PageLine>,
    marker_lines: HashMap<NodeId, usize>,
}

impl PageLayout {
    /// Lays out the body of `document`. `width` of `None` leaves lines unwrapped.
    pub fn build(document: &Document, style: &HighlightStyle, width: Option<usize>) -> Self {
        let mut builder = LayoutBuilder::new(style);
        builder.walk(document, document.body(), SpanContext::default());
        builder.break_line();

        let lines = match width {
            Some(width) if width > 0 => builder
                .lines
                .into_iter()
                .flat_map(|line| wrap_line(line, width))
                .collect(),
            _ => builder.lines,
        };

        let mut marker_lines = HashMap::new();
        for (index, line) in lines.iter().enumerate() {
            for span in &line.spans {
                if let Some(marker) = span.marker {
                    marker_lines.entry(marker).or_insert(index);
                }
            }
        }

        Self {
            lines,
            marker_lines,
        }
    }

    pub fn lines(&self) -> &[PageLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// First line showing any part of `marker`.
    pub fn line_of(&self, marker: NodeId) -> Option<usize> {
        self.marker_lines.get(&marker).copied()
    }
}

#[derive(Debug, Clone, Copy)]
struct SpanContext {
    kind: SpanKind,
    marker: Option<NodeId>,
    visible: bool,
}

impl Default for SpanContext {
    fn default() -> Self {
        Self {
            kind: SpanKind::Plain,
            marker: None,
            visible: true,
        }
    }
}

struct LayoutBuilder<'a> {
    style: &'a HighlightStyle,
    lines: Vec<PageLine>,
    current: PageLine,
    pending_space: bool,
}

impl<'a> LayoutBuilder<'a> {
    fn new(style: &'a HighlightStyle) -> Self {
        Self {
            style,
            lines: Vec::new(),
            current: PageLine::default(),
            pending_space: false,
        }
    }

    fn walk(&mut self, document: &Document, node: NodeId, ctx: SpanContext) {
        if let Some(text) = document.text(node) {
            if ctx.visible {
                self.push_text(text, ctx);
            }
            return;
        }

        let (Some(element), Some(computed)) = (document.element(node), document.computed_style(node))
        else {
            return;
        };
        if computed.display == Display::None || EXCLUDED_TAGS.contains(&element.tag.as_str()) {
            return;
        }

        let mut child_ctx = SpanContext {
            visible: computed.visibility != Visibility::Hidden,
            ..ctx
        };
        if element.has_class(&self.style.marker_class) {
            child_ctx.marker = Some(node);
            child_ctx.kind = if element.has_class(&self.style.active_class) {
                SpanKind::ActiveMarker
            } else {
                SpanKind::Marker
            };
        } else if is_heading(&element.tag) && ctx.marker.is_none() {
            child_ctx.kind = SpanKind::Heading;
        }

        let block = computed.display.is_block_level();
        if block {
            self.break_line();
        }
        match computed.display {
            Display::ListItem => self.push_literal(LIST_BULLET),
            Display::TableCell if !self.current.is_empty() => self.push_literal(CELL_SEPARATOR),
            _ => {}
        }

        for &child in document.children(node) {
            self.walk(document, child, child_ctx);
        }

        if block || element.tag == "br" {
            self.break_line();
        }
    }

    /// Collapses whitespace runs; a gap between spans of different kinds
    /// stays plain.
    fn push_text(&mut self, text: &str, ctx: SpanContext) {
        let mut word = String::new();
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    self.current.push(&word, ctx.kind, ctx.marker);
                    word.clear();
                }
                self.pending_space = true;
                continue;
            }

            if word.is_empty() && self.pending_space {
                self.pending_space = false;
                if !self.current.is_empty() && !self.current.ends_with_space() {
                    let joined = self
                        .current
                        .spans
                        .last()
                        .is_some_and(|last| last.kind == ctx.kind && last.marker == ctx.marker);
                    if joined {
                        self.current.push(" ", ctx.kind, ctx.marker);
                    } else {
                        self.current.push(" ", SpanKind::Plain, None);
                    }
                }
            }
            word.push(ch);
        }

        if !word.is_empty() {
            self.current.push(&word, ctx.kind, ctx.marker);
        }
    }

    fn push_literal(&mut self, text: &str) {
        self.pending_space = false;
        self.current.push(text, SpanKind::Plain, None);
    }

    fn break_line(&mut self) {
        self.pending_space = false;
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn wrap_line(line: PageLine, width: usize) -> Vec<PageLine> {
    if line.width() <= width {
        return vec![line];
    }

    let mut wrapped = Vec::new();
    let mut current = PageLine::default();
    let mut used = 0;
    for span in line.spans {
        for ch in span.text.chars() {
            if used == width {
                wrapped.push(std::mem::take(&mut current));
                used = 0;
            }
            if used == 0 && ch == ' ' && span.marker.is_none() {
                continue;
            }
            let mut buf = [0u8; 4];
            current.push(ch.encode_utf8(&mut buf), span.kind, span.marker);
            used += 1;
        }
    }
    if !current.spans.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// Scroll offset that shows `line` in a window of `height` lines.
pub fn scroll_offset_for(line: usize, current: usize, height: usize, block: ScrollBlock) -> usize {
    if height == 0 {
        return line;
    }
    match block {
        ScrollBlock::Start => line,
        ScrollBlock::Center => line.saturating_sub(height / 2),
        ScrollBlock::End => (line + 1).saturating_sub(height),
        ScrollBlock::Nearest => {
            if line < current {
                line
            } else if line >= current + height {
                line + 1 - height
            } else {
                current
            }
        }
    }
}
