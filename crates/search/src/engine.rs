use log::{debug, trace, warn};

use crate::host::{SearchHost, Segment};
use crate::matcher::{SearchMatch, SearchResults, SearchStats};
use crate::pattern::QueryPattern;
use crate::state::SearchSession;
use crate::style::HighlightStyle;

/// Element id of the stylesheet holding the marker rules.
pub const STYLESHEET_ID: &str = "page-search-styles";

/// Containers whose text is never rendered as page content.
pub const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "object", "embed", "head", "title",
];

/// Finds, marks and steps through occurrences of a query in a render tree.
///
/// One engine holds at most one session; every [`search`](Self::search)
/// clears the previous one first.
pub struct SearchEngine<H: SearchHost> {
    host: H,
    style: HighlightStyle,
    session: SearchSession<H::Node>,
    styles_installed: bool,
}

impl<H: SearchHost> SearchEngine<H> {
    pub fn new(host: H) -> Self {
        Self::with_style(host, HighlightStyle::default())
    }

    pub fn with_style(host: H, style: HighlightStyle) -> Self {
        Self {
            host,
            style,
            session: SearchSession::new(),
            styles_installed: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct access to the tree. Markers removed through it are skipped later.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Clears highlights and hands the tree back.
    pub fn into_host(mut self) -> H {
        self.clear_highlights();
        self.host
    }

    pub fn style(&self) -> &HighlightStyle {
        &self.style
    }

    /// Normalized query of the current session, empty when idle.
    pub fn query(&self) -> &str {
        self.session.query()
    }

    pub fn results(&self) -> &SearchResults<H::Node> {
        self.session.results()
    }

    pub fn matches(&self) -> &[SearchMatch<H::Node>] {
        self.session.results().matches()
    }

    pub fn active_match(&self) -> Option<&SearchMatch<H::Node>> {
        self.session.results().current()
    }

    pub fn search(&mut self, term: &str) -> SearchStats {
        self.clear_highlights();

        let Some(pattern) = QueryPattern::new(term) else {
            return SearchStats::default();
        };

        let targets = self.collect_text_nodes(&pattern);
        if targets.is_empty() {
            debug!("no matches for {:?}", pattern.normalized());
            self.session.begin(pattern.normalized(), Vec::new());
            return self.current_stats();
        }

        self.ensure_styles();

        let mut matches = Vec::new();
        for node in targets {
            let Some(text) = self.host.text(node).map(str::to_string) else {
                continue;
            };
            let segments = pattern.segments(&text);
            let markers =
                self.host
                    .replace_with_segments(node, &segments, &self.style.marker_class);
            trace!("marked {} occurrence(s) in {:?}", markers.len(), node);

            let marked_texts = segments
                .iter()
                .filter(|segment| segment.is_marker())
                .map(Segment::text);
            matches.extend(
                markers
                    .into_iter()
                    .zip(marked_texts)
                    .map(|(marker, text)| SearchMatch::new(marker, text)),
            );
        }

        debug!(
            "search {:?} found {} match(es)",
            pattern.normalized(),
            matches.len()
        );
        self.session.begin(pattern.normalized(), matches);
        if self.session.results().current_index().is_some() {
            self.refresh_active(None);
        }
        self.current_stats()
    }

    pub fn navigate_next(&mut self) -> SearchStats {
        let previous = self.session.results().current_index();
        if self.session.results_mut().next().is_none() {
            return SearchStats::default();
        }
        self.refresh_active(previous);
        self.current_stats()
    }

    pub fn navigate_previous(&mut self) -> SearchStats {
        let previous = self.session.results().current_index();
        if self.session.results_mut().previous().is_none() {
            return SearchStats::default();
        }
        self.refresh_active(previous);
        self.current_stats()
    }

    /// Unwraps every marker and resets the session. Safe to call when idle.
    pub fn clear_highlights(&mut self) {
        let matches = self.session.reset();
        if matches.is_empty() {
            return;
        }

        let mut skipped = 0;
        for search_match in &matches {
            if !self.host.is_attached(search_match.marker)
                || !self.host.unwrap_marker(search_match.marker)
            {
                skipped += 1;
            }
        }

        if skipped > 0 {
            warn!("{} marker(s) were detached before clearing", skipped);
        }
        debug!("cleared {} marker(s)", matches.len() - skipped);
    }

    pub fn current_stats(&self) -> SearchStats {
        self.session.stats()
    }

    /// Text nodes under body, in document order, that contain the query and
    /// whose parent element is rendered.
    fn collect_text_nodes(&self, pattern: &QueryPattern) -> Vec<H::Node> {
        let Some(body) = self.host.body() else {
            return Vec::new();
        };

        let mut selected = Vec::new();
        let mut stack: Vec<(H::Node, H::Node)> = self
            .host
            .children(body)
            .iter()
            .rev()
            .map(|&child| (child, body))
            .collect();

        while let Some((node, parent)) = stack.pop() {
            match self.host.text(node) {
                Some(text) => {
                    if pattern.is_match(text) && self.accepts_parent(parent) {
                        selected.push(node);
                    }
                }
                None => {
                    stack.extend(
                        self.host
                            .children(node)
                            .iter()
                            .rev()
                            .map(|&child| (child, node)),
                    );
                }
            }
        }

        selected
    }

    fn accepts_parent(&self, parent: H::Node) -> bool {
        let excluded = self
            .host
            .tag(parent)
            .is_some_and(|tag| EXCLUDED_TAGS.contains(&tag));
        !excluded && self.host.is_rendered(parent)
    }

    fn ensure_styles(&mut self) {
        if self.styles_installed {
            return;
        }
        if !self.host.has_stylesheet(STYLESHEET_ID) {
            self.host
                .install_stylesheet(STYLESHEET_ID, &self.style.stylesheet());
        }
        self.styles_installed = true;
    }

    fn refresh_active(&mut self, previous: Option<usize>) {
        let active_class = &self.style.active_class;

        if let Some(previous) = previous.and_then(|i| self.session.results().get(i)) {
            let marker = previous.marker;
            if self.host.is_attached(marker) {
                self.host.set_class(marker, active_class, false);
            } else {
                trace!("previous marker {:?} is detached", marker);
            }
        }

        let Some(current) = self.session.results().current() else {
            return;
        };
        let marker = current.marker;
        if !self.host.is_attached(marker) {
            warn!("active marker {:?} is detached; skipping", marker);
            return;
        }
        self.host.set_class(marker, active_class, true);
        self.host
            .scroll_into_view(marker, self.style.scroll_behavior, self.style.scroll_block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelier_dom::{Display, Document, NodeId, ScrollBehavior, ScrollBlock, Visibility};
    use crate::style::DEFAULT_ACTIVE_CLASS;

    fn page(json: &str) -> SearchEngine<Document> {
        SearchEngine::new(Document::from_json(json).unwrap())
    }

    fn body_text(engine: &SearchEngine<Document>) -> String {
        let document = engine.host();
        document.text_content(document.body())
    }

    fn marker_texts(engine: &SearchEngine<Document>) -> Vec<String> {
        engine
            .matches()
            .iter()
            .map(|m| engine.host().text_content(m.marker))
            .collect()
    }

    fn active_markers(engine: &SearchEngine<Document>) -> Vec<NodeId> {
        let document = engine.host();
        engine
            .matches()
            .iter()
            .map(|m| m.marker)
            .filter(|&marker| document.has_class(marker, &engine.style().active_class))
            .collect()
    }

    const GRAND_HOTEL: &str =
        r#"{ "body": ["Welcome to Grand Hotel. The Grand Hotel lobby is open."] }"#;

    #[test]
    fn grand_hotel_scenario() {
        let mut engine = page(GRAND_HOTEL);
        let original = body_text(&engine);

        assert_eq!(engine.search("grand"), SearchStats::new(2, 1));
        let first = engine.matches()[0].marker;
        let second = engine.matches()[1].marker;
        assert_eq!(active_markers(&engine), vec![first]);
        let request = engine.host().viewport().last_request().unwrap();
        assert_eq!(request.node, first);
        assert_eq!(request.behavior, ScrollBehavior::Smooth);
        assert_eq!(request.block, ScrollBlock::Center);

        assert_eq!(engine.navigate_next(), SearchStats::new(2, 2));
        assert_eq!(active_markers(&engine), vec![second]);
        assert_eq!(engine.host().viewport().last_request().unwrap().node, second);

        assert_eq!(engine.navigate_next(), SearchStats::new(2, 1));
        assert_eq!(active_markers(&engine), vec![first]);

        engine.clear_highlights();
        assert_eq!(body_text(&engine), original);
        assert_eq!(engine.current_stats(), SearchStats::default());
        assert_eq!(
            engine.host().body_markup(),
            "Welcome to Grand Hotel. The Grand Hotel lobby is open."
        );
    }

    #[test]
    fn case_insensitive_match_keeps_source_case() {
        let mut engine = page(r#"{ "body": [{ "tag": "p", "children": ["Room 101 and room 202"] }] }"#);

        assert_eq!(engine.search("ROOM").total, 2);
        assert_eq!(marker_texts(&engine), vec!["Room", "room"]);
        assert_eq!(engine.matches()[0].text, "Room");
        assert_eq!(engine.matches()[1].text, "room");
        assert_eq!(engine.query(), "room");
        assert_eq!(
            engine.host().body_markup(),
            "<p><mark class=\"page-search-highlight page-search-highlight-active\">Room</mark> 101 and \
             <mark class=\"page-search-highlight\">room</mark> 202</p>"
        );
    }

    #[test]
    fn matches_follow_document_order() {
        let mut engine = page(
            r#"{ "body": [
                { "tag": "div", "children": [
                    { "tag": "p", "children": ["suite one"] },
                    { "tag": "ul", "children": [{ "tag": "li", "children": ["suite two, suite three"] }] }
                ] },
                { "tag": "p", "children": ["suite four"] }
            ] }"#,
        );

        assert_eq!(engine.search("suite").total, 4);
        let texts: Vec<String> = engine
            .matches()
            .iter()
            .map(|m| {
                let document = engine.host();
                let parent = document.parent(m.marker).unwrap();
                document.text_content(parent)
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "suite one",
                "suite two, suite three",
                "suite two, suite three",
                "suite four"
            ]
        );

        let markers: Vec<NodeId> = engine.matches().iter().map(|m| m.marker).collect();
        let order: Vec<NodeId> = engine
            .host()
            .descendants(engine.host().body())
            .filter(|node| markers.contains(node))
            .collect();
        assert_eq!(markers, order);
    }

    #[test]
    fn cyclic_navigation_in_both_directions() {
        let mut engine = page(r#"{ "body": ["spa spa spa spa spa"] }"#);
        let k = engine.search("spa").total;
        assert_eq!(k, 5);

        for _ in 0..k {
            engine.navigate_next();
        }
        assert_eq!(engine.current_stats(), SearchStats::new(5, 1));

        assert_eq!(engine.navigate_previous(), SearchStats::new(5, 5));
        assert_eq!(engine.navigate_previous(), SearchStats::new(5, 4));
        assert_eq!(active_markers(&engine).len(), 1);
    }

    #[test]
    fn blank_query_clears_and_returns_zero() {
        let mut engine = page(GRAND_HOTEL);
        engine.search("hotel");
        assert_eq!(engine.search("   "), SearchStats::default());
        assert!(engine.matches().is_empty());
        assert_eq!(engine.query(), "");
        assert_eq!(
            engine.host().body_markup(),
            "Welcome to Grand Hotel. The Grand Hotel lobby is open."
        );
    }

    #[test]
    fn no_match_leaves_document_untouched() {
        let mut engine = page(GRAND_HOTEL);
        let before = engine.host().to_markup(engine.host().root());

        assert_eq!(engine.search("zzzznotfound"), SearchStats::default());
        assert_eq!(engine.host().to_markup(engine.host().root()), before);
        assert_eq!(engine.navigate_next(), SearchStats::default());
        assert_eq!(engine.navigate_previous(), SearchStats::default());
        assert_eq!(engine.host().viewport().revision(), 0);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut engine = page(GRAND_HOTEL);
        engine.clear_highlights();
        engine.clear_highlights();
        assert_eq!(engine.current_stats(), SearchStats::default());

        engine.search("lobby");
        engine.clear_highlights();
        engine.clear_highlights();
        assert_eq!(engine.current_stats(), SearchStats::default());
    }

    #[test]
    fn new_search_replaces_previous_session() {
        let mut engine = page(GRAND_HOTEL);
        engine.search("grand");
        assert_eq!(engine.search("lobby"), SearchStats::new(1, 1));
        assert_eq!(marker_texts(&engine), vec!["lobby"]);

        let document = engine.host();
        let marks = document
            .descendants(document.body())
            .filter(|&node| document.tag(node) == Some("mark"))
            .count();
        assert_eq!(marks, 1);
    }

    #[test]
    fn excluded_and_hidden_text_is_never_matched() {
        let mut engine = page(
            r#"{ "body": [
                { "tag": "script", "children": ["var room = 1;"] },
                { "tag": "style", "children": [".room { color: red }"] },
                { "tag": "noscript", "style": { "display": "block" }, "children": ["room"] },
                { "tag": "div", "style": { "display": "none" }, "children": ["hidden room"] },
                { "tag": "div", "style": { "visibility": "hidden" }, "children": ["invisible room"] },
                { "tag": "p", "children": ["visible room"] }
            ] }"#,
        );

        assert_eq!(engine.search("room"), SearchStats::new(1, 1));
        let document = engine.host();
        let parent = document.parent(engine.matches()[0].marker).unwrap();
        assert_eq!(document.tag(parent), Some("p"));
    }

    #[test]
    fn hidden_check_only_looks_at_nearest_element() {
        let mut engine = page(
            r#"{ "body": [
                { "tag": "div", "style": { "display": "none" }, "children": [
                    { "tag": "span", "children": ["nested room"] }
                ] },
                { "tag": "div", "style": { "visibility": "hidden" }, "children": [
                    { "tag": "span", "style": { "visibility": "visible" }, "children": ["shown room"] },
                    { "tag": "span", "children": ["inherited room"] }
                ] }
            ] }"#,
        );

        // display does not inherit, visibility does.
        assert_eq!(engine.search("room").total, 2);
        assert_eq!(
            engine
                .matches()
                .iter()
                .map(|m| engine.host().text_content(engine.host().parent(m.marker).unwrap()))
                .collect::<Vec<_>>(),
            vec!["nested room", "shown room"]
        );
    }

    #[test]
    fn styles_are_installed_once() {
        let mut engine = page(GRAND_HOTEL);
        engine.search("zzzz");
        assert!(engine.host().element_by_id(STYLESHEET_ID).is_none());

        engine.search("grand");
        engine.search("hotel");
        let document = engine.host();
        let sheets = document
            .descendants(document.head())
            .filter(|&node| document.tag(node) == Some("style"))
            .count();
        assert_eq!(sheets, 1);

        let document = engine.into_host();
        let mut engine = SearchEngine::new(document);
        engine.search("open");
        let document = engine.host();
        let sheets = document
            .descendants(document.head())
            .filter(|&node| document.tag(node) == Some("style"))
            .count();
        assert_eq!(sheets, 1);
    }

    #[test]
    fn round_trip_preserves_text_across_nodes() {
        let json = r#"{ "body": [
            { "tag": "h1", "children": ["Guests"] },
            { "tag": "table", "children": [
                { "tag": "tr", "children": [
                    { "tag": "td", "children": ["  Ana  Guest  "] },
                    { "tag": "td", "children": ["guest@example.com"] }
                ] }
            ] },
            "GUEST list: guestguest"
        ] }"#;
        let mut engine = page(json);
        let original = body_text(&engine);

        assert_eq!(engine.search("guest").total, 6);
        assert_eq!(body_text(&engine), original);

        engine.clear_highlights();
        assert_eq!(body_text(&engine), original);
        assert_eq!(engine.host().to_markup(engine.host().body()), {
            let fresh = Document::from_json(json).unwrap();
            fresh.to_markup(fresh.body())
        });
    }

    #[test]
    fn detached_markers_are_skipped() {
        let mut engine = page(
            r#"{ "body": [
                { "tag": "p", "children": ["desk one"] },
                { "tag": "p", "children": ["desk two"] }
            ] }"#,
        );
        engine.search("desk");
        let first_paragraph = engine.host().children(engine.host().body())[0];
        let second_marker = engine.matches()[1].marker;
        engine.host_mut().remove(first_paragraph);

        assert_eq!(engine.navigate_next(), SearchStats::new(2, 2));
        assert_eq!(engine.navigate_next(), SearchStats::new(2, 1));
        assert_eq!(engine.host().viewport().last_request().unwrap().node, second_marker);

        engine.clear_highlights();
        assert_eq!(engine.current_stats(), SearchStats::default());
        assert_eq!(engine.host().body_markup(), "<p>desk two</p>");
    }

    #[test]
    fn detached_active_marker_is_not_scrolled() {
        let mut engine = page(
            r#"{ "body": [
                { "tag": "p", "children": ["lobby"] },
                { "tag": "p", "children": ["lobby bar"] }
            ] }"#,
        );
        engine.search("lobby");
        let revision = engine.host().viewport().revision();
        let second_paragraph = engine.host().children(engine.host().body())[1];
        let second_marker = engine.matches()[1].marker;
        engine.host_mut().remove(second_paragraph);

        assert!(!SearchHost::is_attached(engine.host(), second_marker));
        assert_eq!(engine.navigate_next(), SearchStats::new(2, 2));
        assert_eq!(engine.host().viewport().revision(), revision);
        assert!(!engine.host().has_class(second_marker, DEFAULT_ACTIVE_CLASS));

        engine.clear_highlights();
        assert_eq!(engine.host().body_markup(), "<p>lobby</p>");
    }

    #[test]
    fn custom_style_controls_classes_and_scroll() {
        let style = HighlightStyle {
            marker_class: "hit".to_string(),
            active_class: "hit-now".to_string(),
            scroll_behavior: ScrollBehavior::Instant,
            scroll_block: ScrollBlock::Nearest,
            ..HighlightStyle::default()
        };
        let mut engine =
            SearchEngine::with_style(Document::from_json(GRAND_HOTEL).unwrap(), style);
        engine.search("open");

        let marker = engine.matches()[0].marker;
        assert!(engine.host().has_class(marker, "hit"));
        assert!(engine.host().has_class(marker, "hit-now"));
        let request = engine.host().viewport().last_request().unwrap();
        assert_eq!(request.behavior, ScrollBehavior::Instant);
        assert_eq!(request.block, ScrollBlock::Nearest);
        let sheet = engine.host().element_by_id(STYLESHEET_ID).unwrap();
        assert!(engine.host().text_content(sheet).contains("mark.hit.hit-now"));
    }

    #[test]
    fn body_without_content() {
        let mut engine = SearchEngine::new(Document::new());
        assert_eq!(engine.search("anything"), SearchStats::default());

        let mut document = Document::new();
        let div = document.create_element("div");
        document.append_child(document.body(), div).unwrap();
        document.element_mut(div).unwrap().style.display = Some(Display::Block);
        document.element_mut(div).unwrap().style.visibility = Some(Visibility::Visible);
        let mut engine = SearchEngine::new(document);
        assert_eq!(engine.search("anything"), SearchStats::default());
    }
}
