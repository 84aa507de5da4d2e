use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hotelier_dom::Document;
use hotelier_search::{HighlightStyle, SearchEngine};

use crate::config::load_highlight_style;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Page file (JSON)
    pub page: PathBuf,

    /// Text to look for (case-insensitive)
    pub term: String,

    /// Step forward this many matches after searching
    #[arg(long, default_value_t = 0)]
    pub next: usize,

    /// Step back this many matches after stepping forward
    #[arg(long, default_value_t = 0)]
    pub previous: usize,

    /// Print the page body with markers
    #[arg(long)]
    pub markup: bool,
}

pub fn run(args: &SearchArgs) -> Result<()> {
    let document = Document::load(&args.page)
        .with_context(|| format!("failed to load page {}", args.page.display()))?;

    for line in search_report(document, load_highlight_style(), args) {
        println!("{}", line);
    }
    Ok(())
}

fn search_report(document: Document, style: HighlightStyle, args: &SearchArgs) -> Vec<String> {
    let mut engine = SearchEngine::with_style(document, style);
    let mut stats = engine.search(&args.term);
    for _ in 0..args.next {
        stats = engine.navigate_next();
    }
    for _ in 0..args.previous {
        stats = engine.navigate_previous();
    }

    let mut lines = vec![
        format!("Query: {:?}", engine.query()),
        format!("Total: {}", stats.total),
        format!("Current: {}", stats.current),
    ];

    if stats.is_empty() {
        lines.push("No matches".to_string());
        return lines;
    }

    lines.push(String::new());
    let active = engine.results().current_index();
    for (index, found) in engine.matches().iter().enumerate() {
        let cursor = if Some(index) == active { ">" } else { " " };
        let container = engine
            .host()
            .parent(found.marker)
            .and_then(|parent| engine.host().tag(parent))
            .unwrap_or("?");
        lines.push(format!(
            "{} {:>3}. {:?} in <{}>",
            cursor,
            index + 1,
            found.text,
            container
        ));
    }

    if args.markup {
        lines.push(String::new());
        lines.push(engine.host().body_markup());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "title": "Rooms",
        "body": [
            {"tag": "p", "children": ["Room 101 and room 202"]},
            {"tag": "li", "children": ["ROOM 303"]}
        ]
    }"#;

    fn args(term: &str) -> SearchArgs {
        SearchArgs {
            page: PathBuf::from("rooms.json"),
            term: term.to_string(),
            next: 0,
            previous: 0,
            markup: false,
        }
    }

    fn report(args: &SearchArgs) -> Vec<String> {
        let document = Document::from_json(PAGE).expect("page parses");
        search_report(document, HighlightStyle::default(), args)
    }

    #[test]
    fn lists_matches_in_document_order() {
        let lines = report(&args("room"));
        assert_eq!(
            lines,
            vec![
                "Query: \"room\"",
                "Total: 3",
                "Current: 1",
                "",
                ">   1. \"Room\" in <p>",
                "    2. \"room\" in <p>",
                "    3. \"ROOM\" in <li>",
            ]
        );
    }

    #[test]
    fn next_and_previous_move_the_cursor() {
        let mut stepped = args("room");
        stepped.next = 4;
        stepped.previous = 2;
        let lines = report(&stepped);
        assert_eq!(lines[2], "Current: 3");
        assert!(lines[6].starts_with(">   3."));
    }

    #[test]
    fn no_matches() {
        let lines = report(&args("suite"));
        assert_eq!(lines, vec!["Query: \"suite\"", "Total: 0", "Current: 0", "No matches"]);
    }

    #[test]
    fn markup_shows_markers() {
        let mut with_markup = args("202");
        with_markup.markup = true;
        let lines = report(&with_markup);
        let markup = lines.last().expect("markup line");
        assert!(markup.contains(
            "<mark class=\"page-search-highlight page-search-highlight-active\">202</mark>"
        ));
    }
}
