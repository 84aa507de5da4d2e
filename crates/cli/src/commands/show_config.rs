use hotelier_search::HighlightStyle;

use crate::config::{config_path, parse_highlight_style};

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            return;
        }
    };

    let contents = if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to read config file: {}", e);
                return;
            }
        }
    } else {
        String::new()
    };

    if !path.exists() {
        println!("# Config file: {} (not created yet)", path.display());
    } else {
        println!("# Config file: {}", path.display());
    }
    println!();

    if contents.trim().is_empty() {
        println!("# (no settings - using defaults)");
    } else {
        print!("{}", contents);
        if !contents.ends_with('\n') {
            println!();
        }
    }

    println!();
    for line in effective_settings(&parse_highlight_style(&contents)) {
        println!("{}", line);
    }
}

/// Highlight settings as the search engine will use them.
fn effective_settings(style: &HighlightStyle) -> Vec<String> {
    let mut lines = vec![
        "# Effective highlight settings:".to_string(),
        format!("highlight_color = {}", style.marker_background),
        format!("highlight_text_color = {}", style.marker_foreground),
        format!("active_color = {}", style.active_background),
        format!("highlight_class = {}", style.marker_class),
        format!("active_class = {}", style.active_class),
        format!("scroll_behavior = {}", style.scroll_behavior.as_str()),
        format!("scroll_block = {}", style.scroll_block.as_str()),
        String::new(),
        "# Installed stylesheet:".to_string(),
    ];
    lines.extend(style.stylesheet().lines().map(|rule| format!("#   {}", rule.trim())));
    lines
}
