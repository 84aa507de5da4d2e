use std::path::PathBuf;

use hotelier_dom::{ScrollBehavior, ScrollBlock};
use hotelier_search::{HexColor, HighlightStyle, is_valid_class_name};

/// Returns the path to the config file
pub fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map(|p| p.join("hotelier").join("config.txt"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config_home.trim().is_empty()
        {
            return Some(PathBuf::from(xdg_config_home).join("hotelier").join("config.txt"));
        }
        dirs::home_dir().map(|p| p.join(".config").join("hotelier").join("config.txt"))
    }
}

/// Highlight settings from the config file, defaults when it is missing
pub fn load_highlight_style() -> HighlightStyle {
    config_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|contents| parse_highlight_style(&contents))
        .unwrap_or_default()
}

/// Parses the highlight keys from config file contents
pub fn parse_highlight_style(contents: &str) -> HighlightStyle {
    let mut style = HighlightStyle::default();

    for line in contents.lines() {
        let trimmed = line.trim();

        // Skip comments and empty lines
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');

        match key.trim().to_ascii_lowercase().as_str() {
            "highlight_color" => {
                if let Some(color) = HexColor::parse(value) {
                    style.marker_background = color;
                }
            }
            "highlight_text_color" => {
                if let Some(color) = HexColor::parse(value) {
                    style.marker_foreground = color;
                }
            }
            "active_color" => {
                if let Some(color) = HexColor::parse(value) {
                    style.active_background = color;
                }
            }
            "highlight_class" if is_valid_class_name(value) => {
                style.marker_class = value.to_string();
            }
            "active_class" if is_valid_class_name(value) => {
                style.active_class = value.to_string();
            }
            "scroll_behavior" => {
                if let Some(behavior) = ScrollBehavior::from_str(value) {
                    style.scroll_behavior = behavior;
                }
            }
            "scroll_block" => {
                if let Some(block) = ScrollBlock::from_str(value) {
                    style.scroll_block = block;
                }
            }
            _ => {}
        }
    }

    if style.marker_class == style.active_class {
        let defaults = HighlightStyle::default();
        style.marker_class = defaults.marker_class;
        style.active_class = defaults.active_class;
    }

    style
}
