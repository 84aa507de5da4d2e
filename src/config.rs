use std::{
    env, fs,
    path::{Path, PathBuf},
};

use hotelier_dom::{ScrollBehavior, ScrollBlock};
use hotelier_search::{HexColor, HighlightStyle, is_valid_class_name};

const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;
const MAX_SEARCH_DEBOUNCE_MS: u64 = 2_000;

const DEFAULT_CONFIG: &str = "# Search highlight colors (#rrggbb or #rgb)\n\
highlight_color = #ffeb3b\n\
highlight_text_color = #000000\n\
active_color = #ff9800\n\
# Class names given to highlight markers\n\
# highlight_class = page-search-highlight\n\
# active_class = page-search-highlight-active\n\
# How the active match is brought into view\n\
# scroll_behavior = smooth\n\
# Where the active match lands: center, start, end, nearest\n\
scroll_block = center\n\
# Delay between the last keystroke and the search, in milliseconds (max 2000)\n\
search_debounce_ms = 150\n\
# Wrap long page lines to the window width\n\
# wrap_lines = true\n\
# Page opened when no page is given on the command line\n\
# default_page = ~/pages/front_desk.json\n";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub highlight: HighlightStyle,
    pub search_debounce_ms: u64,
    pub wrap_lines: bool,
    pub default_page: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            highlight: HighlightStyle::default(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            wrap_lines: true,
            default_page: None,
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let mut config = Self::default();
        let Some(path) = ensure_config_file() else {
            return config;
        };

        match fs::read_to_string(&path) {
            Ok(contents) => config = Self::from_contents(&contents),
            Err(e) => log::warn!("could not read {}: {}", path.display(), e),
        }

        config
    }

    fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();

            if key.eq_ignore_ascii_case("highlight_color") {
                if let Some(color) = HexColor::parse(value) {
                    config.highlight.marker_background = color;
                }
            }

            if key.eq_ignore_ascii_case("highlight_text_color") {
                if let Some(color) = HexColor::parse(value) {
                    config.highlight.marker_foreground = color;
                }
            }

            if key.eq_ignore_ascii_case("active_color") {
                if let Some(color) = HexColor::parse(value) {
                    config.highlight.active_background = color;
                }
            }

            if key.eq_ignore_ascii_case("highlight_class") {
                if let Some(class) = parse_class_name(value) {
                    config.highlight.marker_class = class;
                }
            }

            if key.eq_ignore_ascii_case("active_class") {
                if let Some(class) = parse_class_name(value) {
                    config.highlight.active_class = class;
                }
            }

            if key.eq_ignore_ascii_case("scroll_behavior") {
                if let Some(behavior) = ScrollBehavior::from_str(value) {
                    config.highlight.scroll_behavior = behavior;
                }
            }

            if key.eq_ignore_ascii_case("scroll_block") {
                if let Some(block) = ScrollBlock::from_str(value) {
                    config.highlight.scroll_block = block;
                }
            }

            if key.eq_ignore_ascii_case("search_debounce_ms")
                || key.eq_ignore_ascii_case("debounce_ms")
            {
                if let Ok(delay) = value.parse::<u64>() {
                    config.search_debounce_ms = delay.min(MAX_SEARCH_DEBOUNCE_MS);
                }
            }

            if key.eq_ignore_ascii_case("wrap_lines") {
                if let Some(wrap) = parse_bool(value) {
                    config.wrap_lines = wrap;
                }
            }

            if key.eq_ignore_ascii_case("default_page")
                && let Some(path) = parse_string_value(value)
            {
                config.default_page = Some(expand_home(&path));
            }
        }

        // Markers need distinct classes or the active one can never be told apart.
        if config.highlight.marker_class == config.highlight.active_class {
            let defaults = HighlightStyle::default();
            config.highlight.marker_class = defaults.marker_class;
            config.highlight.active_class = defaults.active_class;
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "\"" || trimmed == "'" {
        return None;
    }

    let unquoted = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let unquoted = unquoted.trim();
    if unquoted.is_empty() {
        return None;
    }

    Some(unquoted.to_string())
}

fn parse_class_name(value: &str) -> Option<String> {
    parse_string_value(value).filter(|class| is_valid_class_name(class))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Ok(home) = env::var("HOME")
        && !home.trim().is_empty()
    {
        return Path::new(&home).join(rest);
    }
    PathBuf::from(path)
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            log::warn!("could not create {}: {}", parent.display(), e);
        }
        if let Err(e) = fs::write(&path, DEFAULT_CONFIG) {
            log::warn!("could not write default config to {}: {}", path.display(), e);
        }
    }
    Some(path)
}

fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Ok(app_data) = env::var("APPDATA")
            && !app_data.trim().is_empty()
        {
            return Some(Path::new(&app_data).join("hotelier").join("config.txt"));
        }

        if let Ok(user_profile) = env::var("USERPROFILE")
            && !user_profile.trim().is_empty()
        {
            return Some(Path::new(&user_profile).join(".config/hotelier/config.txt"));
        }
    }

    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("hotelier/config.txt"));
    }

    if let Ok(home) = env::var("HOME")
        && !home.trim().is_empty()
    {
        return Some(Path::new(&home).join(".config/hotelier/config.txt"));
    }

    env::current_dir()
        .ok()
        .map(|dir| dir.join(".config/hotelier/config.txt"))
}
