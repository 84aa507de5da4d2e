use std::fmt;

use hotelier_dom::{ScrollBehavior, ScrollBlock};

pub const DEFAULT_MARKER_CLASS: &str = "page-search-highlight";
pub const DEFAULT_ACTIVE_CLASS: &str = "page-search-highlight-active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`, with or without the leading `#`.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::new(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Presentation of markers and the active marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub marker_class: String,
    pub active_class: String,
    pub marker_background: HexColor,
    pub marker_foreground: HexColor,
    pub active_background: HexColor,
    pub scroll_behavior: ScrollBehavior,
    pub scroll_block: ScrollBlock,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            marker_background: HexColor::new(0xff, 0xeb, 0x3b),
            marker_foreground: HexColor::new(0x00, 0x00, 0x00),
            active_background: HexColor::new(0xff, 0x98, 0x00),
            scroll_behavior: ScrollBehavior::Smooth,
            scroll_block: ScrollBlock::Center,
        }
    }
}

impl HighlightStyle {
    /// Global rules for markers, installed once per document.
    pub fn stylesheet(&self) -> String {
        format!(
            "mark.{marker} {{ background-color: {bg}; color: {fg}; padding: 0; border-radius: 2px; }}\n\
             mark.{marker}.{active} {{ background-color: {active_bg}; }}\n",
            marker = self.marker_class,
            active = self.active_class,
            bg = self.marker_background,
            fg = self.marker_foreground,
            active_bg = self.active_background,
        )
    }
}

/// Valid CSS class token: non-empty, no whitespace, starts with a letter, `-` or `_`.
pub fn is_valid_class_name(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '-' || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_short_and_long_forms() {
        assert_eq!(HexColor::parse("#ffeb3b"), Some(HexColor::new(0xff, 0xeb, 0x3b)));
        assert_eq!(HexColor::parse("FF9800"), Some(HexColor::new(0xff, 0x98, 0x00)));
        assert_eq!(HexColor::parse("#0f0"), Some(HexColor::new(0, 0xff, 0)));
        assert_eq!(HexColor::parse("#12345"), None);
        assert_eq!(HexColor::parse("#gggggg"), None);
        assert_eq!(HexColor::parse("#éé"), None);
    }

    #[test]
    fn hex_colors_display_lowercase() {
        assert_eq!(HexColor::new(0xff, 0x98, 0x00).to_string(), "#ff9800");
    }

    #[test]
    fn stylesheet_mentions_both_classes() {
        let css = HighlightStyle::default().stylesheet();
        assert!(css.contains("mark.page-search-highlight { background-color: #ffeb3b; color: #000000;"));
        assert!(css.contains(
            "mark.page-search-highlight.page-search-highlight-active { background-color: #ff9800; }"
        ));
    }

    #[test]
    fn class_names() {
        assert!(is_valid_class_name("page-search-highlight"));
        assert!(is_valid_class_name("_hit2"));
        assert!(!is_valid_class_name(""));
        assert!(!is_valid_class_name("two words"));
        assert!(!is_valid_class_name("9lives"));
    }
}
