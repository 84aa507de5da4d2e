//! In-page search and highlight for Hotelier pages.

mod engine;
mod host;
mod matcher;
mod pattern;
mod state;
mod style;

pub use engine::{EXCLUDED_TAGS, STYLESHEET_ID, SearchEngine};
pub use host::{SearchHost, Segment};
pub use matcher::{SearchMatch, SearchResults, SearchStats};
pub use pattern::QueryPattern;
pub use state::SearchSession;
pub use style::{
    DEFAULT_ACTIVE_CLASS, DEFAULT_MARKER_CLASS, HexColor, HighlightStyle, is_valid_class_name,
};
