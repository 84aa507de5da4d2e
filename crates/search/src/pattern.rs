use regex::{Regex, RegexBuilder};

use crate::host::Segment;

/// A compiled, case-insensitive literal query.
#[derive(Debug, Clone)]
pub struct QueryPattern {
    normalized: String,
    regex: Regex,
}

impl QueryPattern {
    /// Trims and lowercases `term`. Returns `None` for blank terms.
    pub fn new(term: &str) -> Option<Self> {
        let normalized = term.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        match RegexBuilder::new(&regex::escape(&normalized))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { normalized, regex }),
            Err(e) => {
                log::warn!("could not compile query {:?}: {}", normalized, e);
                None
            }
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte ranges of every non-overlapping occurrence, left to right.
    pub fn find_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    /// Splits `text` into plain and matched runs. Empty runs are never produced.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (start, end) in self.find_ranges(text) {
            if start > cursor {
                segments.push(Segment::Text(&text[cursor..start]));
            }
            segments.push(Segment::Marker(&text[start..end]));
            cursor = end;
        }

        if cursor < text.len() {
            segments.push(Segment::Text(&text[cursor..]));
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_have_no_pattern() {
        assert!(QueryPattern::new("").is_none());
        assert!(QueryPattern::new("   \t\n").is_none());
    }

    #[test]
    fn term_is_trimmed_and_lowercased() {
        let pattern = QueryPattern::new("  Grand HOTEL ").unwrap();
        assert_eq!(pattern.normalized(), "grand hotel");
        assert!(pattern.is_match("Welcome to the GRAND hotel"));
    }

    #[test]
    fn matching_is_case_insensitive_and_non_overlapping() {
        let pattern = QueryPattern::new("room").unwrap();
        assert_eq!(
            pattern.find_ranges("Room 101 and room 202"),
            vec![(0, 4), (13, 17)]
        );

        let pattern = QueryPattern::new("aa").unwrap();
        assert_eq!(pattern.find_ranges("aaaa"), vec![(0, 2), (2, 4)]);
        assert_eq!(pattern.find_ranges("aaa"), vec![(0, 2)]);
    }

    #[test]
    fn literal_metacharacters_are_escaped() {
        let pattern = QueryPattern::new("rate.*").unwrap();
        assert!(!pattern.is_match("rates"));
        assert!(pattern.is_match("Rate.* applies"));
    }

    #[test]
    fn segments_preserve_case_and_whitespace() {
        let pattern = QueryPattern::new("room").unwrap();
        let segments = pattern.segments("  Room 101 and room ");
        assert_eq!(
            segments,
            vec![
                Segment::Text("  "),
                Segment::Marker("Room"),
                Segment::Text(" 101 and "),
                Segment::Marker("room"),
                Segment::Text(" "),
            ]
        );
    }

    #[test]
    fn segments_without_leading_or_trailing_text() {
        let pattern = QueryPattern::new("spa").unwrap();
        assert_eq!(pattern.segments("Spa"), vec![Segment::Marker("Spa")]);
        assert_eq!(pattern.segments("nothing"), vec![Segment::Text("nothing")]);
    }

    #[test]
    fn unicode_terms() {
        let pattern = QueryPattern::new("CAFÉ").unwrap();
        assert_eq!(pattern.normalized(), "café");
        assert_eq!(
            pattern.segments("Le Café"),
            vec![Segment::Text("Le "), Segment::Marker("Café")]
        );
    }
}
