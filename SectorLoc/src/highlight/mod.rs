//! Highlight tags: emphasis spans embedded in free text
//!
//! The same highlighted content has three textual forms:
//!
//! - **Game form**: the base text plus a `|`-separated list of tags kept in a
//!   sibling column (`text3` / `text4`, `customPrimary` / `customPrimaryHL`).
//! - **Portable form**: one string with each tag wrapped in `{{` `}}`, which
//!   is what translators edit.
//! - **Display form**: one string with each tag wrapped in preview markup.
//!
//! Game files place tags in the base text two ways, see [`HighlightStyle`].
//!
//! # Example
//!
//! ```
//! use sectorloc::highlight::{HighlightStyle, HighlightedText};
//!
//! let effect = HighlightedText::from_game("Deals %s damage", "fire", HighlightStyle::Placeholder);
//! assert_eq!(effect.to_portable(), "Deals {{fire}} damage");
//!
//! let back = HighlightedText::from_portable("Deals {{fire}} damage", HighlightStyle::Placeholder);
//! assert_eq!(back, effect);
//! ```

/// Separator between tags in the game-form highlight column
pub const SEPARATOR: char = '|';

/// Slot marker used by [`HighlightStyle::Placeholder`] text
pub const PLACEHOLDER: &str = "%s";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// How tags sit in the game-form base text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    /// Each tag is a literal substring of the text, matched left to right.
    Inline,
    /// The text carries one `%s` slot per tag, filled in order.
    Placeholder,
}

/// Preview markup for the display form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMarkup {
    pub open: String,
    pub close: String,
}

impl DisplayMarkup {
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for DisplayMarkup {
    fn default() -> Self {
        Self::new("<font color=red>", "</font>")
    }
}

/// Base text plus its ordered emphasis tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedText {
    pub text: String,
    pub highlights: Vec<String>,
    pub style: HighlightStyle,
}

impl HighlightedText {
    #[must_use]
    pub fn new(text: impl Into<String>, highlights: Vec<String>, style: HighlightStyle) -> Self {
        Self {
            text: text.into(),
            highlights,
            style,
        }
    }

    /// Build from the two game-form columns.
    #[must_use]
    pub fn from_game(text: &str, highlights_column: &str, style: HighlightStyle) -> Self {
        Self::new(text, parse_highlights(highlights_column), style)
    }

    /// The game-form highlight column value.
    #[must_use]
    pub fn highlights_column(&self) -> String {
        join_highlights(&self.highlights)
    }

    /// Whether there is anything at all to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.highlights.is_empty()
    }

    /// Wrap every tag in `{{` `}}`.
    #[must_use]
    pub fn to_portable(&self) -> String {
        self.wrap(OPEN, CLOSE)
    }

    /// Wrap every tag in preview markup.
    #[must_use]
    pub fn to_display(&self, markup: &DisplayMarkup) -> String {
        self.wrap(&markup.open, &markup.close)
    }

    /// Rebuild the game form from portable text.
    ///
    /// `{{...}}` groups are found with a non-greedy scan. For
    /// [`HighlightStyle::Inline`] the delimiters are dropped and the span stays
    /// in the text; for [`HighlightStyle::Placeholder`] the span is replaced by
    /// `%s`. Unterminated `{{` and empty `{{}}` are kept as literal text.
    #[must_use]
    pub fn from_portable(portable: &str, style: HighlightStyle) -> Self {
        let mut text = String::with_capacity(portable.len());
        let mut highlights = Vec::new();
        let mut rest = portable;

        while let Some(start) = rest.find(OPEN) {
            let after_open = &rest[start + OPEN.len()..];
            let Some(end) = after_open.find(CLOSE) else {
                break;
            };
            let span = &after_open[..end];
            if span.is_empty() {
                text.push_str(&rest[..start + OPEN.len() + CLOSE.len()]);
                rest = &after_open[CLOSE.len()..];
                continue;
            }
            text.push_str(&rest[..start]);
            match style {
                HighlightStyle::Inline => text.push_str(span),
                HighlightStyle::Placeholder => text.push_str(PLACEHOLDER),
            }
            highlights.push(span.to_string());
            rest = &after_open[end + CLOSE.len()..];
        }
        text.push_str(rest);

        Self::new(text, highlights, style)
    }

    /// Tags from the first one that could not be placed in the text onward.
    ///
    /// These are absent from the portable and display forms.
    #[must_use]
    pub fn unwrapped_highlights(&self) -> &[String] {
        let (_, placed) = self.wrap_counted("", "");
        &self.highlights[placed..]
    }

    fn wrap(&self, open: &str, close: &str) -> String {
        self.wrap_counted(open, close).0
    }

    /// Wrapped text and the number of tags placed.
    fn wrap_counted(&self, open: &str, close: &str) -> (String, usize) {
        if self.highlights.is_empty() {
            return (self.text.clone(), 0);
        }

        let mut out = String::with_capacity(self.text.len() + self.highlights.len() * (open.len() + close.len()));
        let mut rest = self.text.as_str();
        let mut placed = 0;

        for tag in &self.highlights {
            let needle = match self.style {
                HighlightStyle::Inline => tag.as_str(),
                HighlightStyle::Placeholder => PLACEHOLDER,
            };
            let found = if needle.is_empty() { None } else { rest.find(needle) };
            let Some(pos) = found else {
                tracing::debug!("highlight '{}' has no match in '{}'", tag, self.text);
                break;
            };
            out.push_str(&rest[..pos]);
            out.push_str(open);
            out.push_str(tag);
            out.push_str(close);
            rest = &rest[pos + needle.len()..];
            placed += 1;
        }
        out.push_str(rest);
        (out, placed)
    }
}

/// Split a game-form highlight column into tags.
///
/// An empty column means no tags. Whitespace around each tag is dropped.
#[must_use]
pub fn parse_highlights(column: &str) -> Vec<String> {
    if column.trim().is_empty() {
        return Vec::new();
    }
    column
        .split(SEPARATOR)
        .map(|tag| tag.trim().to_string())
        .collect()
}

/// Join tags into a game-form highlight column.
#[must_use]
pub fn join_highlights(highlights: &[String]) -> String {
    highlights.join(&SEPARATOR.to_string())
}

/// Number of `{{...}}` groups in portable text.
#[must_use]
pub fn count_markers(portable: &str) -> usize {
    HighlightedText::from_portable(portable, HighlightStyle::Inline)
        .highlights
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholder_round_trip() {
        let game = HighlightedText::from_game("Deals %s damage", "fire", HighlightStyle::Placeholder);
        let portable = game.to_portable();
        assert_eq!(portable, "Deals {{fire}} damage");

        let back = HighlightedText::from_portable(&portable, HighlightStyle::Placeholder);
        assert_eq!(back.text, "Deals %s damage");
        assert_eq!(back.highlights_column(), "fire");
        assert_eq!(
            game.to_display(&DisplayMarkup::default()),
            "Deals <font color=red>fire</font> damage"
        );
    }

    #[test]
    fn test_inline_round_trip() {
        let game = HighlightedText::from_game(
            "Increases speed by 50 su/s and shields by 20%.",
            "50 su/s|20%",
            HighlightStyle::Inline,
        );
        let portable = game.to_portable();
        assert_eq!(portable, "Increases speed by {{50 su/s}} and shields by {{20%}}.");
        assert_eq!(HighlightedText::from_portable(&portable, HighlightStyle::Inline), game);
    }

    #[test]
    fn test_repeated_tags_match_in_order() {
        let game = HighlightedText::from_game("10 then 10 again", "10|10", HighlightStyle::Inline);
        assert_eq!(game.to_portable(), "{{10}} then {{10}} again");
    }

    #[test]
    fn test_empty_highlights_leave_text_verbatim() {
        let game = HighlightedText::from_game("Keeps %s and {{braces}}", "", HighlightStyle::Placeholder);
        assert_eq!(game.to_portable(), "Keeps %s and {{braces}}");
        assert_eq!(game.to_display(&DisplayMarkup::default()), "Keeps %s and {{braces}}");
    }

    #[test]
    fn test_marker_counts_agree() {
        let game = HighlightedText::from_game("a %s b %s c", "x|y", HighlightStyle::Placeholder);
        let markup = DisplayMarkup::new("<b>", "</b>");
        let portable = game.to_portable();
        let display = game.to_display(&markup);
        assert_eq!(count_markers(&portable), 2);
        assert_eq!(display.matches("<b>").count(), 2);
        assert_eq!(game.highlights.len(), 2);
    }

    #[test]
    fn test_unterminated_and_empty_groups_are_literal() {
        let parsed = HighlightedText::from_portable("a {{}} b {{c", HighlightStyle::Inline);
        assert_eq!(parsed.text, "a {{}} b {{c");
        assert!(parsed.highlights.is_empty());
    }

    #[test]
    fn test_non_greedy_scan() {
        let parsed = HighlightedText::from_portable("{{a}} and {{b}}", HighlightStyle::Inline);
        assert_eq!(parsed.highlights, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(parsed.text, "a and b");
    }

    #[test]
    fn test_unmatched_tag_stops_wrapping() {
        let game = HighlightedText::from_game(
            "Boosts Speed greatly for 2 seconds",
            "speed|2 seconds",
            HighlightStyle::Inline,
        );
        assert_eq!(game.to_portable(), "Boosts Speed greatly for 2 seconds");
        assert_eq!(game.unwrapped_highlights(), ["speed", "2 seconds"]);
    }

    #[test]
    fn test_surplus_placeholder_tags_are_kept() {
        let game = HighlightedText::from_game("Deals %s damage", "fire|heat", HighlightStyle::Placeholder);
        assert_eq!(game.highlights, vec!["fire".to_string(), "heat".to_string()]);
        assert_eq!(game.to_portable(), "Deals {{fire}} damage");
        assert_eq!(game.unwrapped_highlights(), ["heat"]);
    }

    #[test]
    fn test_all_tags_placed_leaves_nothing_unwrapped() {
        let game = HighlightedText::from_game("a %s b %s", "x|y", HighlightStyle::Placeholder);
        assert!(game.unwrapped_highlights().is_empty());
    }

    #[test]
    fn test_parse_highlights_trims_entries() {
        assert_eq!(parse_highlights("a | b"), vec!["a".to_string(), "b".to_string()]);
        assert!(parse_highlights("  ").is_empty());
    }
}
