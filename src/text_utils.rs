//! Text primitives shared by the summarizer and the content resolver.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use unicode_width::UnicodeWidthChar;

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").unwrap());

/// Marker appended when an excerpt is cut at the width budget.
pub const ELLIPSIS: &str = "...";

/// Strip all markup from a fragment, keeping the text content.
///
/// Entities are decoded along the way (`&amp;` becomes `&`).
pub fn strip_tags(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

/// Replace `<br>` variants with newlines so markup stripping keeps line structure.
pub fn breaks_to_newlines(html: &str) -> String {
    BR_TAG.replace_all(html, "\n").into_owned()
}

/// Visual width of a string in terminal columns; full-width characters count two.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Cut `text` once its visual width fills `budget`, appending [`ELLIPSIS`].
///
/// A character that would push past the budget is not included, so the kept
/// content never exceeds `budget` columns. Text that fits under the budget is
/// returned verbatim.
pub fn truncate_display(text: &str, budget: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            out.push_str(ELLIPSIS);
            return out;
        }
        out.push(c);
        used += w;
        if used == budget {
            out.push_str(ELLIPSIS);
            return out;
        }
    }
    out
}
