use crate::feed::models::Card;
use crate::text_utils::{strip_tags, truncate_display};

/// Visual-width budget for one excerpt, in terminal columns.
pub const EXCERPT_WIDTH_BUDGET: usize = 32;

const UPSTREAM_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lazy digest of one post for listing. Regenerated on every request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    /// 1-based position in the filtered card list.
    pub index: usize,
    /// `YYYY-MM-DD HH:MM:SS`, or the raw upstream string when unparseable.
    pub date: String,
    /// Tag-stripped, newline-flattened text cut at the width budget.
    pub excerpt: String,
}

/// Digest an already-filtered card list into display summaries.
pub fn summarize(cards: &[Card]) -> Vec<PostSummary> {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let blog = card.mblog.as_ref();
            let flat = blog
                .map(|b| strip_tags(&b.text).replace('\n', " "))
                .unwrap_or_default();
            let excerpt = truncate_display(flat.trim(), EXCERPT_WIDTH_BUDGET);
            let date = blog
                .and_then(|b| b.created_at.as_deref())
                .map(reformat_date)
                .unwrap_or_default();
            PostSummary {
                index: i + 1,
                date,
                excerpt,
            }
        })
        .collect()
}

fn reformat_date(raw: &str) -> String {
    chrono::DateTime::parse_from_str(raw, UPSTREAM_DATE_FORMAT).map_or_else(
        |_| raw.to_string(),
        |date| date.format(DISPLAY_DATE_FORMAT).to_string(),
    )
}
