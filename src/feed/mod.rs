//! Feed retrieval pipeline for a single tracked account.
//!
//! Stages, in control-flow order: [`paginator`] resolves the account's post
//! container and filters its card list, [`summary`] digests cards for
//! listing, and [`resolver`] expands one post's full text and media. Media
//! downloads go through [`crate::media_cache`] and still-image lists through
//! [`crate::grid`].

mod account;
pub mod models;
mod paginator;
mod resolver;
mod summary;

pub use account::FeedAccount;
pub use paginator::list_cards;
pub use resolver::{post_item_id, resolve, PostContent};
pub use summary::{summarize, PostSummary, EXCERPT_WIDTH_BUDGET};
