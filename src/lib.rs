//! Weibo feed fetcher library.
//!
//! Fetches an account's feed from the mobile API, produces truncated post
//! summaries for listing, resolves one post's full content with cached media
//! downloads, and merges 9/6-grid photo posts into a single composite image.

pub mod config;
pub mod constants;
pub mod feed;
pub mod grid;
pub mod media_cache;
pub mod text_utils;
