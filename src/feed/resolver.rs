use std::path::PathBuf;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::feed::account::FeedAccount;
use crate::feed::models::{Card, ExtendResponse};
use crate::feed::paginator::{self, fetch_json};
use crate::grid;
use crate::media_cache::{self, MediaCache};
use crate::text_utils::{breaks_to_newlines, strip_tags};

/// Fully resolved post: expanded plain text plus downloaded media.
///
/// `pics_list`/`pics_urls` and `gif_list`/`gif_urls` are parallel; ordering
/// matches the upstream post's media ordering, except that a merged grid
/// replaces its consumed prefix in `pics_list` only.
#[derive(Debug, Clone, Default)]
pub struct PostContent {
    pub user_name: String,
    pub text: String,
    pub detail_url: String,
    pub pics_list: Vec<PathBuf>,
    pub pics_urls: Vec<String>,
    pub gif_list: Vec<PathBuf>,
    pub gif_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Still,
    Animated,
}

/// Resolve one post of the account's current feed by its 1-based listing
/// index; out-of-range indexes clamp to the last post.
///
/// The card list is re-fetched, so the feed state may differ from an earlier
/// listing. `None` means the feed is empty or the long-text expansion could
/// not be obtained; failed media downloads are dropped silently instead.
pub async fn resolve(
    client: &reqwest::Client,
    account: &mut FeedAccount,
    cache: &MediaCache,
    index: usize,
) -> Option<PostContent> {
    let cards = paginator::list_cards(client, account).await;
    let card = pick_card(&cards, index)?;
    let blog = card.mblog.as_ref()?;
    let blog_id = blog.id.as_deref()?;

    let expanded = fetch_long_text(client, account, blog_id).await?;
    let text = strip_tags(&breaks_to_newlines(&expanded));

    let mut content = PostContent {
        user_name: account.display_name().to_string(),
        text: text.trim_matches('\n').to_string(),
        detail_url: card.scheme.clone().unwrap_or_default(),
        ..PostContent::default()
    };

    let entries: Vec<(MediaKind, String)> = blog
        .pics
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|pic| pic.large.as_ref().and_then(|large| large.url.clone()))
        .filter_map(|url| match classify(&url) {
            MediaKind::Animated if !account.settings().send_gif => {
                debug!(%url, "animated media skipped, forwarding disabled");
                None
            }
            kind => Some((kind, url)),
        })
        .collect();

    // Downloads run concurrently; zipping keeps results in upstream media
    // order regardless of completion order.
    let downloads = join_all(
        entries
            .iter()
            .map(|(_, url)| cache.fetch_or_get(client, url, account.headers())),
    )
    .await;
    for ((kind, url), path) in entries.into_iter().zip(downloads) {
        let Some(path) = path else {
            warn!(%url, "media download failed, dropping attachment");
            continue;
        };
        match kind {
            MediaKind::Still => {
                content.pics_list.push(path);
                content.pics_urls.push(url);
            }
            MediaKind::Animated => {
                content.gif_list.push(path);
                content.gif_urls.push(url);
            }
        }
    }

    if !content.pics_list.is_empty() {
        content.pics_list =
            merge_grid(content.pics_list, cache, account.account_id()).await;
    }

    Some(content)
}

/// Upstream item id of the post at the clamped 1-based index, for pollers
/// tracking which posts they have already forwarded.
pub async fn post_item_id(
    client: &reqwest::Client,
    account: &mut FeedAccount,
    index: usize,
) -> Option<String> {
    let cards = paginator::list_cards(client, account).await;
    pick_card(&cards, index)?.itemid.clone()
}

fn pick_card(cards: &[Card], index: usize) -> Option<&Card> {
    let last = cards.len().checked_sub(1)?;
    cards.get(index.saturating_sub(1).min(last))
}

async fn fetch_long_text(
    client: &reqwest::Client,
    account: &FeedAccount,
    blog_id: &str,
) -> Option<String> {
    let url = account.extend_url(blog_id);
    let response: ExtendResponse = fetch_json(client, &url, account).await?;
    response.data.and_then(|data| data.long_text_content)
}

fn classify(url: &str) -> MediaKind {
    let name = media_cache::filename_from_url(url).unwrap_or_default();
    if mime_guess::from_path(&name).first_or_octet_stream() == mime_guess::mime::IMAGE_GIF {
        MediaKind::Animated
    } else {
        MediaKind::Still
    }
}

/// Grid composition decodes and pastes pixels; run it off the async
/// executor so unrelated requests keep making progress.
async fn merge_grid(paths: Vec<PathBuf>, cache: &MediaCache, account_id: &str) -> Vec<PathBuf> {
    let dir = cache.dir().to_path_buf();
    let id = account_id.to_string();
    let original = paths.clone();
    match tokio::task::spawn_blocking(move || grid::reconstruct(&paths, &dir, &id)).await {
        Ok(merged) => merged,
        Err(e) => {
            warn!(error = %e, "grid merge task failed, keeping original attachments");
            original
        }
    }
}
