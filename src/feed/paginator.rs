use serde::de::DeserializeOwned;
use tracing::debug;

use crate::feed::account::FeedAccount;
use crate::feed::models::{Card, IndexResponse};

/// Key of the tab whose container holds the account's posts.
const POSTS_TAB_KEY: &str = "weibo";

/// Fetch the account's filtered card list, in upstream (reverse-chronological)
/// order.
///
/// Two container-index round trips: the first discovers the posts tab and
/// carries the profile used to memoize the display name, the second pages the
/// discovered container. Accounts without a posts tab, transport failures,
/// and shape mismatches all degrade to an empty list.
pub async fn list_cards(client: &reqwest::Client, account: &mut FeedAccount) -> Vec<Card> {
    let Some(index) = fetch_index(client, account, None).await else {
        return Vec::new();
    };
    let Some(data) = index.data else {
        return Vec::new();
    };

    if let Some(name) = data.user_info.as_ref().and_then(|u| u.screen_name.as_deref()) {
        account.memoize_display_name(name);
    }

    let Some(tabs_info) = data.tabs_info else {
        debug!(
            account = account.account_id(),
            "no tabs on account index, treating as empty feed"
        );
        return Vec::new();
    };
    let Some(container_id) = tabs_info
        .tabs
        .iter()
        .find(|tab| tab.tab_key.as_deref() == Some(POSTS_TAB_KEY))
        .and_then(|tab| tab.containerid.clone())
    else {
        debug!(account = account.account_id(), "account has no posts tab");
        return Vec::new();
    };

    let Some(listing) = fetch_index(client, account, Some(&container_id)).await else {
        return Vec::new();
    };
    listing
        .data
        .and_then(|data| data.cards)
        .unwrap_or_default()
        .into_iter()
        .filter(Card::is_standard_post)
        .collect()
}

async fn fetch_index(
    client: &reqwest::Client,
    account: &FeedAccount,
    container_id: Option<&str>,
) -> Option<IndexResponse> {
    fetch_json(client, &account.index_url(container_id), account).await
}

/// GET a JSON endpoint with the account's headers; any failure becomes `None`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    account: &FeedAccount,
) -> Option<T> {
    let response = match client
        .get(url)
        .headers(account.headers().clone())
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            debug!(error = %e, %url, "feed request failed");
            return None;
        }
    };
    if !response.status().is_success() {
        debug!(status = %response.status(), %url, "feed request returned non-success");
        return None;
    }
    match response.json::<T>().await {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(error = %e, %url, "feed response did not match the expected shape");
            None
        }
    }
}
