use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT,
};

use crate::config::Settings;
use crate::constants::{FALLBACK_USER_AGENT, USER_AGENT_POOL};

/// One tracked feed account.
///
/// Owns the request header set and the lazily memoized display name. The
/// name is resolved from the first container-index response that carries it
/// and kept for the lifetime of the instance unless explicitly invalidated,
/// so two accounts never share name state.
#[derive(Debug, Clone)]
pub struct FeedAccount {
    account_id: String,
    headers: HeaderMap,
    display_name: Option<String>,
    settings: Settings,
}

impl FeedAccount {
    #[must_use]
    pub fn new(account_id: impl Into<String>, settings: &Settings) -> Self {
        let account_id = account_id.into();
        let headers = build_headers(&account_id, settings.user_agent.as_deref());
        Self {
            account_id,
            headers,
            display_name: None,
            settings: settings.clone(),
        }
    }

    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Memoized display name; empty until a container-index response
    /// carrying it has been seen.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    /// Drop the memoized display name so the next listing resolves it again.
    pub fn invalidate_display_name(&mut self) {
        self.display_name = None;
    }

    pub(crate) fn memoize_display_name(&mut self, name: &str) {
        if self.display_name.is_none() && !name.is_empty() {
            self.display_name = Some(name.to_string());
        }
    }

    /// Container-index URL, optionally scoped to one container.
    pub(crate) fn index_url(&self, container_id: Option<&str>) -> String {
        let mut url = format!(
            "{}/api/container/getIndex?type=uid&uid={}&value={}",
            self.settings.api_base, self.account_id, self.account_id
        );
        if let Some(cid) = container_id {
            url.push_str("&containerid=");
            url.push_str(cid);
        }
        url
    }

    /// Long-text expansion URL for one post.
    pub(crate) fn extend_url(&self, blog_id: &str) -> String {
        format!("{}/statuses/extend?id={}", self.settings.api_base, blog_id)
    }
}

fn build_headers(account_id: &str, fixed_user_agent: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let user_agent = fixed_user_agent.map_or_else(
        || {
            USER_AGENT_POOL
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(FALLBACK_USER_AGENT)
                .to_string()
        },
        str::to_owned,
    );
    if let Ok(value) = HeaderValue::from_str(&user_agent) {
        headers.insert(USER_AGENT, value);
    }

    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("https://m.weibo.cn/u/{account_id}")) {
        headers.insert(REFERER, value);
    }
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));

    headers
}
