//! Serde models for the mobile feed API's known response shapes.
//!
//! Every leaf is optional: an unexpected or missing field degrades the stage
//! that needed it to an empty result instead of failing the parse.

use serde::Deserialize;

/// Response of the container-index endpoint, with and without a container id.
#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    pub data: Option<IndexData>,
}

#[derive(Debug, Deserialize)]
pub struct IndexData {
    #[serde(rename = "userInfo")]
    pub user_info: Option<UserInfo>,
    #[serde(rename = "tabsInfo")]
    pub tabs_info: Option<TabsInfo>,
    pub cards: Option<Vec<Card>>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub screen_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TabsInfo {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Deserialize)]
pub struct Tab {
    #[serde(rename = "tabKey")]
    pub tab_key: Option<String>,
    pub containerid: Option<String>,
}

/// One feed entry. Only standard posts survive the paginator's filter.
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub card_type: Option<i64>,
    pub itemid: Option<String>,
    pub scheme: Option<String>,
    pub mblog: Option<Blog>,
}

impl Card {
    /// Standard, unpinned post of the plain sub-type.
    #[must_use]
    pub fn is_standard_post(&self) -> bool {
        self.card_type == Some(9)
            && self
                .mblog
                .as_ref()
                .is_some_and(|b| b.is_top.is_none() && b.mblogtype == Some(0))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Blog {
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    pub created_at: Option<String>,
    pub mblogtype: Option<i64>,
    /// Presence alone marks a pinned post; the payload shape is not relied on.
    #[serde(rename = "isTop")]
    pub is_top: Option<serde_json::Value>,
    pub pics: Option<Vec<Pic>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pic {
    pub large: Option<PicVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PicVariant {
    pub url: Option<String>,
}

/// Response of the long-text expansion endpoint.
#[derive(Debug, Deserialize)]
pub struct ExtendResponse {
    pub data: Option<ExtendData>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendData {
    #[serde(rename = "longTextContent")]
    pub long_text_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_standard_post_passes() {
        let c = card(json!({
            "card_type": 9,
            "mblog": {"id": "1", "text": "hi", "mblogtype": 0}
        }));
        assert!(c.is_standard_post());
    }

    #[test]
    fn test_pinned_post_is_excluded() {
        let c = card(json!({
            "card_type": 9,
            "mblog": {"id": "1", "text": "hi", "mblogtype": 0, "isTop": 1}
        }));
        assert!(!c.is_standard_post());
    }

    #[test]
    fn test_non_plain_subtype_is_excluded() {
        let c = card(json!({
            "card_type": 9,
            "mblog": {"id": "1", "text": "hi", "mblogtype": 2}
        }));
        assert!(!c.is_standard_post());
    }

    #[test]
    fn test_other_card_types_are_excluded() {
        let c = card(json!({"card_type": 11}));
        assert!(!c.is_standard_post());
        let c = card(json!({"card_type": 9}));
        assert!(!c.is_standard_post(), "card without mblog is not a post");
    }

    #[test]
    fn test_unknown_is_top_shape_still_marks_pinned() {
        let c = card(json!({
            "card_type": 9,
            "mblog": {"id": "1", "text": "hi", "mblogtype": 0, "isTop": true}
        }));
        assert!(!c.is_standard_post());
    }
}
