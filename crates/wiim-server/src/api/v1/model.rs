//! Request parameters and response views of the v1 API

use serde::{Deserialize, Serialize};
use wiim_common::WiimError;
use wiim_persistence::{ListOptions, SortOrder, TimelineEntry, entity::record, entity::tag};

/// `count`, `since` and `order` query parameters accepted by list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub count: u64,
    pub since: i32,
    pub order: Option<String>,
}

impl ListParams {
    pub fn options(&self) -> ListOptions {
        ListOptions::new()
            .limit(self.count)
            .since(self.since)
            .order(SortOrder::from_param(self.order.as_deref()))
    }
}

/// Collect the `tags` parameter, given repeated (`tags=1&tags=2`) or comma
/// separated (`tags=1,2`). Returns `None` when the parameter is absent.
pub fn parse_tag_ids(query: &str) -> Result<Option<Vec<i32>>, WiimError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).map_err(|_| WiimError::validation(["tags"]))?;

    let mut present = false;
    let mut ids = Vec::new();
    for (_, value) in pairs.iter().filter(|(key, _)| key == "tags") {
        present = true;
        for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let id = token
                .parse::<i32>()
                .map_err(|_| WiimError::validation(["tags"]))?;
            ids.push(id);
        }
    }

    Ok(present.then_some(ids))
}

/// `{scheme}://{host}/static/icons/96/{icon}.png`
pub fn icon_url(base: &str, icon: &str) -> String {
    format!("{}/static/icons/96/{}.png", base, icon.to_lowercase())
}

/// Tag with its resolved icon image url
#[derive(Clone, Debug, Serialize)]
pub struct TagView {
    #[serde(flatten)]
    pub tag: tag::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl TagView {
    pub fn new(tag: tag::Model, base: &str) -> Self {
        let icon_url = tag
            .icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(|icon| icon_url(base, icon));
        Self { tag, icon_url }
    }

    pub fn from_models(tags: Vec<tag::Model>, base: &str) -> Vec<Self> {
        tags.into_iter().map(|tag| Self::new(tag, base)).collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TimelineView {
    pub tag: TagView,
    pub record: record::Model,
}

impl TimelineView {
    pub fn from_entries(entries: Vec<TimelineEntry>, base: &str) -> Vec<Self> {
        entries
            .into_iter()
            .map(|entry| Self {
                tag: TagView::new(entry.tag, base),
                record: entry.record,
            })
            .collect()
    }
}
