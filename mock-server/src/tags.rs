//! Cursor-paginated tag listing.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{MessageResponse, MockError};
use crate::extract::Params;
use crate::store::{Direction, Record, Window, DEFAULT_LIMIT};
use crate::MockState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "first-seen", default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(rename = "last-seen", default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(tag: &str) -> Self {
        let now = Utc::now();
        Self {
            tag: tag.to_string(),
            description: String::new(),
            first_seen: Some(now),
            last_seen: Some(now),
        }
    }
}

impl Record for Tag {
    fn id(&self) -> &str {
        &self.tag
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub prefix: String,
    pub page: Option<String>,
    pub tag: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub first: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub next: String,
    pub last: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagsResponse {
    pub items: Vec<Tag>,
    pub paging: Paging,
}

fn parse_direction(page: Option<&str>) -> Result<Direction, MockError> {
    match page {
        None | Some("") | Some("next") => Ok(Direction::Next),
        Some("prev") => Ok(Direction::Prev),
        Some("first") => Ok(Direction::First),
        Some("last") => Ok(Direction::Last),
        Some(other) => Err(MockError::BadRequest(format!("invalid 'page' parameter: {other}"))),
    }
}

/// One navigation link: the resource URL with the listing's filters, a
/// direction and, when given, a marker (possibly empty).
fn link(resource: &Url, limit: usize, prefix: &str, page: &str, marker: Option<&str>) -> String {
    let mut url = resource.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("limit", &limit.to_string());
        if !prefix.is_empty() {
            query.append_pair("prefix", prefix);
        }
        query.append_pair("page", page);
        if let Some(marker) = marker {
            query.append_pair("tag", marker);
        }
    }
    url.into()
}

/// `{base}/v3/{domain}/tags`, with the domain escaped as one path segment.
pub fn tags_resource(base_url: &str, domain: &str) -> Result<Url, MockError> {
    let mut url = Url::parse(base_url).map_err(|e| MockError::BadRequest(format!("invalid base url: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| MockError::BadRequest(format!("base url cannot carry a path: {base_url}")))?
        .pop_if_empty()
        .extend(["v3", domain, "tags"]);
    Ok(url)
}

/// Links for a returned window. `next` always carries a marker, cleared when
/// the window reached the end; `previous` is omitted at the start.
pub fn paging_links(resource: &Url, limit: usize, prefix: &str, window: &Window<Tag>) -> Paging {
    Paging {
        first: link(resource, limit, prefix, "first", None),
        previous: window
            .previous
            .as_deref()
            .map(|marker| link(resource, limit, prefix, "prev", Some(marker))),
        next: link(resource, limit, prefix, "next", Some(window.next.as_deref().unwrap_or(""))),
        last: link(resource, limit, prefix, "last", None),
    }
}

pub async fn list_tags(
    State(state): State<MockState>,
    Path(domain): Path<String>,
    Params(query): Params<ListTagsQuery>,
) -> Result<Json<TagsResponse>, MockError> {
    let direction = parse_direction(query.page.as_deref())?;
    let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    let resource = tags_resource(state.base_url(), &domain)?;

    let window = state.tags.read().await.window(
        &query.prefix,
        direction,
        query.tag.as_deref().unwrap_or(""),
        limit,
    );
    debug!(?direction, count = window.items.len(), "listing tags");
    let paging = paging_links(&resource, limit, &query.prefix, &window);
    Ok(Json(TagsResponse {
        items: window.items,
        paging,
    }))
}

pub async fn get_tag(
    State(state): State<MockState>,
    Path((_domain, tag)): Path<(String, String)>,
) -> Result<Json<Tag>, MockError> {
    let tags = state.tags.read().await;
    tags.get(&tag).cloned().map(Json).ok_or(MockError::NotFound("tag not found"))
}

pub async fn delete_tag(
    State(state): State<MockState>,
    Path((_domain, tag)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, MockError> {
    if state.tags.write().await.remove(&tag) {
        debug!(%tag, "tag deleted");
        Ok(Json(MessageResponse::new("Tag deleted")))
    } else {
        Err(MockError::NotFound("tag not found"))
    }
}
