//! Tags: the cursor-paginated resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{check_status, decode, MailgunClient, Scope};
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::paging::{PageIterator, MARKER_PARAM, PAGE_PARAM};

/// A tag and its activity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagItem {
    #[serde(rename = "tag")]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "first-seen", default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(rename = "last-seen", default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl TagItem {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            description: String::new(),
            first_seen: None,
            last_seen: None,
        }
    }
}

/// Direction of a tag listing relative to the `tag` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    First,
    Last,
    Next,
    Prev,
}

impl PageDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            PageDirection::First => "first",
            PageDirection::Last => "last",
            PageDirection::Next => "next",
            PageDirection::Prev => "prev",
        }
    }
}

/// Options for `MailgunClient::list_tags`. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListTagOptions {
    /// Page size.
    pub limit: Option<u32>,
    /// Only tags starting with this prefix.
    pub prefix: Option<String>,
    /// Direction relative to `tag`, for resuming a traversal.
    pub page: Option<PageDirection>,
    /// The tag the `page` direction pivots on.
    pub tag: Option<String>,
}

pub type TagIterator<'c> = PageIterator<'c, TagItem>;

impl MailgunClient {
    /// Start a traversal of the domain's tags. No request is made until the
    /// first call on the returned iterator.
    pub fn list_tags(&self, opts: Option<&ListTagOptions>) -> TagIterator<'_> {
        PageIterator::new(self, self.list_tags_url(opts))
    }

    pub fn build_list_tags(&self, opts: Option<&ListTagOptions>) -> Result<HttpRequest, ApiError> {
        Ok(self.authed_request(HttpMethod::Get, self.list_tags_url(opts)?))
    }

    fn list_tags_url(&self, opts: Option<&ListTagOptions>) -> Result<String, ApiError> {
        let mut params = Vec::new();
        if let Some(opts) = opts {
            if let Some(limit) = opts.limit.filter(|l| *l != 0) {
                params.push(("limit", limit.to_string()));
            }
            if let Some(prefix) = opts.prefix.as_deref().filter(|p| !p.is_empty()) {
                params.push(("prefix", prefix.to_string()));
            }
            if let Some(page) = opts.page {
                params.push((PAGE_PARAM, page.as_str().to_string()));
            }
            if let Some(tag) = opts.tag.as_deref().filter(|t| !t.is_empty()) {
                params.push((MARKER_PARAM, tag.to_string()));
            }
        }
        self.endpoint_url(Scope::Domain, &["tags"], &params)
    }

    pub fn build_get_tag(&self, tag: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Domain, &["tags", tag], &[])?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    pub fn parse_get_tag(&self, response: HttpResponse) -> Result<TagItem, ApiError> {
        decode(&response, 200)
    }

    /// Retrieve metadata about a single tag.
    pub fn get_tag(&self, ctx: &Context, tag: &str) -> Result<TagItem, ApiError> {
        let response = self.execute(ctx, self.build_get_tag(tag)?)?;
        self.parse_get_tag(response)
    }

    pub fn build_delete_tag(&self, tag: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Domain, &["tags", tag], &[])?;
        Ok(self.authed_request(HttpMethod::Delete, url))
    }

    pub fn parse_delete_tag(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    /// Remove a tag together with all of its counters.
    pub fn delete_tag(&self, ctx: &Context, tag: &str) -> Result<(), ApiError> {
        let response = self.execute(ctx, self.build_delete_tag(tag)?)?;
        self.parse_delete_tag(response)
    }
}
