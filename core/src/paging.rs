//! Cursor pagination over server-supplied navigation links.
//!
//! # Design
//! A list endpoint answers with an envelope of items plus four opaque links
//! (`first`, `previous`, `next`, `last`). `PageIterator` keeps the most
//! recent envelope and walks the collection by fetching one of those links
//! per call. Whether `next`/`previous` may be fetched is decided by the
//! marker query parameter alone:
//!
//! | marker in link     | fetchable |
//! |--------------------|-----------|
//! | absent             | yes (first step of a traversal) |
//! | present, empty     | no (server cleared it: nothing further) |
//! | present, non-empty | yes |
//! | link unparsable    | no |
//!
//! The first failure is kept as a sticky error: every later call returns
//! `false` without issuing a request. Running out of pages is not an error,
//! so callers check `err()` after the loop to tell "done" from "failed".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::client::{decode, MailgunClient};
use crate::context::Context;
use crate::error::ApiError;
use crate::http::HttpMethod;

/// Query parameter carrying the cursor position.
pub const MARKER_PARAM: &str = "tag";

/// Query parameter carrying the traversal direction (`first`, `last`,
/// `next`, `prev`).
pub const PAGE_PARAM: &str = "page";

/// Navigation links embedded in every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub first: String,
    /// Empty at the start of the collection.
    #[serde(default)]
    pub previous: String,
    pub next: String,
    pub last: String,
}

/// One page of a cursor-paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub paging: Paging,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paging: Paging::default(),
        }
    }
}

/// State of the marker parameter in a link. Absent and empty are distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Absent,
    Empty,
    Value(String),
}

impl Marker {
    /// Read `param` from the query of `link`; `None` if the link is not a URL.
    pub fn from_link(link: &str, param: &str) -> Option<Self> {
        let url = Url::parse(link).ok()?;
        let value = url
            .query_pairs()
            .find(|(key, _)| key == param)
            .map(|(_, value)| value.into_owned());
        Some(match value {
            None => Marker::Absent,
            Some(value) if value.is_empty() => Marker::Empty,
            Some(value) => Marker::Value(value),
        })
    }
}

/// Whether a `next`/`previous` link may be fetched.
pub fn can_fetch_page(link: &str) -> bool {
    match Marker::from_link(link, MARKER_PARAM) {
        Some(Marker::Absent | Marker::Value(_)) => true,
        Some(Marker::Empty) | None => false,
    }
}

/// The `last` link for a traversal starting at `initial`: same filters, no
/// marker, `page=last`.
fn last_link(initial: &str) -> Result<String, ApiError> {
    let mut url = Url::parse(initial)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != MARKER_PARAM && key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(PAGE_PARAM, "last");
    Ok(url.into())
}

/// Bidirectional iterator over a cursor-paginated collection.
///
/// ```no_run
/// # use mailgun_core::{Context, MailgunClient, TagItem};
/// let client = MailgunClient::new("example.com", "key");
/// let ctx = Context::background();
/// let mut it = client.list_tags(None);
/// let mut page: Vec<TagItem> = Vec::new();
/// while it.next_page(&ctx, &mut page) {
///     for tag in &page {
///         println!("{}", tag.value);
///     }
/// }
/// if let Some(err) = it.err() {
///     eprintln!("listing failed: {err}");
/// }
/// ```
///
/// Not meant to be shared between threads; each traversal owns its iterator.
#[derive(Debug)]
pub struct PageIterator<'c, T> {
    client: &'c MailgunClient,
    page: Page<T>,
    err: Option<ApiError>,
}

impl<'c, T> PageIterator<'c, T>
where
    T: DeserializeOwned + Clone,
{
    /// An unfetched iterator positioned before `initial`. A URL that failed
    /// to build becomes the sticky error.
    pub(crate) fn new(client: &'c MailgunClient, initial: Result<String, ApiError>) -> Self {
        let paging = initial.and_then(|url| {
            let last = last_link(&url)?;
            Ok(Paging {
                first: url.clone(),
                previous: String::new(),
                next: url,
                last,
            })
        });
        match paging {
            Ok(paging) => Self {
                client,
                page: Page {
                    items: Vec::new(),
                    paging,
                },
                err: None,
            },
            Err(err) => Self {
                client,
                page: Page::default(),
                err: Some(err),
            },
        }
    }

    /// Fetch the next page into `out`.
    ///
    /// Returns `false` at the end of the collection, on an empty page, or on
    /// error (see `err()`).
    pub fn next_page(&mut self, ctx: &Context, out: &mut Vec<T>) -> bool {
        if self.err.is_some() {
            return false;
        }
        let link = self.page.paging.next.clone();
        if !can_fetch_page(&link) {
            debug!(%link, "no next page");
            return false;
        }
        self.fetch_into(ctx, &link, out) && !out.is_empty()
    }

    /// Fetch the previous page into `out`.
    ///
    /// Returns `false` at the start of the collection without a request.
    pub fn previous_page(&mut self, ctx: &Context, out: &mut Vec<T>) -> bool {
        if self.err.is_some() {
            return false;
        }
        let link = self.page.paging.previous.clone();
        if link.is_empty() || !can_fetch_page(&link) {
            debug!(%link, "no previous page");
            return false;
        }
        self.fetch_into(ctx, &link, out) && !out.is_empty()
    }

    /// Fetch the first page into `out`. Always attempted.
    pub fn first_page(&mut self, ctx: &Context, out: &mut Vec<T>) -> bool {
        if self.err.is_some() {
            return false;
        }
        let link = self.page.paging.first.clone();
        self.fetch_into(ctx, &link, out)
    }

    /// Fetch the last page into `out`. Always attempted.
    pub fn last_page(&mut self, ctx: &Context, out: &mut Vec<T>) -> bool {
        if self.err.is_some() {
            return false;
        }
        let link = self.page.paging.last.clone();
        self.fetch_into(ctx, &link, out)
    }

    /// The error that stopped the traversal, if any.
    pub fn err(&self) -> Option<&ApiError> {
        self.err.as_ref()
    }

    /// Links of the most recently fetched page.
    pub fn paging(&self) -> &Paging {
        &self.page.paging
    }

    /// Items of the most recently fetched page.
    pub fn items(&self) -> &[T] {
        &self.page.items
    }

    /// Replace the current envelope with the one at `link`; `out` is only
    /// written on success.
    fn fetch_into(&mut self, ctx: &Context, link: &str, out: &mut Vec<T>) -> bool {
        let request = self.client.authed_request(HttpMethod::Get, link.to_string());
        let result = self
            .client
            .execute(ctx, request)
            .and_then(|response| decode::<Page<T>>(&response, 200));
        match result {
            Ok(page) => {
                self.page = page;
                out.clone_from(&self.page.items);
                true
            }
            Err(err) => {
                warn!(%link, error = %err, "page fetch failed");
                self.err = Some(err);
                false
            }
        }
    }
}
