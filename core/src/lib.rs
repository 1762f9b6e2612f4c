//! Blocking client for the Mailgun REST API.
//!
//! # Overview
//! Every operation comes as a `build_*` / `parse_*` pair over plain-data
//! `HttpRequest` / `HttpResponse` values, plus a wrapper that runs the
//! round-trip through the client's `Transport`. Tag listings are walked with
//! a `PageIterator` that follows the server's navigation links; routes,
//! unsubscribes and bounces use skip/limit offsets instead.
//!
//! # Design
//! - `MailgunClient` owns credentials, endpoint and a shared transport; it
//!   carries no per-call state.
//! - `PageIterator` borrows the client and owns its own page and sticky
//!   error, so independent traversals never interfere.
//! - Every network call takes a `Context` so callers can cancel or bound it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod bounces;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod paging;
pub mod routes;
pub mod stats;
pub mod tags;
pub mod unsubscribes;

#[cfg(test)]
mod testing;

pub use bounces::{Bounce, BounceCode};
pub use client::{MailgunClient, DEFAULT_BASE_URL};
pub use context::{CancelHandle, Context};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use paging::{can_fetch_page, Marker, Page, PageIterator, Paging};
pub use routes::{CreateRoute, Route, UpdateRoute};
pub use stats::{ListStatOptions, Resolution, Stats};
pub use tags::{ListTagOptions, PageDirection, TagItem, TagIterator};
pub use unsubscribes::{AddUnsubscribe, Unsubscription};
