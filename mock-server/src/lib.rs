//! In-memory mock of the Mailgun REST API.
//!
//! Serves tags (cursor pagination), routes and unsubscribes (skip/limit
//! pagination) under `/v3`. State lives for the life of the process and each
//! resource sits behind its own lock, so handlers touching one resource run
//! one at a time.

pub mod error;
pub mod extract;
pub mod routes;
pub mod store;
pub mod tags;
pub mod unsubscribes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub use error::{MessageResponse, MockError};
pub use routes::Route;
pub use store::{Collection, Direction, Record, Window};
pub use tags::{Tag, TagsResponse};
pub use unsubscribes::Unsubscription;

/// Base URL used for paging links when the listen address is unknown.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

pub type Shared<T> = Arc<RwLock<Collection<T>>>;

#[derive(Clone)]
pub struct MockState {
    base_url: Arc<str>,
    pub(crate) tags: Shared<Tag>,
    pub(crate) routes: Shared<Route>,
    pub(crate) unsubscribes: Shared<Unsubscription>,
}

impl MockState {
    /// Fresh state seeded with the sample routes. `base_url` is the scheme
    /// and authority clients reach the server at, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            tags: Arc::new(RwLock::new(Collection::new())),
            routes: Arc::new(RwLock::new(routes::sample_routes())),
            unsubscribes: Arc::new(RwLock::new(Collection::new())),
        }
    }

    /// Replace the tag collection with `names`, in order.
    pub fn with_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags: Collection<Tag> = names.into_iter().map(|name| Tag::new(name.as_ref())).collect();
        self.tags = Arc::new(RwLock::new(tags));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub fn app() -> Router {
    app_with_state(MockState::new(DEFAULT_BASE_URL))
}

pub fn app_with_state(state: MockState) -> Router {
    let api = Router::new()
        .route("/{domain}/tags", get(tags::list_tags))
        .route("/{domain}/tags/{tag}", get(tags::get_tag).delete(tags::delete_tag))
        .route("/routes", get(routes::list_routes).post(routes::create_route))
        .route(
            "/routes/{id}",
            get(routes::get_route)
                .put(routes::update_route)
                .delete(routes::delete_route),
        )
        .route(
            "/{domain}/unsubscribes",
            get(unsubscribes::list_unsubscribes).post(unsubscribes::add_unsubscribe),
        )
        .route(
            "/{domain}/unsubscribes/{address}",
            get(unsubscribes::get_unsubscribes_by_address).delete(unsubscribes::remove_unsubscribe),
        );

    Router::new()
        .nest("/v3", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `listener`, with paging links pointing back at its address.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let state = MockState::new(&format!("http://{}", listener.local_addr()?));
    serve(listener, state).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}
