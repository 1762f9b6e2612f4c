use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::routes::{CreateRouteResponse, RouteResponse, RoutesListResponse};
use mock_server::unsubscribes::UnsubscribesListResponse;
use mock_server::{app, app_with_state, MessageResponse, MockState, Route, Tag, TagsResponse};
use pretty_assertions::assert_eq;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn delete(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn call(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

fn tag_app(names: &[&str]) -> Router {
    app_with_state(MockState::new("http://mock.test").with_tags(names.iter().copied()))
}

fn values(items: &[Tag]) -> Vec<&str> {
    items.iter().map(|t| t.tag.as_str()).collect()
}

// --- tags ---

#[tokio::test]
async fn list_tags_empty_is_ok_with_no_items() {
    let resp = app()
        .oneshot(get("/v3/example.com/tags"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: TagsResponse = body_json(resp).await;
    assert!(body.items.is_empty());
    assert_eq!(body.paging.previous, None);
    assert_eq!(
        body.paging.next,
        "http://localhost/v3/example.com/tags?limit=100&page=next&tag="
    );
}

#[tokio::test]
async fn list_tags_first_page_links() {
    let resp = tag_app(&["t0", "t1", "t2", "t3", "t4"])
        .oneshot(get("/v3/example.com/tags?limit=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: TagsResponse = body_json(resp).await;
    assert_eq!(values(&body.items), ["t0", "t1"]);
    assert_eq!(body.paging.first, "http://mock.test/v3/example.com/tags?limit=2&page=first");
    assert_eq!(body.paging.previous, None);
    assert_eq!(body.paging.next, "http://mock.test/v3/example.com/tags?limit=2&page=next&tag=t2");
    assert_eq!(body.paging.last, "http://mock.test/v3/example.com/tags?limit=2&page=last");
}

#[tokio::test]
async fn list_tags_follows_markers_both_ways() {
    let mut app = tag_app(&["t0", "t1", "t2", "t3", "t4"]);

    let resp = call(&mut app, get("/v3/example.com/tags?limit=2&page=next&tag=t2")).await;
    let body: TagsResponse = body_json(resp).await;
    assert_eq!(values(&body.items), ["t2", "t3"]);
    assert_eq!(
        body.paging.previous.as_deref(),
        Some("http://mock.test/v3/example.com/tags?limit=2&page=prev&tag=t1")
    );

    let resp = call(&mut app, get("/v3/example.com/tags?limit=2&page=prev&tag=t1")).await;
    let body: TagsResponse = body_json(resp).await;
    assert_eq!(values(&body.items), ["t0", "t1"]);
    assert_eq!(body.paging.previous, None);

    let resp = call(&mut app, get("/v3/example.com/tags?limit=2&page=last")).await;
    let body: TagsResponse = body_json(resp).await;
    assert_eq!(values(&body.items), ["t3", "t4"]);
    assert!(body.paging.next.ends_with("page=next&tag="));
}

#[tokio::test]
async fn list_tags_filters_by_prefix_and_keeps_it_in_links() {
    let resp = tag_app(&["news-1", "promo-1", "news-2", "promo-2"])
        .oneshot(get("/v3/example.com/tags?prefix=promo&limit=1"))
        .await
        .unwrap();
    let body: TagsResponse = body_json(resp).await;
    assert_eq!(values(&body.items), ["promo-1"]);
    assert_eq!(
        body.paging.next,
        "http://mock.test/v3/example.com/tags?limit=1&prefix=promo&page=next&tag=promo-2"
    );
}

#[tokio::test]
async fn list_tags_unknown_marker_is_an_empty_page_not_an_error() {
    let resp = tag_app(&["t0"])
        .oneshot(get("/v3/example.com/tags?page=next&tag=missing"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: TagsResponse = body_json(resp).await;
    assert!(body.items.is_empty());
}

#[tokio::test]
async fn list_tags_invalid_page_returns_400() {
    let resp = app()
        .oneshot(get("/v3/example.com/tags?page=sideways"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert!(body.message.contains("sideways"));
}

#[tokio::test]
async fn list_tags_non_numeric_limit_returns_400() {
    let resp = app()
        .oneshot(get("/v3/example.com/tags?limit=ten"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert!(body.message.contains("limit"), "{}", body.message);
}

#[tokio::test]
async fn list_tags_links_escape_the_domain() {
    let resp = tag_app(&["a", "b"])
        .oneshot(get("/v3/ex%3Fample.com/tags?limit=1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: TagsResponse = body_json(resp).await;
    assert_eq!(values(&body.items), ["a"]);
    assert_eq!(
        body.paging.next,
        "http://mock.test/v3/ex%3Fample.com/tags?limit=1&page=next&tag=b"
    );
    assert_eq!(
        body.paging.first,
        "http://mock.test/v3/ex%3Fample.com/tags?limit=1&page=first"
    );
}

#[tokio::test]
async fn delete_tag_then_get_is_not_found() {
    let mut app = tag_app(&["t0", "t1"]);

    let resp = call(&mut app, get("/v3/example.com/tags/t1")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tag: Tag = body_json(resp).await;
    assert_eq!(tag.tag, "t1");

    let resp = call(&mut app, delete("/v3/example.com/tags/t1")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, get("/v3/example.com/tags/t1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: MessageResponse = body_json(resp).await;
    assert_eq!(body.message, "tag not found");

    let resp = call(&mut app, delete("/v3/example.com/tags/t1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- routes ---

#[tokio::test]
async fn list_routes_returns_seeded_routes() {
    let resp = app().oneshot(get("/v3/routes")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: RoutesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 10);
    assert_eq!(body.items.len(), 10);
    assert_eq!(body.items[0].description, "Sample Route 0");
}

#[tokio::test]
async fn list_routes_clamps_skip_and_limit() {
    let mut app = app();

    let resp = call(&mut app, get("/v3/routes?skip=15&limit=5")).await;
    let body: RoutesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 10);
    assert!(body.items.is_empty());

    let resp = call(&mut app, get("/v3/routes?skip=8&limit=5")).await;
    let body: RoutesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 10);
    assert_eq!(body.items.len(), 2);
    assert_eq!(body.items[1].description, "Sample Route 9");
}

#[tokio::test]
async fn create_route_without_actions_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/v3/routes", r#"{"expression":"catch_all()"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert_eq!(body.message, "'action' parameter is required");
}

#[tokio::test]
async fn create_route_malformed_json_returns_400_message() {
    let resp = app()
        .oneshot(json_request("POST", "/v3/routes", r#"{"priority": "high""#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert!(!body.message.is_empty());
}

#[tokio::test]
async fn update_route_wrong_field_type_returns_400_message() {
    let resp = app()
        .oneshot(json_request("PUT", "/v3/routes/ID-unknown", r#"{"priority":"high"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert!(body.message.contains("priority"), "{}", body.message);
}

#[tokio::test]
async fn list_routes_non_numeric_skip_returns_400_message() {
    let resp = app().oneshot(get("/v3/routes?skip=-1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert!(body.message.contains("skip"), "{}", body.message);
}

#[tokio::test]
async fn get_route_not_found() {
    let resp = app().oneshot(get("/v3/routes/ID-missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: MessageResponse = body_json(resp).await;
    assert_eq!(body.message, "route not found");
}

#[tokio::test]
async fn update_route_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/v3/routes/ID-missing", r#"{"priority":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_route_leaves_collection_alone() {
    let mut app = app();

    let resp = call(&mut app, delete("/v3/routes/ID-missing")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(&mut app, get("/v3/routes")).await;
    let body: RoutesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 10);
}

#[tokio::test]
async fn route_crud_lifecycle() {
    let mut app = app();

    // create
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/v3/routes",
            r#"{"priority":1,"description":"fwd","expression":"catch_all()","actions":["stop()"]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: CreateRouteResponse = body_json(resp).await;
    assert_eq!(created.message, "Route has been created");
    let id = created.route.id.clone();

    let resp = call(&mut app, get("/v3/routes")).await;
    let body: RoutesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 11);

    // update one field only
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/v3/routes/{id}"), r#"{"description":"renamed"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Route = body_json(resp).await;
    assert_eq!(
        updated,
        Route {
            description: "renamed".to_string(),
            ..created.route.clone()
        }
    );

    // get reflects exactly that change
    let resp = call(&mut app, get(&format!("/v3/routes/{id}"))).await;
    let fetched: RouteResponse = body_json(resp).await;
    assert_eq!(fetched.route, updated);

    // delete, then get is not found
    let resp = call(&mut app, delete(&format!("/v3/routes/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: MessageResponse = body_json(resp).await;
    assert_eq!(body.message, "success");

    let resp = call(&mut app, get(&format!("/v3/routes/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(&mut app, get("/v3/routes")).await;
    let body: RoutesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 10);
}

// --- unsubscribes ---

#[tokio::test]
async fn add_unsubscribe_requires_address() {
    let resp = app()
        .oneshot(json_request("POST", "/v3/example.com/unsubscribes", r#"{"tag":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert_eq!(body.message, "'address' parameter is required");
}

#[tokio::test]
async fn add_unsubscribe_without_json_content_type_returns_400_message() {
    let request = Request::builder()
        .method("POST")
        .uri("/v3/example.com/unsubscribes")
        .body(r#"{"address":"bob@example.com"}"#.to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = body_json(resp).await;
    assert!(body.message.contains("Content-Type"), "{}", body.message);
}

#[tokio::test]
async fn unsubscribe_lifecycle() {
    let mut app = app();

    for body in [
        r#"{"address":"bob@example.com","tag":"promo"}"#,
        r#"{"address":"bob@example.com"}"#,
        r#"{"address":"ann@example.com"}"#,
    ] {
        let resp = call(&mut app, json_request("POST", "/v3/example.com/unsubscribes", body)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = call(&mut app, get("/v3/example.com/unsubscribes?limit=2&skip=2")).await;
    let body: UnsubscribesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 3);
    assert_eq!(body.items.len(), 1);
    assert_eq!(body.items[0].address, "ann@example.com");

    let resp = call(&mut app, get("/v3/example.com/unsubscribes/bob@example.com")).await;
    let body: UnsubscribesListResponse = body_json(resp).await;
    assert_eq!(body.total_count, 2);

    // Removing by tag leaves the catch-all entry.
    let resp = call(&mut app, delete("/v3/example.com/unsubscribes/bob@example.com?tag=promo")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = call(&mut app, get("/v3/example.com/unsubscribes/bob@example.com")).await;
    let body: UnsubscribesListResponse = body_json(resp).await;
    assert_eq!(body.items.len(), 1);
    assert_eq!(body.items[0].tags, vec!["*".to_string()]);

    let resp = call(&mut app, delete("/v3/example.com/unsubscribes/bob@example.com")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = call(&mut app, get("/v3/example.com/unsubscribes/bob@example.com")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = call(&mut app, delete("/v3/example.com/unsubscribes/bob@example.com")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
