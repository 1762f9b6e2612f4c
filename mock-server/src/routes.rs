//! Routes: offset-paginated CRUD.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{MessageResponse, MockError};
use crate::extract::{Params, Payload};
use crate::store::{Collection, Record, DEFAULT_LIMIT};
use crate::MockState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub priority: i32,
    pub description: String,
    pub expression: String,
    pub actions: Vec<String>,
    pub created_at: String,
}

impl Record for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoute {
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoute {
    pub priority: Option<i32>,
    pub description: Option<String>,
    pub expression: Option<String>,
    pub actions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct OffsetQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutesListResponse {
    pub total_count: usize,
    pub items: Vec<Route>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub route: Route,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRouteResponse {
    pub message: String,
    pub route: Route,
}

fn new_route_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("ID-{}", &id[..10])
}

/// Ten routes every fresh mock starts with.
pub fn sample_routes() -> Collection<Route> {
    (0..10)
        .map(|i| Route {
            id: new_route_id(),
            priority: 0,
            description: format!("Sample Route {i}"),
            expression: r#"match_recipient(".*@samples.mailgun.org")"#.to_string(),
            actions: vec![
                r#"forward("http://myhost.com/messages/")"#.to_string(),
                "stop()".to_string(),
            ],
            created_at: Utc::now().to_rfc2822(),
        })
        .collect()
}

pub async fn list_routes(
    State(state): State<MockState>,
    Params(query): Params<OffsetQuery>,
) -> Json<RoutesListResponse> {
    let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    let routes = state.routes.read().await;
    Json(RoutesListResponse {
        total_count: routes.len(),
        items: routes.slice(query.skip.unwrap_or(0), limit).to_vec(),
    })
}

pub async fn get_route(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<Json<RouteResponse>, MockError> {
    let routes = state.routes.read().await;
    routes
        .get(&id)
        .cloned()
        .map(|route| Json(RouteResponse { route }))
        .ok_or(MockError::NotFound("route not found"))
}

pub async fn create_route(
    State(state): State<MockState>,
    Payload(input): Payload<CreateRoute>,
) -> Result<Json<CreateRouteResponse>, MockError> {
    if input.actions.is_empty() {
        return Err(MockError::BadRequest("'action' parameter is required".to_string()));
    }
    let route = Route {
        id: new_route_id(),
        priority: input.priority,
        description: input.description,
        expression: input.expression,
        actions: input.actions,
        created_at: Utc::now().to_rfc2822(),
    };
    debug!(id = %route.id, "route created");
    state.routes.write().await.push(route.clone());
    Ok(Json(CreateRouteResponse {
        message: "Route has been created".to_string(),
        route,
    }))
}

pub async fn update_route(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Payload(input): Payload<UpdateRoute>,
) -> Result<Json<Route>, MockError> {
    let mut routes = state.routes.write().await;
    let route = routes.get_mut(&id).ok_or(MockError::NotFound("route not found"))?;
    if let Some(priority) = input.priority {
        route.priority = priority;
    }
    if let Some(description) = input.description {
        route.description = description;
    }
    if let Some(expression) = input.expression {
        route.expression = expression;
    }
    if let Some(actions) = input.actions.filter(|a| !a.is_empty()) {
        route.actions = actions;
    }
    Ok(Json(route.clone()))
}

pub async fn delete_route(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, MockError> {
    if state.routes.write().await.remove(&id) {
        debug!(%id, "route deleted");
        Ok(Json(MessageResponse::new("success")))
    } else {
        Err(MockError::NotFound("route not found"))
    }
}
