//! Routes: account-level routing rules, paginated by skip/limit.

use serde::{Deserialize, Serialize};

use crate::client::{check_status, decode, MailgunClient, Scope};
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// A routing rule: when `expression` matches, run `actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub description: String,
    pub expression: String,
    pub actions: Vec<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Request payload for creating a route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
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

/// Request payload for updating a route. Only fields present in the JSON are
/// applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RouteListResponse {
    total_count: usize,
    items: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    route: Route,
}

impl MailgunClient {
    pub fn build_list_routes(&self, skip: Option<usize>, limit: Option<usize>) -> Result<HttpRequest, ApiError> {
        let mut params = Vec::new();
        if let Some(skip) = skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        let url = self.endpoint_url(Scope::Account, &["routes"], &params)?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    /// Returns the total number of routes and the requested slice.
    pub fn parse_list_routes(&self, response: HttpResponse) -> Result<(usize, Vec<Route>), ApiError> {
        let list: RouteListResponse = decode(&response, 200)?;
        Ok((list.total_count, list.items))
    }

    pub fn list_routes(
        &self,
        ctx: &Context,
        skip: Option<usize>,
        limit: Option<usize>,
    ) -> Result<(usize, Vec<Route>), ApiError> {
        let response = self.execute(ctx, self.build_list_routes(skip, limit)?)?;
        self.parse_list_routes(response)
    }

    pub fn build_get_route(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Account, &["routes", id], &[])?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    pub fn parse_get_route(&self, response: HttpResponse) -> Result<Route, ApiError> {
        let body: RouteResponse = decode(&response, 200)?;
        Ok(body.route)
    }

    pub fn get_route(&self, ctx: &Context, id: &str) -> Result<Route, ApiError> {
        let response = self.execute(ctx, self.build_get_route(id)?)?;
        self.parse_get_route(response)
    }

    pub fn build_create_route(&self, input: &CreateRoute) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Account, &["routes"], &[])?;
        self.authed_json_request(HttpMethod::Post, url, input)
    }

    pub fn parse_create_route(&self, response: HttpResponse) -> Result<Route, ApiError> {
        let body: RouteResponse = decode(&response, 200)?;
        Ok(body.route)
    }

    pub fn create_route(&self, ctx: &Context, input: &CreateRoute) -> Result<Route, ApiError> {
        let response = self.execute(ctx, self.build_create_route(input)?)?;
        self.parse_create_route(response)
    }

    pub fn build_update_route(&self, id: &str, input: &UpdateRoute) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Account, &["routes", id], &[])?;
        self.authed_json_request(HttpMethod::Put, url, input)
    }

    pub fn parse_update_route(&self, response: HttpResponse) -> Result<Route, ApiError> {
        decode(&response, 200)
    }

    pub fn update_route(&self, ctx: &Context, id: &str, input: &UpdateRoute) -> Result<Route, ApiError> {
        let response = self.execute(ctx, self.build_update_route(id, input)?)?;
        self.parse_update_route(response)
    }

    pub fn build_delete_route(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Account, &["routes", id], &[])?;
        Ok(self.authed_request(HttpMethod::Delete, url))
    }

    pub fn parse_delete_route(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn delete_route(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        let response = self.execute(ctx, self.build_delete_route(id)?)?;
        self.parse_delete_route(response)
    }
}
