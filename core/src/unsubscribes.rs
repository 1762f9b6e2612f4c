//! Unsubscribes: recipients who opted out of mail from the domain.

use serde::{Deserialize, Serialize};

use crate::client::{check_status, decode, MailgunClient, Scope};
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsubscription {
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub id: String,
    pub address: String,
}

/// Request payload for adding an address to the unsubscribe table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUnsubscribe {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnsubscribeList {
    total_count: usize,
    items: Vec<Unsubscription>,
}

impl MailgunClient {
    pub fn build_list_unsubscribes(&self, limit: Option<usize>, skip: Option<usize>) -> Result<HttpRequest, ApiError> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = skip {
            params.push(("skip", skip.to_string()));
        }
        let url = self.endpoint_url(Scope::Domain, &["unsubscribes"], &params)?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    /// Returns the total count and the requested slice. Zero is a valid
    /// list length.
    pub fn parse_list_unsubscribes(&self, response: HttpResponse) -> Result<(usize, Vec<Unsubscription>), ApiError> {
        let list: UnsubscribeList = decode(&response, 200)?;
        Ok((list.total_count, list.items))
    }

    pub fn list_unsubscribes(
        &self,
        ctx: &Context,
        limit: Option<usize>,
        skip: Option<usize>,
    ) -> Result<(usize, Vec<Unsubscription>), ApiError> {
        let response = self.execute(ctx, self.build_list_unsubscribes(limit, skip)?)?;
        self.parse_list_unsubscribes(response)
    }

    pub fn build_get_unsubscribes_by_address(&self, address: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Domain, &["unsubscribes", address], &[])?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    pub fn get_unsubscribes_by_address(
        &self,
        ctx: &Context,
        address: &str,
    ) -> Result<(usize, Vec<Unsubscription>), ApiError> {
        let response = self.execute(ctx, self.build_get_unsubscribes_by_address(address)?)?;
        self.parse_list_unsubscribes(response)
    }

    pub fn build_unsubscribe(&self, input: &AddUnsubscribe) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Domain, &["unsubscribes"], &[])?;
        self.authed_json_request(HttpMethod::Post, url, input)
    }

    /// Add an address to the unsubscribe table, optionally for one tag only.
    pub fn unsubscribe(&self, ctx: &Context, address: &str, tag: Option<&str>) -> Result<(), ApiError> {
        let input = AddUnsubscribe {
            address: address.to_string(),
            tag: tag.map(str::to_string),
        };
        let response = self.execute(ctx, self.build_unsubscribe(&input)?)?;
        check_status(&response, 200)
    }

    pub fn build_remove_unsubscribe(&self, address: &str, tag: Option<&str>) -> Result<HttpRequest, ApiError> {
        let params: Vec<(&str, String)> = tag.map(|t| ("tag", t.to_string())).into_iter().collect();
        let url = self.endpoint_url(Scope::Domain, &["unsubscribes", address], &params)?;
        Ok(self.authed_request(HttpMethod::Delete, url))
    }

    /// Remove an address (or the record with that ID) from the unsubscribe
    /// table.
    pub fn remove_unsubscribe(&self, ctx: &Context, address: &str) -> Result<(), ApiError> {
        let response = self.execute(ctx, self.build_remove_unsubscribe(address, None)?)?;
        check_status(&response, 200)
    }

    /// Remove only the entry for `address` that carries `tag`.
    pub fn remove_unsubscribe_with_tag(&self, ctx: &Context, address: &str, tag: &str) -> Result<(), ApiError> {
        let response = self.execute(ctx, self.build_remove_unsubscribe(address, Some(tag))?)?;
        check_status(&response, 200)
    }
}
