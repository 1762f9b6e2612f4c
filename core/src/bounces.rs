//! Bounces: addresses that hard-bounced, with the SMTP code that caused it.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

use crate::client::{decode, MailgunClient, Scope};
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// The API reports bounce codes either as JSON numbers or as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BounceCode {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounce {
    #[serde(default)]
    pub created_at: String,
    pub code: BounceCode,
    pub address: String,
    #[serde(default)]
    pub error: String,
}

impl Bounce {
    /// The bounce code as an integer, whichever form the server used.
    pub fn code(&self) -> Result<i64, ParseIntError> {
        match &self.code {
            BounceCode::Number(code) => Ok(*code),
            BounceCode::Text(code) => code.parse(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BounceList {
    total_count: usize,
    items: Vec<Bounce>,
}

impl MailgunClient {
    pub fn build_list_bounces(&self, limit: Option<usize>, skip: Option<usize>) -> Result<HttpRequest, ApiError> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = skip {
            params.push(("skip", skip.to_string()));
        }
        let url = self.endpoint_url(Scope::Domain, &["bounces"], &params)?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    pub fn parse_list_bounces(&self, response: HttpResponse) -> Result<(usize, Vec<Bounce>), ApiError> {
        let list: BounceList = decode(&response, 200)?;
        Ok((list.total_count, list.items))
    }

    pub fn list_bounces(
        &self,
        ctx: &Context,
        limit: Option<usize>,
        skip: Option<usize>,
    ) -> Result<(usize, Vec<Bounce>), ApiError> {
        let response = self.execute(ctx, self.build_list_bounces(limit, skip)?)?;
        self.parse_list_bounces(response)
    }

    pub fn build_get_bounce(&self, address: &str) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(Scope::Domain, &["bounces", address], &[])?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    pub fn parse_get_bounce(&self, response: HttpResponse) -> Result<Bounce, ApiError> {
        decode(&response, 200)
    }

    pub fn get_bounce(&self, ctx: &Context, address: &str) -> Result<Bounce, ApiError> {
        let response = self.execute(ctx, self.build_get_bounce(address)?)?;
        self.parse_get_bounce(response)
    }
}
