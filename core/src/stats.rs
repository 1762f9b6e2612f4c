//! Domain statistics totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::{decode, MailgunClient, Scope};
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const ISO8601_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    #[serde(default)]
    pub incoming: u64,
    #[serde(default)]
    pub outgoing: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivered {
    #[serde(default)]
    pub smtp: u64,
    #[serde(default)]
    pub http: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temporary {
    #[serde(default)]
    pub espblock: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Permanent {
    #[serde(default)]
    pub suppress_bounce: u64,
    #[serde(default)]
    pub suppress_unsubscribe: u64,
    #[serde(default)]
    pub suppress_complaint: u64,
    #[serde(default)]
    pub bounce: u64,
    #[serde(default)]
    pub delayed_bounce: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failed {
    #[serde(default)]
    pub temporary: Temporary,
    #[serde(default)]
    pub permanent: Permanent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Total {
    #[serde(default)]
    pub total: u64,
}

/// Event counters for one resolution bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub time: String,
    #[serde(default)]
    pub accepted: Accepted,
    #[serde(default)]
    pub delivered: Delivered,
    #[serde(default)]
    pub failed: Failed,
    #[serde(default)]
    pub stored: Total,
    #[serde(default)]
    pub opened: Total,
    #[serde(default)]
    pub clicked: Total,
    #[serde(default)]
    pub unsubscribed: Total,
    #[serde(default)]
    pub complained: Total,
}

#[derive(Debug, Deserialize)]
struct StatsTotalResponse {
    stats: Vec<Stats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hour,
    Day,
    Month,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Hour => "hour",
            Resolution::Day => "day",
            Resolution::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListStatOptions {
    pub resolution: Option<Resolution>,
    /// Period ending now, e.g. `"1m"`; overrides `start` on the server.
    pub duration: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl MailgunClient {
    pub fn build_list_stats(&self, events: &[&str], opts: Option<&ListStatOptions>) -> Result<HttpRequest, ApiError> {
        let mut params = Vec::new();
        if let Some(opts) = opts {
            if let Some(start) = opts.start {
                params.push(("start", start.format(ISO8601_DATE).to_string()));
            }
            if let Some(end) = opts.end {
                params.push(("end", end.format(ISO8601_DATE).to_string()));
            }
            if let Some(resolution) = opts.resolution {
                params.push(("resolution", resolution.as_str().to_string()));
            }
            if let Some(duration) = opts.duration.as_deref().filter(|d| !d.is_empty()) {
                params.push(("duration", duration.to_string()));
            }
        }
        params.extend(events.iter().map(|event| ("event", event.to_string())));
        let url = self.endpoint_url(Scope::Domain, &["stats", "total"], &params)?;
        Ok(self.authed_request(HttpMethod::Get, url))
    }

    pub fn parse_list_stats(&self, response: HttpResponse) -> Result<Vec<Stats>, ApiError> {
        let body: StatsTotalResponse = decode(&response, 200)?;
        Ok(body.stats)
    }

    /// Total stats for the domain over the requested period.
    pub fn list_stats(
        &self,
        ctx: &Context,
        events: &[&str],
        opts: Option<&ListStatOptions>,
    ) -> Result<Vec<Stats>, ApiError> {
        let response = self.execute(ctx, self.build_list_stats(events, opts)?)?;
        self.parse_list_stats(response)
    }
}
