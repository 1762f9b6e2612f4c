//! Unsubscribe table: offset-paginated list, lookup by address, add, remove.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{MessageResponse, MockError};
use crate::extract::{Params, Payload};
use crate::routes::OffsetQuery;
use crate::store::{Record, DEFAULT_LIMIT};
use crate::MockState;

/// Tag recorded when an address unsubscribes from everything.
const ALL_TAGS: &str = "*";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsubscription {
    pub created_at: String,
    pub tags: Vec<String>,
    pub id: String,
    pub address: String,
}

impl Record for Unsubscription {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Unsubscription {
    fn matches(&self, address_or_id: &str) -> bool {
        self.address == address_or_id || self.id == address_or_id
    }
}

#[derive(Debug, Deserialize)]
pub struct AddUnsubscribe {
    #[serde(default)]
    pub address: String,
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub tag: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnsubscribesListResponse {
    pub total_count: usize,
    pub items: Vec<Unsubscription>,
}

pub async fn list_unsubscribes(
    State(state): State<MockState>,
    Path(_domain): Path<String>,
    Params(query): Params<OffsetQuery>,
) -> Json<UnsubscribesListResponse> {
    let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    let unsubscribes = state.unsubscribes.read().await;
    Json(UnsubscribesListResponse {
        total_count: unsubscribes.len(),
        items: unsubscribes.slice(query.skip.unwrap_or(0), limit).to_vec(),
    })
}

pub async fn get_unsubscribes_by_address(
    State(state): State<MockState>,
    Path((_domain, address)): Path<(String, String)>,
) -> Result<Json<UnsubscribesListResponse>, MockError> {
    let unsubscribes = state.unsubscribes.read().await;
    let items: Vec<Unsubscription> = unsubscribes.filter(|u| u.matches(&address)).cloned().collect();
    if items.is_empty() {
        return Err(MockError::NotFound("address not found"));
    }
    Ok(Json(UnsubscribesListResponse {
        total_count: items.len(),
        items,
    }))
}

pub async fn add_unsubscribe(
    State(state): State<MockState>,
    Path(_domain): Path<String>,
    Payload(input): Payload<AddUnsubscribe>,
) -> Result<Json<MessageResponse>, MockError> {
    if input.address.is_empty() {
        return Err(MockError::BadRequest("'address' parameter is required".to_string()));
    }
    let tag = input
        .tag
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| ALL_TAGS.to_string());
    debug!(address = %input.address, %tag, "unsubscribed");
    state.unsubscribes.write().await.push(Unsubscription {
        created_at: Utc::now().to_rfc2822(),
        tags: vec![tag],
        id: Uuid::new_v4().to_string(),
        address: input.address,
    });
    Ok(Json(MessageResponse::new(
        "Address has been added to the unsubscribes table",
    )))
}

pub async fn remove_unsubscribe(
    State(state): State<MockState>,
    Path((_domain, address)): Path<(String, String)>,
    Params(query): Params<RemoveQuery>,
) -> Result<Json<MessageResponse>, MockError> {
    let tag = query.tag.filter(|t| !t.is_empty());
    let removed = state.unsubscribes.write().await.remove_where(|u| {
        u.matches(&address) && tag.as_ref().map_or(true, |tag| u.tags.contains(tag))
    });
    if removed == 0 {
        return Err(MockError::NotFound("address not found"));
    }
    debug!(%address, removed, "unsubscribe removed");
    Ok(Json(MessageResponse::new("Unsubscribe event has been removed")))
}
