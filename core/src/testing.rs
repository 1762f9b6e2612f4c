//! Scripted transport for unit tests: replays queued responses in order and
//! records every request it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<HttpResponse, ApiError>>,
    requests: Vec<HttpRequest>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().responses.push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
    }

    pub(crate) fn fail(&self, err: ApiError) {
        self.inner.lock().unwrap().responses.push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        ctx.check()?;
        let mut script = self.inner.lock().unwrap();
        script.requests.push(request);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response left".to_string())))
    }
}
