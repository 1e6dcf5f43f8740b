use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::{err, ErrorCode};
use tracing::{debug, warn};

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    debug!(id = %req.id, method = %req.method, "request");

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::student::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::teacher::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::matrix::try_handle(state, &req) {
        return resp;
    }

    warn!(method = %req.method, "unknown method");
    err(
        &req.id,
        ErrorCode::NotImplemented,
        format!("unknown method: {}", req.method),
        None,
    )
}
