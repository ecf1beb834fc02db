use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use message_store::{ContactMessage, StoreError};

use crate::error::ContactError;
use crate::state::ContactState;

/// Create the contact router with all endpoints.
pub fn contact_router(state: Arc<ContactState>) -> Router {
    Router::new()
        .route(
            "/api/contact",
            post(submit_handler).get(list_handler).delete(delete_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    success: bool,
    message: String,
    id: String,
    /// Present only when an email relay is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    email_sent: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    messages: Vec<ContactMessage>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    success: bool,
    message: String,
}

/// Public submission endpoint.
///
/// Validation failures reject with 400 before anything is stored. A
/// store write failure is logged and swallowed; the caller still gets a
/// success response.
async fn submit_handler(
    State(state): State<Arc<ContactState>>,
    headers: HeaderMap,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ContactError> {
    let Json(body) = body.map_err(|_| ContactError::MissingFields)?;
    if body.name.trim().is_empty()
        || body.phone.trim().is_empty()
        || body.message.trim().is_empty()
    {
        return Err(ContactError::MissingFields);
    }

    let mut message = ContactMessage::new(&body.name, &body.phone, &body.message);
    message.ip = Some(header_or_unknown(&headers, "x-forwarded-for"));
    message.user_agent = Some(header_or_unknown(&headers, "user-agent"));

    let stored = match state.store.append(message.clone()).await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("could not persist contact message {}: {}", message.id, e);
            message
        }
    };

    let email_sent = match &state.notifier {
        Some(notifier) => Some(notifier.send(&stored).await),
        None => None,
    };

    tracing::info!("contact message {} received", stored.id);

    Ok(Json(SubmitResponse {
        success: true,
        message: "Message sent successfully".to_string(),
        id: stored.id,
        email_sent,
    }))
}

/// Admin read endpoint: every stored message, newest first.
async fn list_handler(
    State(state): State<Arc<ContactState>>,
    headers: HeaderMap,
) -> Result<Json<MessagesResponse>, ContactError> {
    require_session(&state, &headers)?;

    let mut messages = state.store.list().await.map_err(ContactError::ReadFailed)?;
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(Json(MessagesResponse { messages }))
}

/// Admin delete endpoint: one message when `id` is given, the whole
/// store otherwise.
async fn delete_handler(
    State(state): State<Arc<ContactState>>,
    headers: HeaderMap,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteResponse>, ContactError> {
    require_session(&state, &headers)?;

    let result = match &params.id {
        Some(id) => state.store.delete_by_id(id).await,
        None => state.store.delete_all().await,
    };
    match result {
        Ok(()) => {}
        Err(StoreError::NotFound) => return Err(ContactError::NoStoreFile),
        Err(e) => return Err(ContactError::DeleteFailed(e)),
    }

    let message = if params.id.is_some() {
        "Message deleted successfully"
    } else {
        "All messages deleted successfully"
    };
    Ok(Json(DeleteResponse {
        success: true,
        message: message.to_string(),
    }))
}

fn require_session(state: &ContactState, headers: &HeaderMap) -> Result<(), ContactError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if state.sessions.verify(token).is_some() => Ok(()),
        _ => Err(ContactError::Unauthorized),
    }
}

fn header_or_unknown(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
