//! Route handlers.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;

use crate::http::pages;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::notes::{ChangeEvent, Slug, StoreError};
use crate::observability::metrics;
use crate::security::access_control::admin_key_matches;
use crate::security::headers::client_ip;
use crate::security::limits::markdown_within_limit;

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub key: Option<String>,
}

/// Fields posted by the note form.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub markdown: String,
    pub version: Option<String>,
}

pub async fn index() -> Html<String> {
    Html(pages::index_page())
}

pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(slugs) => Json(serde_json::json!({
            "status": "ok",
            "notes": slugs.len(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed to read notes directory");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

/// Show a note; with a valid admin key, create it first if missing.
pub async fn view_note(
    State(state): State<AppState>,
    Path(raw_slug): Path<String>,
    Query(params): Query<ViewParams>,
) -> Result<Html<String>, ApiError> {
    let slug = Slug::parse(&raw_slug).map_err(|_| ApiError::InvalidSlug)?;

    let note = match state.store.load(&slug).await? {
        Some(note) => note,
        None if admin_key_matches(params.key.as_deref(), &state.admin_key) => {
            state.store.create_default(&slug).await?
        }
        None => return Err(ApiError::NotFound),
    };

    Ok(Html(pages::note_page(&slug, &note)))
}

/// Save new markdown for an existing note.
pub async fn update_note(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(raw_slug): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Form(form): Form<UpdateForm>,
) -> Result<Response, ApiError> {
    let slug = Slug::parse(&raw_slug).map_err(|_| ApiError::InvalidSlug)?;

    if state.store.load(&slug).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let expected_version = match form.version.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ApiError::BadRequest("Invalid version"))?,
    };

    if !markdown_within_limit(&form.markdown, state.max_markdown_chars) {
        return Err(ApiError::TooLarge);
    }

    let saved = state
        .store
        .update(&slug, form.markdown, expected_version)
        .await
        .map_err(|e| {
            if let StoreError::Conflict { current, .. } = &e {
                tracing::info!(slug = %slug, expected_version, current, "Edit rejected, stale version");
                metrics::record_conflict();
            }
            ApiError::from(e)
        })?;

    metrics::record_note_updated();

    let ip = client_ip(&headers, peer, state.trust_forwarded_for);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let event = ChangeEvent::new(
        slug.clone(),
        saved.version,
        Some(ip.to_string()),
        user_agent,
        request_url(&headers, &uri, state.trust_forwarded_for),
    );
    state.notifier.notify(&event);

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, format!("/notes/{}", slug))],
    )
        .into_response())
}

/// Absolute URL of the request as the client addressed it.
fn request_url(headers: &HeaderMap, uri: &Uri, trust_forwarded: bool) -> Option<String> {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok())?;
    let scheme = if trust_forwarded {
        headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http")
    } else {
        "http"
    };
    Some(format!("{}://{}{}", scheme, host, uri))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_url() {
        let mut headers = HeaderMap::new();
        let uri: Uri = "/notes/a".parse().unwrap();
        assert_eq!(request_url(&headers, &uri, false), None);

        headers.insert(header::HOST, HeaderValue::from_static("notes.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(
            request_url(&headers, &uri, false).as_deref(),
            Some("http://notes.example.com/notes/a")
        );
        assert_eq!(
            request_url(&headers, &uri, true).as_deref(),
            Some("https://notes.example.com/notes/a")
        );
    }
}
