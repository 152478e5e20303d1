use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Form, Json, Router,
    extract::{FromRequest, Multipart, Request, State, multipart::MultipartError},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
    routing::get,
};
use medibot_rag::Query;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::{error::ChatError, state::AppState};

/// Body of a `/get` request.
///
/// Read from a `multipart/form-data` body, a url-encoded body, or for `GET`
/// the query string. A form that cannot be read at all counts as missing `msg`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatForm {
    pub msg: Option<String>,
}

impl ChatForm {
    /// The question carried by the form, if the `msg` field was sent.
    pub fn into_query(self) -> Option<Query> {
        self.msg.map(|text| Query { text })
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        while let Some(field) = multipart.next_field().await? {
            if field.name() == Some("msg") {
                return Ok(Self { msg: Some(field.text().await?) });
            }
        }
        Ok(Self::default())
    }
}

impl<S> FromRequest<S> for ChatForm
where
    S: Send + Sync,
{
    type Rejection = ChatError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let unreadable = |rejection: &dyn std::fmt::Display| {
            warn!(%rejection, "unreadable chat form");
            ChatError::MissingParameter { name: "msg" }
        };

        if is_multipart {
            let multipart =
                Multipart::from_request(req, state).await.map_err(|e| unreadable(&e))?;
            return Self::from_multipart(multipart).await.map_err(|e| unreadable(&e));
        }

        let Form(form) = Form::<Self>::from_request(req, state).await.map_err(|e| unreadable(&e))?;
        Ok(form)
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/get", get(chat).post(chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("medibot listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> impl IntoResponse {
    Html(include_str!("../ui/chat.html"))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status":"ok","service":"medibot"}))
}

async fn chat(State(state): State<AppState>, form: ChatForm) -> Result<String, ChatError> {
    let Some(query) = form.into_query() else {
        warn!("chat request without 'msg'");
        return Err(ChatError::MissingParameter { name: "msg" });
    };

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    async move {
        info!(question = %query.text, "received question");
        let answer = state.pipeline.answer(&query.text).await?;
        info!(answer = %answer.text, "sending answer");
        Ok::<_, ChatError>(answer.text)
    }
    .instrument(span)
    .await
}
