use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{sse::Event as SseEvent, Html, IntoResponse, Json, Response, Sse},
};
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

use super::events::LayerEvent;
use super::state::AppState;
use crate::map_context::{LayerStatus, MapContext};
use crate::model::{LayerKind, Site};
use crate::settings::Settings;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn embedded_asset(name: &str, content_type: &'static str) -> Response {
    match Asset::get(name) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type)],
            file.data.into_owned(),
        )
            .into_response(),
        None => {
            tracing::error!("Embedded asset missing: {}", name);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn index_html() -> Response {
    match Asset::get("index.html") {
        Some(file) => Html(file.data.into_owned()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn style_css() -> Response {
    embedded_asset("style.css", "text/css")
}

pub async fn script_js() -> Response {
    embedded_asset("script.js", "application/javascript")
}

// Full scene: map view plus every layer group with its markers and flows
pub async fn get_scene(State(state): State<AppState>) -> Result<Json<MapContext>, StatusCode> {
    let map = state.map.read().map_err(|e| {
        tracing::error!("Map context lock poisoned: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(map.clone()))
}

pub async fn get_sites(State(state): State<AppState>) -> Json<Vec<Site>> {
    Json(state.sites.as_ref().clone())
}

pub async fn get_layers(
    State(state): State<AppState>,
) -> Result<Json<Vec<LayerStatus>>, StatusCode> {
    let map = state
        .map
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(map.layer_statuses()))
}

#[derive(Debug, Deserialize)]
pub struct LayerVisibility {
    pub visible: bool,
}

// Legend toggle: show or hide one layer group
pub async fn set_layer_visibility(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
    Json(payload): Json<LayerVisibility>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let kind: LayerKind = name.parse().map_err(|e| {
        tracing::warn!("{}", e);
        StatusCode::NOT_FOUND
    })?;

    let changed = {
        let mut map = state
            .map
            .write()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        map.set_visible(kind, payload.visible)
    };

    if changed {
        tracing::info!(layer = %kind, visible = payload.visible, "Layer toggled");
        // No subscribers is fine; nobody is listening for updates.
        let _ = state
            .event_sender
            .send(LayerEvent::visibility_changed(kind, payload.visible));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "layer": kind,
        "visible": payload.visible,
        "changed": changed
    })))
}

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, StatusCode> {
    let settings = state
        .settings
        .lock()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(settings.clone()))
}

// SSE endpoint for layer visibility updates
pub async fn layer_events_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::channel(100);

    let mut event_receiver = state.event_sender.subscribe();

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = event_receiver.recv() => match event {
                    Ok(layer_event) => layer_event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("SSE client lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(_) => break, // Channel closed
                },
                _ = tokio::time::sleep(Duration::from_secs(30)) => LayerEvent::heartbeat(),
            };

            let sse_event = SseEvent::default()
                .json_data(&event)
                .unwrap_or_else(|_| SseEvent::default().data("Error serializing event"));

            if tx.send(Ok(sse_event)).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive-message"),
    )
}
