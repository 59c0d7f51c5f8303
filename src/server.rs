//! Read-only HTTP endpoint serving random jokes.
//!
//! The dataset is loaded once at startup. A load failure does not stop the
//! server: it is kept and reported on every `/api/joke` request as a 500.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | service name, version, endpoints, joke count |
//! | `GET /api/joke` | `{"success": true, "joke": {...}}` |

use crate::jokes::{DatasetError, JokeBook, load_jokes};
use crate::models::Joke;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

pub const SERVICE_NAME: &str = "ChistAPI XD";

/// Shared, read-only server state.
#[derive(Debug)]
pub struct JokeState {
    jokes: Result<JokeBook, String>,
}

impl JokeState {
    pub fn from_load(result: Result<JokeBook, DatasetError>) -> Self {
        Self {
            jokes: result.map_err(|e| e.to_string()),
        }
    }

    pub async fn load(path: &Path) -> Self {
        let result = load_jokes(path).await;
        if let Err(e) = &result {
            error!(error = %e, "Failed to load jokes; /api/joke will report the error");
        }
        Self::from_load(result)
    }

    fn total(&self) -> usize {
        self.jokes.as_ref().map(JokeBook::len).unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
struct JokeResponse<'a> {
    success: bool,
    joke: &'a Joke,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoResponse {
    name: &'static str,
    version: &'static str,
    endpoints: Endpoints,
    total_jokes: usize,
}

#[derive(Debug, Serialize)]
struct Endpoints {
    joke: &'static str,
}

/// Errors surfaced to HTTP clients.
///
/// A loaded [`JokeBook`] is never empty, so the only failure is the startup
/// load itself.
pub enum ApiError {
    LoadFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::LoadFailed(error) = self;
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

async fn random_joke(State(state): State<Arc<JokeState>>) -> Result<Response, ApiError> {
    let book = state.jokes.as_ref().map_err(|e| ApiError::LoadFailed(e.clone()))?;
    let joke = book.pick(&mut rand::rng());
    Ok(Json(JokeResponse {
        success: true,
        joke,
    })
    .into_response())
}

async fn service_info(State(state): State<Arc<JokeState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            joke: "GET /api/joke - returns a random joke",
        },
        total_jokes: state.total(),
    })
}

pub fn build_router(state: Arc<JokeState>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/joke", get(random_joke))
        .with_state(state)
}

/// Load the dataset and serve until the process is stopped.
#[instrument(level = "info", skip_all, fields(port = %port))]
pub async fn serve(dataset: &Path, port: u16) -> Result<(), std::io::Error> {
    let state = Arc::new(JokeState::load(dataset).await);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, total_jokes = state.total(), "Joke endpoint listening");
    axum::serve(listener, build_router(state)).await
}
