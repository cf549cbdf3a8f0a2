use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use tracing::{error, info};

use crate::application::RelayService;
use crate::domain::DomainError;

use super::payloads::{ErrorBody, OutputBody, RelayPayload};

pub const RELAY_PATH: &str = "/api/linkr";

const METHOD_NOT_ALLOWED: &str = "Only POST requests allowed";
const MISSING_DOMAIN: &str = "Missing domain in request body";
/// Shown instead of transport details, which only go to the log.
const TRANSPORT_FAILURE: &str = "An error occurred while calling OpenAI API.";

#[derive(Clone)]
pub struct RelayState {
    relay: Arc<dyn RelayService>,
}

/// Build the router serving the relay endpoint.
///
/// Every method is routed to the handler so that non-POST requests get the
/// JSON 405 body rather than axum's empty one.
pub fn build_router(relay: Arc<dyn RelayService>) -> Router {
    Router::new()
        .route(RELAY_PATH, any(relay_handler))
        .with_state(RelayState { relay })
}

/// Serve the relay endpoint until Ctrl-C.
pub async fn serve(relay: Arc<dyn RelayService>, addr: SocketAddr) -> Result<(), DomainError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Relay endpoint listening on http://{}{}", listener.local_addr()?, RELAY_PATH);

    axum::serve(listener, build_router(relay))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down relay endpoint");
        })
        .await?;
    Ok(())
}

async fn relay_handler(State(state): State<RelayState>, method: Method, body: Bytes) -> Response {
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED);
    }

    let payload: RelayPayload = serde_json::from_slice(&body).unwrap_or_default();
    let Some(domain) = payload.domain() else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_DOMAIN);
    };

    match state.relay.relay(&domain).await {
        Ok(output) => (StatusCode::OK, Json(OutputBody { output })).into_response(),
        Err(DomainError::InvalidInput(msg)) => error_response(StatusCode::BAD_REQUEST, &msg),
        Err(DomainError::UpstreamError(msg)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &msg)
        }
        Err(e) => {
            error!("Completion service call failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, TRANSPORT_FAILURE)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
