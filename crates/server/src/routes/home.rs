//! Service endpoints: welcome text, store probe and health checks.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Welcome message.
pub async fn index() -> &'static str {
    "Serviço de catálogo configurado com sucesso!"
}

/// Store connectivity probe.
///
/// Always answers 200; the body says whether the store responded. Monitoring
/// should use `/health/ready`, which reports failure with a 503.
pub async fn test_db(State(state): State<AppState>) -> String {
    match state.store().ping().await {
        Ok(()) => "Conexão com o banco de dados estabelecida com sucesso!".to_owned(),
        Err(e) => {
            tracing::warn!("Store ping failed: {e}");
            format!("Erro ao conectar ao banco de dados: {e}")
        }
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
