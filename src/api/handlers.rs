use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use crate::api::error::{ApiError, Envelope};
use crate::api::AppState;
use crate::models::{field_errors, Client, ClientPatchReq, NewClientReq};

/// List every stored client
pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = state.store.find_all().await?;
    info!("Listed {} clients", clients.len());
    Ok(Json(clients))
}

/// Get a specific client by ID
pub async fn show_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    match state.store.find_by_id(id).await? {
        Some(client) => Ok(Json(client)),
        None => {
            warn!("Client {} not found", id);
            Err(ApiError::NotFound(format!(
                "Client ID: {} does not exist in the database.",
                id
            )))
        }
    }
}

/// Create a new client
pub async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<NewClientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    let Json(req) = payload?;
    if let Some(errors) = field_errors(&req) {
        warn!("Rejected new client: {:?}", errors);
        return Err(ApiError::Validation(errors));
    }

    let created = state.store.save(req.into_client()).await?;
    info!("Created client {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_client("Client created successfully", created)),
    ))
}

/// Update an existing client with the fields present in the payload
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ClientPatchReq>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    let Json(req) = payload?;
    if let Some(errors) = field_errors(&req) {
        warn!("Rejected update of client {}: {:?}", id, errors);
        return Err(ApiError::Validation(errors));
    }

    let Some(mut current) = state.store.find_by_id(id).await? else {
        warn!("Client {} not found for update", id);
        return Err(ApiError::NotFound(format!(
            "Error: could not update, client ID: {} does not exist in the database.",
            id
        )));
    };

    req.apply_to(&mut current);
    let updated = state.store.save(current).await?;
    info!("Updated client {}", id);

    // Same status as create.
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_client("Client updated successfully", updated)),
    ))
}

/// Delete a client by ID; a missing id is not reported
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope>, ApiError> {
    state.store.delete_by_id(id).await?;
    info!("Deleted client {}", id);
    Ok(Json(Envelope::message("Client deleted successfully!")))
}
