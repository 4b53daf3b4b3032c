//! Client and collector handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::{ClientId, CollectorId};
use domain_party::{Client, Collector};
use infra_db::{ClientRepository, CollectorRepository};

use crate::dto::party::*;
use crate::error::ApiError;
use crate::AppState;

/// Registers a new client
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let mut client = Client::new(request.full_name, request.document_id)?;
    if let Some(phone) = request.phone {
        client = client.with_phone(phone)?;
    }
    if let Some(address) = request.address {
        client = client.with_address(address);
    }

    ClientRepository::new(state.pool.clone()).create(&client).await?;
    tracing::info!(client_id = %client.id, "client registered");

    Ok(Json(ClientResponse::from_client(&client)))
}

/// Lists the client registry
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = ClientRepository::new(state.pool.clone()).list().await?;
    Ok(Json(clients.iter().map(ClientResponse::from_client).collect()))
}

/// Gets a client by ID
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = ClientRepository::new(state.pool.clone())
        .find(ClientId::from(id))
        .await?;
    Ok(Json(ClientResponse::from_client(&client)))
}

/// Updates a client's contact details or active flag
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let repo = ClientRepository::new(state.pool.clone());
    let mut client = repo.find(ClientId::from(id)).await?;

    client.update_contact(request.phone, request.address)?;
    match request.active {
        Some(true) => client.reactivate(),
        Some(false) => client.deactivate(),
        None => {}
    }

    repo.update(&client).await?;
    Ok(Json(ClientResponse::from_client(&client)))
}

/// Registers a new collector
pub async fn create_collector(
    State(state): State<AppState>,
    Json(request): Json<CreateCollectorRequest>,
) -> Result<Json<CollectorResponse>, ApiError> {
    let mut collector = Collector::new(request.full_name)?;
    if let Some(phone) = request.phone {
        collector = collector.with_phone(phone)?;
    }
    if let Some(zone) = request.zone {
        collector.assign_zone(zone);
    }

    CollectorRepository::new(state.pool.clone()).create(&collector).await?;
    tracing::info!(collector_id = %collector.id, "collector registered");

    Ok(Json(CollectorResponse::from_collector(&collector)))
}

/// Lists all collectors
pub async fn list_collectors(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectorResponse>>, ApiError> {
    let collectors = CollectorRepository::new(state.pool.clone()).list().await?;
    Ok(Json(
        collectors.iter().map(CollectorResponse::from_collector).collect(),
    ))
}

/// Gets a collector by ID
pub async fn get_collector(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollectorResponse>, ApiError> {
    let collector = CollectorRepository::new(state.pool.clone())
        .find(CollectorId::from(id))
        .await?;
    Ok(Json(CollectorResponse::from_collector(&collector)))
}
