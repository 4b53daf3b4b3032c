//! Client and collector DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_party::{Client, Collector};

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub full_name: String,
    pub document_id: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub full_name: String,
    pub document_id: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ClientResponse {
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.into(),
            full_name: client.full_name.clone(),
            document_id: client.document_id.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            active: client.active,
            created_at: client.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCollectorRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub zone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CollectorResponse {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub zone: Option<String>,
    pub status: String,
}

impl CollectorResponse {
    pub fn from_collector(collector: &Collector) -> Self {
        Self {
            id: collector.id.into(),
            full_name: collector.full_name.clone(),
            phone: collector.phone.clone(),
            zone: collector.zone.clone(),
            status: collector.status.as_str().to_string(),
        }
    }
}
