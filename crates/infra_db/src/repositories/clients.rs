//! Client repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::ClientId;
use domain_party::Client;

use crate::error::DatabaseError;

/// Repository for the client registry
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: Uuid,
    full_name: String,
    document_id: String,
    phone: Option<String>,
    address: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClientRow {
    fn into_client(self) -> Client {
        Client {
            id: ClientId::from(self.id),
            full_name: self.full_name,
            document_id: self.document_id,
            phone: self.phone,
            address: self.address,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ClientRepository {
    /// Creates a new ClientRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new client
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` when the document number is already registered
    pub async fn create(&self, client: &Client) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (id, full_name, document_id, phone, address, active,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (document_id) DO NOTHING
            "#,
        )
        .bind(Uuid::from(client.id))
        .bind(&client.full_name)
        .bind(&client.document_id)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.active)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::DuplicateEntry(format!(
                "client with document '{}' already exists",
                client.document_id
            )));
        }
        Ok(())
    }

    /// Loads a client by ID
    pub async fn find(&self, id: ClientId) -> Result<Client, DatabaseError> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, full_name, document_id, phone, address, active, created_at, updated_at \
             FROM clients WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?;

        row.map(ClientRow::into_client)
            .ok_or_else(|| DatabaseError::not_found("Client", id))
    }

    /// Lists the full registry, active first
    pub async fn list(&self) -> Result<Vec<Client>, DatabaseError> {
        let rows: Vec<ClientRow> = sqlx::query_as(
            "SELECT id, full_name, document_id, phone, address, active, created_at, updated_at \
             FROM clients ORDER BY active DESC, full_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClientRow::into_client).collect())
    }

    /// Persists changes to an existing client
    pub async fn update(&self, client: &Client) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET full_name = $1, phone = $2, address = $3, active = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&client.full_name)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.active)
        .bind(client.updated_at)
        .bind(Uuid::from(client.id))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Client", client.id));
        }
        Ok(())
    }
}
