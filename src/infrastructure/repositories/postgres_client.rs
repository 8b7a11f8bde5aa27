// src/infrastructure/repositories/postgres_client.rs
use super::map_sqlx;
use crate::domain::client::{
    ClientId, ClientRegistry, ClientSecretHash, NewClient, RedirectUri, RegisteredClient, Scope,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PostgresClientRegistry {
    pool: PgPool,
}

impl PostgresClientRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    client_id: String,
    secret_hash: String,
    redirect_uris: Vec<String>,
    scope: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for RegisteredClient {
    type Error = DomainError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(RegisteredClient {
            client_id: ClientId::new(row.client_id)?,
            secret_hash: ClientSecretHash::new(row.secret_hash)?,
            redirect_uris: row
                .redirect_uris
                .into_iter()
                .map(RedirectUri::new)
                .collect::<DomainResult<_>>()?,
            scopes: row.scope.parse::<Scope>()?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ClientRegistry for PostgresClientRegistry {
    async fn insert(&self, new_client: NewClient) -> DomainResult<RegisteredClient> {
        let NewClient {
            client_id,
            secret_hash,
            redirect_uris,
            scopes,
            created_at,
        } = new_client;
        let redirect_uris: Vec<String> = redirect_uris
            .iter()
            .map(|uri| uri.as_str().to_owned())
            .collect();

        let row = sqlx::query_as::<_, ClientRow>(
            "INSERT INTO oauth_clients (client_id, secret_hash, redirect_uris, scope, created_at)
             VALUES ($1, $2, $3, $4, $5)
            RETURNING client_id, secret_hash, redirect_uris, scope, created_at",
        )
        .bind(client_id.as_str())
        .bind(secret_hash.as_str())
        .bind(&redirect_uris)
        .bind(scopes.to_string())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        RegisteredClient::try_from(row)
    }

    async fn find_by_id(&self, client_id: &ClientId) -> DomainResult<Option<RegisteredClient>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, secret_hash, redirect_uris, scope, created_at
             FROM oauth_clients WHERE client_id = $1",
        )
        .bind(client_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(RegisteredClient::try_from).transpose()
    }

    async fn delete(&self, client_id: &ClientId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM oauth_clients WHERE client_id = $1")
            .bind(client_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> DomainResult<Vec<RegisteredClient>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, secret_hash, redirect_uris, scope, created_at
             FROM oauth_clients ORDER BY created_at, client_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(RegisteredClient::try_from).collect()
    }
}
