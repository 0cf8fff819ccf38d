use crate::errors::AppError;
use crate::models::{Lead, LeadId};
use crate::store::LeadStore;
use async_trait::async_trait;
use serde_json::Map;
use sqlx::{FromRow, PgPool};

/// Columns read from the leads table. `id` is cast to text so any key type works.
#[derive(Debug, FromRow)]
struct LeadRow {
    id: String,
    nome: Option<String>,
    telefone: String,
    ia_on_off: Option<String>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Lead {
            id: LeadId::from_db_text(row.id),
            nome: row.nome,
            telefone: row.telefone,
            ia_on_off: row.ia_on_off,
            extra: Map::new(),
        }
    }
}

/// `LeadStore` talking to Postgres directly, for deployments that bypass the
/// Supabase REST layer.
pub struct PgLeadStore {
    pool: PgPool,
    select_sql: String,
    update_sql: String,
}

impl PgLeadStore {
    /// `table` must already be a validated identifier (see `Config`).
    pub fn new(pool: PgPool, table: &str) -> Self {
        let select_sql = format!(
            "SELECT id::text AS id, nome, telefone, ia_on_off FROM {} WHERE telefone = ANY($1)",
            table
        );
        let update_sql = format!("UPDATE {} SET ia_on_off = $1 WHERE id::text = $2", table);

        Self {
            pool,
            select_sql,
            update_sql,
        }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn find_by_phones(&self, candidates: &[String]) -> Result<Vec<Lead>, AppError> {
        let rows = sqlx::query_as::<_, LeadRow>(&self.select_sql)
            .bind(candidates)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Postgres lookup returned {} row(s)", rows.len());
        Ok(rows.into_iter().map(Lead::from).collect())
    }

    async fn update_ia_status(&self, id: &LeadId, status: &str) -> Result<(), AppError> {
        let result = sqlx::query(&self.update_sql)
            .bind(status)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Postgres update of lead {} affected {} row(s)",
            id,
            result.rows_affected()
        );
        Ok(())
    }
}
