use campus_core::{IDENTITY_ID_TABLE, Record, RecordStore, RecordStoreError, Role};
use sqlx::{Column, PgPool, Row, error::ErrorKind, postgres::PgRow};

const UNDEFINED_COLUMN: &str = "42703";
const UNDEFINED_TABLE: &str = "42P01";

/// Record store over the per-role Postgres tables.
///
/// Queries are built at runtime. Identifiers come from the static role
/// registry and are always double-quoted; values are always bound.
///
/// Inserts into a role table first claim the id in `identity_ids` within
/// the same transaction, so the shared id namespace and the role row are
/// written together or not at all.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresRecordStore { pool }
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn map_sqlx_error(e: sqlx::Error) -> RecordStoreError {
    match e {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            match db_err.kind() {
                ErrorKind::UniqueViolation => RecordStoreError::UniqueViolation {
                    constraint: db_err.constraint().map(str::to_owned),
                },
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    RecordStoreError::ConstraintViolation(db_err.message().to_owned())
                }
                _ if matches!(code.as_deref(), Some(UNDEFINED_COLUMN | UNDEFINED_TABLE)) => {
                    RecordStoreError::UnknownField(db_err.message().to_owned())
                }
                _ => RecordStoreError::UnexpectedError(db_err.to_string()),
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => RecordStoreError::Unavailable(e.to_string()),
        other => RecordStoreError::UnexpectedError(other.to_string()),
    }
}

fn row_to_record(row: &PgRow) -> Result<Record, RecordStoreError> {
    row.columns()
        .iter()
        .map(|column| {
            let value: Option<String> = row
                .try_get(column.ordinal())
                .map_err(|e| RecordStoreError::UnexpectedError(e.to_string()))?;
            Ok((column.name().to_string(), value))
        })
        .collect()
}

#[async_trait::async_trait]
impl RecordStore for PostgresRecordStore {
    #[tracing::instrument(name = "Finding record in PostgreSQL", skip(self, value))]
    async fn find_one(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Record>, RecordStoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1 LIMIT 1",
            quote_ident(table),
            quote_ident(field)
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    #[tracing::instrument(name = "Inserting record into PostgreSQL", skip(self, record))]
    async fn insert(&self, table: &str, record: Record) -> Result<(), RecordStoreError> {
        let columns = record
            .keys()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=record.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            quote_ident(table)
        );

        let claimed_id = Role::for_table(table)
            .and_then(|role| record.get(role.descriptor().id_field).cloned().flatten());

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        if let Some(id) = claimed_id {
            let claim = format!(
                "INSERT INTO {} (id) VALUES ($1)",
                quote_ident(IDENTITY_ID_TABLE)
            );
            sqlx::query(&claim)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        let query = record
            .into_values()
            .fold(sqlx::query(&sql), |query, value| query.bind(value));
        query.execute(&mut *tx).await.map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }

    #[tracing::instrument(
        name = "Updating record field in PostgreSQL",
        skip(self, match_value, set_value)
    )]
    async fn update_field(
        &self,
        table: &str,
        match_field: &str,
        match_value: &str,
        set_field: &str,
        set_value: Option<String>,
    ) -> Result<u64, RecordStoreError> {
        let sql = format!(
            "UPDATE {} SET {} = $1 WHERE {} = $2",
            quote_ident(table),
            quote_ident(set_field),
            quote_ident(match_field)
        );

        let result = sqlx::query(&sql)
            .bind(set_value)
            .bind(match_value)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
