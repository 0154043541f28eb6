use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use campus_core::{IDENTITY_ID_CONSTRAINT, Record, RecordStore, RecordStoreError, Role};

struct Table {
    columns: Vec<&'static str>,
    id_column: &'static str,
    // (column, constraint name)
    unique: Vec<(&'static str, String)>,
    rows: Vec<Record>,
}

impl Table {
    fn check_column(&self, table: &str, column: &str) -> Result<(), RecordStoreError> {
        if self.columns.contains(&column) {
            Ok(())
        } else {
            Err(RecordStoreError::UnknownField(format!("{table}.{column}")))
        }
    }
}

/// In-memory record store with one table per role.
///
/// Ids share one namespace across every table and the email column is unique
/// per table. Constraint names match the Postgres schema.
#[derive(Clone)]
pub struct HashMapRecordStore {
    tables: Arc<RwLock<HashMap<&'static str, Table>>>,
}

impl Default for HashMapRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HashMapRecordStore {
    pub fn new() -> Self {
        let tables = Role::ALL
            .iter()
            .map(|role| {
                let d = role.descriptor();
                let table = Table {
                    columns: d.insertable_fields.to_vec(),
                    id_column: d.id_field,
                    unique: vec![(
                        d.email_field,
                        format!("{}_{}_key", d.table_name, d.email_field),
                    )],
                    rows: Vec::new(),
                };
                (d.table_name, table)
            })
            .collect();

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

fn value_of<'r>(record: &'r Record, field: &str) -> Option<&'r str> {
    record.get(field).and_then(|v| v.as_deref())
}

#[async_trait::async_trait]
impl RecordStore for HashMapRecordStore {
    async fn find_one(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Record>, RecordStoreError> {
        let tables = self.tables.read().await;
        let t = tables
            .get(table)
            .ok_or_else(|| RecordStoreError::UnknownField(table.to_string()))?;
        t.check_column(table, field)?;

        Ok(t
            .rows
            .iter()
            .find(|row| value_of(row, field) == Some(value))
            .cloned())
    }

    async fn insert(&self, table: &str, mut record: Record) -> Result<(), RecordStoreError> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get(table)
            .ok_or_else(|| RecordStoreError::UnknownField(table.to_string()))?;

        for column in record.keys() {
            t.check_column(table, column)?;
        }
        for column in &t.columns {
            record.entry(column.to_string()).or_insert(None);
        }

        if let Some(id) = value_of(&record, t.id_column) {
            let taken = tables.values().any(|other| {
                other
                    .rows
                    .iter()
                    .any(|row| value_of(row, other.id_column) == Some(id))
            });
            if taken {
                return Err(RecordStoreError::UniqueViolation {
                    constraint: Some(IDENTITY_ID_CONSTRAINT.to_string()),
                });
            }
        }

        for (column, constraint) in &t.unique {
            let Some(value) = value_of(&record, column) else {
                continue;
            };
            if t.rows.iter().any(|row| value_of(row, column) == Some(value)) {
                return Err(RecordStoreError::UniqueViolation {
                    constraint: Some(constraint.clone()),
                });
            }
        }

        if let Some(t) = tables.get_mut(table) {
            t.rows.push(record);
        }
        Ok(())
    }

    async fn update_field(
        &self,
        table: &str,
        match_field: &str,
        match_value: &str,
        set_field: &str,
        set_value: Option<String>,
    ) -> Result<u64, RecordStoreError> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| RecordStoreError::UnknownField(table.to_string()))?;
        t.check_column(table, match_field)?;
        t.check_column(table, set_field)?;

        let mut updated = 0;
        for row in t
            .rows
            .iter_mut()
            .filter(|row| value_of(row, match_field) == Some(match_value))
        {
            row.insert(set_field.to_string(), set_value.clone());
            updated += 1;
        }
        Ok(updated)
    }
}
