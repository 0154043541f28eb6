use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// A row as column name to value; `None` is SQL NULL.
pub type Record = BTreeMap<String, Option<String>>;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The store could not be reached at all.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
    #[error("Unique constraint violated")]
    UniqueViolation { constraint: Option<String> },
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
    /// A table or column name does not exist in the store.
    #[error("Unknown field reference: {0}")]
    UnknownField(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for RecordStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unavailable(_), Self::Unavailable(_)) => true,
            (Self::UniqueViolation { .. }, Self::UniqueViolation { .. }) => true,
            (Self::ConstraintViolation(_), Self::ConstraintViolation(_)) => true,
            (Self::UnknownField(_), Self::UnknownField(_)) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Keyed access to the per-role identity tables.
///
/// Table and field names always come from a [`RoleDescriptor`], never from
/// caller input.
///
/// [`RoleDescriptor`]: crate::RoleDescriptor
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// First row of `table` where `field = value`, or `None` when no row matches.
    async fn find_one(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Record>, RecordStoreError>;

    /// Insert a row. For a role table the row's id is claimed in
    /// [`IDENTITY_ID_TABLE`] in the same step, and an id already claimed by
    /// any role fails with [`IDENTITY_ID_CONSTRAINT`].
    ///
    /// [`IDENTITY_ID_TABLE`]: crate::IDENTITY_ID_TABLE
    /// [`IDENTITY_ID_CONSTRAINT`]: crate::IDENTITY_ID_CONSTRAINT
    async fn insert(&self, table: &str, record: Record) -> Result<(), RecordStoreError>;

    /// Set `set_field` on every row where `match_field = match_value`.
    /// Returns the number of rows updated.
    async fn update_field(
        &self,
        table: &str,
        match_field: &str,
        match_value: &str,
        set_field: &str,
        set_value: Option<String>,
    ) -> Result<u64, RecordStoreError>;
}
