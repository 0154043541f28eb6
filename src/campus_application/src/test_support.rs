//! Hand-rolled port doubles shared by the use case tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use campus_core::{
    AuthClaims, AuthToken, Clock, Email, EmailClient, EmailDeliveryError, HashingError,
    IDENTITY_ID_CONSTRAINT, IdentityId, Password, Record, RecordStore, RecordStoreError, ResetCode,
    ResetTicket, ResetTicketStore, ResetTicketStoreError, Role, TokenError, TokenSigner,
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};

pub fn student_row(id: &str, email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("student_id", id.to_string()),
        ("student_email", email.to_string()),
        ("password", "hashed:secret1".to_string()),
        ("full_name", "Ada Student".to_string()),
    ]
}

#[derive(Default)]
pub struct MockRecordStore {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    failing_tables: Mutex<HashSet<String>>,
    queried: Mutex<Vec<String>>,
    insert_error: Mutex<Option<RecordStoreError>>,
    update_error: Mutex<Option<RecordStoreError>>,
}

impl MockRecordStore {
    pub fn seed<I, K, V>(&self, table: &str, row: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let record = row
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    pub fn fail_table(&self, table: &str) {
        self.failing_tables.lock().unwrap().insert(table.to_string());
    }

    pub fn fail_next_insert(&self, error: RecordStoreError) {
        *self.insert_error.lock().unwrap() = Some(error);
    }

    pub fn fail_next_update(&self, error: RecordStoreError) {
        *self.update_error.lock().unwrap() = Some(error);
    }

    pub fn queried_tables(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn check_reachable(&self, table: &str) -> Result<(), RecordStoreError> {
        if self.failing_tables.lock().unwrap().contains(table) {
            return Err(RecordStoreError::Unavailable(format!("{table} is down")));
        }
        Ok(())
    }
}

fn matches(record: &Record, field: &str, value: &str) -> bool {
    record.get(field).and_then(|v| v.as_deref()) == Some(value)
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn find_one(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Record>, RecordStoreError> {
        self.queried.lock().unwrap().push(table.to_string());
        self.check_reachable(table)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| matches(r, field, value)).cloned()))
    }

    async fn insert(&self, table: &str, record: Record) -> Result<(), RecordStoreError> {
        self.check_reachable(table)?;
        if let Some(error) = self.insert_error.lock().unwrap().take() {
            return Err(error);
        }
        let descriptor = Role::ALL
            .iter()
            .map(|r| r.descriptor())
            .find(|d| d.table_name == table)
            .ok_or_else(|| RecordStoreError::UnknownField(table.to_string()))?;

        let mut tables = self.tables.lock().unwrap();
        let id = record
            .get(descriptor.id_field)
            .and_then(|v| v.as_deref())
            .unwrap_or_default();
        let id_taken = Role::ALL.iter().any(|role| {
            let d = role.descriptor();
            tables
                .get(d.table_name)
                .is_some_and(|rows| rows.iter().any(|r| matches(r, d.id_field, id)))
        });
        if id_taken {
            return Err(RecordStoreError::UniqueViolation {
                constraint: Some(IDENTITY_ID_CONSTRAINT.to_string()),
            });
        }

        let rows = tables.entry(table.to_string()).or_default();
        let email = record
            .get(descriptor.email_field)
            .and_then(|v| v.as_deref())
            .unwrap_or_default();
        if rows.iter().any(|r| matches(r, descriptor.email_field, email)) {
            return Err(RecordStoreError::UniqueViolation {
                constraint: Some(format!("{table}_{}_key", descriptor.email_field)),
            });
        }
        rows.push(record);
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
        self.check_reachable(table)?;
        if let Some(error) = self.update_error.lock().unwrap().take() {
            return Err(error);
        }
        let mut tables = self.tables.lock().unwrap();
        let mut updated = 0;
        for row in tables.get_mut(table).into_iter().flatten() {
            if matches(row, match_field, match_value) {
                row.insert(set_field.to_string(), set_value.clone());
                updated += 1;
            }
        }
        Ok(updated)
    }
}

/// Reversible "hash" so tests can assert on stored values.
///
/// Hashing yields once, like a real hasher handing off to a blocking pool.
#[derive(Default)]
pub struct PlainHasher {
    verifications: AtomicUsize,
}

impl PlainHasher {
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl campus_core::PasswordHasher for PlainHasher {
    async fn hash(&self, password: &Password) -> Result<Secret<String>, HashingError> {
        tokio::task::yield_now().await;
        Ok(Secret::from(format!(
            "hashed:{}",
            password.as_ref().expose_secret()
        )))
    }

    async fn verify(
        &self,
        password: &Password,
        password_hash: &Secret<String>,
    ) -> Result<bool, HashingError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        Ok(password_hash.expose_secret() == &format!("hashed:{}", password.as_ref().expose_secret()))
    }

    fn decoy_hash(&self) -> Secret<String> {
        Secret::from("decoy".to_string())
    }
}

/// Encodes claims as `id|role` without signing.
#[derive(Default)]
pub struct FakeSigner;

impl TokenSigner for FakeSigner {
    fn sign(&self, claims: &AuthClaims) -> Result<AuthToken, TokenError> {
        Ok(AuthToken::new(format!("{}|{}", claims.id, claims.role)))
    }

    fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let (id, role) = token.split_once('|').ok_or(TokenError::InvalidToken)?;
        Ok(AuthClaims::new(
            IdentityId::parse(id).map_err(|_| TokenError::InvalidToken)?,
            role.parse().map_err(|_| TokenError::InvalidToken)?,
        ))
    }
}

pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingEmailClient {
    sent: Mutex<Vec<(String, String, String)>>,
    fail: bool,
}

impl RecordingEmailClient {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailDeliveryError> {
        if self.fail {
            return Err(EmailDeliveryError::Transport(
                "mail relay refused connection".to_string(),
            ));
        }
        self.sent.lock().unwrap().push((
            recipient.as_ref().expose_secret().clone(),
            subject.to_string(),
            content.to_string(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTicketStore {
    tickets: Mutex<HashMap<Email, ResetTicket>>,
    fail_claims: Mutex<bool>,
    // Lands just before the next claim, like a request racing a reset.
    replacement: Mutex<Option<ResetTicket>>,
}

impl MockTicketStore {
    pub fn fail_claims(&self) {
        *self.fail_claims.lock().unwrap() = true;
    }

    pub fn replace_on_claim(&self, ticket: ResetTicket) {
        *self.replacement.lock().unwrap() = Some(ticket);
    }

    pub fn ticket(&self, email: &Email) -> Option<ResetTicket> {
        self.tickets.lock().unwrap().get(email).cloned()
    }

    pub fn len(&self) -> usize {
        self.tickets.lock().unwrap().len()
    }
}

#[async_trait]
impl ResetTicketStore for MockTicketStore {
    async fn put(&self, ticket: ResetTicket) -> Result<(), ResetTicketStoreError> {
        self.tickets
            .lock()
            .unwrap()
            .insert(ticket.email.clone(), ticket);
        Ok(())
    }

    async fn get(&self, email: &Email) -> Result<Option<ResetTicket>, ResetTicketStoreError> {
        Ok(self.ticket(email))
    }

    async fn claim(
        &self,
        email: &Email,
        code: &ResetCode,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetTicket>, ResetTicketStoreError> {
        if *self.fail_claims.lock().unwrap() {
            return Err(ResetTicketStoreError::UnexpectedError(
                "claim refused".to_string(),
            ));
        }
        let mut tickets = self.tickets.lock().unwrap();
        if let Some(fresh) = self.replacement.lock().unwrap().take() {
            tickets.insert(fresh.email.clone(), fresh);
        }
        let redeemable = tickets
            .get(email)
            .is_some_and(|t| t.redeemable_with(code, now));
        Ok(if redeemable { tickets.remove(email) } else { None })
    }

    async fn delete(&self, email: &Email) -> Result<(), ResetTicketStoreError> {
        self.tickets.lock().unwrap().remove(email);
        Ok(())
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ResetTicketStoreError> {
        let mut tickets = self.tickets.lock().unwrap();
        let before = tickets.len();
        tickets.retain(|_, t| !t.is_stale_at(now));
        Ok(before - tickets.len())
    }
}
