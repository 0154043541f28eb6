use std::sync::Arc;

use campus_core::{Email, ResetCode, ResetTicket, ResetTicketStore, ResetTicketStoreError};
use chrono::{DateTime, Utc};
use redis::{Commands, Connection};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Reset tickets kept in Redis under `reset_ticket:<email>`.
///
/// Each key carries a TTL matching the ticket's remaining lifetime, so Redis
/// evicts expired tickets itself and `sweep` has nothing to do. Claims run
/// as a `WATCH`/`MULTI` transaction on the ticket's key.
#[derive(Clone)]
pub struct RedisResetTicketStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisResetTicketStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl ResetTicketStore for RedisResetTicketStore {
    async fn put(&self, ticket: ResetTicket) -> Result<(), ResetTicketStoreError> {
        let key = get_key(&ticket.email);
        let ttl = ttl_in_seconds(&ticket, Utc::now());
        let value = serde_json::to_string(&StoredTicket::from(&ticket))
            .map_err(|e| ResetTicketStoreError::UnexpectedError(e.to_string()))?;

        let mut conn = self.conn.write().await;
        conn.set_ex::<_, _, ()>(key, value, ttl)
            .map_err(|e| ResetTicketStoreError::UnexpectedError(e.to_string()))
    }

    async fn get(&self, email: &Email) -> Result<Option<ResetTicket>, ResetTicketStoreError> {
        let key = get_key(email);
        let value: Option<String> = {
            let mut conn = self.conn.write().await;
            conn.get(&key)
                .map_err(|e| ResetTicketStoreError::UnexpectedError(e.to_string()))?
        };

        value.as_deref().map(decode_ticket).transpose()
    }

    async fn claim(
        &self,
        email: &Email,
        code: &ResetCode,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetTicket>, ResetTicketStoreError> {
        let key = get_key(email);
        let redeems =
            |json: &str| decode_ticket(json).is_ok_and(|ticket| ticket.redeemable_with(code, now));

        let claimed: Option<String> = {
            let mut conn = self.conn.write().await;
            // A nil EXEC means the key changed under WATCH; `transaction` retries then.
            redis::transaction(&mut *conn, &[&key], |con, pipe| {
                let value: Option<String> = con.get(&key)?;
                match value {
                    Some(json) if redeems(&json) => pipe
                        .del(&key)
                        .ignore()
                        .query::<Option<()>>(con)
                        .map(|committed| committed.map(|()| Some(json))),
                    _ => Ok(Some(None)),
                }
            })
            .map_err(|e| ResetTicketStoreError::UnexpectedError(e.to_string()))?
        };

        claimed.as_deref().map(decode_ticket).transpose()
    }

    async fn delete(&self, email: &Email) -> Result<(), ResetTicketStoreError> {
        let key = get_key(email);
        let mut conn = self.conn.write().await;
        conn.del::<_, ()>(&key)
            .map_err(|e| ResetTicketStoreError::UnexpectedError(e.to_string()))
    }

    async fn sweep(&self, _now: DateTime<Utc>) -> Result<usize, ResetTicketStoreError> {
        Ok(0)
    }
}

const RESET_TICKET_KEY_PREFIX: &str = "reset_ticket:";

fn get_key(email: &Email) -> String {
    format!("{}{}", RESET_TICKET_KEY_PREFIX, email.as_ref().expose_secret())
}

fn decode_ticket(json: &str) -> Result<ResetTicket, ResetTicketStoreError> {
    serde_json::from_str::<StoredTicket>(json)
        .map_err(|e| ResetTicketStoreError::UnexpectedError(e.to_string()))
        .and_then(StoredTicket::into_ticket)
}

// SET EX rejects 0, and an already expired ticket still has to read back as expired.
fn ttl_in_seconds(ticket: &ResetTicket, now: DateTime<Utc>) -> u64 {
    let remaining = (ticket.expires_at - now).num_seconds();
    u64::try_from(remaining).unwrap_or(0).max(1)
}

#[derive(Serialize, Deserialize)]
struct StoredTicket {
    email: String,
    code: String,
    expires_at: DateTime<Utc>,
    used: bool,
}

impl From<&ResetTicket> for StoredTicket {
    fn from(ticket: &ResetTicket) -> Self {
        Self {
            email: ticket.email.as_ref().expose_secret().clone(),
            code: ticket.code.as_str().to_owned(),
            expires_at: ticket.expires_at,
            used: ticket.used,
        }
    }
}

impl StoredTicket {
    fn into_ticket(self) -> Result<ResetTicket, ResetTicketStoreError> {
        let corrupt = |what: &str| ResetTicketStoreError::UnexpectedError(format!("corrupt {what}"));
        Ok(ResetTicket {
            email: Email::parse(&self.email).map_err(|_| corrupt("email"))?,
            code: ResetCode::parse(&self.code).map_err(|_| corrupt("code"))?,
            expires_at: self.expires_at,
            used: self.used,
        })
    }
}
