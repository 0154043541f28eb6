use std::sync::Arc;

use campus_core::{Email, ResetCode, ResetTicket, ResetTicketStore, ResetTicketStoreError};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// In-process reset ticket store. Clones share the same map.
#[derive(Default, Clone)]
pub struct HashMapResetTicketStore {
    tickets: Arc<DashMap<Email, ResetTicket>>,
}

impl HashMapResetTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[async_trait::async_trait]
impl ResetTicketStore for HashMapResetTicketStore {
    async fn put(&self, ticket: ResetTicket) -> Result<(), ResetTicketStoreError> {
        self.tickets.insert(ticket.email.clone(), ticket);
        Ok(())
    }

    async fn get(&self, email: &Email) -> Result<Option<ResetTicket>, ResetTicketStoreError> {
        Ok(self.tickets.get(email).map(|entry| entry.value().clone()))
    }

    async fn claim(
        &self,
        email: &Email,
        code: &ResetCode,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetTicket>, ResetTicketStoreError> {
        Ok(self
            .tickets
            .remove_if(email, |_, ticket| ticket.redeemable_with(code, now))
            .map(|(_, ticket)| ticket))
    }

    async fn delete(&self, email: &Email) -> Result<(), ResetTicketStoreError> {
        self.tickets.remove(email);
        Ok(())
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ResetTicketStoreError> {
        let before = self.tickets.len();
        self.tickets.retain(|_, ticket| !ticket.is_stale_at(now));
        Ok(before.saturating_sub(self.tickets.len()))
    }
}
