use campus_core::{Clock, ResetTicketStore, ResetTicketStoreError};

/// Sweep use case - purges expired and used reset tickets
pub struct SweepResetTicketsUseCase<'a, T, C>
where
    T: ResetTicketStore,
    C: Clock,
{
    ticket_store: &'a T,
    clock: &'a C,
}

impl<'a, T, C> SweepResetTicketsUseCase<'a, T, C>
where
    T: ResetTicketStore,
    C: Clock,
{
    pub fn new(ticket_store: &'a T, clock: &'a C) -> Self {
        Self {
            ticket_store,
            clock,
        }
    }

    /// Returns the number of tickets removed.
    #[tracing::instrument(name = "SweepResetTicketsUseCase::execute", skip_all)]
    pub async fn execute(&self) -> Result<usize, ResetTicketStoreError> {
        let purged = self.ticket_store.sweep(self.clock.now()).await?;
        tracing::debug!(purged, "Reset ticket sweep finished");
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, MockTicketStore};
    use campus_core::{Email, ResetCode, ResetTicket};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_sweep_purges_expired_and_used() {
        let clock = ManualClock::new(Utc::now());
        let store = MockTicketStore::default();
        let issue = |address: &str, ttl: i64| {
            ResetTicket::issue(
                Email::parse(address).unwrap(),
                ResetCode::new(),
                clock.now(),
                Duration::minutes(ttl),
            )
        };

        store.put(issue("fresh@u.edu", 15)).await.unwrap();
        store.put(issue("stale@u.edu", 1)).await.unwrap();
        let mut used = issue("used@u.edu", 15);
        used.mark_used();
        store.put(used).await.unwrap();

        clock.advance(Duration::minutes(5));
        let purged = SweepResetTicketsUseCase::new(&store, &clock)
            .execute()
            .await
            .unwrap();

        assert_eq!(purged, 2);
        assert_eq!(store.len(), 1);
        assert!(store.ticket(&Email::parse("fresh@u.edu").unwrap()).is_some());
    }
}
