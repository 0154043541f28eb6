use std::time::Duration;

use campus_application::SweepResetTicketsUseCase;
use campus_core::{Clock, ResetTicketStore};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Purge stale reset tickets every `interval` until the handle is aborted.
///
/// The first sweep runs one full interval after spawning. A failed sweep is
/// logged and retried on the next tick.
pub fn spawn_reset_sweeper<T, C>(ticket_store: T, clock: C, interval: Duration) -> JoinHandle<()>
where
    T: ResetTicketStore + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = SweepResetTicketsUseCase::new(&ticket_store, &clock)
                .execute()
                .await
            {
                tracing::error!(error = %e, "Reset ticket sweep failed");
            }
        }
    })
}
