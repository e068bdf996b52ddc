use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use taskforge_core::SessionStore;

/// Periodically delete sessions that are both expired and revoked.
///
/// Runs independently of request handling; revoked-but-unexpired tokens
/// are never touched, so replay of a rotated token stays detectable for
/// the token's full lifetime.
pub fn spawn_session_sweeper<S>(session_store: S, period: Duration) -> JoinHandle<()>
where
    S: SessionStore + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match session_store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "session purge failed"),
            }
        }
    })
}
