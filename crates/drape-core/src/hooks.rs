//! Hooks for downstream integration
//!
//! The upload flow only decides *when* a garment becomes ready. Whatever runs
//! afterwards (the assembly job) is reached through [`ReadyNotifier`], so the
//! core never depends on a particular job system.

use async_trait::async_trait;
use uuid::Uuid;

/// Receives the single readiness signal of a garment.
///
/// Callers invoke this only after winning the readiness claim, so an
/// implementation sees each garment at most once.
#[async_trait]
pub trait ReadyNotifier: Send + Sync {
    async fn notify_ready(&self, garment_id: Uuid) -> Result<(), String>;
}

/// Notifier that records the signal in the log stream.
pub struct LoggingReadyNotifier;

#[async_trait]
impl ReadyNotifier for LoggingReadyNotifier {
    async fn notify_ready(&self, garment_id: Uuid) -> Result<(), String> {
        tracing::info!(garment_id = %garment_id, "Garment ready, processing job eligible");
        Ok(())
    }
}
