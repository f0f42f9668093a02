//! Application state.
//!
//! Built once at startup from [`Config`] and shared by every handler. Handlers
//! never reach for globals or the environment.

use crate::services::{CompletionCoordinator, CoordinatorDeps};
use drape_core::{Config, ReadyNotifier};
use drape_db::GarmentStateStore;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub coordinator: CompletionCoordinator,
    pub garments: Arc<dyn GarmentStateStore>,
    pub notifier: Arc<dyn ReadyNotifier>,
}

impl AppState {
    pub fn new(config: Config, deps: CoordinatorDeps, notifier: Arc<dyn ReadyNotifier>) -> Self {
        let garments = deps.garments.clone();
        let coordinator = CompletionCoordinator::new(
            deps,
            config.categories().clone(),
            Duration::from_secs(config.upload_url_ttl_seconds()),
        );

        Self {
            config,
            coordinator,
            garments,
            notifier,
        }
    }
}
