//! Push-notification registration keyed by user id.
use async_trait::async_trait;
use tracing::{info, warn};

use crate::session::SessionContext;

#[async_trait]
pub trait PushRegistry: Send + Sync {
    /// Associate this device with `external_id` (the backend user id).
    async fn register(&self, external_id: &str);

    /// Detach the current user from this device.
    async fn unregister(&self);
}

/// Registry for hosts without a push SDK: records registration in the log
/// and honours the persisted notification preference.
#[derive(Debug, Clone)]
pub struct LoggingPushRegistry {
    app_id: String,
    enabled: bool,
    session: SessionContext,
}

impl LoggingPushRegistry {
    pub fn new(app_id: impl Into<String>, enabled: bool, session: SessionContext) -> Self {
        Self {
            app_id: app_id.into(),
            enabled,
            session,
        }
    }

    async fn active(&self) -> bool {
        if !self.enabled {
            return false;
        }
        match self.session.notifications_enabled().await {
            Ok(enabled) => enabled,
            Err(err) => {
                warn!(?err, "could not read notification preference");
                false
            }
        }
    }
}

#[async_trait]
impl PushRegistry for LoggingPushRegistry {
    async fn register(&self, external_id: &str) {
        if !self.active().await {
            return;
        }
        match self.session.device_id().await {
            Ok(device_id) => info!(
                app_id = %self.app_id,
                %device_id,
                external_id,
                "push registration set"
            ),
            Err(err) => warn!(?err, "push registration failed"),
        }
    }

    async fn unregister(&self) {
        if !self.active().await {
            return;
        }
        info!(app_id = %self.app_id, "push registration removed");
    }
}

/// Registry that does nothing; for embedding without notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPushRegistry;

#[async_trait]
impl PushRegistry for NoopPushRegistry {
    async fn register(&self, _external_id: &str) {}

    async fn unregister(&self) {}
}
