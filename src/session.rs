//! Session context: the narrow read/write surface over the key-value store
//! that services and screens share.
use crate::model::UserType;
use crate::store::{keys, KeyValueStore, StoreError};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Fields persisted after a successful login or OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub user_type: String,
    pub token: String,
    pub minimum_qty: Option<i64>,
}

/// Snapshot of the persisted session keys; any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub name: Option<String>,
    pub user_type: Option<String>,
    pub token: Option<String>,
}

impl CurrentUser {
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.trim().parse().ok())
    }

    pub fn kind(&self) -> UserType {
        self.user_type
            .as_deref()
            .map(UserType::from_code)
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    #[instrument(skip_all, fields(user_id = %session.user_id))]
    pub async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.store.set(keys::USER_ID, &session.user_id).await?;
        self.store.set(keys::USER_NAME, &session.name).await?;
        self.store.set(keys::USER_TYPE, &session.user_type).await?;
        self.store.set(keys::TOKEN, &session.token).await?;
        if let Some(min) = session.minimum_qty.filter(|m| *m > 0) {
            self.store.set(keys::MIN_QTY, &min.to_string()).await?;
        }
        Ok(())
    }

    pub async fn current(&self) -> Result<CurrentUser, StoreError> {
        Ok(CurrentUser {
            id: self.store.get(keys::USER_ID).await?,
            name: self.store.get(keys::USER_NAME).await?,
            user_type: self.store.get(keys::USER_TYPE).await?,
            token: self.store.get(keys::TOKEN).await?,
        })
    }

    /// Removes the four session keys. Cached scalars are left in place.
    #[instrument(skip_all)]
    pub async fn clear(&self) -> Result<(), StoreError> {
        for key in [keys::USER_ID, keys::USER_NAME, keys::USER_TYPE, keys::TOKEN] {
            self.store.remove(key).await?;
        }
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(keys::USER_ID)
            .await?
            .is_some_and(|id| !id.trim().is_empty()))
    }

    pub async fn user_id(&self) -> Result<Option<i64>, StoreError> {
        Ok(self
            .store
            .get(keys::USER_ID)
            .await?
            .and_then(|id| id.trim().parse().ok()))
    }

    pub async fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(keys::TOKEN)
            .await?
            .filter(|t| !t.is_empty()))
    }

    pub async fn cart_count(&self) -> Result<u32, StoreError> {
        Ok(self
            .store
            .get(keys::CART_COUNT)
            .await?
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0))
    }

    pub async fn set_cart_count(&self, count: usize) -> Result<(), StoreError> {
        self.store.set(keys::CART_COUNT, &count.to_string()).await
    }

    pub async fn delivery_charge(&self) -> Result<Option<Decimal>, StoreError> {
        let raw = self.store.get(keys::DELIVERY_CHARGE).await?;
        Ok(raw.and_then(|v| match Decimal::from_str(v.trim()) {
            Ok(d) => Some(d),
            Err(err) => {
                warn!(%err, value = %v, "ignoring unparseable cached delivery charge");
                None
            }
        }))
    }

    pub async fn set_delivery_charge(&self, charge: Decimal) -> Result<(), StoreError> {
        self.store
            .set(keys::DELIVERY_CHARGE, &charge.normalize().to_string())
            .await
    }

    pub async fn minimum_qty(&self) -> Result<Option<i64>, StoreError> {
        Ok(self
            .store
            .get(keys::MIN_QTY)
            .await?
            .and_then(|v| v.trim().parse().ok()))
    }

    pub async fn notifications_enabled(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(keys::NOTIFICATIONS)
            .await?
            .map(|v| v != "0")
            .unwrap_or(true))
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.store
            .set(keys::NOTIFICATIONS, if enabled { "1" } else { "0" })
            .await
    }

    /// Per-install identifier, generated on first use.
    pub async fn device_id(&self) -> Result<String, StoreError> {
        if let Some(id) = self.store.get(keys::DEVICE_ID).await? {
            return Ok(id);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.store.set(keys::DEVICE_ID, &id).await?;
        Ok(id)
    }
}
