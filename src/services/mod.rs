//! Business logic services

pub mod auth;
pub mod equipment;
pub mod health;
pub mod logs;
pub mod profiles;
pub mod transactions;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Store};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub equipment: equipment::EquipmentService,
    pub health: health::HealthService,
    pub transactions: transactions::TransactionsService,
    pub profiles: profiles::ProfilesService,
    pub logs: logs::LogsService,
}

impl Services {
    /// Create all services on top of the given store
    pub async fn new(store: Arc<dyn Store>, auth_config: AuthConfig) -> Self {
        let auth = auth::AuthService::new(store.clone(), auth_config);
        auth.subscribe(Arc::new(auth::TracingSessionObserver)).await;

        Self {
            auth,
            equipment: equipment::EquipmentService::new(store.clone()),
            health: health::HealthService::new(store.clone()),
            transactions: transactions::TransactionsService::new(store.clone()),
            profiles: profiles::ProfilesService::new(store.clone()),
            logs: logs::LogsService::new(store),
        }
    }
}
