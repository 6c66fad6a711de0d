//! Store readiness

use std::sync::Arc;

use crate::{error::AppResult, repository::Store};

#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn Store>,
}

impl HealthService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fails if the store cannot be reached
    pub async fn check(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
