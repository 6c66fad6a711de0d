//! Audit log service

use std::sync::Arc;

use crate::{error::AppResult, models::LogEntry, repository::Store};

#[derive(Clone)]
pub struct LogsService {
    store: Arc<dyn Store>,
}

impl LogsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Audit trail, newest first
    pub async fn list(&self) -> AppResult<Vec<LogEntry>> {
        self.store.log_list().await
    }
}
