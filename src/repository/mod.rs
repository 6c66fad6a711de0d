//! Repository layer: store traits and their implementations
//!
//! Services only see the [`Store`] trait object. [`Repository`] implements it
//! on PostgreSQL; [`memory::MemoryStore`] keeps everything in process.

pub mod equipment;
pub mod logs;
pub mod memory;
pub mod profiles;
pub mod transactions;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, EquipmentQuery, UpdateEquipment},
        log::AuditStamp,
        profile::{NewProfile, ProfileCredentials},
        Equipment, EquipmentWithHistory, LogEntry, Movement, Profile, ProfileShort, Transaction,
    },
};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile_create(&self, profile: &NewProfile) -> AppResult<Profile>;

    /// Not-found if the profile does not exist
    async fn profile_get(&self, id: Uuid) -> AppResult<Profile>;

    /// Case-insensitive lookup used at sign-in
    async fn profile_get_credentials(&self, email: &str) -> AppResult<Option<ProfileCredentials>>;

    async fn profile_list(&self) -> AppResult<Vec<ProfileShort>>;
}

#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// All equipment matching the category filter, oldest first, each with
    /// its transactions (joined with the acting usernames)
    async fn equipment_list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentWithHistory>>;

    async fn equipment_get(&self, id: i32) -> AppResult<EquipmentWithHistory>;

    /// Insert the equipment and its audit entry in one transaction
    async fn equipment_create(&self, data: &CreateEquipment, audit: &AuditStamp) -> AppResult<Equipment>;

    async fn equipment_update(&self, id: i32, data: &UpdateEquipment, audit: &AuditStamp) -> AppResult<Equipment>;

    /// Delete the equipment (its transactions cascade) and append the audit entry
    async fn equipment_delete(&self, id: i32, audit: &AuditStamp) -> AppResult<()>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Atomically: check the transition against the resolved holder, insert
    /// the transaction, update the equipment status and append the log entry
    async fn record_movement(&self, movement: &Movement) -> AppResult<Transaction>;

    /// Transactions of one equipment, newest first
    async fn transaction_list(&self, equipment_id: i32) -> AppResult<Vec<Transaction>>;
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Audit trail, newest first
    async fn log_list(&self) -> AppResult<Vec<LogEntry>>;
}

#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Cheapest round trip that proves the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Everything the services need from persistence
pub trait Store: ProfileStore + EquipmentStore + TransactionStore + LogStore + HealthStore {}

impl<T> Store for T where T: ProfileStore + EquipmentStore + TransactionStore + LogStore + HealthStore {}

/// PostgreSQL store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
