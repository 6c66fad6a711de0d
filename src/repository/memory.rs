// In-memory store for tests and demos
//
// Keeps every collection behind one RwLock so that each write below is
// atomic the same way a database transaction is on the Postgres store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EquipmentStore, HealthStore, LogStore, ProfileStore, TransactionStore};
use crate::{
    error::{AppError, AppResult},
    holder,
    models::{
        equipment::{CreateEquipment, EquipmentQuery, UpdateEquipment},
        log::AuditStamp,
        profile::{NewProfile, ProfileCredentials},
        Equipment, EquipmentStatus, EquipmentWithHistory, LogEntry, Movement, NewLogEntry, Profile,
        ProfileShort, Transaction, TransactionType,
    },
};

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<ProfileCredentials>,
    equipments: BTreeMap<i32, Equipment>,
    transactions: Vec<Transaction>,
    logs: Vec<LogEntry>,
    last_equipment_id: i32,
    last_transaction_id: i32,
    last_log_id: i32,
}

impl Tables {
    fn username_of(&self, user_id: Uuid) -> Option<String> {
        self.profiles
            .iter()
            .find(|p| p.profile.id == user_id)
            .map(|p| p.profile.username.clone())
    }

    /// Transactions of one equipment with usernames joined, newest first
    fn history(&self, equipment_id: i32) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.equipment_id == equipment_id)
            .map(|t| Transaction {
                username: self.username_of(t.user_id),
                ..t.clone()
            })
            .collect();
        rows.sort_by(|a, b| b.order_key().cmp(&a.order_key()));
        rows
    }

    fn equipment(&self, id: i32) -> AppResult<&Equipment> {
        self.equipments
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    fn push_transaction(&mut self, equipment_id: i32, user_id: Uuid, kind: TransactionType, at: DateTime<Utc>) -> Transaction {
        self.last_transaction_id += 1;
        let transaction = Transaction {
            id: self.last_transaction_id,
            equipment_id,
            user_id,
            transaction_type: kind,
            transaction_date: at,
            username: None,
        };
        self.transactions.push(transaction.clone());
        if let Some(equipment) = self.equipments.get_mut(&equipment_id) {
            equipment.status = kind.resulting_status();
            equipment.updated_at = Utc::now();
        }
        Transaction {
            username: self.username_of(user_id),
            ..transaction
        }
    }

    fn push_log(&mut self, entry: NewLogEntry) {
        self.last_log_id += 1;
        self.logs.push(LogEntry {
            id: self.last_log_id,
            action: entry.action.as_str().to_string(),
            details: entry.details,
            user_id: entry.user_id,
            username: entry.username,
            created_at: Utc::now(),
        });
    }
}

/// In-memory store
///
/// Cloning shares the underlying tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a transaction with an explicit date, bypassing the movement
    /// precondition and the audit log
    #[cfg(test)]
    pub(crate) async fn seed_transaction(
        &self,
        equipment_id: i32,
        user_id: Uuid,
        kind: TransactionType,
        at: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        let mut tables = self.tables.write().await;
        tables.equipment(equipment_id)?;
        Ok(tables.push_transaction(equipment_id, user_id, kind, at))
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile_create(&self, profile: &NewProfile) -> AppResult<Profile> {
        let mut tables = self.tables.write().await;
        if tables
            .profiles
            .iter()
            .any(|p| p.profile.email.eq_ignore_ascii_case(&profile.email))
        {
            return Err(AppError::Conflict(format!("Email {} is already registered", profile.email)));
        }

        let created = Profile {
            id: profile.id,
            email: profile.email.clone(),
            username: profile.username.clone(),
            created_at: Utc::now(),
        };
        tables.profiles.push(ProfileCredentials {
            profile: created.clone(),
            password_hash: profile.password_hash.clone(),
        });
        Ok(created)
    }

    async fn profile_get(&self, id: Uuid) -> AppResult<Profile> {
        self.tables
            .read()
            .await
            .profiles
            .iter()
            .find(|p| p.profile.id == id)
            .map(|p| p.profile.clone())
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    async fn profile_get_credentials(&self, email: &str) -> AppResult<Option<ProfileCredentials>> {
        Ok(self
            .tables
            .read()
            .await
            .profiles
            .iter()
            .find(|p| p.profile.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn profile_list(&self) -> AppResult<Vec<ProfileShort>> {
        let mut profiles: Vec<ProfileShort> = self
            .tables
            .read()
            .await
            .profiles
            .iter()
            .map(|p| ProfileShort::from(&p.profile))
            .collect();
        profiles.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(profiles)
    }
}

#[async_trait]
impl EquipmentStore for MemoryStore {
    async fn equipment_list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentWithHistory>> {
        let tables = self.tables.read().await;
        Ok(tables
            .equipments
            .values()
            .filter(|e| match &query.category {
                Some(category) => e.category.as_ref() == Some(category),
                None => true,
            })
            .map(|e| EquipmentWithHistory {
                equipment: e.clone(),
                transactions: tables.history(e.id),
            })
            .collect())
    }

    async fn equipment_get(&self, id: i32) -> AppResult<EquipmentWithHistory> {
        let tables = self.tables.read().await;
        let equipment = tables.equipment(id)?.clone();
        Ok(EquipmentWithHistory {
            transactions: tables.history(id),
            equipment,
        })
    }

    async fn equipment_create(&self, data: &CreateEquipment, audit: &AuditStamp) -> AppResult<Equipment> {
        let mut tables = self.tables.write().await;
        tables.last_equipment_id += 1;
        let now = Utc::now();
        let equipment = Equipment {
            id: tables.last_equipment_id,
            name: data.name.clone(),
            description: data.description.clone(),
            serial_number: data.serial_number.clone(),
            category: data.category.clone(),
            status: EquipmentStatus::Available,
            created_at: now,
            updated_at: now,
        };
        tables.equipments.insert(equipment.id, equipment.clone());
        tables.push_log(audit.entry_for(&equipment));
        Ok(equipment)
    }

    async fn equipment_update(&self, id: i32, data: &UpdateEquipment, audit: &AuditStamp) -> AppResult<Equipment> {
        let mut tables = self.tables.write().await;
        let equipment = tables
            .equipments
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        if let Some(ref name) = data.name {
            equipment.name = name.clone();
        }
        if let Some(description) = &data.description {
            equipment.description = description.clone();
        }
        if let Some(serial_number) = &data.serial_number {
            equipment.serial_number = serial_number.clone();
        }
        if let Some(category) = &data.category {
            equipment.category = category.clone();
        }
        equipment.updated_at = Utc::now();

        let updated = equipment.clone();
        tables.push_log(audit.entry_for(&updated));
        Ok(updated)
    }

    async fn equipment_delete(&self, id: i32, audit: &AuditStamp) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let equipment = tables
            .equipments
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        tables.transactions.retain(|t| t.equipment_id != id);
        tables.push_log(audit.entry_for(&equipment));
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn record_movement(&self, movement: &Movement) -> AppResult<Transaction> {
        let mut tables = self.tables.write().await;
        let equipment = tables.equipment(movement.equipment_id)?.clone();

        if tables.username_of(movement.actor.user_id).is_none() {
            return Err(AppError::NotFound(format!("Profile {} not found", movement.actor.user_id)));
        }

        let current = holder::resolve_holder(&tables.history(equipment.id));
        holder::ensure_transition(movement.kind, movement.expected_holder, &equipment, current.as_ref())?;

        let created = tables.push_transaction(equipment.id, movement.actor.user_id, movement.kind, Utc::now());
        tables.push_log(movement.log_entry(&equipment));
        Ok(created)
    }

    async fn transaction_list(&self, equipment_id: i32) -> AppResult<Vec<Transaction>> {
        let tables = self.tables.read().await;
        tables.equipment(equipment_id)?;
        Ok(tables.history(equipment_id))
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn log_list(&self) -> AppResult<Vec<LogEntry>> {
        let mut logs = self.tables.read().await.logs.clone();
        logs.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(logs)
    }
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }
}
