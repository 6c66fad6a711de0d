//! Transaction (check-out / check-in event) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    enums::{LogAction, TransactionType},
    equipment::Equipment,
    log::NewLogEntry,
    session::SessionContext,
};

/// One immutable entry of an equipment's movement log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i32,
    pub equipment_id: i32,
    /// Acting profile
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub transaction_date: DateTime<Utc>,
    /// Acting profile's username, joined on read
    #[sqlx(default)]
    pub username: Option<String>,
}

impl Transaction {
    /// Total order of events: timestamp first, store sequence id on ties
    pub fn order_key(&self) -> (DateTime<Utc>, i32) {
        (self.transaction_date, self.id)
    }
}

/// A check-out or check-in to record atomically with its status change and log entry
#[derive(Debug, Clone)]
pub struct Movement {
    pub equipment_id: i32,
    pub kind: TransactionType,
    pub actor: SessionContext,
    pub action: LogAction,
    /// Only record the movement if this user holds the equipment at write time
    pub expected_holder: Option<Uuid>,
}

impl Movement {
    pub fn check_out(equipment_id: i32, actor: &SessionContext) -> Self {
        Self {
            equipment_id,
            kind: TransactionType::CheckOut,
            actor: actor.clone(),
            action: LogAction::CheckedOut,
            expected_holder: None,
        }
    }

    pub fn check_in(equipment_id: i32, actor: &SessionContext) -> Self {
        Self {
            equipment_id,
            kind: TransactionType::CheckIn,
            actor: actor.clone(),
            action: LogAction::CheckedIn,
            expected_holder: None,
        }
    }

    pub fn log_entry(&self, equipment: &Equipment) -> NewLogEntry {
        NewLogEntry::for_equipment(self.action, &self.actor, equipment)
    }

    /// Check-in issued as part of a bulk self check-in; fails if the actor
    /// no longer holds the equipment when it is written
    pub fn bulk_check_in(equipment_id: i32, actor: &SessionContext) -> Self {
        Self {
            action: LogAction::CheckedInAll,
            expected_holder: Some(actor.user_id),
            ..Self::check_in(equipment_id, actor)
        }
    }
}

/// Outcome of a bulk self check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInAllOutcome {
    /// The acting user held nothing; no write was issued
    NothingToCheckIn,
    /// Every listed equipment was checked in
    CheckedIn(Vec<i32>),
}
