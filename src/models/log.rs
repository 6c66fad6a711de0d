//! Audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{enums::LogAction, equipment::Equipment, session::SessionContext};

/// Audit trail entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LogEntry {
    pub id: i32,
    pub action: String,
    /// Attribute bag (equipment id and name)
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub user_id: Uuid,
    /// Username at the time of the action
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Log entry to append alongside an equipment write
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub action: LogAction,
    pub details: serde_json::Value,
    pub user_id: Uuid,
    pub username: String,
}

impl NewLogEntry {
    pub fn for_equipment(action: LogAction, actor: &SessionContext, equipment: &Equipment) -> Self {
        Self {
            action,
            details: json!({
                "equipment_id": equipment.id,
                "equipment_name": equipment.name,
            }),
            user_id: actor.user_id,
            username: actor.username.clone(),
        }
    }
}

/// Who did what, attached to an equipment write so the store can append
/// the matching log entry in the same transaction
#[derive(Debug, Clone)]
pub struct AuditStamp {
    pub action: LogAction,
    pub actor: SessionContext,
}

impl AuditStamp {
    pub fn new(action: LogAction, actor: &SessionContext) -> Self {
        Self {
            action,
            actor: actor.clone(),
        }
    }

    pub fn entry_for(&self, equipment: &Equipment) -> NewLogEntry {
        NewLogEntry::for_equipment(self.action, &self.actor, equipment)
    }
}
