//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{
    enums::{EquipmentAction, EquipmentStatus},
    profile::ProfileShort,
    transaction::Transaction,
};
use crate::holder::{self, HolderRef};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    /// Free-text description
    pub description: Option<String>,
    pub serial_number: Option<String>,
    /// Category tag used for filtering
    pub category: Option<String>,
    /// Derived from the transaction log, never written directly by clients
    pub status: EquipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipment together with its full transaction history, as fetched from a store
#[derive(Debug, Clone)]
pub struct EquipmentWithHistory {
    pub equipment: Equipment,
    pub transactions: Vec<Transaction>,
}

/// Equipment as presented to clients: history plus derived holder
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentView {
    #[serde(flatten)]
    pub equipment: Equipment,
    /// Transactions, newest first
    pub transactions: Vec<Transaction>,
    pub current_holder: Option<HolderRef>,
    pub available_actions: Vec<EquipmentAction>,
}

impl From<EquipmentWithHistory> for EquipmentView {
    fn from(record: EquipmentWithHistory) -> Self {
        let current_holder = holder::resolve_holder(&record.transactions);

        let mut transactions = record.transactions;
        transactions.sort_by(|a, b| b.order_key().cmp(&a.order_key()));

        let movement = if current_holder.is_some() {
            EquipmentAction::CheckIn
        } else {
            EquipmentAction::CheckOut
        };

        Self {
            equipment: record.equipment,
            transactions,
            current_holder,
            available_actions: vec![movement, EquipmentAction::Edit, EquipmentAction::Delete],
        }
    }
}

impl EquipmentView {
    pub fn is_held_by(&self, user_id: Uuid) -> bool {
        self.current_holder
            .as_ref()
            .is_some_and(|h| h.user_id == user_id)
    }
}

/// Create equipment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
}

/// Update equipment request
///
/// Absent fields are left untouched. An explicit `null` clears the optional
/// fields (`description`, `serial_number`, `category`).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 100))]
    pub serial_number: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 100))]
    pub category: Option<Option<String>>,
}

/// Query parameters for equipment listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EquipmentQuery {
    /// Only equipment with this category
    pub category: Option<String>,
    /// Only equipment currently held by this profile
    pub holder: Option<Uuid>,
}

/// Dashboard payload: filtered equipment, employee selector and counters
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    pub equipments: Vec<EquipmentView>,
    pub profiles: Vec<ProfileShort>,
    pub total: usize,
    pub available: usize,
}

/// Query parameters for the dashboard
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    pub category: Option<String>,
    /// Employee (profile id) whose held equipment should be shown
    pub employee: Option<Uuid>,
}

impl From<DashboardQuery> for EquipmentQuery {
    fn from(query: DashboardQuery) -> Self {
        Self {
            category: query.category,
            holder: query.employee,
        }
    }
}
