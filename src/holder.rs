//! Current-holder derivation
//!
//! An equipment's holder is never stored; it is derived from its transaction
//! log. Every place that needs to know who holds an item (list and detail
//! views, the per-employee filter, bulk self check-in and the movement
//! precondition in the stores) goes through [`resolve_holder`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Equipment, Transaction, TransactionType},
};

/// The user currently holding an equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HolderRef {
    pub user_id: Uuid,
    pub username: Option<String>,
    /// Date of the check-out that made this user the holder
    pub since: DateTime<Utc>,
}

impl From<&Transaction> for HolderRef {
    fn from(checkout: &Transaction) -> Self {
        Self {
            user_id: checkout.user_id,
            username: checkout.username.clone(),
            since: checkout.transaction_date,
        }
    }
}

fn latest(transactions: &[Transaction], kind: TransactionType) -> Option<&Transaction> {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind)
        .max_by_key(|t| t.order_key())
}

/// Resolve who currently holds an equipment from its (unordered) transaction log.
///
/// The item is held iff there is a check-out and it is ordered after the
/// latest check-in, if any. Transactions are ordered by date, then by id.
pub fn resolve_holder(transactions: &[Transaction]) -> Option<HolderRef> {
    let checkout = latest(transactions, TransactionType::CheckOut)?;
    match latest(transactions, TransactionType::CheckIn) {
        Some(checkin) if checkin.order_key() > checkout.order_key() => None,
        _ => Some(HolderRef::from(checkout)),
    }
}

/// Reject movements that have no transition from the current state:
/// checking out a held item, or checking in an item nobody holds.
///
/// When `expected_holder` is set, a check-in is also rejected unless that
/// user is the one holding the item right now.
pub fn ensure_transition(
    kind: TransactionType,
    expected_holder: Option<Uuid>,
    equipment: &Equipment,
    holder: Option<&HolderRef>,
) -> AppResult<()> {
    match (kind, holder) {
        (TransactionType::CheckIn, Some(current))
            if expected_holder.is_some_and(|expected| expected != current.user_id) =>
        {
            Err(AppError::BusinessRule(format!(
                "Equipment '{}' is now held by {}",
                equipment.name,
                current.username.as_deref().unwrap_or("another user")
            )))
        }
        (TransactionType::CheckOut, Some(current)) => Err(AppError::BusinessRule(format!(
            "Equipment '{}' is already checked out by {}",
            equipment.name,
            current.username.as_deref().unwrap_or("another user")
        ))),
        (TransactionType::CheckIn, None) => Err(AppError::BusinessRule(format!(
            "Equipment '{}' is not checked out",
            equipment.name
        ))),
        _ => Ok(()),
    }
}
