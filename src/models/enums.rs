//! Shared domain enums, stored as lowercase text columns

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use utoipa::ToSchema;

/// Implements sqlx text (de)serialization through `as_str` / `FromStr`
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <&str as Decode<Postgres>>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Cached availability of an equipment, kept in step with its transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Available,
    Unavailable,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "available",
            EquipmentStatus::Unavailable => "unavailable",
        }
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(EquipmentStatus::Available),
            "unavailable" => Ok(EquipmentStatus::Unavailable),
            _ => Err(format!("Invalid equipment status: {}", s)),
        }
    }
}

text_column!(EquipmentStatus);

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Direction of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    CheckOut,
    CheckIn,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CheckOut => "check_out",
            TransactionType::CheckIn => "check_in",
        }
    }

    /// Status the equipment ends up in once this movement is recorded
    pub fn resulting_status(&self) -> EquipmentStatus {
        match self {
            TransactionType::CheckOut => EquipmentStatus::Unavailable,
            TransactionType::CheckIn => EquipmentStatus::Available,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check_out" => Ok(TransactionType::CheckOut),
            "check_in" => Ok(TransactionType::CheckIn),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

text_column!(TransactionType);

// ---------------------------------------------------------------------------
// LogAction
// ---------------------------------------------------------------------------

/// Audit trail labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    AddedEquipment,
    UpdatedEquipment,
    DeletedEquipment,
    CheckedOut,
    CheckedIn,
    CheckedInAll,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::AddedEquipment => "added new equipment",
            LogAction::UpdatedEquipment => "updated equipment",
            LogAction::DeletedEquipment => "deleted equipment",
            LogAction::CheckedOut => "checked out equipment",
            LogAction::CheckedIn => "checked in equipment",
            LogAction::CheckedInAll => "checked in all equipment",
        }
    }
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EquipmentAction
// ---------------------------------------------------------------------------

/// Actions a client may currently offer on an equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentAction {
    CheckOut,
    CheckIn,
    Edit,
    Delete,
}
