//! Data models for Eqtrack

pub mod enums;
pub mod equipment;
pub mod log;
pub mod profile;
pub mod session;
pub mod transaction;

// Re-export commonly used types
pub use enums::{EquipmentAction, EquipmentStatus, LogAction, TransactionType};
pub use equipment::{Equipment, EquipmentView, EquipmentWithHistory};
pub use log::{LogEntry, NewLogEntry};
pub use profile::{Profile, ProfileShort};
pub use session::{SessionContext, SessionEvent};
pub use transaction::{Movement, Transaction};
