//! Equipment service: views with derived holders, management and dashboard

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, Dashboard, DashboardQuery, EquipmentQuery, UpdateEquipment},
        log::AuditStamp,
        Equipment, EquipmentView, LogAction, SessionContext, Transaction,
    },
    repository::Store,
};

#[derive(Clone)]
pub struct EquipmentService {
    store: Arc<dyn Store>,
}

impl EquipmentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List equipment with their current holder attached.
    ///
    /// When `query.holder` is set only items held by that profile are kept,
    /// in the order the store returned them.
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentView>> {
        let mut views: Vec<EquipmentView> = self
            .store
            .equipment_list(query)
            .await?
            .into_iter()
            .map(EquipmentView::from)
            .collect();

        if let Some(employee) = query.holder {
            views.retain(|view| view.is_held_by(employee));
        }

        Ok(views)
    }

    pub async fn get(&self, id: i32) -> AppResult<EquipmentView> {
        self.store.equipment_get(id).await.map(EquipmentView::from)
    }

    pub async fn create(&self, ctx: &SessionContext, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let equipment = self
            .store
            .equipment_create(data, &AuditStamp::new(LogAction::AddedEquipment, ctx))
            .await?;
        tracing::info!(equipment_id = equipment.id, user_id = %ctx.user_id, "Equipment added");
        Ok(equipment)
    }

    pub async fn update(&self, ctx: &SessionContext, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.store
            .equipment_update(id, data, &AuditStamp::new(LogAction::UpdatedEquipment, ctx))
            .await
    }

    pub async fn delete(&self, ctx: &SessionContext, id: i32) -> AppResult<()> {
        self.store
            .equipment_delete(id, &AuditStamp::new(LogAction::DeletedEquipment, ctx))
            .await?;
        tracing::info!(equipment_id = id, user_id = %ctx.user_id, "Equipment deleted");
        Ok(())
    }

    /// Transaction history of one equipment, newest first
    pub async fn history(&self, id: i32) -> AppResult<Vec<Transaction>> {
        self.store.transaction_list(id).await
    }

    /// Filtered equipment, the employee selector and availability counters
    pub async fn dashboard(&self, query: DashboardQuery) -> AppResult<Dashboard> {
        let equipments = self.list(&query.into()).await?;
        let profiles = self.store.profile_list().await?;
        let available = equipments
            .iter()
            .filter(|view| view.current_holder.is_none())
            .count();

        Ok(Dashboard {
            total: equipments.len(),
            available,
            equipments,
            profiles,
        })
    }
}
