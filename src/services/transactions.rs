//! Check-out / check-in service

use std::sync::Arc;

use futures::future::join_all;

use crate::{
    error::{AppError, AppResult},
    models::{equipment::EquipmentQuery, transaction::CheckInAllOutcome, EquipmentView, Movement, SessionContext, Transaction},
    repository::Store,
};

#[derive(Clone)]
pub struct TransactionsService {
    store: Arc<dyn Store>,
}

impl TransactionsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Check out equipment on behalf of the acting user
    pub async fn check_out(&self, ctx: &SessionContext, equipment_id: i32) -> AppResult<Transaction> {
        let transaction = self
            .store
            .record_movement(&Movement::check_out(equipment_id, ctx))
            .await?;
        tracing::info!(equipment_id, user_id = %ctx.user_id, "Equipment checked out");
        Ok(transaction)
    }

    /// Check equipment back in; any signed-in user may return an item
    pub async fn check_in(&self, ctx: &SessionContext, equipment_id: i32) -> AppResult<Transaction> {
        let transaction = self
            .store
            .record_movement(&Movement::check_in(equipment_id, ctx))
            .await?;
        tracing::info!(equipment_id, user_id = %ctx.user_id, "Equipment checked in");
        Ok(transaction)
    }

    /// Check in every item the acting user currently holds.
    ///
    /// Each item is its own atomic movement. Items are processed
    /// concurrently; failures are logged one by one and reported together.
    pub async fn check_in_all(&self, ctx: &SessionContext) -> AppResult<CheckInAllOutcome> {
        let held: Vec<i32> = self
            .store
            .equipment_list(&EquipmentQuery::default())
            .await?
            .into_iter()
            .map(EquipmentView::from)
            .filter(|view| view.is_held_by(ctx.user_id))
            .map(|view| view.equipment.id)
            .collect();

        if held.is_empty() {
            return Ok(CheckInAllOutcome::NothingToCheckIn);
        }

        let movements: Vec<Movement> = held
            .iter()
            .map(|id| Movement::bulk_check_in(*id, ctx))
            .collect();
        let results = join_all(movements.iter().map(|m| self.store.record_movement(m))).await;

        let mut failed = 0;
        for (equipment_id, result) in held.iter().zip(&results) {
            if let Err(e) = result {
                failed += 1;
                tracing::error!(equipment_id, user_id = %ctx.user_id, "Check-in failed: {}", e);
            }
        }

        if failed > 0 {
            return Err(AppError::PartialFailure {
                message: "Some equipments failed to check in".to_string(),
                failed,
                total: held.len(),
            });
        }

        tracing::info!(count = held.len(), user_id = %ctx.user_id, "Checked in all held equipment");
        Ok(CheckInAllOutcome::CheckedIn(held))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            equipment::{CreateEquipment, UpdateEquipment},
            log::AuditStamp,
            profile::{NewProfile, ProfileCredentials},
            Equipment, EquipmentStatus, EquipmentWithHistory, LogAction, LogEntry, Profile, ProfileShort,
            TransactionType,
        },
        repository::{memory::MemoryStore, EquipmentStore, HealthStore, LogStore, ProfileStore, TransactionStore},
    };
    use async_trait::async_trait;
    use futures::future::join;
    use std::sync::Mutex;
    use uuid::Uuid;

    async fn profile(store: &MemoryStore, name: &str) -> SessionContext {
        let profile = store
            .profile_create(&NewProfile {
                id: Uuid::new_v4(),
                email: format!("{}@example.com", name),
                username: name.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        SessionContext {
            session_id: Uuid::new_v4(),
            user_id: profile.id,
            username: profile.username,
        }
    }

    async fn equipment(store: &MemoryStore, ctx: &SessionContext, name: &str) -> i32 {
        store
            .equipment_create(
                &CreateEquipment {
                    name: name.to_string(),
                    description: None,
                    serial_number: None,
                    category: None,
                },
                &AuditStamp::new(LogAction::AddedEquipment, ctx),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_check_out_then_in_restores_availability() {
        let store = MemoryStore::new();
        let service = TransactionsService::new(Arc::new(store.clone()));
        let u1 = profile(&store, "u1").await;
        let id = equipment(&store, &u1, "Drill").await;

        let out = service.check_out(&u1, id).await.unwrap();
        assert_eq!(out.transaction_type, TransactionType::CheckOut);
        let back = service.check_in(&u1, id).await.unwrap();
        assert_eq!(back.transaction_type, TransactionType::CheckIn);

        let record = store.equipment_get(id).await.unwrap();
        assert_eq!(record.equipment.status, EquipmentStatus::Available);
        assert_eq!(EquipmentView::from(record).current_holder, None);
    }

    #[tokio::test]
    async fn test_double_check_out_is_rejected() {
        let store = MemoryStore::new();
        let service = TransactionsService::new(Arc::new(store.clone()));
        let u1 = profile(&store, "u1").await;
        let u2 = profile(&store, "u2").await;
        let id = equipment(&store, &u1, "Drill").await;

        service.check_out(&u1, id).await.unwrap();
        let err = service.check_out(&u2, id).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(store.transaction_list(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_by_another_user_releases_item() {
        let store = MemoryStore::new();
        let service = TransactionsService::new(Arc::new(store.clone()));
        let u1 = profile(&store, "u1").await;
        let u2 = profile(&store, "u2").await;
        let id = equipment(&store, &u1, "Drill").await;

        service.check_out(&u1, id).await.unwrap();
        service.check_in(&u2, id).await.unwrap();
        let view = EquipmentView::from(store.equipment_get(id).await.unwrap());
        assert!(view.current_holder.is_none());
    }

    #[tokio::test]
    async fn test_check_in_all_with_nothing_held() {
        let store = MemoryStore::new();
        let service = TransactionsService::new(Arc::new(store.clone()));
        let u1 = profile(&store, "u1").await;
        equipment(&store, &u1, "Drill").await;

        let outcome = service.check_in_all(&u1).await.unwrap();
        assert_eq!(outcome, CheckInAllOutcome::NothingToCheckIn);
        assert_eq!(store.log_list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_all_only_touches_own_items() {
        let store = MemoryStore::new();
        let service = TransactionsService::new(Arc::new(store.clone()));
        let u1 = profile(&store, "u1").await;
        let u2 = profile(&store, "u2").await;
        let a = equipment(&store, &u1, "a").await;
        let b = equipment(&store, &u1, "b").await;
        let c = equipment(&store, &u1, "c").await;

        service.check_out(&u1, a).await.unwrap();
        service.check_out(&u1, b).await.unwrap();
        service.check_out(&u2, c).await.unwrap();

        let outcome = service.check_in_all(&u1).await.unwrap();
        assert_eq!(outcome, CheckInAllOutcome::CheckedIn(vec![a, b]));

        let views: Vec<EquipmentView> = store
            .equipment_list(&EquipmentQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(EquipmentView::from)
            .collect();
        assert!(views[0].current_holder.is_none());
        assert!(views[1].current_holder.is_none());
        assert!(views[2].is_held_by(u2.user_id));

        let logs = store.log_list().await.unwrap();
        let bulk = logs.iter().filter(|l| l.action == "checked in all equipment").count();
        assert_eq!(bulk, 2);
    }

    #[tokio::test]
    async fn test_racing_check_outs_serialize() {
        let store = MemoryStore::new();
        let service = TransactionsService::new(Arc::new(store.clone()));
        let u1 = profile(&store, "u1").await;
        let u2 = profile(&store, "u2").await;
        let id = equipment(&store, &u1, "Drill").await;

        let (first, second) = join(service.check_out(&u1, id), service.check_out(&u2, id)).await;
        let results = [first, second];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::BusinessRule(_))))
                .count(),
            1
        );
        assert_eq!(store.transaction_list(id).await.unwrap().len(), 1);
    }

    /// Memory store wrapper for failure and interleaving scenarios: refuses
    /// movements on `broken`, and records `after_list` movements right after
    /// the first equipment listing has been read.
    struct ScriptedStore {
        inner: MemoryStore,
        broken: Option<i32>,
        after_list: Mutex<Vec<Movement>>,
    }

    impl ScriptedStore {
        fn new(inner: &MemoryStore) -> Self {
            Self {
                inner: inner.clone(),
                broken: None,
                after_list: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProfileStore for ScriptedStore {
        async fn profile_create(&self, profile: &NewProfile) -> AppResult<Profile> {
            self.inner.profile_create(profile).await
        }
        async fn profile_get(&self, id: Uuid) -> AppResult<Profile> {
            self.inner.profile_get(id).await
        }
        async fn profile_get_credentials(&self, email: &str) -> AppResult<Option<ProfileCredentials>> {
            self.inner.profile_get_credentials(email).await
        }
        async fn profile_list(&self) -> AppResult<Vec<ProfileShort>> {
            self.inner.profile_list().await
        }
    }

    #[async_trait]
    impl EquipmentStore for ScriptedStore {
        async fn equipment_list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentWithHistory>> {
            let snapshot = self.inner.equipment_list(query).await?;
            let pending: Vec<Movement> = self.after_list.lock().unwrap().drain(..).collect();
            for movement in &pending {
                self.inner.record_movement(movement).await?;
            }
            Ok(snapshot)
        }
        async fn equipment_get(&self, id: i32) -> AppResult<EquipmentWithHistory> {
            self.inner.equipment_get(id).await
        }
        async fn equipment_create(&self, data: &CreateEquipment, audit: &AuditStamp) -> AppResult<Equipment> {
            self.inner.equipment_create(data, audit).await
        }
        async fn equipment_update(&self, id: i32, data: &UpdateEquipment, audit: &AuditStamp) -> AppResult<Equipment> {
            self.inner.equipment_update(id, data, audit).await
        }
        async fn equipment_delete(&self, id: i32, audit: &AuditStamp) -> AppResult<()> {
            self.inner.equipment_delete(id, audit).await
        }
    }

    #[async_trait]
    impl TransactionStore for ScriptedStore {
        async fn record_movement(&self, movement: &Movement) -> AppResult<Transaction> {
            if Some(movement.equipment_id) == self.broken {
                return Err(AppError::Internal("connection reset".to_string()));
            }
            self.inner.record_movement(movement).await
        }
        async fn transaction_list(&self, equipment_id: i32) -> AppResult<Vec<Transaction>> {
            self.inner.transaction_list(equipment_id).await
        }
    }

    #[async_trait]
    impl LogStore for ScriptedStore {
        async fn log_list(&self) -> AppResult<Vec<LogEntry>> {
            self.inner.log_list().await
        }
    }

    #[async_trait]
    impl HealthStore for ScriptedStore {
        async fn ping(&self) -> AppResult<()> {
            self.inner.ping().await
        }
    }

    #[tokio::test]
    async fn test_check_in_all_reports_partial_failure() {
        let store = MemoryStore::new();
        let u1 = profile(&store, "u1").await;
        let a = equipment(&store, &u1, "a").await;
        let b = equipment(&store, &u1, "b").await;
        let c = equipment(&store, &u1, "c").await;

        let direct = TransactionsService::new(Arc::new(store.clone()));
        for id in [a, b, c] {
            direct.check_out(&u1, id).await.unwrap();
        }

        let service = TransactionsService::new(Arc::new(ScriptedStore {
            broken: Some(b),
            ..ScriptedStore::new(&store)
        }));
        let err = service.check_in_all(&u1).await.unwrap_err();
        match err {
            AppError::PartialFailure { failed, total, .. } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // Successful items stay checked in, the failed one is still held
        let views: Vec<EquipmentView> = store
            .equipment_list(&EquipmentQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(EquipmentView::from)
            .collect();
        assert!(views[0].current_holder.is_none());
        assert!(views[1].is_held_by(u1.user_id));
        assert!(views[2].current_holder.is_none());
    }

    #[tokio::test]
    async fn test_check_in_all_leaves_item_taken_over_after_listing() {
        let store = MemoryStore::new();
        let alice = profile(&store, "alice").await;
        let bob = profile(&store, "bob").await;
        let carol = profile(&store, "carol").await;
        let drill = equipment(&store, &alice, "Drill").await;

        TransactionsService::new(Arc::new(store.clone()))
            .check_out(&alice, drill)
            .await
            .unwrap();

        // Alice's listing still shows her holding the drill, but before her
        // bulk check-in is written Bob returns it and Carol takes it
        let scripted = ScriptedStore::new(&store);
        *scripted.after_list.lock().unwrap() = vec![
            Movement::check_in(drill, &bob),
            Movement::check_out(drill, &carol),
        ];
        let service = TransactionsService::new(Arc::new(scripted));

        let err = service.check_in_all(&alice).await.unwrap_err();
        assert!(matches!(err, AppError::PartialFailure { failed: 1, total: 1, .. }));

        let view = EquipmentView::from(store.equipment_get(drill).await.unwrap());
        assert!(view.is_held_by(carol.user_id));
        assert_eq!(view.equipment.status, EquipmentStatus::Unavailable);
        assert_eq!(store.transaction_list(drill).await.unwrap().len(), 3);
    }
}
