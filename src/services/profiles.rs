//! Profiles service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Profile, ProfileShort},
    repository::Store,
};

#[derive(Clone)]
pub struct ProfilesService {
    store: Arc<dyn Store>,
}

impl ProfilesService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All profiles, ordered by username
    pub async fn list(&self) -> AppResult<Vec<ProfileShort>> {
        self.store.profile_list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Profile> {
        self.store.profile_get(id).await
    }
}
