//! Equipment repository

use std::collections::HashMap;

use async_trait::async_trait;

use super::{logs::insert_log, transactions::transactions_for, EquipmentStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, EquipmentQuery, UpdateEquipment},
        log::AuditStamp,
        Equipment, EquipmentWithHistory,
    },
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Equipment {} not found", id))
}

#[async_trait]
impl EquipmentStore for Repository {
    async fn equipment_list(&self, query: &EquipmentQuery) -> AppResult<Vec<EquipmentWithHistory>> {
        let equipments = match &query.category {
            Some(category) => {
                sqlx::query_as::<_, Equipment>(
                    "SELECT * FROM equipments WHERE category = $1 ORDER BY id",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Equipment>("SELECT * FROM equipments ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let ids: Vec<i32> = equipments.iter().map(|e| e.id).collect();
        let mut conn = self.pool.acquire().await?;
        let mut by_equipment: HashMap<i32, Vec<_>> = HashMap::new();
        for transaction in transactions_for(&mut conn, &ids).await? {
            by_equipment
                .entry(transaction.equipment_id)
                .or_default()
                .push(transaction);
        }

        Ok(equipments
            .into_iter()
            .map(|equipment| EquipmentWithHistory {
                transactions: by_equipment.remove(&equipment.id).unwrap_or_default(),
                equipment,
            })
            .collect())
    }

    async fn equipment_get(&self, id: i32) -> AppResult<EquipmentWithHistory> {
        let equipment = sqlx::query_as::<_, Equipment>("SELECT * FROM equipments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut conn = self.pool.acquire().await?;
        let transactions = transactions_for(&mut conn, &[id]).await?;

        Ok(EquipmentWithHistory {
            equipment,
            transactions,
        })
    }

    async fn equipment_create(&self, data: &CreateEquipment, audit: &AuditStamp) -> AppResult<Equipment> {
        let mut tx = self.pool.begin().await?;

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipments (name, description, serial_number, category)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.serial_number)
        .bind(&data.category)
        .fetch_one(&mut *tx)
        .await?;

        insert_log(&mut tx, &audit.entry_for(&equipment)).await?;
        tx.commit().await?;

        Ok(equipment)
    }

    async fn equipment_update(&self, id: i32, data: &UpdateEquipment, audit: &AuditStamp) -> AppResult<Equipment> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.description, "description");
        add_field!(data.serial_number, "serial_number");
        add_field!(data.category, "category");

        let query = format!(
            "UPDATE equipments SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.description);
        bind_field!(data.serial_number);
        bind_field!(data.category);

        let mut tx = self.pool.begin().await?;

        let equipment = builder
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        insert_log(&mut tx, &audit.entry_for(&equipment)).await?;
        tx.commit().await?;

        Ok(equipment)
    }

    async fn equipment_delete(&self, id: i32, audit: &AuditStamp) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let equipment = sqlx::query_as::<_, Equipment>("DELETE FROM equipments WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        insert_log(&mut tx, &audit.entry_for(&equipment)).await?;
        tx.commit().await?;

        Ok(())
    }
}
