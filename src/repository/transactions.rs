//! Transactions repository: movement recording and history

use async_trait::async_trait;
use sqlx::PgConnection;

use super::{logs::insert_log, Repository, TransactionStore};
use crate::{
    error::{AppError, AppResult},
    holder,
    models::{Equipment, Movement, Transaction},
};

/// Transactions of the given equipment, joined with the acting usernames, newest first
pub(crate) async fn transactions_for(conn: &mut PgConnection, equipment_ids: &[i32]) -> AppResult<Vec<Transaction>> {
    if equipment_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT t.id, t.equipment_id, t.user_id, t.transaction_type, t.transaction_date,
               p.username
        FROM transactions t
        LEFT JOIN profiles p ON p.id = t.user_id
        WHERE t.equipment_id = ANY($1)
        ORDER BY t.transaction_date DESC, t.id DESC
        "#,
    )
    .bind(equipment_ids)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

#[async_trait]
impl TransactionStore for Repository {
    async fn record_movement(&self, movement: &Movement) -> AppResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent movements on the same equipment
        let equipment = sqlx::query_as::<_, Equipment>(
            "SELECT * FROM equipments WHERE id = $1 FOR UPDATE",
        )
        .bind(movement.equipment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", movement.equipment_id)))?;

        let history = transactions_for(&mut tx, &[equipment.id]).await?;
        let current = holder::resolve_holder(&history);
        holder::ensure_transition(movement.kind, movement.expected_holder, &equipment, current.as_ref())?;

        let mut created = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (equipment_id, user_id, transaction_type)
            VALUES ($1, $2, $3)
            RETURNING id, equipment_id, user_id, transaction_type, transaction_date
            "#,
        )
        .bind(equipment.id)
        .bind(movement.actor.user_id)
        .bind(movement.kind)
        .fetch_one(&mut *tx)
        .await?;
        created.username = Some(movement.actor.username.clone());

        sqlx::query("UPDATE equipments SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(movement.kind.resulting_status())
            .bind(equipment.id)
            .execute(&mut *tx)
            .await?;

        insert_log(&mut tx, &movement.log_entry(&equipment)).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn transaction_list(&self, equipment_id: i32) -> AppResult<Vec<Transaction>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipments WHERE id = $1)")
            .bind(equipment_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(AppError::NotFound(format!("Equipment {} not found", equipment_id)));
        }

        let mut conn = self.pool.acquire().await?;
        transactions_for(&mut conn, &[equipment_id]).await
    }
}
