use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{article, stock_movement, stock_movement::StockOperation};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::{audit, stock, stock::StockChange};

/// One manual stock movement to record against an article.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordMovementInput {
    pub article_id: Uuid,
    /// Movement type catalog code, e.g. "COMPRA" or "AJUSTE".
    #[validate(length(min = 1, message = "movement type code is required"))]
    pub movement_type_code: String,
    pub quantity: Decimal,
    pub performed_by: Uuid,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

/// Records manual stock entries and exits against the ledger.
pub struct MovementService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MovementService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Records a stock entry (IN movement).
    #[instrument(skip(self, input), fields(article_id = %input.article_id))]
    pub async fn register_entry(
        &self,
        input: RecordMovementInput,
    ) -> Result<StockChange, ServiceError> {
        self.register_movement(StockOperation::In, input).await
    }

    /// Records a stock exit (OUT movement).
    #[instrument(skip(self, input), fields(article_id = %input.article_id))]
    pub async fn register_exit(
        &self,
        input: RecordMovementInput,
    ) -> Result<StockChange, ServiceError> {
        self.register_movement(StockOperation::Out, input).await
    }

    /// Records a movement in the given direction. The article update and the
    /// ledger row commit together or not at all.
    pub async fn register_movement(
        &self,
        operation: StockOperation,
        input: RecordMovementInput,
    ) -> Result<StockChange, ServiceError> {
        input.validate()?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(ServiceError::db_error)?;

        let movement_type = stock::resolve_movement_type(&txn, &input.movement_type_code).await?;
        let change = stock::apply(
            &txn,
            input.article_id,
            operation,
            input.quantity,
            movement_type.id,
            input.performed_by,
            &input.reason,
        )
        .await?;

        audit::record(
            &txn,
            "stock_movement",
            change.movement.id,
            "create",
            input.performed_by,
            Some(json!({
                "operation": operation.as_str(),
                "quantity": input.quantity,
                "stock_after": change.article.stock_current,
            })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(
            movement_id = %change.movement.id,
            article = %change.article.code,
            operation = operation.as_str(),
            quantity = %input.quantity,
            stock_after = %change.article.stock_current,
            "stock movement recorded"
        );

        let event = match operation {
            StockOperation::In => Event::StockIncreased {
                article_id: change.article.id,
                quantity: input.quantity,
                stock_after: change.article.stock_current,
                movement_id: change.movement.id,
            },
            StockOperation::Out => Event::StockDecreased {
                article_id: change.article.id,
                quantity: input.quantity,
                stock_after: change.article.stock_current,
                movement_id: change.movement.id,
            },
        };
        self.event_sender
            .send(event)
            .await
            .map_err(ServiceError::EventError)?;

        Ok(change)
    }

    /// Ledger rows for one article, newest first, optionally capped.
    #[instrument(skip(self))]
    pub async fn article_history(
        &self,
        article_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<stock_movement::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        article::Entity::find_by_id(article_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Article {}", article_id)))?;

        let mut query = stock_movement::Entity::find()
            .filter(stock_movement::Column::ArticleId.eq(article_id))
            .order_by_desc(stock_movement::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        query.all(db).await.map_err(ServiceError::db_error)
    }
}
