use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entities::{article, movement_type, stock_movement, stock_movement::StockOperation};
use crate::errors::ServiceError;

/// Result of applying one stock change: the article after the update and the
/// ledger row that recorded it.
#[derive(Debug, Clone)]
pub struct StockChange {
    pub article: article::Model,
    pub movement: stock_movement::Model,
}

/// Increases an article's stock and records the matching ledger row.
pub async fn increase_stock<C>(
    db: &C,
    article_id: Uuid,
    quantity: Decimal,
    movement_type_id: Uuid,
    performed_by: Uuid,
    reason: &str,
) -> Result<StockChange, ServiceError>
where
    C: ConnectionTrait,
{
    apply(
        db,
        article_id,
        StockOperation::In,
        quantity,
        movement_type_id,
        performed_by,
        reason,
    )
    .await
}

/// Decreases an article's stock and records the matching ledger row.
pub async fn decrease_stock<C>(
    db: &C,
    article_id: Uuid,
    quantity: Decimal,
    movement_type_id: Uuid,
    performed_by: Uuid,
    reason: &str,
) -> Result<StockChange, ServiceError>
where
    C: ConnectionTrait,
{
    apply(
        db,
        article_id,
        StockOperation::Out,
        quantity,
        movement_type_id,
        performed_by,
        reason,
    )
    .await
}

/// Single write path for `articles.stock_current`.
///
/// Every caller that moves stock goes through here, so the article column
/// and the ledger stay consistent: the before/after snapshots are read and
/// written in the caller's transaction.
pub async fn apply<C>(
    db: &C,
    article_id: Uuid,
    operation: StockOperation,
    quantity: Decimal,
    movement_type_id: Uuid,
    performed_by: Uuid,
    reason: &str,
) -> Result<StockChange, ServiceError>
where
    C: ConnectionTrait,
{
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "Movement quantity must be positive, got {}",
            quantity
        )));
    }

    let article = article::Entity::find_by_id(article_id)
        .filter(article::Column::Deleted.eq(false))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Article {}", article_id)))?;

    if !article.active {
        return Err(ServiceError::InvalidOperation(format!(
            "Article {} is inactive",
            article.code
        )));
    }

    let stock_before = article.stock_current;
    let stock_after = match operation {
        StockOperation::In => {
            let after = stock_before + quantity;
            if let Some(max) = article.stock_max {
                if after > max {
                    return Err(ServiceError::ValidationError(format!(
                        "Entry of {} would exceed maximum stock {} for article {} (current {})",
                        quantity, max, article.code, stock_before
                    )));
                }
            }
            after
        }
        StockOperation::Out => {
            if stock_before < quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Article {} has {} in stock, requested {}",
                    article.code, stock_before, quantity
                )));
            }
            stock_before - quantity
        }
    };

    let mut active_article: article::ActiveModel = article.into();
    active_article.stock_current = Set(stock_after);
    active_article.updated_at = Set(Utc::now());
    let article = active_article
        .update(db)
        .await
        .map_err(ServiceError::db_error)?;

    let movement = stock_movement::ActiveModel {
        id: Set(Uuid::new_v4()),
        article_id: Set(article.id),
        movement_type_id: Set(movement_type_id),
        operation: Set(operation),
        quantity: Set(quantity),
        stock_before: Set(stock_before),
        stock_after: Set(stock_after),
        performed_by: Set(performed_by),
        reason: Set(reason.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(ServiceError::db_error)?;

    Ok(StockChange { article, movement })
}

/// Resolves a movement type by code, falling back to any active type when
/// the code is not configured. An empty catalog is a hard error: a ledger
/// row is never skipped.
pub async fn resolve_movement_type<C>(
    db: &C,
    code: &str,
) -> Result<movement_type::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let by_code = movement_type::Entity::find()
        .filter(movement_type::Column::Code.eq(code))
        .filter(movement_type::Column::Active.eq(true))
        .filter(movement_type::Column::Deleted.eq(false))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?;

    if let Some(movement_type) = by_code {
        return Ok(movement_type);
    }

    movement_type::Entity::find()
        .filter(movement_type::Column::Active.eq(true))
        .filter(movement_type::Column::Deleted.eq(false))
        .order_by_asc(movement_type::Column::Code)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::ValidationError("No active movement type configured".to_string())
        })
}
