use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{article, asset};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewArticle {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "unit is required"))]
    pub unit: String,
    pub brand: Option<String>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub stock_min: Decimal,
    pub stock_max: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAsset {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub requires_serial: bool,
    pub workshop: Option<String>,
    pub provenance: Option<String>,
    pub location_id: Option<Uuid>,
    pub created_by: Uuid,
}

/// Registry of inventoriable items: quantity-tracked articles and
/// individually tracked assets.
pub struct ItemService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an article with zero stock. Stock only moves afterwards,
    /// through ledger-recording movements.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_article(&self, input: NewArticle) -> Result<article::Model, ServiceError> {
        input.validate()?;
        validate_thresholds(input.stock_min, input.stock_max, input.reorder_point)?;
        let code = input.code.trim().to_uppercase();

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let existing = article::Entity::find()
            .filter(article::Column::Code.eq(code.as_str()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Article code {} already exists",
                code
            )));
        }

        let now = Utc::now();
        let created = article::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            description: Set(input.description),
            unit: Set(input.unit),
            brand: Set(input.brand),
            category_id: Set(input.category_id),
            location_id: Set(input.location_id),
            stock_current: Set(Decimal::ZERO),
            stock_min: Set(input.stock_min),
            stock_max: Set(input.stock_max),
            reorder_point: Set(input.reorder_point),
            active: Set(true),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "article",
            created.id,
            "create",
            input.created_by,
            Some(json!({ "code": created.code })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(article_id = %created.id, code = %created.code, "article created");
        self.event_sender
            .send(Event::ArticleCreated {
                article_id: created.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_asset(&self, input: NewAsset) -> Result<asset::Model, ServiceError> {
        input.validate()?;
        if input.requires_serial && input.serial_number.as_deref().unwrap_or("").is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Asset {} requires a serial number",
                input.code
            )));
        }
        let code = input.code.trim().to_uppercase();

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let existing = asset::Entity::find()
            .filter(asset::Column::Code.eq(code.as_str()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Asset code {} already exists",
                code
            )));
        }

        let now = Utc::now();
        let created = asset::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            description: Set(input.description),
            serial_number: Set(input.serial_number),
            requires_serial: Set(input.requires_serial),
            workshop: Set(input.workshop),
            provenance: Set(input.provenance),
            location_id: Set(input.location_id),
            active: Set(true),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "asset",
            created.id,
            "create",
            input.created_by,
            Some(json!({ "code": created.code })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(asset_id = %created.id, code = %created.code, "asset created");
        self.event_sender
            .send(Event::AssetCreated {
                asset_id: created.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    pub async fn get_article(&self, article_id: Uuid) -> Result<article::Model, ServiceError> {
        article::Entity::find_by_id(article_id)
            .filter(article::Column::Deleted.eq(false))
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Article {}", article_id)))
    }

    pub async fn get_asset(&self, asset_id: Uuid) -> Result<asset::Model, ServiceError> {
        asset::Entity::find_by_id(asset_id)
            .filter(asset::Column::Deleted.eq(false))
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {}", asset_id)))
    }

    /// Soft-deletes an article. Rejected while stock remains: the ledger
    /// must account for every unit before the article disappears from view.
    #[instrument(skip(self))]
    pub async fn soft_delete_article(
        &self,
        article_id: Uuid,
        actor: Uuid,
    ) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let article = article::Entity::find_by_id(article_id)
            .filter(article::Column::Deleted.eq(false))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Article {}", article_id)))?;

        if article.stock_current > Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(format!(
                "Article {} still has {} in stock",
                article.code, article.stock_current
            )));
        }

        let code = article.code.clone();
        let mut active_article: article::ActiveModel = article.into();
        active_article.deleted = Set(true);
        active_article.active = Set(false);
        active_article.updated_at = Set(Utc::now());
        active_article
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "article",
            article_id,
            "delete",
            actor,
            Some(json!({ "code": code })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(%article_id, "article soft-deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn soft_delete_asset(&self, asset_id: Uuid, actor: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let asset = asset::Entity::find_by_id(asset_id)
            .filter(asset::Column::Deleted.eq(false))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {}", asset_id)))?;

        let code = asset.code.clone();
        let mut active_asset: asset::ActiveModel = asset.into();
        active_asset.deleted = Set(true);
        active_asset.active = Set(false);
        active_asset.updated_at = Set(Utc::now());
        active_asset
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "asset",
            asset_id,
            "delete",
            actor,
            Some(json!({ "code": code })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(%asset_id, "asset soft-deleted");
        Ok(())
    }

    /// Active articles at or below their minimum stock.
    pub async fn low_stock_articles(&self) -> Result<Vec<article::Model>, ServiceError> {
        article::Entity::find()
            .filter(article::Column::Active.eq(true))
            .filter(article::Column::Deleted.eq(false))
            .filter(
                Expr::col(article::Column::StockCurrent).lte(Expr::col(article::Column::StockMin)),
            )
            .order_by_asc(article::Column::Code)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Active articles at or below their reorder point, where one is set.
    pub async fn reorder_needed_articles(&self) -> Result<Vec<article::Model>, ServiceError> {
        article::Entity::find()
            .filter(article::Column::Active.eq(true))
            .filter(article::Column::Deleted.eq(false))
            .filter(article::Column::ReorderPoint.is_not_null())
            .filter(
                Expr::col(article::Column::StockCurrent)
                    .lte(Expr::col(article::Column::ReorderPoint)),
            )
            .order_by_asc(article::Column::Code)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }
}

fn validate_thresholds(
    stock_min: Decimal,
    stock_max: Option<Decimal>,
    reorder_point: Option<Decimal>,
) -> Result<(), ServiceError> {
    if stock_min < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Minimum stock cannot be negative".to_string(),
        ));
    }
    if let Some(max) = stock_max {
        if max < stock_min {
            return Err(ServiceError::ValidationError(format!(
                "Maximum stock {} is below minimum {}",
                max, stock_min
            )));
        }
    }
    if let Some(point) = reorder_point {
        if point < stock_min {
            return Err(ServiceError::ValidationError(format!(
                "Reorder point {} is below minimum stock {}",
                point, stock_min
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn thresholds_must_be_ordered() {
        assert!(validate_thresholds(dec!(5), Some(dec!(100)), Some(dec!(10))).is_ok());
        assert!(validate_thresholds(dec!(5), Some(dec!(3)), None).is_err());
        assert!(validate_thresholds(dec!(5), None, Some(dec!(2))).is_err());
        assert!(validate_thresholds(dec!(-1), None, None).is_err());
    }
}
