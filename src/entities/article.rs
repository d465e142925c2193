use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity-tracked inventory item.
///
/// `stock_current` is never written directly by callers; it only moves
/// through the stock primitive that records the matching ledger row in the
/// same transaction. Thresholds: `stock_max` and `reorder_point`, when set,
/// are both `>= stock_min`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit of measure, free text (e.g. "UN", "KG", "CAJA")
    pub unit: String,
    pub brand: Option<String>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub stock_current: Decimal,
    pub stock_min: Decimal,
    pub stock_max: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub active: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.updated_at {
            active_model.updated_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}

impl Model {
    /// Stock at or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.stock_current <= self.stock_min
    }

    /// Stock at or below the reorder point, when one is configured.
    pub fn needs_reorder(&self) -> bool {
        self.reorder_point
            .map(|p| self.stock_current <= p)
            .unwrap_or(false)
    }
}
