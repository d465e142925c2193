use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request line with dispatch progress counters. The delivery service
/// guarantees `quantity_dispatched <= quantity_approved`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_id: Uuid,
    pub article_id: Uuid,
    pub quantity_requested: Decimal,
    pub quantity_approved: Decimal,
    pub quantity_dispatched: Decimal,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::request::Entity",
        from = "Column::RequestId",
        to = "super::request::Column::Id"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::ArticleId",
        to = "super::article::Column::Id"
    )]
    Article,
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Model {
    /// Quantity still awaiting dispatch.
    pub fn quantity_pending(&self) -> Decimal {
        self.quantity_approved - self.quantity_dispatched
    }

    pub fn is_fully_dispatched(&self) -> bool {
        self.quantity_dispatched >= self.quantity_approved
    }
}

impl ActiveModelBehavior for ActiveModel {}
