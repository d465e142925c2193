use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemKind;

/// Number prefix for article receptions.
pub const NUMBER_PREFIX_ARTICLE: &str = "REC-ART";
/// Number prefix for asset receptions.
pub const NUMBER_PREFIX_ASSET: &str = "REC-ACT";

/// Inbound transfer header, optionally fulfilling a purchase order.
/// Lifecycle: initial status, lines appended while non-terminal, then an
/// explicit confirm or cancel.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub kind: ItemKind,
    pub status_id: Uuid,
    /// Destination location; required for article receptions.
    pub location_id: Option<Uuid>,
    pub received_by: Uuid,
    pub purchase_order_id: Option<Uuid>,
    pub reference_document: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reception_line::Entity")]
    Lines,
    #[sea_orm(
        belongs_to = "super::document_status::Entity",
        from = "Column::StatusId",
        to = "super::document_status::Column::Id"
    )]
    Status,
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::Id"
    )]
    PurchaseOrder,
}

impl Related<super::reception_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
