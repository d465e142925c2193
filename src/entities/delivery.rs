use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemKind;

/// Number prefix for article deliveries.
pub const NUMBER_PREFIX_ARTICLE: &str = "ENT-ART";
/// Number prefix for asset deliveries.
pub const NUMBER_PREFIX_ASSET: &str = "ENT-ACT";

/// Outbound transfer header. One header owns one-or-more lines; article
/// deliveries additionally reference the source location and may fulfill a
/// request.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub kind: ItemKind,
    pub delivery_type_id: Uuid,
    pub status_id: Uuid,
    /// Source location; set for article deliveries only.
    pub source_location_id: Option<Uuid>,
    pub delivered_by: Uuid,
    pub received_by: Uuid,
    pub request_id: Option<Uuid>,
    pub reason: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_line::Entity")]
    Lines,
    #[sea_orm(
        belongs_to = "super::delivery_type::Entity",
        from = "Column::DeliveryTypeId",
        to = "super::delivery_type::Column::Id"
    )]
    DeliveryType,
    #[sea_orm(
        belongs_to = "super::document_status::Entity",
        from = "Column::StatusId",
        to = "super::document_status::Column::Id"
    )]
    Status,
    #[sea_orm(
        belongs_to = "super::request::Entity",
        from = "Column::RequestId",
        to = "super::request::Column::Id"
    )]
    Request,
}

impl Related<super::delivery_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::delivery_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
