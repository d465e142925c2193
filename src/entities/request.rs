use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal demand for items awaiting approval and dispatch.
///
/// External aggregate from the core's point of view: the delivery service
/// reads per-line approved/dispatched quantities, writes dispatched
/// quantities, and moves the header to its terminal status once every line
/// is fully dispatched.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub requested_by: Uuid,
    pub status_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::request_line::Entity")]
    Lines,
    #[sea_orm(
        belongs_to = "super::document_status::Entity",
        from = "Column::StatusId",
        to = "super::document_status::Column::Id"
    )]
    Status,
}

impl Related<super::request_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
