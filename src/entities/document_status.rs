use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status code receptions are moved to on confirmation, with a fallback to
/// any non-cancelled terminal status of the domain.
pub const CODE_COMPLETED: &str = "COMPLETADA";
/// Status code for cancelled receptions.
pub const CODE_CANCELLED: &str = "CANCELADA";

/// Workflow document families sharing the status catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum StatusDomain {
    #[sea_orm(string_value = "delivery")]
    Delivery,
    #[sea_orm(string_value = "reception")]
    Reception,
    #[sea_orm(string_value = "request")]
    Request,
    #[sea_orm(string_value = "purchase_order")]
    PurchaseOrder,
}

/// Workflow status catalog.
///
/// Statuses are configuration rows, not a hardcoded enum: a document family
/// with no `is_initial` row configured makes document creation fail with a
/// validation error, mirroring how the system is administered.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_statuses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub domain: StatusDomain,
    pub is_initial: bool,
    pub is_terminal: bool,
    pub is_cancelled: bool,
    pub active: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
