use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod article;
pub mod asset;
pub mod audit_log;
pub mod category;
pub mod delivery;
pub mod delivery_line;
pub mod delivery_type;
pub mod document_counter;
pub mod document_status;
pub mod location;
pub mod movement_type;
pub mod purchase_order;
pub mod purchase_order_line;
pub mod reception;
pub mod reception_line;
pub mod request;
pub mod request_line;
pub mod stock_movement;

/// The two inventoriable item kinds: articles are tracked by aggregate
/// stock count, assets individually with no quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ItemKind {
    #[sea_orm(string_value = "article")]
    Article,
    #[sea_orm(string_value = "asset")]
    Asset,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Article => "article",
            ItemKind::Asset => "asset",
        }
    }
}
