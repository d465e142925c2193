use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-(prefix, day) sequence counter backing document numbering.
///
/// Replaces scan-the-max numbering: the counter row is bumped with a single
/// atomic UPDATE inside the caller's transaction, so two concurrent
/// creations can never compute the same candidate number.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub prefix: String,
    /// Calendar day in `YYYYMMDD` form.
    #[sea_orm(primary_key, auto_increment = false)]
    pub date_key: String,
    pub last_value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
