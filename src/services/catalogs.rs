use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    article, category, delivery_type, document_status, document_status::StatusDomain, location,
    movement_type, stock_movement,
};
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::services::audit;

/// Input shared by the plain code/name catalogs.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCatalogEntry {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDocumentStatus {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub domain: StatusDomain,
    pub is_initial: bool,
    pub is_terminal: bool,
    pub is_cancelled: bool,
    pub created_by: Uuid,
}

/// Administration of the configuration catalogs the document services
/// resolve at runtime: categories, locations, movement types, delivery
/// types and workflow statuses.
pub struct CatalogService {
    db_pool: Arc<DbPool>,
    #[allow(dead_code)]
    event_sender: Arc<EventSender>,
}

macro_rules! catalog_create {
    ($fn_name:ident, $module:ident, $entity_name:literal) => {
        #[instrument(skip(self, input), fields(code = %input.code))]
        pub async fn $fn_name(
            &self,
            input: NewCatalogEntry,
        ) -> Result<$module::Model, ServiceError> {
            input.validate()?;

            let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

            let existing = $module::Entity::find()
                .filter($module::Column::Code.eq(input.code.as_str()))
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            if existing.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "{} code {} already exists",
                    $entity_name, input.code
                )));
            }

            let now = Utc::now();
            let created = $module::ActiveModel {
                id: Set(Uuid::new_v4()),
                code: Set(input.code),
                name: Set(input.name),
                description: Set(input.description),
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
                $entity_name,
                created.id,
                "create",
                input.created_by,
                Some(json!({ "code": created.code })),
            )
            .await?;

            txn.commit().await.map_err(ServiceError::db_error)?;
            info!(id = %created.id, code = %created.code, entity = $entity_name, "catalog entry created");
            Ok(created)
        }
    };
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    catalog_create!(create_category, category, "category");
    catalog_create!(create_location, location, "location");
    catalog_create!(create_movement_type, movement_type, "movement_type");
    catalog_create!(create_delivery_type, delivery_type, "delivery_type");

    #[instrument(skip(self, input), fields(code = %input.code, domain = ?input.domain))]
    pub async fn create_status(
        &self,
        input: NewDocumentStatus,
    ) -> Result<document_status::Model, ServiceError> {
        input.validate()?;
        if input.is_cancelled && !input.is_terminal {
            return Err(ServiceError::ValidationError(
                "A cancelled status must also be terminal".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let existing = document_status::Entity::find()
            .filter(document_status::Column::Domain.eq(input.domain))
            .filter(document_status::Column::Code.eq(input.code.as_str()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Status {} already exists for domain {:?}",
                input.code, input.domain
            )));
        }

        let now = Utc::now();
        let created = document_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            domain: Set(input.domain),
            is_initial: Set(input.is_initial),
            is_terminal: Set(input.is_terminal),
            is_cancelled: Set(input.is_cancelled),
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
            "document_status",
            created.id,
            "create",
            input.created_by,
            Some(json!({ "code": created.code, "domain": created.domain })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(id = %created.id, code = %created.code, "document status created");
        Ok(created)
    }

    /// Soft-deletes a category. Rejected while live articles still point at
    /// it.
    #[instrument(skip(self))]
    pub async fn soft_delete_category(
        &self,
        category_id: Uuid,
        actor: Uuid,
    ) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let cat = category::Entity::find_by_id(category_id)
            .filter(category::Column::Deleted.eq(false))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {}", category_id)))?;

        let in_use = article::Entity::find()
            .filter(article::Column::CategoryId.eq(category_id))
            .filter(article::Column::Deleted.eq(false))
            .count(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if in_use > 0 {
            return Err(ServiceError::Conflict(format!(
                "Category {} is referenced by {} article(s)",
                cat.code, in_use
            )));
        }

        let code = cat.code.clone();
        let mut active_cat: category::ActiveModel = cat.into();
        active_cat.deleted = Set(true);
        active_cat.active = Set(false);
        active_cat.updated_at = Set(Utc::now());
        active_cat
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "category",
            category_id,
            "delete",
            actor,
            Some(json!({ "code": code })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(%category_id, "category soft-deleted");
        Ok(())
    }

    /// Soft-deletes a movement type. Ledger rows that already reference it
    /// keep doing so; only new movements stop resolving it.
    #[instrument(skip(self))]
    pub async fn soft_delete_movement_type(
        &self,
        movement_type_id: Uuid,
        actor: Uuid,
    ) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let mt = movement_type::Entity::find_by_id(movement_type_id)
            .filter(movement_type::Column::Deleted.eq(false))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Movement type {}", movement_type_id)))?;

        let code = mt.code.clone();
        let mut active_mt: movement_type::ActiveModel = mt.into();
        active_mt.deleted = Set(true);
        active_mt.active = Set(false);
        active_mt.updated_at = Set(Utc::now());
        active_mt
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "movement_type",
            movement_type_id,
            "delete",
            actor,
            Some(json!({ "code": code })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(%movement_type_id, "movement type soft-deleted");
        Ok(())
    }

    /// Ledger rows recorded against a movement type; used by admin views.
    pub async fn movement_type_usage(&self, movement_type_id: Uuid) -> Result<u64, ServiceError> {
        stock_movement::Entity::find()
            .filter(stock_movement::Column::MovementTypeId.eq(movement_type_id))
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }
}
