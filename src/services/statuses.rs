use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::document_status::{self, StatusDomain, CODE_CANCELLED, CODE_COMPLETED};
use crate::errors::ServiceError;

/// Initial status for a document family. Missing configuration fails the
/// operation; documents are never created without a status.
pub async fn find_initial<C>(
    db: &C,
    domain: StatusDomain,
) -> Result<document_status::Model, ServiceError>
where
    C: ConnectionTrait,
{
    active_statuses(domain)
        .filter(document_status::Column::IsInitial.eq(true))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::InvalidStatus(format!(
                "No initial status configured for domain {:?}",
                domain
            ))
        })
}

/// Completion status: the `COMPLETADA` row when present, otherwise any
/// non-cancelled terminal status of the domain.
pub async fn find_completed<C>(
    db: &C,
    domain: StatusDomain,
) -> Result<document_status::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let by_code = active_statuses(domain)
        .filter(document_status::Column::Code.eq(CODE_COMPLETED))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?;

    if let Some(status) = by_code {
        return Ok(status);
    }

    active_statuses(domain)
        .filter(document_status::Column::IsTerminal.eq(true))
        .filter(document_status::Column::IsCancelled.eq(false))
        .order_by_asc(document_status::Column::Code)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::InvalidStatus(format!(
                "No completion status configured for domain {:?}",
                domain
            ))
        })
}

/// Cancellation status: the `CANCELADA` row when present, otherwise any
/// cancelled status of the domain.
pub async fn find_cancelled<C>(
    db: &C,
    domain: StatusDomain,
) -> Result<document_status::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let by_code = active_statuses(domain)
        .filter(document_status::Column::Code.eq(CODE_CANCELLED))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?;

    if let Some(status) = by_code {
        return Ok(status);
    }

    active_statuses(domain)
        .filter(document_status::Column::IsCancelled.eq(true))
        .order_by_asc(document_status::Column::Code)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::InvalidStatus(format!(
                "No cancellation status configured for domain {:?}",
                domain
            ))
        })
}

/// Looks up a document's current status row.
pub async fn get<C>(db: &C, status_id: uuid::Uuid) -> Result<document_status::Model, ServiceError>
where
    C: ConnectionTrait,
{
    document_status::Entity::find_by_id(status_id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Document status {}", status_id)))
}

fn active_statuses(domain: StatusDomain) -> sea_orm::Select<document_status::Entity> {
    document_status::Entity::find()
        .filter(document_status::Column::Domain.eq(domain))
        .filter(document_status::Column::Active.eq(true))
        .filter(document_status::Column::Deleted.eq(false))
}
