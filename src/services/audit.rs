use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::audit_log;
use crate::errors::ServiceError;

/// Appends one audit row inside the caller's transaction.
pub async fn record<C>(
    db: &C,
    entity_type: &str,
    entity_id: Uuid,
    action: &str,
    actor: Uuid,
    details: Option<Value>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    audit_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set(entity_type.to_string()),
        entity_id: Set(entity_id),
        action: Set(action.to_string()),
        actor: Set(actor),
        details: Set(details),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(ServiceError::db_error)?;

    Ok(())
}
