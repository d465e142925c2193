use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    asset, delivery, delivery_line, delivery_type, document_status::StatusDomain, movement_type,
    request, request_line, ItemKind,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::{audit, numbering, statuses, stock};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewArticleDelivery {
    pub delivery_type_id: Uuid,
    pub source_location_id: Option<Uuid>,
    pub delivered_by: Uuid,
    pub received_by: Uuid,
    /// When set, every line must reconcile against a line of this request.
    pub request_id: Option<Uuid>,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<NewArticleDeliveryLine>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewArticleDeliveryLine {
    pub article_id: Uuid,
    pub quantity: Decimal,
    pub request_line_id: Option<Uuid>,
    pub lot: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAssetDelivery {
    pub delivery_type_id: Uuid,
    pub delivered_by: Uuid,
    pub received_by: Uuid,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<NewAssetDeliveryLine>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewAssetDeliveryLine {
    pub asset_id: Uuid,
    pub physical_condition: Option<String>,
    pub notes: Option<String>,
}

/// A delivery with its persisted lines.
#[derive(Debug, Clone)]
pub struct DeliveryWithLines {
    pub delivery: delivery::Model,
    pub lines: Vec<delivery_line::Model>,
}

/// Outbound deliveries: article deliveries decrement stock line by line and
/// reconcile request dispatch counters; asset deliveries hand over
/// individually tracked items without touching the ledger.
pub struct DeliveryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DeliveryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an article delivery. Header, lines, stock decrements, ledger
    /// rows and request counters commit atomically; any line failure voids
    /// the whole document.
    #[instrument(skip(self, input), fields(lines = input.lines.len()))]
    pub async fn create_article_delivery(
        &self,
        input: NewArticleDelivery,
    ) -> Result<DeliveryWithLines, ServiceError> {
        input.validate()?;

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;
        let mut events = Vec::new();

        self.check_delivery_type(&txn, input.delivery_type_id).await?;
        let initial = statuses::find_initial(&txn, StatusDomain::Delivery).await?;
        let number =
            numbering::next_document_number(&txn, delivery::NUMBER_PREFIX_ARTICLE, Utc::now().date_naive())
                .await?;
        let movement_type = stock::resolve_movement_type(&txn, movement_type::CODE_DELIVERY).await?;

        let now = Utc::now();
        let header = delivery::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number.clone()),
            kind: Set(ItemKind::Article),
            delivery_type_id: Set(input.delivery_type_id),
            status_id: Set(initial.id),
            source_location_id: Set(input.source_location_id),
            delivered_by: Set(input.delivered_by),
            received_by: Set(input.received_by),
            request_id: Set(input.request_id),
            reason: Set(input.reason),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            if let Some(request_line_id) = line.request_line_id {
                self.reconcile_request_line(&txn, &input.request_id, line, request_line_id)
                    .await?;
            }

            let change = stock::decrease_stock(
                &txn,
                line.article_id,
                line.quantity,
                movement_type.id,
                input.delivered_by,
                &format!("Delivery {}", number),
            )
            .await?;
            events.push(Event::StockDecreased {
                article_id: change.article.id,
                quantity: line.quantity,
                stock_after: change.article.stock_current,
                movement_id: change.movement.id,
            });

            let persisted = delivery_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                delivery_id: Set(header.id),
                article_id: Set(Some(line.article_id)),
                asset_id: Set(None),
                request_line_id: Set(line.request_line_id),
                quantity: Set(line.quantity),
                lot: Set(line.lot.clone()),
                serial_number: Set(None),
                physical_condition: Set(None),
                notes: Set(line.notes.clone()),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            lines.push(persisted);
        }

        if let Some(request_id) = input.request_id {
            if self.close_request_if_dispatched(&txn, request_id).await? {
                events.push(Event::RequestFullyDispatched { request_id });
            }
        }

        audit::record(
            &txn,
            "delivery",
            header.id,
            "create",
            input.delivered_by,
            Some(json!({ "number": header.number, "kind": header.kind, "lines": lines.len() })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(delivery_id = %header.id, number = %header.number, "article delivery created");
        events.push(Event::DeliveryCreated {
            delivery_id: header.id,
            number: header.number.clone(),
            kind: ItemKind::Article,
        });
        self.publish(events).await?;

        Ok(DeliveryWithLines {
            delivery: header,
            lines,
        })
    }

    /// Creates an asset delivery. Assets carry no quantity; each line hands
    /// over one asset and records its serial and physical condition.
    #[instrument(skip(self, input), fields(lines = input.lines.len()))]
    pub async fn create_asset_delivery(
        &self,
        input: NewAssetDelivery,
    ) -> Result<DeliveryWithLines, ServiceError> {
        input.validate()?;

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        self.check_delivery_type(&txn, input.delivery_type_id).await?;
        let initial = statuses::find_initial(&txn, StatusDomain::Delivery).await?;
        let number =
            numbering::next_document_number(&txn, delivery::NUMBER_PREFIX_ASSET, Utc::now().date_naive())
                .await?;

        let now = Utc::now();
        let header = delivery::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number),
            kind: Set(ItemKind::Asset),
            delivery_type_id: Set(input.delivery_type_id),
            status_id: Set(initial.id),
            source_location_id: Set(None),
            delivered_by: Set(input.delivered_by),
            received_by: Set(input.received_by),
            request_id: Set(None),
            reason: Set(input.reason),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let asset = asset::Entity::find_by_id(line.asset_id)
                .filter(asset::Column::Deleted.eq(false))
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| ServiceError::NotFound(format!("Asset {}", line.asset_id)))?;
            if !asset.active {
                return Err(ServiceError::InvalidOperation(format!(
                    "Asset {} is inactive",
                    asset.code
                )));
            }

            let persisted = delivery_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                delivery_id: Set(header.id),
                article_id: Set(None),
                asset_id: Set(Some(asset.id)),
                request_line_id: Set(None),
                quantity: Set(Decimal::ONE),
                lot: Set(None),
                serial_number: Set(asset.serial_number.clone()),
                physical_condition: Set(line.physical_condition.clone()),
                notes: Set(line.notes.clone()),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            lines.push(persisted);
        }

        audit::record(
            &txn,
            "delivery",
            header.id,
            "create",
            input.delivered_by,
            Some(json!({ "number": header.number, "kind": header.kind, "lines": lines.len() })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(delivery_id = %header.id, number = %header.number, "asset delivery created");
        self.publish(vec![Event::DeliveryCreated {
            delivery_id: header.id,
            number: header.number.clone(),
            kind: ItemKind::Asset,
        }])
        .await?;

        Ok(DeliveryWithLines {
            delivery: header,
            lines,
        })
    }

    pub async fn get_delivery(&self, delivery_id: Uuid) -> Result<DeliveryWithLines, ServiceError> {
        let db = self.db_pool.as_ref();
        let header = delivery::Entity::find_by_id(delivery_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Delivery {}", delivery_id)))?;
        let lines = delivery_line::Entity::find()
            .filter(delivery_line::Column::DeliveryId.eq(delivery_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(DeliveryWithLines {
            delivery: header,
            lines,
        })
    }

    async fn check_delivery_type(
        &self,
        txn: &DatabaseTransaction,
        delivery_type_id: Uuid,
    ) -> Result<(), ServiceError> {
        let dt = delivery_type::Entity::find_by_id(delivery_type_id)
            .filter(delivery_type::Column::Deleted.eq(false))
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Delivery type {}", delivery_type_id)))?;
        if !dt.active {
            return Err(ServiceError::InvalidOperation(format!(
                "Delivery type {} is inactive",
                dt.code
            )));
        }
        Ok(())
    }

    /// Validates a line against its request line and advances the dispatch
    /// counter. The line must belong to the header's request and have
    /// enough approved quantity still pending.
    async fn reconcile_request_line(
        &self,
        txn: &DatabaseTransaction,
        request_id: &Option<Uuid>,
        line: &NewArticleDeliveryLine,
        request_line_id: Uuid,
    ) -> Result<(), ServiceError> {
        let request_id = request_id.ok_or_else(|| {
            ServiceError::ValidationError(
                "Line references a request line but the delivery has no request".to_string(),
            )
        })?;

        let request_line = request_line::Entity::find_by_id(request_line_id)
            .filter(request_line::Column::Deleted.eq(false))
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Request line {}", request_line_id)))?;

        if request_line.request_id != request_id {
            return Err(ServiceError::ValidationError(format!(
                "Request line {} does not belong to request {}",
                request_line_id, request_id
            )));
        }
        if request_line.article_id != line.article_id {
            return Err(ServiceError::ValidationError(format!(
                "Request line {} is for a different article",
                request_line_id
            )));
        }

        let pending = request_line.quantity_pending();
        if line.quantity > pending {
            return Err(ServiceError::ValidationError(format!(
                "Quantity {} exceeds pending {} on request line {}",
                line.quantity, pending, request_line_id
            )));
        }

        let dispatched = request_line.quantity_dispatched + line.quantity;
        let mut active_line: request_line::ActiveModel = request_line.into();
        active_line.quantity_dispatched = Set(dispatched);
        active_line.updated_at = Set(Utc::now());
        active_line
            .update(txn)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }

    /// Moves the request to its completion status once every live line is
    /// fully dispatched. Returns whether the transition happened.
    async fn close_request_if_dispatched(
        &self,
        txn: &DatabaseTransaction,
        request_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let req = request::Entity::find_by_id(request_id)
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {}", request_id)))?;

        let lines = request_line::Entity::find()
            .filter(request_line::Column::RequestId.eq(request_id))
            .filter(request_line::Column::Deleted.eq(false))
            .all(txn)
            .await
            .map_err(ServiceError::db_error)?;

        if lines.is_empty() || !lines.iter().all(|l| l.is_fully_dispatched()) {
            return Ok(false);
        }

        let completed = statuses::find_completed(txn, StatusDomain::Request).await?;
        if req.status_id == completed.id {
            return Ok(false);
        }

        let mut active_req: request::ActiveModel = req.into();
        active_req.status_id = Set(completed.id);
        active_req.updated_at = Set(Utc::now());
        active_req
            .update(txn)
            .await
            .map_err(ServiceError::db_error)?;

        info!(%request_id, "request fully dispatched");
        Ok(true)
    }

    async fn publish(&self, events: Vec<Event>) -> Result<(), ServiceError> {
        for event in events {
            self.event_sender
                .send(event)
                .await
                .map_err(ServiceError::EventError)?;
        }
        Ok(())
    }
}
