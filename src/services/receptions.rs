use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    asset, document_status::StatusDomain, movement_type, purchase_order, purchase_order_line,
    reception, reception_line, ItemKind,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::{audit, numbering, statuses, stock};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewReception {
    /// Destination location; required for article receptions.
    pub location_id: Option<Uuid>,
    pub received_by: Uuid,
    /// When set, every line must reconcile against a line of this order.
    pub purchase_order_id: Option<Uuid>,
    pub reference_document: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReceptionLine {
    pub article_id: Option<Uuid>,
    pub asset_id: Option<Uuid>,
    pub quantity: Decimal,
    pub lot: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

/// A reception with its persisted lines.
#[derive(Debug, Clone)]
pub struct ReceptionWithLines {
    pub reception: reception::Model,
    pub lines: Vec<reception_line::Model>,
}

/// Kind-specific behavior of the reception workflow.
///
/// The workflow itself (numbering, status lifecycle, auditing) is shared;
/// profiles contribute only what genuinely differs between articles and
/// assets: header requirements, line validation and the stock/order side
/// effects of a line.
#[async_trait]
pub trait ReceptionProfile: Send + Sync {
    fn kind(&self) -> ItemKind;
    fn number_prefix(&self) -> &'static str;

    async fn validate_header(
        &self,
        txn: &DatabaseTransaction,
        input: &NewReception,
    ) -> Result<(), ServiceError>;

    /// Validates a line and applies its effects (stock increment, purchase
    /// order progress). Runs at line-add time; confirmation applies no
    /// further stock effect.
    async fn apply_line(
        &self,
        txn: &DatabaseTransaction,
        header: &reception::Model,
        input: &NewReceptionLine,
    ) -> Result<Vec<Event>, ServiceError>;

    /// Reverses a line's effects when the reception is cancelled.
    async fn reverse_line(
        &self,
        txn: &DatabaseTransaction,
        header: &reception::Model,
        line: &reception_line::Model,
    ) -> Result<Vec<Event>, ServiceError>;
}

pub struct ArticleReceptionProfile;

#[async_trait]
impl ReceptionProfile for ArticleReceptionProfile {
    fn kind(&self) -> ItemKind {
        ItemKind::Article
    }

    fn number_prefix(&self) -> &'static str {
        reception::NUMBER_PREFIX_ARTICLE
    }

    async fn validate_header(
        &self,
        _txn: &DatabaseTransaction,
        input: &NewReception,
    ) -> Result<(), ServiceError> {
        if input.location_id.is_none() {
            return Err(ServiceError::ValidationError(
                "Article receptions require a destination location".to_string(),
            ));
        }
        Ok(())
    }

    async fn apply_line(
        &self,
        txn: &DatabaseTransaction,
        header: &reception::Model,
        input: &NewReceptionLine,
    ) -> Result<Vec<Event>, ServiceError> {
        let article_id = input.article_id.ok_or_else(|| {
            ServiceError::ValidationError("Article reception lines require an article".to_string())
        })?;

        if let Some(order_id) = header.purchase_order_id {
            advance_order_line(txn, order_id, Some(article_id), None, input.quantity).await?;
        }

        let movement_type = stock::resolve_movement_type(txn, movement_type::CODE_RECEPTION).await?;
        let change = stock::increase_stock(
            txn,
            article_id,
            input.quantity,
            movement_type.id,
            header.received_by,
            &format!("Reception {}", header.number),
        )
        .await?;

        Ok(vec![Event::StockIncreased {
            article_id: change.article.id,
            quantity: input.quantity,
            stock_after: change.article.stock_current,
            movement_id: change.movement.id,
        }])
    }

    async fn reverse_line(
        &self,
        txn: &DatabaseTransaction,
        header: &reception::Model,
        line: &reception_line::Model,
    ) -> Result<Vec<Event>, ServiceError> {
        let article_id = line.article_id.ok_or_else(|| {
            ServiceError::InternalError(format!("Reception line {} has no article", line.id))
        })?;

        if let Some(order_id) = header.purchase_order_id {
            rewind_order_line(txn, order_id, Some(article_id), None, line.quantity).await?;
        }

        let movement_type = stock::resolve_movement_type(txn, movement_type::CODE_RECEPTION).await?;
        let change = stock::decrease_stock(
            txn,
            article_id,
            line.quantity,
            movement_type.id,
            header.received_by,
            &format!("Cancellation of reception {}", header.number),
        )
        .await?;

        Ok(vec![Event::StockDecreased {
            article_id: change.article.id,
            quantity: line.quantity,
            stock_after: change.article.stock_current,
            movement_id: change.movement.id,
        }])
    }
}

pub struct AssetReceptionProfile;

#[async_trait]
impl ReceptionProfile for AssetReceptionProfile {
    fn kind(&self) -> ItemKind {
        ItemKind::Asset
    }

    fn number_prefix(&self) -> &'static str {
        reception::NUMBER_PREFIX_ASSET
    }

    async fn validate_header(
        &self,
        _txn: &DatabaseTransaction,
        _input: &NewReception,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn apply_line(
        &self,
        txn: &DatabaseTransaction,
        header: &reception::Model,
        input: &NewReceptionLine,
    ) -> Result<Vec<Event>, ServiceError> {
        let asset_id = input.asset_id.ok_or_else(|| {
            ServiceError::ValidationError("Asset reception lines require an asset".to_string())
        })?;
        if input.quantity != Decimal::ONE {
            return Err(ServiceError::ValidationError(
                "Assets are received one per line".to_string(),
            ));
        }

        let asset = asset::Entity::find_by_id(asset_id)
            .filter(asset::Column::Deleted.eq(false))
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {}", asset_id)))?;
        if !asset.active {
            return Err(ServiceError::InvalidOperation(format!(
                "Asset {} is inactive",
                asset.code
            )));
        }
        if asset.requires_serial && input.serial_number.as_deref().unwrap_or("").is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Asset {} requires a serial number on reception",
                asset.code
            )));
        }

        if let Some(order_id) = header.purchase_order_id {
            advance_order_line(txn, order_id, None, Some(asset_id), input.quantity).await?;
        }

        Ok(Vec::new())
    }

    async fn reverse_line(
        &self,
        txn: &DatabaseTransaction,
        header: &reception::Model,
        line: &reception_line::Model,
    ) -> Result<Vec<Event>, ServiceError> {
        let asset_id = line.asset_id.ok_or_else(|| {
            ServiceError::InternalError(format!("Reception line {} has no asset", line.id))
        })?;

        if let Some(order_id) = header.purchase_order_id {
            rewind_order_line(txn, order_id, None, Some(asset_id), line.quantity).await?;
        }

        Ok(Vec::new())
    }
}

static ARTICLE_PROFILE: ArticleReceptionProfile = ArticleReceptionProfile;
static ASSET_PROFILE: AssetReceptionProfile = AssetReceptionProfile;

fn profile_for(kind: ItemKind) -> &'static dyn ReceptionProfile {
    match kind {
        ItemKind::Article => &ARTICLE_PROFILE,
        ItemKind::Asset => &ASSET_PROFILE,
    }
}

/// Inbound receptions. Stock and purchase-order progress move when a line
/// is added; confirmation is a pure status transition and cancellation
/// reverses every line with compensating ledger rows.
pub struct ReceptionService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReceptionService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Opens a reception of the given kind in its initial status.
    #[instrument(skip(self, input), fields(kind = kind.as_str()))]
    pub async fn create_reception(
        &self,
        kind: ItemKind,
        input: NewReception,
    ) -> Result<reception::Model, ServiceError> {
        input.validate()?;
        let profile = profile_for(kind);

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        profile.validate_header(&txn, &input).await?;

        if let Some(order_id) = input.purchase_order_id {
            purchase_order::Entity::find_by_id(order_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {}", order_id)))?;
        }

        let initial = statuses::find_initial(&txn, StatusDomain::Reception).await?;
        let number =
            numbering::next_document_number(&txn, profile.number_prefix(), Utc::now().date_naive())
                .await?;

        let now = Utc::now();
        let header = reception::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number),
            kind: Set(kind),
            status_id: Set(initial.id),
            location_id: Set(input.location_id),
            received_by: Set(input.received_by),
            purchase_order_id: Set(input.purchase_order_id),
            reference_document: Set(input.reference_document),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "reception",
            header.id,
            "create",
            input.received_by,
            Some(json!({ "number": header.number, "kind": header.kind })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(reception_id = %header.id, number = %header.number, "reception created");
        self.event_sender
            .send(Event::ReceptionCreated {
                reception_id: header.id,
                number: header.number.clone(),
                kind,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(header)
    }

    /// Appends a line to an open reception, applying its stock and
    /// purchase-order effects in the same transaction.
    #[instrument(skip(self, input))]
    pub async fn add_line(
        &self,
        reception_id: Uuid,
        input: NewReceptionLine,
    ) -> Result<reception_line::Model, ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;
        let mut events = Vec::new();

        let header = self.load_open(&txn, reception_id).await?;
        let profile = profile_for(header.kind);

        events.extend(profile.apply_line(&txn, &header, &input).await?);

        let line = reception_line::ActiveModel {
            id: Set(Uuid::new_v4()),
            reception_id: Set(header.id),
            article_id: Set(input.article_id),
            asset_id: Set(input.asset_id),
            quantity: Set(input.quantity),
            lot: Set(input.lot),
            expiry_date: Set(input.expiry_date),
            serial_number: Set(input.serial_number),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut active_header: reception::ActiveModel = header.into();
        active_header.updated_at = Set(Utc::now());
        active_header
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(%reception_id, line_id = %line.id, "reception line added");
        events.push(Event::ReceptionLineAdded {
            reception_id,
            line_id: line.id,
        });
        self.publish(events).await?;

        Ok(line)
    }

    /// Confirms a reception: a status transition only. Stock already moved
    /// line by line, so confirmation never touches the ledger.
    #[instrument(skip(self))]
    pub async fn confirm(&self, reception_id: Uuid, actor: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let header = self.load_open(&txn, reception_id).await?;

        let line_count = reception_line::Entity::find()
            .filter(reception_line::Column::ReceptionId.eq(reception_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .len();
        if line_count == 0 {
            return Err(ServiceError::ValidationError(format!(
                "Reception {} has no lines",
                header.number
            )));
        }

        let completed = statuses::find_completed(&txn, StatusDomain::Reception).await?;
        let number = header.number.clone();
        let mut active_header: reception::ActiveModel = header.into();
        active_header.status_id = Set(completed.id);
        active_header.updated_at = Set(Utc::now());
        active_header
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "reception",
            reception_id,
            "confirm",
            actor,
            Some(json!({ "number": number, "lines": line_count })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(%reception_id, "reception confirmed");
        self.event_sender
            .send(Event::ReceptionConfirmed { reception_id })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    /// Cancels an open reception, reversing every line's effects with
    /// compensating ledger rows and purchase-order rewinds.
    #[instrument(skip(self))]
    pub async fn cancel(&self, reception_id: Uuid, actor: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;
        let mut events = Vec::new();

        let header = self.load_open(&txn, reception_id).await?;
        let profile = profile_for(header.kind);

        let lines = reception_line::Entity::find()
            .filter(reception_line::Column::ReceptionId.eq(reception_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        for line in &lines {
            events.extend(profile.reverse_line(&txn, &header, line).await?);
        }

        let cancelled = statuses::find_cancelled(&txn, StatusDomain::Reception).await?;
        let number = header.number.clone();
        let mut active_header: reception::ActiveModel = header.into();
        active_header.status_id = Set(cancelled.id);
        active_header.updated_at = Set(Utc::now());
        active_header
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        audit::record(
            &txn,
            "reception",
            reception_id,
            "cancel",
            actor,
            Some(json!({ "number": number, "lines": lines.len() })),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(%reception_id, "reception cancelled");
        events.push(Event::ReceptionCancelled { reception_id });
        self.publish(events).await?;

        Ok(())
    }

    pub async fn get_reception(
        &self,
        reception_id: Uuid,
    ) -> Result<ReceptionWithLines, ServiceError> {
        let db = self.db_pool.as_ref();
        let header = reception::Entity::find_by_id(reception_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Reception {}", reception_id)))?;
        let lines = reception_line::Entity::find()
            .filter(reception_line::Column::ReceptionId.eq(reception_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(ReceptionWithLines {
            reception: header,
            lines,
        })
    }

    /// Loads a reception and rejects it when already in a terminal status.
    async fn load_open(
        &self,
        txn: &DatabaseTransaction,
        reception_id: Uuid,
    ) -> Result<reception::Model, ServiceError> {
        let header = reception::Entity::find_by_id(reception_id)
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Reception {}", reception_id)))?;

        let status = statuses::get(txn, header.status_id).await?;
        if status.is_terminal {
            return Err(ServiceError::InvalidStatus(format!(
                "Reception {} is {} and can no longer change",
                header.number, status.code
            )));
        }
        Ok(header)
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

/// Advances `quantity_received` on the order line matching the received
/// item. Receiving an item the order does not carry, or more than it
/// ordered, is rejected.
async fn advance_order_line(
    txn: &DatabaseTransaction,
    order_id: Uuid,
    article_id: Option<Uuid>,
    asset_id: Option<Uuid>,
    quantity: Decimal,
) -> Result<(), ServiceError> {
    let line = find_order_line(txn, order_id, article_id, asset_id).await?;

    let outstanding = line.quantity_outstanding();
    if quantity > outstanding {
        return Err(ServiceError::ValidationError(format!(
            "Quantity {} exceeds outstanding {} on purchase order line {}",
            quantity, outstanding, line.id
        )));
    }

    let received = line.quantity_received + quantity;
    let mut active_line: purchase_order_line::ActiveModel = line.into();
    active_line.quantity_received = Set(received);
    active_line.updated_at = Set(Utc::now());
    active_line
        .update(txn)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(())
}

/// Rolls back `quantity_received` when a reception is cancelled, never
/// below zero.
async fn rewind_order_line(
    txn: &DatabaseTransaction,
    order_id: Uuid,
    article_id: Option<Uuid>,
    asset_id: Option<Uuid>,
    quantity: Decimal,
) -> Result<(), ServiceError> {
    let line = find_order_line(txn, order_id, article_id, asset_id).await?;

    let received = (line.quantity_received - quantity).max(Decimal::ZERO);
    let mut active_line: purchase_order_line::ActiveModel = line.into();
    active_line.quantity_received = Set(received);
    active_line.updated_at = Set(Utc::now());
    active_line
        .update(txn)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(())
}

async fn find_order_line(
    txn: &DatabaseTransaction,
    order_id: Uuid,
    article_id: Option<Uuid>,
    asset_id: Option<Uuid>,
) -> Result<purchase_order_line::Model, ServiceError> {
    let mut query = purchase_order_line::Entity::find()
        .filter(purchase_order_line::Column::PurchaseOrderId.eq(order_id));
    if let Some(article_id) = article_id {
        query = query.filter(purchase_order_line::Column::ArticleId.eq(article_id));
    }
    if let Some(asset_id) = asset_id {
        query = query.filter(purchase_order_line::Column::AssetId.eq(asset_id));
    }

    query
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Received item is not on purchase order {}",
                order_id
            ))
        })
}
