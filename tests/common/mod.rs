// Not every suite exercises every helper.
#![allow(dead_code)]

use std::sync::Arc;

use bodega_api::{
    config::AppConfig,
    db,
    entities::{
        article, asset, document_status::StatusDomain, purchase_order, purchase_order_line,
        request, request_line,
    },
    events::{self, EventSender},
    services::{
        catalogs::{NewCatalogEntry, NewDocumentStatus},
        items::{NewArticle, NewAsset},
        movements::RecordMovementInput,
    },
    AppState,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Fixed actor used for every seeded and exercised operation.
pub const ACTOR: Uuid = Uuid::from_u128(0x11111111_2222_3333_4444_555555555555);

/// Test harness backed by an in-memory SQLite database.
///
/// The pool is capped at one connection so every query sees the same
/// in-memory database.
pub struct TestApp {
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Fresh application with migrated schema and the standard catalog rows
    /// (statuses, movement types, one delivery type) already seeded.
    pub async fn new() -> Self {
        let app = Self::new_unseeded().await;
        app.seed_catalogs().await;
        app
    }

    /// Fresh application with a migrated but otherwise empty database. Used
    /// by tests that exercise missing-configuration failures.
    pub async fn new_unseeded() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:");
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender);

        Self {
            state,
            _event_task: event_task,
        }
    }

    /// Statuses for every document family plus the movement and delivery
    /// type catalogs.
    pub async fn seed_catalogs(&self) {
        for domain in [
            StatusDomain::Delivery,
            StatusDomain::Reception,
            StatusDomain::Request,
            StatusDomain::PurchaseOrder,
        ] {
            self.seed_status(domain, "PENDIENTE", true, false, false).await;
            self.seed_status(domain, "COMPLETADA", false, true, false).await;
            self.seed_status(domain, "CANCELADA", false, true, true).await;
        }

        for (code, name) in [
            ("COMPRA", "Compra"),
            ("ENTREGA", "Entrega"),
            ("RECEPCION", "Recepción"),
            ("AJUSTE", "Ajuste"),
        ] {
            self.state
                .services
                .catalogs
                .create_movement_type(NewCatalogEntry {
                    code: code.to_string(),
                    name: name.to_string(),
                    description: None,
                    created_by: ACTOR,
                })
                .await
                .expect("seed movement type");
        }

        self.state
            .services
            .catalogs
            .create_delivery_type(NewCatalogEntry {
                code: "INTERNA".to_string(),
                name: "Entrega interna".to_string(),
                description: None,
                created_by: ACTOR,
            })
            .await
            .expect("seed delivery type");
    }

    pub async fn seed_status(
        &self,
        domain: StatusDomain,
        code: &str,
        is_initial: bool,
        is_terminal: bool,
        is_cancelled: bool,
    ) -> Uuid {
        self.state
            .services
            .catalogs
            .create_status(NewDocumentStatus {
                code: code.to_string(),
                name: code.to_string(),
                domain,
                is_initial,
                is_terminal,
                is_cancelled,
                created_by: ACTOR,
            })
            .await
            .expect("seed document status")
            .id
    }

    pub async fn delivery_type_id(&self) -> Uuid {
        use bodega_api::entities::delivery_type;
        delivery_type::Entity::find()
            .one(self.state.db.as_ref())
            .await
            .expect("query delivery type")
            .expect("delivery type seeded")
            .id
    }

    pub async fn seed_article(&self, code: &str, stock_max: Option<Decimal>) -> article::Model {
        self.state
            .services
            .items
            .create_article(NewArticle {
                code: code.to_string(),
                name: format!("Article {}", code),
                description: None,
                unit: "UN".to_string(),
                brand: None,
                category_id: None,
                location_id: None,
                stock_min: Decimal::ZERO,
                stock_max,
                reorder_point: None,
                created_by: ACTOR,
            })
            .await
            .expect("seed article")
    }

    pub async fn seed_asset(&self, code: &str, requires_serial: bool) -> asset::Model {
        self.state
            .services
            .items
            .create_asset(NewAsset {
                code: code.to_string(),
                name: format!("Asset {}", code),
                description: None,
                serial_number: if requires_serial {
                    Some(format!("SN-{}", code))
                } else {
                    None
                },
                requires_serial,
                workshop: None,
                provenance: None,
                location_id: None,
                created_by: ACTOR,
            })
            .await
            .expect("seed asset")
    }

    /// Stocks up an article through the movement service so the ledger
    /// stays consistent with the balance.
    pub async fn stock_up(&self, article_id: Uuid, quantity: Decimal) {
        self.state
            .services
            .movements
            .register_entry(RecordMovementInput {
                article_id,
                movement_type_code: "COMPRA".to_string(),
                quantity,
                performed_by: ACTOR,
                reason: "Initial stock".to_string(),
            })
            .await
            .expect("stock up article");
    }

    pub async fn seed_location(&self, code: &str) -> Uuid {
        self.state
            .services
            .catalogs
            .create_location(NewCatalogEntry {
                code: code.to_string(),
                name: format!("Location {}", code),
                description: None,
                created_by: ACTOR,
            })
            .await
            .expect("seed location")
            .id
    }

    /// Inserts an approved request with one line for the article.
    pub async fn seed_request(
        &self,
        article_id: Uuid,
        quantity_approved: Decimal,
    ) -> (request::Model, request_line::Model) {
        let db = self.state.db.as_ref();
        let initial = bodega_api::services::statuses::find_initial(db, StatusDomain::Request)
            .await
            .expect("request initial status");

        let now = Utc::now();
        let req = request::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(format!("SOL-{}", Uuid::new_v4().simple())),
            requested_by: Set(ACTOR),
            status_id: Set(initial.id),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed request");

        let line = request_line::ActiveModel {
            id: Set(Uuid::new_v4()),
            request_id: Set(req.id),
            article_id: Set(article_id),
            quantity_requested: Set(quantity_approved),
            quantity_approved: Set(quantity_approved),
            quantity_dispatched: Set(Decimal::ZERO),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed request line");

        (req, line)
    }

    /// Inserts a purchase order with one line per (article, asset, ordered)
    /// triple.
    pub async fn seed_purchase_order(
        &self,
        lines: &[(Option<Uuid>, Option<Uuid>, Decimal)],
    ) -> purchase_order::Model {
        let db = self.state.db.as_ref();
        let now = Utc::now();
        let order = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(format!("OC-{}", Uuid::new_v4().simple())),
            supplier_name: Set("Proveedor de prueba".to_string()),
            requested_by: Set(ACTOR),
            order_date: Set(now.date_naive()),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed purchase order");

        for (article_id, asset_id, ordered) in lines {
            purchase_order_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(order.id),
                article_id: Set(*article_id),
                asset_id: Set(*asset_id),
                quantity_ordered: Set(*ordered),
                quantity_received: Set(Decimal::ZERO),
                unit_price: Set(Decimal::ONE),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await
            .expect("seed purchase order line");
        }

        order
    }

    pub async fn reload_article(&self, article_id: Uuid) -> article::Model {
        article::Entity::find_by_id(article_id)
            .one(self.state.db.as_ref())
            .await
            .expect("query article")
            .expect("article exists")
    }

    pub async fn order_lines(&self, order_id: Uuid) -> Vec<purchase_order_line::Model> {
        use sea_orm::{ColumnTrait, QueryFilter};
        purchase_order_line::Entity::find()
            .filter(purchase_order_line::Column::PurchaseOrderId.eq(order_id))
            .all(self.state.db.as_ref())
            .await
            .expect("query purchase order lines")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
