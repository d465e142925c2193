mod common;

use bodega_api::entities::{delivery, request, ItemKind};
use bodega_api::services::deliveries::{
    NewArticleDelivery, NewArticleDeliveryLine, NewAssetDelivery, NewAssetDeliveryLine,
};
use bodega_api::ServiceError;
use chrono::Utc;
use common::{TestApp, ACTOR};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use uuid::Uuid;

fn article_line(article_id: Uuid, quantity: rust_decimal::Decimal) -> NewArticleDeliveryLine {
    NewArticleDeliveryLine {
        article_id,
        quantity,
        request_line_id: None,
        lot: None,
        notes: None,
    }
}

async fn article_delivery(
    app: &TestApp,
    request_id: Option<Uuid>,
    lines: Vec<NewArticleDeliveryLine>,
) -> Result<bodega_api::services::deliveries::DeliveryWithLines, ServiceError> {
    app.state
        .services
        .deliveries
        .create_article_delivery(NewArticleDelivery {
            delivery_type_id: app.delivery_type_id().await,
            source_location_id: None,
            delivered_by: ACTOR,
            received_by: ACTOR,
            request_id,
            reason: "Entrega de prueba".to_string(),
            notes: None,
            lines,
        })
        .await
}

#[tokio::test]
async fn article_delivery_decrements_stock_per_line() {
    let app = TestApp::new().await;
    let pencils = app.seed_article("LAP-001", None).await;
    let paper = app.seed_article("PAP-001", None).await;
    app.stock_up(pencils.id, dec!(20)).await;
    app.stock_up(paper.id, dec!(10)).await;

    let created = article_delivery(
        &app,
        None,
        vec![article_line(pencils.id, dec!(5)), article_line(paper.id, dec!(3))],
    )
    .await
    .expect("create delivery");

    let date_key = Utc::now().date_naive().format("%Y%m%d").to_string();
    assert_eq!(created.delivery.number, format!("ENT-ART-{}-001", date_key));
    assert_eq!(created.delivery.kind, ItemKind::Article);
    assert_eq!(created.lines.len(), 2);

    assert_eq!(app.reload_article(pencils.id).await.stock_current, dec!(15));
    assert_eq!(app.reload_article(paper.id).await.stock_current, dec!(7));
}

#[tokio::test]
async fn delivery_numbers_are_sequential_within_the_day() {
    let app = TestApp::new().await;
    let article = app.seed_article("SEQ-001", None).await;
    app.stock_up(article.id, dec!(10)).await;

    let first = article_delivery(&app, None, vec![article_line(article.id, dec!(1))])
        .await
        .expect("first delivery");
    let second = article_delivery(&app, None, vec![article_line(article.id, dec!(1))])
        .await
        .expect("second delivery");

    let date_key = Utc::now().date_naive().format("%Y%m%d").to_string();
    assert_eq!(first.delivery.number, format!("ENT-ART-{}-001", date_key));
    assert_eq!(second.delivery.number, format!("ENT-ART-{}-002", date_key));
}

#[tokio::test]
async fn a_failing_line_voids_the_whole_delivery() {
    let app = TestApp::new().await;
    let plenty = app.seed_article("OK-001", None).await;
    let scarce = app.seed_article("SCARCE-001", None).await;
    app.stock_up(plenty.id, dec!(50)).await;
    app.stock_up(scarce.id, dec!(2)).await;

    let err = article_delivery(
        &app,
        None,
        vec![article_line(plenty.id, dec!(10)), article_line(scarce.id, dec!(5))],
    )
    .await
    .expect_err("second line exceeds stock");
    assert!(matches!(err, ServiceError::InsufficientStock(_)), "{err}");

    // Nothing from the first line may survive the rollback.
    assert_eq!(app.reload_article(plenty.id).await.stock_current, dec!(50));
    assert_eq!(app.reload_article(scarce.id).await.stock_current, dec!(2));
    let headers = delivery::Entity::find()
        .all(app.state.db.as_ref())
        .await
        .expect("query deliveries");
    assert!(headers.is_empty());
}

#[tokio::test]
async fn deliveries_require_at_least_one_line() {
    let app = TestApp::new().await;

    let err = article_delivery(&app, None, Vec::new())
        .await
        .expect_err("empty delivery");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
}

#[tokio::test]
async fn request_lines_accumulate_dispatch_and_close_the_request() {
    let app = TestApp::new().await;
    let article = app.seed_article("REQ-001", None).await;
    app.stock_up(article.id, dec!(20)).await;
    let (req, req_line) = app.seed_request(article.id, dec!(10)).await;

    article_delivery(
        &app,
        Some(req.id),
        vec![NewArticleDeliveryLine {
            request_line_id: Some(req_line.id),
            ..article_line(article.id, dec!(4))
        }],
    )
    .await
    .expect("partial dispatch");

    let reloaded = request::Entity::find_by_id(req.id)
        .one(app.state.db.as_ref())
        .await
        .expect("query request")
        .expect("request exists");
    assert_eq!(reloaded.status_id, req.status_id, "request stays open");

    article_delivery(
        &app,
        Some(req.id),
        vec![NewArticleDeliveryLine {
            request_line_id: Some(req_line.id),
            ..article_line(article.id, dec!(6))
        }],
    )
    .await
    .expect("final dispatch");

    let closed = request::Entity::find_by_id(req.id)
        .one(app.state.db.as_ref())
        .await
        .expect("query request")
        .expect("request exists");
    assert_ne!(closed.status_id, req.status_id, "request moved to terminal status");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(10));
}

#[tokio::test]
async fn dispatch_beyond_pending_quantity_is_rejected() {
    let app = TestApp::new().await;
    let article = app.seed_article("REQ-002", None).await;
    app.stock_up(article.id, dec!(50)).await;
    let (req, req_line) = app.seed_request(article.id, dec!(10)).await;

    let err = article_delivery(
        &app,
        Some(req.id),
        vec![NewArticleDeliveryLine {
            request_line_id: Some(req_line.id),
            ..article_line(article.id, dec!(11))
        }],
    )
    .await
    .expect_err("over-dispatch");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(50));
}

#[tokio::test]
async fn request_line_must_match_the_delivered_article() {
    let app = TestApp::new().await;
    let requested = app.seed_article("REQ-003", None).await;
    let other = app.seed_article("REQ-004", None).await;
    app.stock_up(other.id, dec!(10)).await;
    let (req, req_line) = app.seed_request(requested.id, dec!(5)).await;

    let err = article_delivery(
        &app,
        Some(req.id),
        vec![NewArticleDeliveryLine {
            request_line_id: Some(req_line.id),
            ..article_line(other.id, dec!(2))
        }],
    )
    .await
    .expect_err("article mismatch");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
}

#[tokio::test]
async fn missing_initial_status_fails_creation() {
    let app = TestApp::new_unseeded().await;
    // Catalogs the delivery needs before the status lookup.
    app.state
        .services
        .catalogs
        .create_delivery_type(bodega_api::services::catalogs::NewCatalogEntry {
            code: "INTERNA".to_string(),
            name: "Entrega interna".to_string(),
            description: None,
            created_by: ACTOR,
        })
        .await
        .expect("seed delivery type");
    let article = app.seed_article("NOSTATUS-001", None).await;

    let err = article_delivery(&app, None, vec![article_line(article.id, dec!(1))])
        .await
        .expect_err("no initial status configured");
    assert!(matches!(err, ServiceError::InvalidStatus(_)), "{err}");
}

#[tokio::test]
async fn asset_deliveries_use_their_own_number_sequence() {
    let app = TestApp::new().await;
    let projector = app.seed_asset("PROJ-001", true).await;

    let created = app
        .state
        .services
        .deliveries
        .create_asset_delivery(NewAssetDelivery {
            delivery_type_id: app.delivery_type_id().await,
            delivered_by: ACTOR,
            received_by: ACTOR,
            reason: "Préstamo".to_string(),
            notes: None,
            lines: vec![NewAssetDeliveryLine {
                asset_id: projector.id,
                physical_condition: Some("Bueno".to_string()),
                notes: None,
            }],
        })
        .await
        .expect("asset delivery");

    let date_key = Utc::now().date_naive().format("%Y%m%d").to_string();
    assert_eq!(created.delivery.number, format!("ENT-ACT-{}-001", date_key));
    assert_eq!(created.delivery.kind, ItemKind::Asset);
    assert_eq!(created.lines.len(), 1);
    assert_eq!(created.lines[0].quantity, dec!(1));
    assert_eq!(
        created.lines[0].serial_number.as_deref(),
        Some("SN-PROJ-001")
    );
}
