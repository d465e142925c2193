mod common;

use bodega_api::entities::{document_status::StatusDomain, ItemKind};
use bodega_api::services::receptions::{NewReception, NewReceptionLine};
use bodega_api::services::statuses;
use bodega_api::ServiceError;
use chrono::Utc;
use common::{TestApp, ACTOR};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn header_input(location_id: Option<Uuid>, purchase_order_id: Option<Uuid>) -> NewReception {
    NewReception {
        location_id,
        received_by: ACTOR,
        purchase_order_id,
        reference_document: Some("FACTURA-123".to_string()),
        notes: None,
    }
}

fn article_line(article_id: Uuid, quantity: rust_decimal::Decimal) -> NewReceptionLine {
    NewReceptionLine {
        article_id: Some(article_id),
        asset_id: None,
        quantity,
        lot: None,
        expiry_date: None,
        serial_number: None,
        notes: None,
    }
}

fn asset_line(asset_id: Uuid, serial_number: Option<&str>) -> NewReceptionLine {
    NewReceptionLine {
        article_id: None,
        asset_id: Some(asset_id),
        quantity: dec!(1),
        lot: None,
        expiry_date: None,
        serial_number: serial_number.map(str::to_string),
        notes: None,
    }
}

#[tokio::test]
async fn article_reception_moves_stock_at_line_time_only() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-01").await;
    let article = app.seed_article("REC-001", None).await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), None))
        .await
        .expect("create reception");

    let date_key = Utc::now().date_naive().format("%Y%m%d").to_string();
    assert_eq!(reception.number, format!("REC-ART-{}-001", date_key));

    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(5)))
        .await
        .expect("first line");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(5));

    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(3)))
        .await
        .expect("second line");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(8));

    app.state
        .services
        .receptions
        .confirm(reception.id, ACTOR)
        .await
        .expect("confirm");

    // Confirmation is a status transition only; stock must not move again.
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(8));

    let confirmed = app
        .state
        .services
        .receptions
        .get_reception(reception.id)
        .await
        .expect("reload reception");
    let completed = statuses::find_completed(app.state.db.as_ref(), StatusDomain::Reception)
        .await
        .expect("completed status");
    assert_eq!(confirmed.reception.status_id, completed.id);

    let history = app
        .state
        .services
        .movements
        .article_history(article.id, None)
        .await
        .expect("history");
    assert_eq!(history.len(), 2, "one ledger row per line, none on confirm");
}

#[tokio::test]
async fn article_receptions_require_a_destination_location() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(None, None))
        .await
        .expect_err("missing location");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
}

#[tokio::test]
async fn closed_receptions_reject_further_changes() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-02").await;
    let article = app.seed_article("REC-002", None).await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), None))
        .await
        .expect("create reception");
    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(2)))
        .await
        .expect("line");
    app.state
        .services
        .receptions
        .confirm(reception.id, ACTOR)
        .await
        .expect("confirm");

    let err = app
        .state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(1)))
        .await
        .expect_err("line after confirm");
    assert!(matches!(err, ServiceError::InvalidStatus(_)), "{err}");

    let err = app
        .state
        .services
        .receptions
        .confirm(reception.id, ACTOR)
        .await
        .expect_err("double confirm");
    assert!(matches!(err, ServiceError::InvalidStatus(_)), "{err}");
}

#[tokio::test]
async fn confirming_an_empty_reception_is_rejected() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-03").await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), None))
        .await
        .expect("create reception");

    let err = app
        .state
        .services
        .receptions
        .confirm(reception.id, ACTOR)
        .await
        .expect_err("no lines");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
}

#[tokio::test]
async fn cancellation_reverses_stock_with_compensating_rows() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-04").await;
    let article = app.seed_article("REC-003", None).await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), None))
        .await
        .expect("create reception");
    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(5)))
        .await
        .expect("line");

    app.state
        .services
        .receptions
        .cancel(reception.id, ACTOR)
        .await
        .expect("cancel");

    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(0));
    let history = app
        .state
        .services
        .movements
        .article_history(article.id, None)
        .await
        .expect("history");
    assert_eq!(history.len(), 2, "the reversal is a new ledger row");

    let cancelled = statuses::find_cancelled(app.state.db.as_ref(), StatusDomain::Reception)
        .await
        .expect("cancelled status");
    let reloaded = app
        .state
        .services
        .receptions
        .get_reception(reception.id)
        .await
        .expect("reload");
    assert_eq!(reloaded.reception.status_id, cancelled.id);
}

#[tokio::test]
async fn purchase_order_lines_advance_and_cap_received_quantity() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-05").await;
    let article = app.seed_article("PO-001", None).await;
    let order = app
        .seed_purchase_order(&[(Some(article.id), None, dec!(10))])
        .await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), Some(order.id)))
        .await
        .expect("create reception");

    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(4)))
        .await
        .expect("first partial");
    assert_eq!(app.order_lines(order.id).await[0].quantity_received, dec!(4));

    let err = app
        .state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(7)))
        .await
        .expect_err("exceeds outstanding 6");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
    assert_eq!(app.order_lines(order.id).await[0].quantity_received, dec!(4));
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(4));

    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(6)))
        .await
        .expect("exactly the outstanding quantity");
    assert_eq!(
        app.order_lines(order.id).await[0].quantity_received,
        dec!(10)
    );
}

#[tokio::test]
async fn items_missing_from_the_purchase_order_are_rejected() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-06").await;
    let ordered = app.seed_article("PO-002", None).await;
    let stray = app.seed_article("PO-003", None).await;
    let order = app
        .seed_purchase_order(&[(Some(ordered.id), None, dec!(10))])
        .await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), Some(order.id)))
        .await
        .expect("create reception");

    let err = app
        .state
        .services
        .receptions
        .add_line(reception.id, article_line(stray.id, dec!(1)))
        .await
        .expect_err("article not on the order");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
    assert_eq!(app.reload_article(stray.id).await.stock_current, dec!(0));
}

#[tokio::test]
async fn cancelling_a_reception_rewinds_purchase_order_progress() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-07").await;
    let article = app.seed_article("PO-004", None).await;
    let order = app
        .seed_purchase_order(&[(Some(article.id), None, dec!(10))])
        .await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), Some(order.id)))
        .await
        .expect("create reception");
    app.state
        .services
        .receptions
        .add_line(reception.id, article_line(article.id, dec!(4)))
        .await
        .expect("line");

    app.state
        .services
        .receptions
        .cancel(reception.id, ACTOR)
        .await
        .expect("cancel");

    assert_eq!(app.order_lines(order.id).await[0].quantity_received, dec!(0));
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(0));
}

#[tokio::test]
async fn asset_receptions_enforce_serial_and_unit_quantity() {
    let app = TestApp::new().await;
    let asset = app.seed_asset("ACT-001", true).await;

    let reception = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Asset, header_input(None, None))
        .await
        .expect("create reception");

    let date_key = Utc::now().date_naive().format("%Y%m%d").to_string();
    assert_eq!(reception.number, format!("REC-ACT-{}-001", date_key));

    let err = app
        .state
        .services
        .receptions
        .add_line(reception.id, asset_line(asset.id, None))
        .await
        .expect_err("serial required");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");

    let err = app
        .state
        .services
        .receptions
        .add_line(
            reception.id,
            NewReceptionLine {
                quantity: dec!(2),
                ..asset_line(asset.id, Some("SN-42"))
            },
        )
        .await
        .expect_err("one asset per line");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");

    let line = app
        .state
        .services
        .receptions
        .add_line(reception.id, asset_line(asset.id, Some("SN-42")))
        .await
        .expect("valid asset line");
    assert_eq!(line.serial_number.as_deref(), Some("SN-42"));

    app.state
        .services
        .receptions
        .confirm(reception.id, ACTOR)
        .await
        .expect("confirm");
}

#[tokio::test]
async fn each_prefix_keeps_its_own_daily_sequence() {
    let app = TestApp::new().await;
    let location = app.seed_location("BOD-08").await;

    let article_rec = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), None))
        .await
        .expect("article reception");
    let asset_rec = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Asset, header_input(None, None))
        .await
        .expect("asset reception");

    let date_key = Utc::now().date_naive().format("%Y%m%d").to_string();
    assert_eq!(article_rec.number, format!("REC-ART-{}-001", date_key));
    assert_eq!(asset_rec.number, format!("REC-ACT-{}-001", date_key));
}

#[tokio::test]
async fn missing_initial_status_fails_reception_creation() {
    let app = TestApp::new_unseeded().await;
    let location = {
        // Only the location catalog; no statuses configured.
        app.state
            .services
            .catalogs
            .create_location(bodega_api::services::catalogs::NewCatalogEntry {
                code: "BOD-09".to_string(),
                name: "Bodega".to_string(),
                description: None,
                created_by: ACTOR,
            })
            .await
            .expect("seed location")
            .id
    };

    let err = app
        .state
        .services
        .receptions
        .create_reception(ItemKind::Article, header_input(Some(location), None))
        .await
        .expect_err("no initial status");
    assert!(matches!(err, ServiceError::InvalidStatus(_)), "{err}");
}
