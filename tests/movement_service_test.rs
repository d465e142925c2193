mod common;

use assert_matches::assert_matches;
use bodega_api::entities::stock_movement::StockOperation;
use bodega_api::services::movements::RecordMovementInput;
use bodega_api::ServiceError;
use common::{TestApp, ACTOR};
use rust_decimal_macros::dec;
use test_case::test_case;

fn entry_input(article_id: uuid::Uuid, quantity: rust_decimal::Decimal) -> RecordMovementInput {
    RecordMovementInput {
        article_id,
        movement_type_code: "COMPRA".to_string(),
        quantity,
        performed_by: ACTOR,
        reason: "Restock".to_string(),
    }
}

#[tokio::test]
async fn entry_increases_stock_and_records_ledger_row() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-001", None).await;

    let change = app
        .state
        .services
        .movements
        .register_entry(entry_input(article.id, dec!(10)))
        .await
        .expect("register entry");

    assert_eq!(change.article.stock_current, dec!(10));
    assert_eq!(change.movement.operation, StockOperation::In);
    assert_eq!(change.movement.stock_before, dec!(0));
    assert_eq!(change.movement.stock_after, dec!(10));

    let history = app
        .state
        .services
        .movements
        .article_history(article.id, None)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, change.movement.id);
}

#[tokio::test]
async fn exit_decreases_stock_with_consistent_snapshots() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-002", None).await;
    app.stock_up(article.id, dec!(10)).await;

    let change = app
        .state
        .services
        .movements
        .register_exit(RecordMovementInput {
            movement_type_code: "ENTREGA".to_string(),
            reason: "Manual exit".to_string(),
            ..entry_input(article.id, dec!(4))
        })
        .await
        .expect("register exit");

    assert_eq!(change.movement.operation, StockOperation::Out);
    assert_eq!(change.movement.stock_before, dec!(10));
    assert_eq!(change.movement.stock_after, dec!(6));
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(6));
}

#[test_case(dec!(0) ; "zero quantity")]
#[test_case(dec!(-5) ; "negative quantity")]
#[tokio::test]
async fn non_positive_quantities_are_rejected(quantity: rust_decimal::Decimal) {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-003", None).await;

    let err = app
        .state
        .services
        .movements
        .register_entry(entry_input(article.id, quantity))
        .await
        .expect_err("zero or negative quantity must fail");
    assert_matches!(err, ServiceError::ValidationError(_));

    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(0));
}

#[tokio::test]
async fn insufficient_stock_rejects_exit_and_leaves_no_trace() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-004", None).await;
    app.stock_up(article.id, dec!(3)).await;

    let err = app
        .state
        .services
        .movements
        .register_exit(entry_input(article.id, dec!(5)))
        .await
        .expect_err("exit beyond stock must fail");
    assert!(matches!(err, ServiceError::InsufficientStock(_)), "{err}");

    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(3));
    let history = app
        .state
        .services
        .movements
        .article_history(article.id, None)
        .await
        .expect("history");
    assert_eq!(history.len(), 1, "only the stock-up row may exist");
}

#[tokio::test]
async fn entries_beyond_maximum_stock_are_rejected() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-005", Some(dec!(10))).await;
    app.stock_up(article.id, dec!(8)).await;

    let err = app
        .state
        .services
        .movements
        .register_entry(entry_input(article.id, dec!(3)))
        .await
        .expect_err("entry over the maximum must fail");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(8));

    // Exactly reaching the maximum is allowed.
    app.state
        .services
        .movements
        .register_entry(entry_input(article.id, dec!(2)))
        .await
        .expect("entry up to the maximum");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(10));
}

#[tokio::test]
async fn unknown_movement_type_code_falls_back_to_an_active_type() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-006", None).await;

    let change = app
        .state
        .services
        .movements
        .register_entry(RecordMovementInput {
            movement_type_code: "NO-SUCH-CODE".to_string(),
            ..entry_input(article.id, dec!(2))
        })
        .await
        .expect("fallback movement type");

    assert_eq!(change.article.stock_current, dec!(2));
}

#[tokio::test]
async fn empty_movement_type_catalog_is_a_hard_error() {
    let app = TestApp::new_unseeded().await;
    let article = app.seed_article("ART-007", None).await;

    let err = app
        .state
        .services
        .movements
        .register_entry(entry_input(article.id, dec!(1)))
        .await
        .expect_err("no movement types configured");
    assert!(matches!(err, ServiceError::ValidationError(_)), "{err}");
    assert_eq!(app.reload_article(article.id).await.stock_current, dec!(0));
}

#[tokio::test]
async fn movements_against_deleted_articles_are_rejected() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-008", None).await;
    app.state
        .services
        .items
        .soft_delete_article(article.id, ACTOR)
        .await
        .expect("soft delete");

    let err = app
        .state
        .services
        .movements
        .register_entry(entry_input(article.id, dec!(1)))
        .await
        .expect_err("deleted article");
    assert!(matches!(err, ServiceError::NotFound(_)), "{err}");
}

#[tokio::test]
async fn articles_with_stock_cannot_be_soft_deleted() {
    let app = TestApp::new().await;
    let article = app.seed_article("ART-009", None).await;
    app.stock_up(article.id, dec!(1)).await;

    let err = app
        .state
        .services
        .items
        .soft_delete_article(article.id, ACTOR)
        .await
        .expect_err("stock on hand");
    assert!(matches!(err, ServiceError::InvalidOperation(_)), "{err}");
}
