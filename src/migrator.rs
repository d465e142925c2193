use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_catalog_tables::Migration),
            Box::new(m20240101_000002_create_item_tables::Migration),
            Box::new(m20240101_000003_create_stock_movements_table::Migration),
            Box::new(m20240101_000004_create_request_tables::Migration),
            Box::new(m20240101_000005_create_purchase_order_tables::Migration),
            Box::new(m20240101_000006_create_delivery_tables::Migration),
            Box::new(m20240101_000007_create_reception_tables::Migration),
            Box::new(m20240101_000008_create_counters_and_audit_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (table, cols) in [
                (Categories::Table.into_table_ref(), Categories::iden_cols()),
                (Locations::Table.into_table_ref(), Locations::iden_cols()),
                (
                    MovementTypes::Table.into_table_ref(),
                    MovementTypes::iden_cols(),
                ),
                (
                    DeliveryTypes::Table.into_table_ref(),
                    DeliveryTypes::iden_cols(),
                ),
            ] {
                let mut stmt = Table::create();
                stmt.table(table).if_not_exists();
                for col in cols {
                    stmt.col(col);
                }
                manager.create_table(stmt.to_owned()).await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(DocumentStatuses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DocumentStatuses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DocumentStatuses::Code).string().not_null())
                        .col(ColumnDef::new(DocumentStatuses::Name).string().not_null())
                        .col(
                            ColumnDef::new(DocumentStatuses::Domain)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::IsInitial)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::IsTerminal)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::IsCancelled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DocumentStatuses::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_document_statuses_domain_code")
                        .table(DocumentStatuses::Table)
                        .col(DocumentStatuses::Domain)
                        .col(DocumentStatuses::Code)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                DocumentStatuses::Table.into_table_ref(),
                DeliveryTypes::Table.into_table_ref(),
                MovementTypes::Table.into_table_ref(),
                Locations::Table.into_table_ref(),
                Categories::Table.into_table_ref(),
            ] {
                manager
                    .drop_table(Table::drop().table(table).if_exists().to_owned())
                    .await?;
            }
            Ok(())
        }
    }

    /// The four plain catalogs share one column layout.
    macro_rules! catalog_iden {
        ($name:ident) => {
            #[derive(DeriveIden)]
            pub enum $name {
                Table,
                Id,
                Code,
                Name,
                Description,
                Active,
                Deleted,
                CreatedAt,
                UpdatedAt,
            }

            impl $name {
                pub fn iden_cols() -> Vec<ColumnDef> {
                    vec![
                        ColumnDef::new($name::Id).uuid().primary_key().not_null().to_owned(),
                        ColumnDef::new($name::Code)
                            .string()
                            .not_null()
                            .unique_key()
                            .to_owned(),
                        ColumnDef::new($name::Name).string().not_null().to_owned(),
                        ColumnDef::new($name::Description).string().null().to_owned(),
                        ColumnDef::new($name::Active)
                            .boolean()
                            .not_null()
                            .default(true)
                            .to_owned(),
                        ColumnDef::new($name::Deleted)
                            .boolean()
                            .not_null()
                            .default(false)
                            .to_owned(),
                        ColumnDef::new($name::CreatedAt).timestamp().not_null().to_owned(),
                        ColumnDef::new($name::UpdatedAt).timestamp().not_null().to_owned(),
                    ]
                }
            }
        };
    }

    catalog_iden!(Categories);
    catalog_iden!(Locations);
    catalog_iden!(MovementTypes);
    catalog_iden!(DeliveryTypes);

    #[derive(DeriveIden)]
    pub enum DocumentStatuses {
        Table,
        Id,
        Code,
        Name,
        Domain,
        IsInitial,
        IsTerminal,
        IsCancelled,
        Active,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_item_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_item_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Articles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Articles::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Articles::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Articles::Name).string().not_null())
                        .col(ColumnDef::new(Articles::Description).string().null())
                        .col(ColumnDef::new(Articles::Unit).string().not_null())
                        .col(ColumnDef::new(Articles::Brand).string().null())
                        .col(ColumnDef::new(Articles::CategoryId).uuid().null())
                        .col(ColumnDef::new(Articles::LocationId).uuid().null())
                        .col(
                            ColumnDef::new(Articles::StockCurrent)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Articles::StockMin)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Articles::StockMax).decimal_len(12, 2).null())
                        .col(
                            ColumnDef::new(Articles::ReorderPoint)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Articles::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Articles::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Articles::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Articles::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_articles_category_id")
                        .table(Articles::Table)
                        .col(Articles::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Assets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Assets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Assets::Code).string().not_null().unique_key())
                        .col(ColumnDef::new(Assets::Name).string().not_null())
                        .col(ColumnDef::new(Assets::Description).string().null())
                        .col(ColumnDef::new(Assets::SerialNumber).string().null())
                        .col(
                            ColumnDef::new(Assets::RequiresSerial)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Assets::Workshop).string().null())
                        .col(ColumnDef::new(Assets::Provenance).string().null())
                        .col(ColumnDef::new(Assets::LocationId).uuid().null())
                        .col(
                            ColumnDef::new(Assets::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Assets::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Assets::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Assets::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Assets::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Articles::Table).if_exists().to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum Articles {
        Table,
        Id,
        Code,
        Name,
        Description,
        Unit,
        Brand,
        CategoryId,
        LocationId,
        StockCurrent,
        StockMin,
        StockMax,
        ReorderPoint,
        Active,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Assets {
        Table,
        Id,
        Code,
        Name,
        Description,
        SerialNumber,
        RequiresSerial,
        Workshop,
        Provenance,
        LocationId,
        Active,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_stock_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_stock_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::ArticleId).uuid().not_null())
                        .col(
                            ColumnDef::new(StockMovements::MovementTypeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::Operation)
                                .string_len(8)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::StockBefore)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::StockAfter)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::PerformedBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Reason).string().not_null())
                        .col(
                            ColumnDef::new(StockMovements::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_article_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::ArticleId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(StockMovements::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum StockMovements {
        Table,
        Id,
        ArticleId,
        MovementTypeId,
        Operation,
        Quantity,
        StockBefore,
        StockAfter,
        PerformedBy,
        Reason,
        CreatedAt,
    }
}

mod m20240101_000004_create_request_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_request_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Requests::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Requests::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Requests::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Requests::RequestedBy).uuid().not_null())
                        .col(ColumnDef::new(Requests::StatusId).uuid().not_null())
                        .col(ColumnDef::new(Requests::Notes).string().null())
                        .col(ColumnDef::new(Requests::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Requests::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RequestLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RequestLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RequestLines::RequestId).uuid().not_null())
                        .col(ColumnDef::new(RequestLines::ArticleId).uuid().not_null())
                        .col(
                            ColumnDef::new(RequestLines::QuantityRequested)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestLines::QuantityApproved)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(RequestLines::QuantityDispatched)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(RequestLines::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(RequestLines::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequestLines::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_request_lines_request_id")
                        .table(RequestLines::Table)
                        .col(RequestLines::RequestId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(RequestLines::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(Requests::Table).if_exists().to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum Requests {
        Table,
        Id,
        Number,
        RequestedBy,
        StatusId,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum RequestLines {
        Table,
        Id,
        RequestId,
        ArticleId,
        QuantityRequested,
        QuantityApproved,
        QuantityDispatched,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_purchase_order_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::RequestedBy).uuid().not_null())
                        .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Notes).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrderLines::ArticleId).uuid().null())
                        .col(ColumnDef::new(PurchaseOrderLines::AssetId).uuid().null())
                        .col(
                            ColumnDef::new(PurchaseOrderLines::QuantityOrdered)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::QuantityReceived)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_order_lines_order_id")
                        .table(PurchaseOrderLines::Table)
                        .col(PurchaseOrderLines::PurchaseOrderId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(PurchaseOrderLines::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(PurchaseOrders::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum PurchaseOrders {
        Table,
        Id,
        Number,
        SupplierName,
        RequestedBy,
        OrderDate,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum PurchaseOrderLines {
        Table,
        Id,
        PurchaseOrderId,
        ArticleId,
        AssetId,
        QuantityOrdered,
        QuantityReceived,
        UnitPrice,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_delivery_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_delivery_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Deliveries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Deliveries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Deliveries::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Deliveries::Kind).string_len(16).not_null())
                        .col(ColumnDef::new(Deliveries::DeliveryTypeId).uuid().not_null())
                        .col(ColumnDef::new(Deliveries::StatusId).uuid().not_null())
                        .col(ColumnDef::new(Deliveries::SourceLocationId).uuid().null())
                        .col(ColumnDef::new(Deliveries::DeliveredBy).uuid().not_null())
                        .col(ColumnDef::new(Deliveries::ReceivedBy).uuid().not_null())
                        .col(ColumnDef::new(Deliveries::RequestId).uuid().null())
                        .col(ColumnDef::new(Deliveries::Reason).string().not_null())
                        .col(ColumnDef::new(Deliveries::Notes).string().null())
                        .col(ColumnDef::new(Deliveries::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Deliveries::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryLines::DeliveryId).uuid().not_null())
                        .col(ColumnDef::new(DeliveryLines::ArticleId).uuid().null())
                        .col(ColumnDef::new(DeliveryLines::AssetId).uuid().null())
                        .col(ColumnDef::new(DeliveryLines::RequestLineId).uuid().null())
                        .col(
                            ColumnDef::new(DeliveryLines::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryLines::Lot).string().null())
                        .col(ColumnDef::new(DeliveryLines::SerialNumber).string().null())
                        .col(
                            ColumnDef::new(DeliveryLines::PhysicalCondition)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(DeliveryLines::Notes).string().null())
                        .col(
                            ColumnDef::new(DeliveryLines::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_delivery_lines_delivery_id")
                        .table(DeliveryLines::Table)
                        .col(DeliveryLines::DeliveryId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(DeliveryLines::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(Deliveries::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum Deliveries {
        Table,
        Id,
        Number,
        Kind,
        DeliveryTypeId,
        StatusId,
        SourceLocationId,
        DeliveredBy,
        ReceivedBy,
        RequestId,
        Reason,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum DeliveryLines {
        Table,
        Id,
        DeliveryId,
        ArticleId,
        AssetId,
        RequestLineId,
        Quantity,
        Lot,
        SerialNumber,
        PhysicalCondition,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000007_create_reception_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_reception_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Receptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Receptions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Receptions::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Receptions::Kind).string_len(16).not_null())
                        .col(ColumnDef::new(Receptions::StatusId).uuid().not_null())
                        .col(ColumnDef::new(Receptions::LocationId).uuid().null())
                        .col(ColumnDef::new(Receptions::ReceivedBy).uuid().not_null())
                        .col(ColumnDef::new(Receptions::PurchaseOrderId).uuid().null())
                        .col(
                            ColumnDef::new(Receptions::ReferenceDocument)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Receptions::Notes).string().null())
                        .col(ColumnDef::new(Receptions::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Receptions::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ReceptionLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReceptionLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceptionLines::ReceptionId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReceptionLines::ArticleId).uuid().null())
                        .col(ColumnDef::new(ReceptionLines::AssetId).uuid().null())
                        .col(
                            ColumnDef::new(ReceptionLines::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReceptionLines::Lot).string().null())
                        .col(ColumnDef::new(ReceptionLines::ExpiryDate).date().null())
                        .col(ColumnDef::new(ReceptionLines::SerialNumber).string().null())
                        .col(ColumnDef::new(ReceptionLines::Notes).string().null())
                        .col(
                            ColumnDef::new(ReceptionLines::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reception_lines_reception_id")
                        .table(ReceptionLines::Table)
                        .col(ReceptionLines::ReceptionId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(ReceptionLines::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(Receptions::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum Receptions {
        Table,
        Id,
        Number,
        Kind,
        StatusId,
        LocationId,
        ReceivedBy,
        PurchaseOrderId,
        ReferenceDocument,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum ReceptionLines {
        Table,
        Id,
        ReceptionId,
        ArticleId,
        AssetId,
        Quantity,
        Lot,
        ExpiryDate,
        SerialNumber,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000008_create_counters_and_audit_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_counters_and_audit_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DocumentCounters::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(DocumentCounters::Prefix).string().not_null())
                        .col(
                            ColumnDef::new(DocumentCounters::DateKey)
                                .string_len(8)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DocumentCounters::LastValue)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(DocumentCounters::Prefix)
                                .col(DocumentCounters::DateKey),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AuditLog::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(AuditLog::EntityType).string().not_null())
                        .col(ColumnDef::new(AuditLog::EntityId).uuid().not_null())
                        .col(ColumnDef::new(AuditLog::Action).string().not_null())
                        .col(ColumnDef::new(AuditLog::Actor).uuid().not_null())
                        .col(ColumnDef::new(AuditLog::Details).json().null())
                        .col(ColumnDef::new(AuditLog::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_audit_log_entity")
                        .table(AuditLog::Table)
                        .col(AuditLog::EntityType)
                        .col(AuditLog::EntityId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLog::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(DocumentCounters::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    pub enum DocumentCounters {
        Table,
        Prefix,
        DateKey,
        LastValue,
    }

    #[derive(DeriveIden)]
    pub enum AuditLog {
        Table,
        Id,
        EntityType,
        EntityId,
        Action,
        Actor,
        Details,
        CreatedAt,
    }
}
