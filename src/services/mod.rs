pub mod audit;
pub mod catalogs;
pub mod deliveries;
pub mod items;
pub mod movements;
pub mod numbering;
pub mod receptions;
pub mod statuses;
pub mod stock;

pub use catalogs::CatalogService;
pub use deliveries::DeliveryService;
pub use items::ItemService;
pub use movements::MovementService;
pub use receptions::ReceptionService;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

/// All services wired against one database pool and one event channel.
pub struct AppServices {
    pub catalogs: CatalogService,
    pub items: ItemService,
    pub movements: MovementService,
    pub deliveries: DeliveryService,
    pub receptions: ReceptionService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            catalogs: CatalogService::new(db_pool.clone(), event_sender.clone()),
            items: ItemService::new(db_pool.clone(), event_sender.clone()),
            movements: MovementService::new(db_pool.clone(), event_sender.clone()),
            deliveries: DeliveryService::new(db_pool.clone(), event_sender.clone()),
            receptions: ReceptionService::new(db_pool, event_sender),
        }
    }
}
