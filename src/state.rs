use tokio::sync::broadcast;

use crate::models::courier::Courier;
use crate::models::event::OrderEvent;
use crate::models::order::DeliveryOrder;
use crate::models::payment::Payment;
use crate::observability::metrics::Metrics;
use crate::store::Store;

/// Shared root of the system: the entity stores, the lifecycle event
/// channel, and the metrics registry. Wrapped in an `Arc` by the caller.
pub struct AppState {
    pub orders: Store<DeliveryOrder>,
    pub couriers: Store<Courier>,
    pub payments: Store<Payment>,
    pub events_tx: broadcast::Sender<OrderEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders: Store::new(),
            couriers: Store::new(),
            payments: Store::new(),
            events_tx,
            metrics: Metrics::new(),
        }
    }
}
