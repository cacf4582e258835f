use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventKind {
    Placed,
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
}

/// Broadcast to subscribers on every successful state transition.
/// Best-effort: slow or absent subscribers never block an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub kind: EventKind,
    pub at: DateTime<Utc>,
}
