use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::models::event::{EventKind, OrderEvent};
use crate::state::AppState;

/// Fire-and-forget transition notification: a trace line plus a broadcast to
/// whoever is subscribed. A send with no live subscribers is normal and
/// never surfaces to the caller.
pub fn publish(state: &AppState, order_id: Uuid, courier_id: Option<Uuid>, kind: EventKind) {
    let event = OrderEvent {
        order_id,
        courier_id,
        kind,
        at: Utc::now(),
    };

    debug!(%order_id, kind = ?event.kind, "publishing order event");
    let _ = state.events_tx.send(event);
}
