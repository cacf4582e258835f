use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::engine::lifecycle::OrderLifecycle;
use crate::models::order::OrderStatus;

/// Background task cancelling Pending orders that outlived the expiry
/// threshold. Runs until the owning task handle is dropped or aborted.
pub async fn run_expiry_sweeper(
    lifecycle: Arc<OrderLifecycle>,
    sweep_interval: Duration,
    max_age: chrono::Duration,
) {
    info!(interval_secs = sweep_interval.as_secs(), "expiry sweeper started");

    let mut ticker = tokio::time::interval(sweep_interval);
    loop {
        ticker.tick().await;
        sweep_once(&lifecycle, max_age);
    }
}

/// One scan-and-cancel pass over a snapshot of the order store. Only
/// unmatched Pending orders age out; Assigned and PickedUp orders are never
/// touched. Cancel failures are swallowed: nobody is waiting on a sweep.
pub fn sweep_once(lifecycle: &OrderLifecycle, max_age: chrono::Duration) -> usize {
    let cutoff = Utc::now() - max_age;
    let mut expired = 0;

    for order in lifecycle.state().orders.snapshot() {
        if order.status != OrderStatus::Pending || order.created_at >= cutoff {
            continue;
        }

        match lifecycle.expire(order.id) {
            Ok(()) => {
                expired += 1;
                lifecycle.state().metrics.orders_expired_total.inc();
                info!(order_id = %order.id, "pending order expired");
            }
            // Lost a race with a cancel or an assignment since the snapshot.
            Err(err) => {
                debug!(order_id = %order.id, error = %err, "expiry sweep skipped order");
            }
        }
    }

    expired
}
