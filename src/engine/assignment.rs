use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::matching::MatchingStrategy;
use crate::error::DispatchError;
use crate::models::courier::{Courier, CourierStatus};
use crate::models::event::EventKind;
use crate::models::order::OrderStatus;
use crate::services::notifications;
use crate::state::AppState;

/// Result of a placement attempt. Queued is a success: the order waits in
/// the backlog until a courier frees up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Assigned(Uuid),
    Queued,
}

/// Binds orders to couriers. The mutex guards the backlog and every courier
/// availability flip, so exactly one placement or freed-courier event can
/// claim a given courier; racing callers see each other's writes in their
/// own locked snapshot.
pub struct AssignmentEngine {
    state: Arc<AppState>,
    strategy: Box<dyn MatchingStrategy>,
    backlog: Mutex<VecDeque<Uuid>>,
}

impl AssignmentEngine {
    pub fn new(state: Arc<AppState>, strategy: Box<dyn MatchingStrategy>) -> Self {
        Self {
            state,
            strategy,
            backlog: Mutex::new(VecDeque::new()),
        }
    }

    /// Matches a freshly placed order against the current Free couriers, or
    /// appends it to the backlog tail.
    pub fn try_assign(&self, order_id: Uuid) -> AssignmentOutcome {
        let (outcome, queued_depth) = {
            let mut backlog = self.backlog.lock();

            match self.strategy.select(&self.free_couriers()) {
                Some(courier_id) if self.bind(order_id, courier_id) => {
                    (AssignmentOutcome::Assigned(courier_id), None)
                }
                // The order left Pending before we got the lock (concurrent
                // cancel or expiry); it is terminal, nothing to bind or queue.
                Some(_) => (AssignmentOutcome::Queued, None),
                None => {
                    backlog.push_back(order_id);
                    (AssignmentOutcome::Queued, Some(backlog.len()))
                }
            }
        };

        match outcome {
            AssignmentOutcome::Assigned(courier_id) => {
                self.state
                    .metrics
                    .assignments_total
                    .with_label_values(&["matched"])
                    .inc();
                info!(%order_id, %courier_id, "order assigned");
                notifications::publish(&self.state, order_id, Some(courier_id), EventKind::Assigned);
            }
            AssignmentOutcome::Queued => {
                if let Some(depth) = queued_depth {
                    self.state.metrics.backlog_depth.set(depth as i64);
                    self.state
                        .metrics
                        .assignments_total
                        .with_label_values(&["queued"])
                        .inc();
                    info!(%order_id, depth, "no free courier, order queued");
                }
            }
        }

        outcome
    }

    /// Returns the courier to Free, then drains the backlog head-first while
    /// a Free courier and a queued order both exist.
    pub fn release_and_rescan(&self, courier_id: Uuid) -> Result<(), DispatchError> {
        let bound = {
            let mut backlog = self.backlog.lock();

            self.state
                .couriers
                .update(&courier_id, |courier| {
                    courier.status = CourierStatus::Free;
                    courier.current_order = None;
                })
                .ok_or_else(|| DispatchError::NotFound(format!("courier {courier_id} not found")))?;

            let bound = self.drain(&mut backlog);
            self.state.metrics.backlog_depth.set(backlog.len() as i64);
            bound
        };

        for (order_id, courier_id) in bound {
            self.state
                .metrics
                .assignments_total
                .with_label_values(&["matched"])
                .inc();
            info!(%order_id, %courier_id, "queued order assigned");
            notifications::publish(&self.state, order_id, Some(courier_id), EventKind::Assigned);
        }

        Ok(())
    }

    /// Drops a cancelled order from the backlog, if it is still queued.
    pub fn withdraw(&self, order_id: Uuid) {
        let mut backlog = self.backlog.lock();
        backlog.retain(|queued| *queued != order_id);
        self.state.metrics.backlog_depth.set(backlog.len() as i64);
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.lock().len()
    }

    /// Pops queued orders in strict arrival order. Events for the bindings
    /// made here are published by the caller once the lock is released.
    fn drain(&self, backlog: &mut VecDeque<Uuid>) -> Vec<(Uuid, Uuid)> {
        let mut bound = Vec::new();

        while let Some(order_id) = backlog.front().copied() {
            let Some(courier_id) = self.strategy.select(&self.free_couriers()) else {
                break;
            };

            backlog.pop_front();
            if self.bind(order_id, courier_id) {
                bound.push((order_id, courier_id));
            } else {
                // Stale entry: the order was cancelled or expired while it
                // waited. Drop it without consuming the courier.
                debug!(%order_id, "dropping stale backlog entry");
            }
        }

        bound
    }

    fn free_couriers(&self) -> Vec<Courier> {
        self.state
            .couriers
            .snapshot()
            .into_iter()
            .filter(|courier| courier.status == CourierStatus::Free)
            .collect()
    }

    /// Order side first, courier side second. The order entry lock re-checks
    /// Pending, so a cancel that already won is never overwritten.
    fn bind(&self, order_id: Uuid, courier_id: Uuid) -> bool {
        let bound = self
            .state
            .orders
            .update(&order_id, |order| {
                if order.status == OrderStatus::Pending {
                    order.status = OrderStatus::Assigned;
                    order.assigned_courier = Some(courier_id);
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false);

        if bound {
            self.state.couriers.update(&courier_id, |courier| {
                courier.status = CourierStatus::Busy;
                courier.current_order = Some(order_id);
            });
        }

        bound
    }
}
