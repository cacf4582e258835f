use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::engine::assignment::AssignmentEngine;
use crate::error::DispatchError;
use crate::models::event::EventKind;
use crate::models::order::{DeliveryOrder, OrderStatus};
use crate::services::notifications;
use crate::state::AppState;

/// The order state machine: Pending -> Assigned -> PickedUp -> Delivered,
/// with Cancelled reachable from Pending and Assigned only. All transitions
/// validate under the order's entry lock; of two racing requests, the loser
/// sees the new status and gets an `InvalidTransition`.
pub struct OrderLifecycle {
    state: Arc<AppState>,
    engine: Arc<AssignmentEngine>,
    allowed_categories: HashSet<String>,
}

impl OrderLifecycle {
    pub fn new(
        state: Arc<AppState>,
        engine: Arc<AssignmentEngine>,
        allowed_categories: HashSet<String>,
    ) -> Self {
        Self {
            state,
            engine,
            allowed_categories,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the order and immediately attempts a match. The returned
    /// snapshot is Assigned on an immediate match or Pending when queued;
    /// both are successful placements.
    pub fn place(&self, customer_id: Uuid, category: &str) -> Result<DeliveryOrder, DispatchError> {
        let category = category.trim().to_uppercase();
        if !self.allowed_categories.contains(&category) {
            return Err(DispatchError::InvalidItem(format!(
                "category {category} is not deliverable"
            )));
        }

        let order = DeliveryOrder::new(customer_id, category);
        let order_id = order.id;
        self.state.orders.insert(order_id, order);

        info!(%order_id, %customer_id, "order placed");
        notifications::publish(&self.state, order_id, None, EventKind::Placed);

        self.engine.try_assign(order_id);

        self.state
            .orders
            .get(&order_id)
            .ok_or_else(|| DispatchError::NotFound(format!("order {order_id} not found")))
    }

    pub fn cancel(&self, order_id: Uuid) -> Result<(), DispatchError> {
        self.cancel_impl(order_id, false)
    }

    /// Expiry variant of cancel: only a still-Pending order may age out, and
    /// that guard holds under the same entry lock as the status change.
    pub(crate) fn expire(&self, order_id: Uuid) -> Result<(), DispatchError> {
        self.cancel_impl(order_id, true)
    }

    fn cancel_impl(&self, order_id: Uuid, pending_only: bool) -> Result<(), DispatchError> {
        let released = self
            .state
            .orders
            .update(&order_id, |order| {
                let cancellable = if pending_only {
                    order.status == OrderStatus::Pending
                } else {
                    order.can_be_cancelled()
                };

                if !cancellable {
                    return Err(DispatchError::InvalidTransition(format!(
                        "order {order_id} cannot be cancelled from {:?}",
                        order.status
                    )));
                }

                order.status = OrderStatus::Cancelled;
                Ok(order.assigned_courier.take())
            })
            .ok_or_else(|| DispatchError::NotFound(format!("order {order_id} not found")))??;

        match released {
            Some(courier_id) => self.engine.release_and_rescan(courier_id)?,
            None => self.engine.withdraw(order_id),
        }

        info!(%order_id, "order cancelled");
        notifications::publish(&self.state, order_id, released, EventKind::Cancelled);
        Ok(())
    }

    pub fn pickup(&self, order_id: Uuid) -> Result<(), DispatchError> {
        let courier_id = self
            .state
            .orders
            .update(&order_id, |order| {
                if order.status != OrderStatus::Assigned {
                    return Err(DispatchError::InvalidTransition(format!(
                        "order {order_id} cannot be picked up from {:?}",
                        order.status
                    )));
                }

                order.status = OrderStatus::PickedUp;
                order.picked_up_at = Some(Utc::now());
                Ok(order.assigned_courier)
            })
            .ok_or_else(|| DispatchError::NotFound(format!("order {order_id} not found")))??;

        info!(%order_id, "order picked up");
        notifications::publish(&self.state, order_id, courier_id, EventKind::PickedUp);
        Ok(())
    }

    /// Completes the order, credits the courier, and hands it straight back
    /// to the engine so the backlog head is matched without a new placement.
    pub fn deliver(&self, order_id: Uuid) -> Result<(), DispatchError> {
        let courier_id = self
            .state
            .orders
            .update(&order_id, |order| {
                if order.status != OrderStatus::PickedUp {
                    return Err(DispatchError::InvalidTransition(format!(
                        "order {order_id} cannot be delivered from {:?}",
                        order.status
                    )));
                }

                order.status = OrderStatus::Delivered;
                order.delivered_at = Some(Utc::now());
                Ok(order.assigned_courier.take())
            })
            .ok_or_else(|| DispatchError::NotFound(format!("order {order_id} not found")))??;

        self.state.metrics.deliveries_total.inc();

        if let Some(courier_id) = courier_id {
            self.state.couriers.update(&courier_id, |courier| {
                courier.completed_orders += 1;
            });
            self.engine.release_and_rescan(courier_id)?;
        }

        info!(%order_id, "order delivered");
        notifications::publish(&self.state, order_id, courier_id, EventKind::Delivered);
        Ok(())
    }
}
