use tracing::info;
use uuid::Uuid;

use crate::error::DispatchError;
use crate::models::payment::{Payment, PaymentMode};
use crate::state::AppState;

/// Collects payment for an order. Idempotent: a repeated collection returns
/// the already-recorded payment. Payment is never a precondition for
/// delivery, and a failed collection rolls nothing back.
pub fn process_payment(
    state: &AppState,
    order_id: Uuid,
    amount: f64,
    mode: PaymentMode,
) -> Result<Payment, DispatchError> {
    let order = state
        .orders
        .get(&order_id)
        .ok_or_else(|| DispatchError::NotFound(format!("order {order_id} not found")))?;

    if let Some(payment_id) = order.payment_id {
        if let Some(existing) = state.payments.get(&payment_id) {
            info!(%order_id, payment_id = %existing.id, "order already paid");
            return Ok(existing);
        }
    }

    let payment = Payment::new(order_id, amount, mode);
    state.payments.insert(payment.id, payment.clone());
    state.orders.update(&order_id, |order| {
        order.payment_id = Some(payment.id);
    });

    info!(%order_id, payment_id = %payment.id, amount, mode = ?payment.mode, "payment collected");
    Ok(payment)
}
