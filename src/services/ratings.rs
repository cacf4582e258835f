use uuid::Uuid;

use crate::error::DispatchError;
use crate::state::AppState;

/// Records a 1-5 score for a courier and returns the new average. A courier
/// can only be rated once at least one of its orders reached Delivered.
pub fn rate_courier(state: &AppState, courier_id: Uuid, score: u8) -> Result<f64, DispatchError> {
    if !(1..=5).contains(&score) {
        return Err(DispatchError::InvalidRating(format!(
            "score must be between 1 and 5, got {score}"
        )));
    }

    state
        .couriers
        .update(&courier_id, |courier| {
            if courier.completed_orders == 0 {
                return Err(DispatchError::InvalidRating(format!(
                    "courier {courier_id} has no delivered orders to rate"
                )));
            }

            courier.record_rating(score);
            Ok(courier.rating())
        })
        .ok_or_else(|| DispatchError::NotFound(format!("courier {courier_id} not found")))?
}
