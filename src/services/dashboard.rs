use crate::models::courier::Courier;
use crate::state::AppState;

/// Read-only views for reporting. Both work on a store snapshot; nothing
/// here iterates while holding a store lock.
pub fn top_couriers_by_rating(state: &AppState, limit: usize) -> Vec<Courier> {
    let mut couriers = state.couriers.snapshot();
    couriers.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    couriers.truncate(limit);
    couriers
}

pub fn top_couriers_by_deliveries(state: &AppState, limit: usize) -> Vec<Courier> {
    let mut couriers = state.couriers.snapshot();
    couriers.sort_by_key(|courier| std::cmp::Reverse(courier.completed_orders));
    couriers.truncate(limit);
    couriers
}
