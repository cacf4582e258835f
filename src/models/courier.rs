use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CourierStatus {
    Free,
    Busy,
}

/// A courier is Busy iff exactly one live order references it; that order's
/// id sits in `current_order` for as long as the binding holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    pub id: Uuid,
    pub name: String,
    pub status: CourierStatus,
    pub current_order: Option<Uuid>,
    pub rating_sum: u32,
    pub rating_count: u32,
    pub completed_orders: u32,
    pub registered_at: DateTime<Utc>,
}

impl Courier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: CourierStatus::Free,
            current_order: None,
            rating_sum: 0,
            rating_count: 0,
            completed_orders: 0,
            registered_at: Utc::now(),
        }
    }

    /// Average score, 0.0 while unrated.
    pub fn rating(&self) -> f64 {
        if self.rating_count == 0 {
            0.0
        } else {
            f64::from(self.rating_sum) / f64::from(self.rating_count)
        }
    }

    pub fn record_rating(&mut self, score: u8) {
        self.rating_sum += u32::from(score);
        self.rating_count += 1;
    }
}
