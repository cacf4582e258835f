use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OrderStatus {
    Pending,
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOrder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub category: String,
    pub status: OrderStatus,
    pub assigned_courier: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub payment_id: Option<Uuid>,
}

impl DeliveryOrder {
    pub fn new(customer_id: Uuid, category: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            category,
            status: OrderStatus::Pending,
            assigned_courier: None,
            created_at: Utc::now(),
            picked_up_at: None,
            delivered_at: None,
            payment_id: None,
        }
    }

    /// Once a courier has picked an order up it can no longer be cancelled.
    pub fn can_be_cancelled(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Assigned)
    }
}
