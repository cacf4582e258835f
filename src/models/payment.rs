use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PaymentMode {
    Cash,
    Upi,
    Wallet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: f64,
    pub mode: PaymentMode,
    pub collected_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(order_id: Uuid, amount: f64, mode: PaymentMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            amount,
            mode,
            collected_at: Utc::now(),
        }
    }
}
