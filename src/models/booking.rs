use serde::{Deserialize, Serialize, ser::Error as _};
use serde_json::{Map, Value};

use super::quote::Quote;

pub const CAPTURE_STATUS_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub listing_id: String,
    pub guest_id: String,
    pub quantity: u32,
    pub quote: Quote,
    pub capture_id: String,
    pub status: BookingStatus,
}

impl Booking {
    pub fn to_document(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(doc) => Ok(doc),
            _ => Err(serde_json::Error::custom("booking is not a JSON object")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub id: String,
    pub status: String,
}

impl CaptureResult {
    pub fn is_completed(&self) -> bool {
        self.status == CAPTURE_STATUS_COMPLETED
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}
