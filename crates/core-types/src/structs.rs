use crate::enums::{ProcessingStatus, ServiceType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single customer job record: the unit everything else in the system
/// filters, ranks and aggregates.
///
/// Field names are serialized in camelCase to match the JSON wire format the
/// web clients already speak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Internal identifier, immutable once assigned.
    pub id: Uuid,
    /// Sequential display identifier, assigned once at creation (max + 1,
    /// starting at 1). Never reused or renumbered.
    pub queue_number: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_type: ServiceType,
    pub notes: Option<String>,
    /// When the customer collects the garment. Drives urgency scoring.
    pub pickup_date: DateTime<Utc>,
    pub price: Decimal,
    /// True once the order has been paid.
    pub payment_status: bool,
    pub processing_status: ProcessingStatus,
    /// References to attached garment images, in upload order (at most 5).
    /// The first entry is used as the thumbnail.
    pub image_refs: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The payload for creating a new order. The store assigns the id, the queue
/// number and both timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_type: ServiceType,
    #[serde(default)]
    pub notes: Option<String>,
    pub pickup_date: DateTime<Utc>,
    pub price: Decimal,
    #[serde(default)]
    pub payment_status: bool,
    #[serde(default = "default_processing_status")]
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub image_refs: Vec<Uuid>,
}

fn default_processing_status() -> ProcessingStatus {
    ProcessingStatus::NotStarted
}

/// A partial update to an existing order. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub pickup_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<bool>,
    #[serde(default)]
    pub processing_status: Option<ProcessingStatus>,
    #[serde(default)]
    pub image_refs: Option<Vec<Uuid>>,
}

/// A stored garment image: the binary content plus its metadata.
///
/// Images are created standalone on upload (possibly before their order
/// exists) and linked afterwards via the nullable `order_id` back-reference.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The payload for storing a freshly uploaded image.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub order_id: Option<Uuid>,
}
