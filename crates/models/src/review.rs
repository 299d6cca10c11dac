use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review as returned to API callers. `service_id` is an opaque reference;
/// a dangling reference to a missing service is permitted.
///
/// Fields other than the identifier default when absent so that documents
/// created by an upsert (which writes only `review`/`rating`) still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "serviceId", default)]
    pub service_id: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub rating: i32,
    /// Descending sort key; stored as an RFC 3339 timestamp.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Request body for `POST /reviews`. A missing `date` is filled with the
/// insertion time by the store gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub review: String,
    pub rating: i32,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Request body for `PUT /myreview/:id`; only message and rating are mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPatch {
    pub review: String,
    pub rating: i32,
}
