//! Domain types shared across the workspace.
//! - JSON-facing documents for the catalog (services) and reviews collections.
//! - The identifier codec between external hex strings and store ObjectIds.
//! - Operation outcomes echoed back to API callers.

pub mod catalog;
pub mod errors;
pub mod id;
pub mod outcome;
pub mod review;

pub use catalog::{NewService, ServiceItem};
pub use id::DocumentId;
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use review::{NewReview, Review, ReviewPatch};
