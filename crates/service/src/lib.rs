//! Service layer between the HTTP surface and the document store.
//! - `token`: stateless JWT issuance and verification.
//! - `store`: the catalog/reviews repository trait, its MongoDB
//!   implementation, and an in-memory mock for tests.

pub mod errors;
pub mod store;
pub mod token;

pub use store::repository::CatalogRepository;
pub use token::TokenService;
