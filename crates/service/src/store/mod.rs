//! Document store gateway: the repository trait the HTTP surface depends on,
//! plus its MongoDB implementation.

pub mod mongo;
pub mod repository;

pub use mongo::MongoCatalogRepository;
pub use repository::CatalogRepository;
